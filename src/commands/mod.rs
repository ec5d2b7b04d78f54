pub mod help;
pub mod leaderboard;
pub mod lookup;
pub mod trivia;
