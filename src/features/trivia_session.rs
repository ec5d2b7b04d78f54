// Per-channel trivia round bookkeeping
//
// A channel is "busy" while a session holds it (running) or while a question
// is pending. Each pending question owns a one-shot sender; whoever removes the
// question from the map (a correct answer, the expiry timer or a cancel)
// is the one that resolves it, so exactly one outcome is ever produced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use tokio::sync::oneshot;
use tracing::debug;

use crate::features::questions::Question;

/// How a posted question ended
#[derive(Debug)]
pub enum Outcome {
    Answered { user: serenity::UserId, points: u32 },
    Expired(Arc<Question>),
    Cancelled,
}

/// A winning guess, returned to the message handler
#[derive(Debug)]
pub struct CorrectAnswer {
    pub question: Arc<Question>,
    pub points: u32,
}

#[derive(Debug)]
enum Resolution {
    Answered { user: serenity::UserId, points: u32 },
    Cancelled,
}

struct Pending {
    id: u64,
    question: Arc<Question>,
    resolve: oneshot::Sender<Resolution>,
}

#[derive(Default)]
struct ChannelRounds {
    /// Token of the session currently holding the channel
    session: Option<u64>,
    pending: Vec<Pending>,
}

impl ChannelRounds {
    fn is_idle(&self) -> bool {
        self.session.is_none() && self.pending.is_empty()
    }
}

/// Shared trivia state for every channel
#[derive(Default)]
pub struct TriviaSessions {
    channels: DashMap<serenity::ChannelId, ChannelRounds>,
    cooldowns: DashMap<serenity::GuildId, Instant>,
    next_id: AtomicU64,
}

impl TriviaSessions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Claim the channel for a session. None if a round is already active.
    pub fn begin(self: &Arc<Self>, channel: serenity::ChannelId) -> Option<SessionGuard> {
        let token = self.next_id();
        let mut rounds = self.channels.entry(channel).or_default();
        if !rounds.is_idle() {
            return None;
        }
        rounds.session = Some(token);
        debug!("Trivia session {} started in channel {}", token, channel);

        Some(SessionGuard {
            sessions: Arc::clone(self),
            channel,
            token,
        })
    }

    /// A session or a question is active in the channel
    pub fn is_busy(&self, channel: serenity::ChannelId) -> bool {
        self.channels
            .get(&channel)
            .is_some_and(|rounds| !rounds.is_idle())
    }

    fn holds(&self, channel: serenity::ChannelId, token: u64) -> bool {
        self.channels
            .get(&channel)
            .is_some_and(|rounds| rounds.session == Some(token))
    }

    /// Register a question for the session holding `guard`. None once the
    /// session was cancelled; the token is checked under the entry lock.
    pub fn post(self: &Arc<Self>, guard: &SessionGuard, question: Question) -> Option<PendingQuestion> {
        let channel = guard.channel;
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();

        {
            let mut rounds = self.channels.get_mut(&channel)?;
            if rounds.session != Some(guard.token) {
                return None;
            }
            rounds.pending.push(Pending {
                id,
                question: Arc::new(question),
                resolve: tx,
            });
        }

        Some(PendingQuestion {
            sessions: Arc::clone(self),
            channel,
            id,
            rx,
        })
    }

    /// Check a guess against the channel's pending questions. The first
    /// correct guess takes the question; later guesses find nothing.
    pub fn try_answer(
        &self,
        channel: serenity::ChannelId,
        user: serenity::UserId,
        guess: &str,
    ) -> Option<CorrectAnswer> {
        let (pending, points) = {
            let mut rounds = self.channels.get_mut(&channel)?;
            let (index, points) = rounds
                .pending
                .iter()
                .enumerate()
                .find_map(|(i, p)| p.question.check(guess).map(|points| (i, points)))?;

            let pending = rounds.pending.remove(index);
            let _ = pending.resolve.send(Resolution::Answered { user, points });
            (pending.question, points)
        };
        self.prune(channel);

        Some(CorrectAnswer {
            question: pending,
            points,
        })
    }

    /// Stop the session in the channel and drop every pending question.
    /// Returns how many questions were cancelled.
    pub fn cancel(&self, channel: serenity::ChannelId) -> usize {
        let cancelled = match self.channels.get_mut(&channel) {
            Some(mut rounds) => {
                rounds.session = None;
                let pending: Vec<Pending> = rounds.pending.drain(..).collect();
                let count = pending.len();
                for p in pending {
                    let _ = p.resolve.send(Resolution::Cancelled);
                }
                count
            }
            None => 0,
        };
        self.prune(channel);
        cancelled
    }

    /// Remove a question whose timer ran out, if nobody took it first
    fn expire(&self, channel: serenity::ChannelId, id: u64) -> Option<Arc<Question>> {
        let expired = {
            let mut rounds = self.channels.get_mut(&channel)?;
            let index = rounds.pending.iter().position(|p| p.id == id)?;
            rounds.pending.remove(index).question
        };
        self.prune(channel);
        Some(expired)
    }

    fn finish(&self, channel: serenity::ChannelId, token: u64) {
        if let Some(mut rounds) = self.channels.get_mut(&channel) {
            if rounds.session == Some(token) {
                rounds.session = None;
            }
        }
        self.prune(channel);
    }

    fn prune(&self, channel: serenity::ChannelId) {
        self.channels.remove_if(&channel, |_, rounds| rounds.is_idle());
    }

    /// Channels with an active session or question
    pub fn active_channels(&self) -> usize {
        self.channels.iter().filter(|r| !r.is_idle()).count()
    }

    /// Time left on the guild's `!trivia` cooldown
    pub fn cooldown_remaining(&self, guild: serenity::GuildId, cooldown: Duration) -> Option<Duration> {
        let started = *self.cooldowns.get(&guild)?;
        cooldown
            .checked_sub(started.elapsed())
            .filter(|left| !left.is_zero())
    }

    pub fn mark_cooldown(&self, guild: serenity::GuildId) {
        self.cooldowns.insert(guild, Instant::now());
    }
}

/// Held by a running session; dropping it frees the channel
pub struct SessionGuard {
    sessions: Arc<TriviaSessions>,
    channel: serenity::ChannelId,
    token: u64,
}

impl SessionGuard {
    /// False once the session was cancelled
    pub fn is_current(&self) -> bool {
        self.sessions.holds(self.channel, self.token)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.finish(self.channel, self.token);
        debug!("Trivia session {} ended in channel {}", self.token, self.channel);
    }
}

/// A posted question waiting to be answered, cancelled or to expire
pub struct PendingQuestion {
    sessions: Arc<TriviaSessions>,
    channel: serenity::ChannelId,
    id: u64,
    rx: oneshot::Receiver<Resolution>,
}

impl PendingQuestion {
    pub async fn wait(mut self, game_length: Duration) -> Outcome {
        match tokio::time::timeout(game_length, &mut self.rx).await {
            Ok(Ok(resolution)) => resolution.into(),
            Ok(Err(_)) => Outcome::Cancelled,
            Err(_) => match self.sessions.expire(self.channel, self.id) {
                Some(question) => Outcome::Expired(question),
                // Answered or cancelled right at the deadline
                None => self
                    .rx
                    .try_recv()
                    .map(Outcome::from)
                    .unwrap_or(Outcome::Cancelled),
            },
        }
    }
}

impl From<Resolution> for Outcome {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Answered { user, points } => Outcome::Answered { user, points },
            Resolution::Cancelled => Outcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::questions::{generate, QuestionKind};
    use crate::models::game_data::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn channel(n: u64) -> serenity::ChannelId {
        serenity::ChannelId::new(n)
    }

    fn user(n: u64) -> serenity::UserId {
        serenity::UserId::new(n)
    }

    /// Rune path question; the fixture only has Domination runes
    fn question() -> Question {
        let data = fixtures::game_data();
        let mut rng = StdRng::seed_from_u64(1);
        generate(QuestionKind::RunePath, &data, &mut rng).unwrap()
    }

    #[test]
    fn test_begin_blocks_duplicate_sessions() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        assert!(sessions.is_busy(channel(1)));
        assert!(sessions.begin(channel(1)).is_none());

        // other channels are independent
        let other = sessions.begin(channel(2)).unwrap();
        assert_eq!(sessions.active_channels(), 2);

        drop(guard);
        assert!(!sessions.is_busy(channel(1)));
        assert!(sessions.begin(channel(1)).is_some());
        drop(other);
    }

    #[test]
    fn test_pending_question_keeps_channel_busy() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        let _pending = sessions.post(&guard, question()).unwrap();
        drop(guard);

        // the session is gone but its question is still open
        assert!(sessions.is_busy(channel(1)));
        assert!(sessions.begin(channel(1)).is_none());
    }

    #[tokio::test]
    async fn test_first_correct_answer_wins() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        let pending = sessions.post(&guard, question()).unwrap();

        assert!(sessions.try_answer(channel(1), user(1), "precision").is_none());
        let correct = sessions.try_answer(channel(1), user(2), "domination").unwrap();
        assert_eq!(correct.points, 1);
        assert!(sessions.try_answer(channel(1), user(3), "domination").is_none());

        match pending.wait(Duration::from_secs(5)).await {
            Outcome::Answered { user: winner, points } => {
                assert_eq!(winner, user(2));
                assert_eq!(points, 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        drop(guard);
        assert!(!sessions.is_busy(channel(1)));
        assert_eq!(sessions.active_channels(), 0);
    }

    #[tokio::test]
    async fn test_unanswered_question_expires() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        let pending = sessions.post(&guard, question()).unwrap();

        match pending.wait(Duration::from_millis(20)).await {
            Outcome::Expired(q) => assert_eq!(q.display_answer, "Domination"),
            other => panic!("unexpected outcome {:?}", other),
        }
        // late answers find nothing
        assert!(sessions.try_answer(channel(1), user(1), "domination").is_none());
        drop(guard);
        assert!(!sessions.is_busy(channel(1)));
    }

    #[tokio::test]
    async fn test_answers_only_count_in_their_channel() {
        let sessions = TriviaSessions::new();
        let first_guard = sessions.begin(channel(1)).unwrap();
        let second_guard = sessions.begin(channel(2)).unwrap();
        let first = sessions.post(&first_guard, question()).unwrap();
        let second = sessions.post(&second_guard, question()).unwrap();

        assert!(sessions.try_answer(channel(3), user(1), "domination").is_none());
        assert!(sessions.try_answer(channel(2), user(1), "domination").is_some());

        assert!(matches!(
            second.wait(Duration::from_secs(5)).await,
            Outcome::Answered { .. }
        ));
        assert!(matches!(
            first.wait(Duration::from_millis(20)).await,
            Outcome::Expired(_)
        ));
    }

    #[tokio::test]
    async fn test_cancel_resolves_pending_and_stops_session() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        let pending = sessions.post(&guard, question()).unwrap();

        assert_eq!(sessions.cancel(channel(1)), 1);
        assert!(!guard.is_current());
        assert!(matches!(
            pending.wait(Duration::from_secs(5)).await,
            Outcome::Cancelled
        ));

        // a new session can start while the cancelled one is still unwinding
        let next = sessions.begin(channel(1)).unwrap();
        drop(guard);
        assert!(next.is_current());
        assert!(sessions.is_busy(channel(1)));
    }

    #[test]
    fn test_cancelled_session_cannot_post() {
        let sessions = TriviaSessions::new();
        let guard = sessions.begin(channel(1)).unwrap();
        assert!(guard.is_current());

        sessions.cancel(channel(1));
        assert!(sessions.post(&guard, question()).is_none());
        assert!(!sessions.is_busy(channel(1)));
        assert!(sessions.begin(channel(1)).is_some());
    }

    #[test]
    fn test_stale_session_cannot_post_into_new_one() {
        let sessions = TriviaSessions::new();
        let stale = sessions.begin(channel(1)).unwrap();
        sessions.cancel(channel(1));
        let current = sessions.begin(channel(1)).unwrap();

        assert!(sessions.post(&stale, question()).is_none());
        assert!(sessions.post(&current, question()).is_some());
    }

    #[test]
    fn test_cancel_idle_channel() {
        let sessions = TriviaSessions::new();
        assert_eq!(sessions.cancel(channel(9)), 0);
        assert_eq!(sessions.active_channels(), 0);
    }

    #[test]
    fn test_cooldown() {
        let sessions = TriviaSessions::new();
        let guild = serenity::GuildId::new(1);
        assert!(sessions.cooldown_remaining(guild, Duration::from_secs(30)).is_none());

        sessions.mark_cooldown(guild);
        let left = sessions.cooldown_remaining(guild, Duration::from_secs(30)).unwrap();
        assert!(left <= Duration::from_secs(30));
        assert!(sessions.cooldown_remaining(guild, Duration::ZERO).is_none());
    }
}
