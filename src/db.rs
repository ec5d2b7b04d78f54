// Persistent trivia scores (SQLite)

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub discord_id: u64,
    pub name: String,
    pub score: i64,
}

pub struct TriviaDb {
    conn: Mutex<Connection>,
}

impl TriviaDb {
    /// Open (or create) the score database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                discord_id INTEGER PRIMARY KEY,
                score INTEGER NOT NULL DEFAULT 0,
                name TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_score ON users(score DESC);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current score, None if the user never scored
    pub fn get_score(&self, discord_id: u64) -> Result<Option<i64>, DbError> {
        let score = self
            .conn()
            .query_row(
                "SELECT score FROM users WHERE discord_id = ?1",
                params![discord_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score)
    }

    /// Add points and refresh the stored name. Returns the new total.
    pub fn add_score(&self, discord_id: u64, points: i64, name: &str) -> Result<i64, DbError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO users (discord_id, score, name, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(discord_id) DO UPDATE SET
                score = score + excluded.score,
                name = excluded.name,
                updated_at = excluded.updated_at",
            params![discord_id as i64, points, name, now],
        )?;

        let total = conn.query_row(
            "SELECT score FROM users WHERE discord_id = ?1",
            params![discord_id as i64],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Highest scores first; ties by id
    pub fn get_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, DbError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT discord_id, name, score FROM users
             ORDER BY score DESC, discord_id ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ScoreEntry {
                discord_id: row.get::<_, i64>(0)? as u64,
                name: row.get(1)?,
                score: row.get(2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 1-based position on the leaderboard
    pub fn get_rank(&self, discord_id: u64) -> Result<Option<u64>, DbError> {
        let Some(score) = self.get_score(discord_id)? else {
            return Ok(None);
        };
        let ahead: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users
             WHERE score > ?1 OR (score = ?1 AND discord_id < ?2)",
            params![score, discord_id as i64],
            |row| row.get(0),
        )?;
        Ok(Some(ahead as u64 + 1))
    }
}
