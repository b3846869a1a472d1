//! # Feature: Activity Rewards
//!
//! Grants points for ordinary chat activity. Points live in SQLite; a per-user
//! cooldown held in a DashMap keeps message spam from farming them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info};
use serenity::async_trait;
use sqlite::{Connection, State};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Receives every non-command message author.
#[async_trait]
pub trait RewardSink: Send + Sync {
    /// Returns `true` when points were granted.
    async fn try_reward(&self, user_id: u64) -> Result<bool>;
}

#[derive(Clone)]
pub struct RewardStore {
    connection: Arc<Mutex<Connection>>,
    cooldowns: Arc<DashMap<u64, Instant>>,
    cooldown: Duration,
    points_per_message: i64,
}

impl RewardStore {
    pub async fn new(database_path: &str, cooldown: Duration, points_per_message: i64) -> Result<Self> {
        let connection = sqlite::open(database_path)?;
        let store = RewardStore {
            connection: Arc::new(Mutex::new(connection)),
            cooldowns: Arc::new(DashMap::new()),
            cooldown,
            points_per_message,
        };

        store.init_tables().await?;
        info!("Reward store initialized at: {}", database_path);
        Ok(store)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.connection.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS rewards (
                user_id TEXT PRIMARY KEY,
                points INTEGER NOT NULL DEFAULT 0,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_rewards_points
             ON rewards(points DESC)",
        )?;

        Ok(())
    }

    /// Adds `amount` to the user's balance and returns the new total.
    pub async fn add_points(&self, user_id: u64, amount: i64) -> Result<i64> {
        let conn = self.connection.lock().await;
        let user_id = user_id.to_string();

        let mut statement = conn.prepare(
            "INSERT INTO rewards (user_id, points) VALUES (?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                points = points + excluded.points,
                updated_at = CURRENT_TIMESTAMP",
        )?;
        statement.bind((1, user_id.as_str()))?;
        statement.bind((2, amount))?;
        statement.next()?;

        let mut statement = conn.prepare("SELECT points FROM rewards WHERE user_id = ?")?;
        statement.bind((1, user_id.as_str()))?;
        statement.next()?;
        Ok(statement.read::<i64, _>("points")?)
    }

    pub async fn points(&self, user_id: u64) -> Result<i64> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("SELECT points FROM rewards WHERE user_id = ?")?;
        statement.bind((1, user_id.to_string().as_str()))?;

        if let Ok(State::Row) = statement.next() {
            Ok(statement.read::<i64, _>("points")?)
        } else {
            Ok(0)
        }
    }

    /// Highest balances first; ties go to whoever got there earlier.
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<(u64, i64)>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT user_id, points FROM rewards
             ORDER BY points DESC, updated_at ASC
             LIMIT ?",
        )?;
        statement.bind((1, limit))?;

        let mut rows = Vec::new();
        while let Ok(State::Row) = statement.next() {
            let user_id = statement.read::<String, _>(0)?;
            let points = statement.read::<i64, _>(1)?;
            rows.push((user_id.parse()?, points));
        }
        Ok(rows)
    }

    fn claim_cooldown(&self, user_id: u64) -> bool {
        let now = Instant::now();
        match self.cooldowns.entry(user_id) {
            Entry::Occupied(mut last) => {
                if now.duration_since(*last.get()) < self.cooldown {
                    false
                } else {
                    last.insert(now);
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }
}

#[async_trait]
impl RewardSink for RewardStore {
    async fn try_reward(&self, user_id: u64) -> Result<bool> {
        if !self.claim_cooldown(user_id) {
            debug!("Reward cooldown active for user {}", user_id);
            return Ok(false);
        }

        let total = self.add_points(user_id, self.points_per_message).await?;
        debug!("User {} now has {} points", user_id, total);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store(cooldown: Duration) -> RewardStore {
        RewardStore::new(":memory:", cooldown, 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_user_has_zero_points() {
        let store = store(Duration::from_secs(60)).await;
        assert_eq!(store.points(42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_points_accumulates() {
        let store = store(Duration::from_secs(60)).await;
        assert_eq!(store.add_points(42, 3).await.unwrap(), 3);
        assert_eq!(store.add_points(42, 2).await.unwrap(), 5);
        assert_eq!(store.points(42).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_reward_respects_cooldown() {
        let store = store(Duration::from_secs(60)).await;
        assert!(store.try_reward(7).await.unwrap());
        assert!(!store.try_reward(7).await.unwrap());
        assert_eq!(store.points(7).await.unwrap(), 1);

        // Cooldowns are per user.
        assert!(store.try_reward(8).await.unwrap());
    }

    #[tokio::test]
    async fn test_reward_after_cooldown_expires() {
        let store = store(Duration::from_millis(50)).await;
        assert!(store.try_reward(7).await.unwrap());
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(store.try_reward(7).await.unwrap());
        assert_eq!(store.points(7).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_points() {
        let store = store(Duration::from_secs(60)).await;
        store.add_points(1, 5).await.unwrap();
        store.add_points(2, 10).await.unwrap();
        store.add_points(3, 1).await.unwrap();

        let top = store.leaderboard(2).await.unwrap();
        assert_eq!(top, vec![(2, 10), (1, 5)]);
    }
}
