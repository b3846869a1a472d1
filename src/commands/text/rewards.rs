//! +points [@user], +leaderboard [count]

use anyhow::{anyhow, Result};
use serenity::async_trait;

use crate::commands::{CommandEnv, MessageContext, TextCommand, TextModule};
use crate::dispatcher::text_arguments;
use crate::rewards::RewardStore;

const LEADERBOARD_SIZE: i64 = 5;
const LEADERBOARD_MAX: i64 = 25;

pub fn points(env: &CommandEnv) -> TextModule {
    TextModule::new(
        "points",
        Points {
            rewards: env.rewards.clone(),
            prefix: env.prefix,
        },
    )
}

pub fn leaderboard(env: &CommandEnv) -> TextModule {
    TextModule::new(
        "leaderboard",
        Leaderboard {
            rewards: env.rewards.clone(),
            prefix: env.prefix,
        },
    )
}

struct Points {
    rewards: RewardStore,
    prefix: char,
}

#[async_trait]
impl TextCommand for Points {
    async fn execute(&self, ctx: &dyn MessageContext) -> Result<()> {
        let target = text_arguments(ctx.content(), self.prefix)
            .map(str::trim)
            .filter(|arg| !arg.is_empty());

        match target {
            Some(arg) => {
                let user_id = parse_user_mention(arg)
                    .ok_or_else(|| anyhow!("'{}' is not a user mention", arg))?;
                let points = self.rewards.points(user_id).await?;
                ctx.reply(&format!("⭐ <@{}> has {} points.", user_id, points))
                    .await
            }
            None => {
                let points = self.rewards.points(ctx.author_id()).await?;
                ctx.reply(&format!("⭐ {}, you have {} points.", ctx.author_name(), points))
                    .await
            }
        }
    }
}

struct Leaderboard {
    rewards: RewardStore,
    prefix: char,
}

#[async_trait]
impl TextCommand for Leaderboard {
    async fn execute(&self, ctx: &dyn MessageContext) -> Result<()> {
        let size = match text_arguments(ctx.content(), self.prefix).map(str::trim) {
            Some(arg) if !arg.is_empty() => arg
                .parse::<i64>()
                .map_err(|_| anyhow!("'{}' is not a number", arg))?
                .clamp(1, LEADERBOARD_MAX),
            _ => LEADERBOARD_SIZE,
        };

        let top = self.rewards.leaderboard(size).await?;
        ctx.reply(&format_leaderboard(&top)).await
    }
}

/// Accepts `<@id>`, `<@!id>` or a bare id.
fn parse_user_mention(arg: &str) -> Option<u64> {
    let id = arg
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches('!'))
        .unwrap_or(arg);
    id.parse().ok()
}

fn format_leaderboard(top: &[(u64, i64)]) -> String {
    if top.is_empty() {
        return "Nobody has earned any points yet.".to_string();
    }

    let mut output = String::from("**Leaderboard**\n");
    for (rank, (user_id, points)) in top.iter().enumerate() {
        output.push_str(&format!("{}. <@{}> - {} points\n", rank + 1, user_id, points));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::text::test_support::FakeMessage;
    use std::time::Duration;

    #[test]
    fn test_format_empty_leaderboard() {
        assert_eq!(format_leaderboard(&[]), "Nobody has earned any points yet.");
    }

    #[test]
    fn test_format_leaderboard() {
        let output = format_leaderboard(&[(10, 7), (20, 3)]);
        assert!(output.contains("1. <@10> - 7 points"));
        assert!(output.contains("2. <@20> - 3 points"));
    }

    #[test]
    fn test_parse_user_mention() {
        assert_eq!(parse_user_mention("<@123>"), Some(123));
        assert_eq!(parse_user_mention("<@!123>"), Some(123));
        assert_eq!(parse_user_mention("123"), Some(123));
        assert_eq!(parse_user_mention("<#123>"), None);
        assert_eq!(parse_user_mention("someone"), None);
    }

    async fn rewards() -> RewardStore {
        RewardStore::new(":memory:", Duration::from_secs(60), 1)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_points_for_self() {
        let rewards = rewards().await;
        rewards.add_points(99, 4).await.unwrap();

        let msg = FakeMessage::new("+points ", 99);
        Points { rewards, prefix: '+' }.execute(&msg).await.unwrap();
        assert_eq!(msg.replies(), vec!["⭐ tester, you have 4 points."]);
    }

    #[tokio::test]
    async fn test_points_for_mentioned_user() {
        let rewards = rewards().await;
        rewards.add_points(55, 2).await.unwrap();

        let msg = FakeMessage::new("+points <@55>", 99);
        Points { rewards, prefix: '+' }.execute(&msg).await.unwrap();
        assert_eq!(msg.replies(), vec!["⭐ <@55> has 2 points."]);
    }

    #[tokio::test]
    async fn test_leaderboard_with_count() {
        let rewards = rewards().await;
        rewards.add_points(1, 1).await.unwrap();
        rewards.add_points(2, 2).await.unwrap();

        let msg = FakeMessage::new("+leaderboard 1", 99);
        Leaderboard { rewards, prefix: '+' }.execute(&msg).await.unwrap();
        let replies = msg.replies();
        assert!(replies[0].contains("1. <@2> - 2 points"));
        assert!(!replies[0].contains("<@1>"));
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_bad_count() {
        let msg = FakeMessage::new("+leaderboard lots", 99);
        let result = Leaderboard { rewards: rewards().await, prefix: '+' }
            .execute(&msg)
            .await;
        assert!(result.is_err());
    }
}
