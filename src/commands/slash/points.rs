//! /points: the caller's reward balance.

use anyhow::Result;
use serenity::async_trait;

use crate::commands::{CommandData, CommandEnv, InteractionContext, SlashCommand, SlashModule};
use crate::rewards::RewardStore;

pub fn points(env: &CommandEnv) -> SlashModule {
    SlashModule::new(
        CommandData::new("points", "Show how many activity points you have"),
        Points {
            rewards: env.rewards.clone(),
        },
    )
}

struct Points {
    rewards: RewardStore,
}

#[async_trait]
impl SlashCommand for Points {
    async fn execute(&self, ctx: &dyn InteractionContext) -> Result<()> {
        let points = self.rewards.points(ctx.user_id()).await?;
        ctx.reply(&format!("⭐ {}, you have {} points.", ctx.user_name(), points))
            .await
    }
}
