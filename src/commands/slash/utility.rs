//! Utility slash commands: /ping, /uptime

use anyhow::Result;
use chrono::{DateTime, Utc};
use serenity::async_trait;

use crate::commands::{CommandData, CommandEnv, InteractionContext, SlashCommand, SlashModule};

pub fn ping(_env: &CommandEnv) -> SlashModule {
    SlashModule::new(CommandData::new("ping", "Test bot responsiveness"), Ping)
}

pub fn uptime(env: &CommandEnv) -> SlashModule {
    SlashModule::new(
        CommandData::new("uptime", "Show how long the bot has been running"),
        Uptime {
            started_at: env.started_at,
        },
    )
}

struct Ping;

#[async_trait]
impl SlashCommand for Ping {
    async fn execute(&self, ctx: &dyn InteractionContext) -> Result<()> {
        ctx.reply("🏓 Pong!").await
    }
}

struct Uptime {
    started_at: DateTime<Utc>,
}

#[async_trait]
impl SlashCommand for Uptime {
    async fn execute(&self, ctx: &dyn InteractionContext) -> Result<()> {
        ctx.reply(&format_uptime(self.started_at, Utc::now())).await
    }
}

fn format_uptime(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let uptime = (now - started_at).num_seconds().max(0);
    let days = uptime / 86400;
    let hours = (uptime % 86400) / 3600;
    let minutes = (uptime % 3600) / 60;
    let seconds = uptime % 60;

    if days > 0 {
        format!("⏱️ Uptime: {}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("⏱️ Uptime: {}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("⏱️ Uptime: {}m {}s", minutes, seconds)
    } else {
        format!("⏱️ Uptime: {}s", seconds)
    }
}
