use anyhow::Result;
use log::{error, info};
use serenity::http::Http;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use herald::commands::{self, CommandEnv, CommandRegistry};
use herald::config::Config;
use herald::discord::{AuditChannel, Handler, MessageSnapshots};
use herald::dispatcher::Dispatcher;
use herald::rewards::RewardStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Herald...");

    let rewards = RewardStore::new(
        &config.database_path,
        Duration::from_secs(config.reward_cooldown_secs),
        config.reward_points,
    )
    .await?;

    // Every command is registered before the gateway connects.
    let env = CommandEnv::new(rewards.clone(), config.command_prefix);
    let registry = CommandRegistry::load(
        &commands::slash_registrations(),
        &commands::text_registrations(),
        &env,
    );

    let audit_channel = Arc::new(AuditChannel::new(
        config.audit_channel_id,
        Arc::new(Http::new(&config.bot_token())),
    ));
    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        audit_channel.clone(),
        Arc::new(rewards),
        config.command_prefix,
    );
    let handler = Handler::new(
        Arc::new(dispatcher),
        audit_channel,
        MessageSnapshots::new(config.message_cache_size),
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Connecting to Discord gateway with intents: {:?}", intents);

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
