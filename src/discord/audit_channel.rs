use anyhow::{anyhow, Result};
use log::debug;
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::{Channel, ChannelType, GuildChannel};
use serenity::model::id::ChannelId;
use serenity::model::Timestamp;
use std::sync::{Arc, OnceLock};

use crate::audit::{NotificationRecord, Notifier};

const AUDIT_COLOUR: u32 = 0x5865F2;

/// Posts audit records as embeds into the configured channel.
///
/// The channel is resolved on every delivery, from the cache when the gateway
/// has populated it and over HTTP otherwise.
pub struct AuditChannel {
    channel_id: ChannelId,
    http: Arc<Http>,
    cache: OnceLock<Arc<Cache>>,
}

impl AuditChannel {
    pub fn new(channel_id: u64, http: Arc<Http>) -> Self {
        AuditChannel {
            channel_id: ChannelId(channel_id),
            http,
            cache: OnceLock::new(),
        }
    }

    /// Called once the gateway is ready; later calls are ignored.
    pub fn attach_cache(&self, cache: Arc<Cache>) {
        let _ = self.cache.set(cache);
    }

    async fn resolve(&self) -> Result<GuildChannel> {
        if let Some(channel) = self
            .cache
            .get()
            .and_then(|cache| cache.guild_channel(self.channel_id))
        {
            return check_sendable(channel);
        }

        debug!("Audit channel {} not cached, fetching", self.channel_id);
        match self.http.get_channel(self.channel_id.0).await? {
            Channel::Guild(channel) => check_sendable(channel),
            _ => Err(anyhow!("channel {} is not a guild channel", self.channel_id)),
        }
    }
}

fn check_sendable(channel: GuildChannel) -> Result<GuildChannel> {
    match channel.kind {
        ChannelType::Text | ChannelType::News => Ok(channel),
        kind => Err(anyhow!(
            "channel {} is a {:?} channel, not a text channel",
            channel.id,
            kind
        )),
    }
}

#[async_trait]
impl Notifier for AuditChannel {
    async fn deliver(&self, record: &NotificationRecord) -> Result<()> {
        let channel = self.resolve().await?;

        channel
            .id
            .send_message(&self.http, |message| {
                message.embed(|embed| {
                    embed
                        .title(&record.title)
                        .colour(AUDIT_COLOUR)
                        .timestamp(Timestamp::now());
                    for field in &record.fields {
                        embed.field(&field.label, &field.value, field.inline);
                    }
                    embed
                })
            })
            .await?;
        Ok(())
    }
}
