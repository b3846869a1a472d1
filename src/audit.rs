//! # Feature: Audit Log
//!
//! Turns guild lifecycle events (voice moves, member joins and leaves, message
//! deletes and edits) into a uniform [`NotificationRecord`] that the
//! [`Notifier`] posts to the audit channel.
//!
//! Translation is pure: every event maps to at most one record and nothing is
//! remembered between events.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use serenity::async_trait;

/// Discord caps embed field values at 1024 characters.
const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationField {
    pub label: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub title: String,
    pub fields: Vec<NotificationField>,
}

impl NotificationRecord {
    pub fn new(title: impl Into<String>) -> Self {
        NotificationRecord {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, label: &str, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(NotificationField {
            label: label.to_string(),
            value: value.into(),
            inline,
        });
        self
    }
}

/// Delivers records to the audit channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, record: &NotificationRecord) -> Result<()>;
}

/// The user an audit event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
}

impl Actor {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Actor {
            id,
            name: name.into(),
        }
    }

    fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    VoiceStateUpdate {
        user: Actor,
        previous: Option<u64>,
        next: Option<u64>,
    },
    MemberAdd {
        user: Actor,
    },
    MemberRemove {
        user: Actor,
    },
    MessageDelete {
        author: Actor,
        content: String,
    },
    MessageUpdate {
        author: Actor,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
        old_content: String,
        new_content: String,
    },
}

/// Maps an event to its record, or `None` when nothing worth logging happened.
pub fn translate(event: &AuditEvent) -> Option<NotificationRecord> {
    match event {
        AuditEvent::VoiceStateUpdate {
            user,
            previous,
            next,
        } => voice_transition(user, *previous, *next),
        AuditEvent::MemberAdd { user } => Some(
            NotificationRecord::new(format!("{} joined the server", user.name))
                .field("User", user.mention(), true),
        ),
        AuditEvent::MemberRemove { user } => Some(
            NotificationRecord::new(format!("{} left the server", user.name))
                .field("User", user.mention(), true),
        ),
        AuditEvent::MessageDelete { author, content } => Some(
            NotificationRecord::new(format!("{} deleted a message", author.name))
                .field("User", author.mention(), true)
                .field("Message", code_block(content), false),
        ),
        AuditEvent::MessageUpdate {
            author,
            guild_id,
            channel_id,
            message_id,
            old_content,
            new_content,
        } => Some(
            NotificationRecord::new(format!("{} edited a message", author.name))
                .field("User", author.mention(), true)
                .field(
                    "Message Link",
                    format!(
                        "[Click Here]({})",
                        message_link(*guild_id, *channel_id, *message_id)
                    ),
                    true,
                )
                .field("Old Message", code_block(old_content), false)
                .field("New Message", code_block(new_content), false),
        ),
    }
}

fn voice_transition(
    user: &Actor,
    previous: Option<u64>,
    next: Option<u64>,
) -> Option<NotificationRecord> {
    match (previous, next) {
        (None, Some(joined)) => Some(
            NotificationRecord::new(format!("{} joined a voice channel", user.name))
                .field("User", user.mention(), true)
                .field("Channel", channel_mention(joined), true),
        ),
        (Some(left), None) => Some(
            NotificationRecord::new(format!("{} left a voice channel", user.name))
                .field("User", user.mention(), true)
                .field("Channel", channel_mention(left), true),
        ),
        (Some(from), Some(to)) if from != to => Some(
            NotificationRecord::new(format!("{} moved voice channels", user.name))
                .field("User", user.mention(), true)
                .field("From", channel_mention(from), true)
                .field("To", channel_mention(to), true),
        ),
        _ => None,
    }
}

pub fn message_link(guild_id: u64, channel_id: u64, message_id: u64) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

fn channel_mention(channel_id: u64) -> String {
    format!("<#{}>", channel_id)
}

/// Wraps content in a code fence, keeping the result within the field limit.
fn code_block(content: &str) -> String {
    const FENCE: &str = "```";
    // Break up fences inside the content so it cannot close the block early.
    let escaped = content.replace(FENCE, "`\u{200b}``");
    let budget = FIELD_VALUE_LIMIT - 2 * FENCE.len();

    if escaped.chars().count() <= budget {
        return format!("{FENCE}{escaped}{FENCE}");
    }

    let truncated: String = escaped.chars().take(budget - 1).collect();
    format!("{FENCE}{truncated}…{FENCE}")
}
