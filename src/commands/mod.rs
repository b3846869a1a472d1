//! # Command System
//!
//! Two independent command kinds share one registry:
//! slash commands (`/`) arrive as Discord interactions, text commands arrive
//! as chat messages starting with the configured prefix (`+` by default).
//!
//! Every command module exposes a registration function returning its
//! descriptor. The loader calls each function once and keeps only the
//! well-formed descriptors.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod registry;
pub mod slash;
pub mod text;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serenity::async_trait;
use std::sync::Arc;

use crate::rewards::RewardStore;

pub use registry::CommandRegistry;

/// The interaction a slash command is answering.
#[async_trait]
pub trait InteractionContext: Send + Sync {
    fn command_name(&self) -> &str;
    /// `false` for context-menu and other non chat-input commands.
    fn is_chat_input(&self) -> bool;
    fn user_id(&self) -> u64;
    fn user_name(&self) -> &str;
    async fn reply(&self, content: &str) -> Result<()>;
}

/// The chat message a text command (or reward) is answering.
#[async_trait]
pub trait MessageContext: Send + Sync {
    fn content(&self) -> &str;
    fn author_id(&self) -> u64;
    fn author_name(&self) -> &str;
    async fn reply(&self, content: &str) -> Result<()>;
}

#[async_trait]
pub trait SlashCommand: Send + Sync {
    async fn execute(&self, ctx: &dyn InteractionContext) -> Result<()>;
}

#[async_trait]
pub trait TextCommand: Send + Sync {
    async fn execute(&self, ctx: &dyn MessageContext) -> Result<()>;
}

/// Descriptor data of a slash command, also used to register it with Discord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandData {
    pub name: String,
    pub description: String,
}

impl CommandData {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        CommandData {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// What a slash command module hands to the loader.
///
/// Both fields must be present for the module to be registered.
#[derive(Default)]
pub struct SlashModule {
    pub data: Option<CommandData>,
    pub execute: Option<Arc<dyn SlashCommand>>,
}

impl SlashModule {
    pub fn new(data: CommandData, command: impl SlashCommand + 'static) -> Self {
        SlashModule {
            data: Some(data),
            execute: Some(Arc::new(command)),
        }
    }
}

/// What a text command module hands to the loader.
///
/// Both fields must be present, and the name non-empty, for the module to be
/// registered.
#[derive(Default)]
pub struct TextModule {
    pub name: Option<String>,
    pub execute: Option<Arc<dyn TextCommand>>,
}

impl TextModule {
    pub fn new(name: impl Into<String>, command: impl TextCommand + 'static) -> Self {
        TextModule {
            name: Some(name.into()),
            execute: Some(Arc::new(command)),
        }
    }
}

pub type SlashRegistration = fn(&CommandEnv) -> SlashModule;
pub type TextRegistration = fn(&CommandEnv) -> TextModule;

/// Shared services handed to every registration function.
#[derive(Clone)]
pub struct CommandEnv {
    pub rewards: RewardStore,
    pub started_at: DateTime<Utc>,
    pub prefix: char,
}

impl CommandEnv {
    pub fn new(rewards: RewardStore, prefix: char) -> Self {
        CommandEnv {
            rewards,
            started_at: Utc::now(),
            prefix,
        }
    }
}

/// Every built-in slash command.
pub fn slash_registrations() -> Vec<SlashRegistration> {
    slash::registrations()
}

/// Every built-in text command.
pub fn text_registrations() -> Vec<TextRegistration> {
    text::registrations()
}
