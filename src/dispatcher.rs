//! # Event Dispatcher
//!
//! Single entry point for everything the gateway delivers. Interactions and
//! prefixed messages go to the command registry, ordinary messages earn
//! rewards, and lifecycle events are translated into audit records.
//!
//! Command failures never escape [`Dispatcher::handle`]: they are answered
//! with the error text and the next event is processed as usual.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::audit::{self, AuditEvent, Notifier};
use crate::commands::{CommandRegistry, InteractionContext, MessageContext};
use crate::rewards::RewardSink;

pub const NO_ARGUMENTS_REPLY: &str = "Command not found, or no arguments were provided.";
pub const UNKNOWN_COMMAND_REPLY: &str = "Command not found.";

pub enum PlatformEvent {
    InteractionCreate(Arc<dyn InteractionContext>),
    MessageCreate(Arc<dyn MessageContext>),
    Audit(AuditEvent),
}

/// What [`Dispatcher::handle`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Executed(String),
    Failed(String),
    UnknownCommand(String),
    MissingArguments,
    Rewarded,
    Notified,
    /// The audit record could not be delivered and was discarded.
    Dropped,
}

/// A message split at the command boundary.
#[derive(Debug, PartialEq, Eq)]
pub enum TextInvocation<'a> {
    NotPrefixed,
    /// Prefixed, but no space or newline ends the command name.
    NoArguments,
    Command { name: &'a str, args: &'a str },
}

/// Splits `content` into command name and raw argument payload.
///
/// The name ends at the first space or newline, whichever comes first. The
/// payload is everything after that delimiter, untouched.
pub fn parse_text_command(content: &str, prefix: char) -> TextInvocation<'_> {
    let Some(rest) = content.strip_prefix(prefix) else {
        return TextInvocation::NotPrefixed;
    };

    match rest.find(|c: char| c == ' ' || c == '\n') {
        Some(index) => TextInvocation::Command {
            name: &rest[..index],
            args: &rest[index + 1..],
        },
        None => TextInvocation::NoArguments,
    }
}

/// The argument payload of a prefixed message, for commands to re-parse.
pub fn text_arguments(content: &str, prefix: char) -> Option<&str> {
    match parse_text_command(content, prefix) {
        TextInvocation::Command { args, .. } => Some(args),
        _ => None,
    }
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    notifier: Arc<dyn Notifier>,
    rewards: Arc<dyn RewardSink>,
    prefix: char,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        notifier: Arc<dyn Notifier>,
        rewards: Arc<dyn RewardSink>,
        prefix: char,
    ) -> Self {
        Dispatcher {
            registry,
            notifier,
            rewards,
            prefix,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn handle(&self, event: PlatformEvent) -> Outcome {
        match event {
            PlatformEvent::InteractionCreate(ctx) => self.handle_interaction(ctx.as_ref()).await,
            PlatformEvent::MessageCreate(ctx) => self.handle_message(ctx.as_ref()).await,
            PlatformEvent::Audit(event) => self.handle_audit(&event).await,
        }
    }

    async fn handle_interaction(&self, ctx: &dyn InteractionContext) -> Outcome {
        if !ctx.is_chat_input() {
            return Outcome::Ignored;
        }

        let name = ctx.command_name().to_string();
        let Some(command) = self.registry.slash(&name) else {
            warn!("Received unknown slash command '{}'", name);
            reply_to_interaction(ctx, UNKNOWN_COMMAND_REPLY).await;
            return Outcome::UnknownCommand(name);
        };

        info!("Processing slash command: {} from user: {}", name, ctx.user_id());
        match command.execute(ctx).await {
            Ok(()) => Outcome::Executed(name),
            Err(e) => {
                reply_to_interaction(ctx, &format!("There was an error: {}", e)).await;
                Outcome::Failed(name)
            }
        }
    }

    async fn handle_message(&self, ctx: &dyn MessageContext) -> Outcome {
        let name = match parse_text_command(ctx.content(), self.prefix) {
            TextInvocation::NotPrefixed => return self.reward(ctx.author_id()).await,
            TextInvocation::NoArguments => {
                reply_to_message(ctx, NO_ARGUMENTS_REPLY).await;
                return Outcome::MissingArguments;
            }
            TextInvocation::Command { name, .. } => name.to_string(),
        };

        let Some(command) = self.registry.text(&name) else {
            debug!("Unknown text command '{}'", name);
            reply_to_message(ctx, UNKNOWN_COMMAND_REPLY).await;
            return Outcome::UnknownCommand(name);
        };

        info!("Processing text command: {} from user: {}", name, ctx.author_id());
        match command.execute(ctx).await {
            Ok(()) => Outcome::Executed(name),
            Err(e) => {
                reply_to_message(ctx, &format!("There was an error: {}", e)).await;
                Outcome::Failed(name)
            }
        }
    }

    async fn reward(&self, author_id: u64) -> Outcome {
        if let Err(e) = self.rewards.try_reward(author_id).await {
            error!("Failed to reward user {}: {}", author_id, e);
        }
        Outcome::Rewarded
    }

    async fn handle_audit(&self, event: &AuditEvent) -> Outcome {
        let Some(record) = audit::translate(event) else {
            return Outcome::Ignored;
        };

        match self.notifier.deliver(&record).await {
            Ok(()) => Outcome::Notified,
            Err(e) => {
                warn!("Dropping audit record '{}': {}", record.title, e);
                Outcome::Dropped
            }
        }
    }
}

async fn reply_to_interaction(ctx: &dyn InteractionContext, content: &str) {
    if let Err(e) = ctx.reply(content).await {
        error!("Failed to reply to slash command '{}': {}", ctx.command_name(), e);
    }
}

async fn reply_to_message(ctx: &dyn MessageContext, content: &str) {
    if let Err(e) = ctx.reply(content).await {
        error!("Failed to reply to message from {}: {}", ctx.author_id(), e);
    }
}
