use anyhow::Result;
use serenity::async_trait;
use serenity::model::application::command::CommandType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::commands::{InteractionContext, MessageContext};

pub struct SerenityInteraction {
    ctx: Context,
    command: ApplicationCommandInteraction,
    replied: AtomicBool,
}

impl SerenityInteraction {
    pub fn new(ctx: Context, command: ApplicationCommandInteraction) -> Self {
        SerenityInteraction {
            ctx,
            command,
            replied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl InteractionContext for SerenityInteraction {
    fn command_name(&self) -> &str {
        &self.command.data.name
    }

    fn is_chat_input(&self) -> bool {
        self.command.data.kind == CommandType::ChatInput
    }

    fn user_id(&self) -> u64 {
        self.command.user.id.0
    }

    fn user_name(&self) -> &str {
        &self.command.user.name
    }

    /// The first reply answers the interaction; later ones are follow-ups.
    async fn reply(&self, content: &str) -> Result<()> {
        if self.replied.swap(true, Ordering::SeqCst) {
            self.command
                .create_followup_message(&self.ctx.http, |message| message.content(content))
                .await?;
        } else {
            self.command
                .create_interaction_response(&self.ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| message.content(content))
                })
                .await?;
        }
        Ok(())
    }
}

pub struct SerenityMessage {
    ctx: Context,
    msg: Message,
}

impl SerenityMessage {
    pub fn new(ctx: Context, msg: Message) -> Self {
        SerenityMessage { ctx, msg }
    }
}

#[async_trait]
impl MessageContext for SerenityMessage {
    fn content(&self) -> &str {
        &self.msg.content
    }

    fn author_id(&self) -> u64 {
        self.msg.author.id.0
    }

    fn author_name(&self) -> &str {
        &self.msg.author.name
    }

    async fn reply(&self, content: &str) -> Result<()> {
        self.msg.reply(&self.ctx, content).await?;
        Ok(())
    }
}
