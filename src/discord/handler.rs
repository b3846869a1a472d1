use log::{debug, error, info};
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, MessageId};
use serenity::model::user::User;
use serenity::model::voice::VoiceState;
use serenity::prelude::*;
use std::sync::Arc;

use super::{AuditChannel, MessageSnapshots, SerenityInteraction, SerenityMessage};
use crate::audit::{Actor, AuditEvent};
use crate::commands::CommandRegistry;
use crate::dispatcher::{Dispatcher, PlatformEvent};

pub struct Handler {
    dispatcher: Arc<Dispatcher>,
    audit_channel: Arc<AuditChannel>,
    snapshots: MessageSnapshots,
}

impl Handler {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        audit_channel: Arc<AuditChannel>,
        snapshots: MessageSnapshots,
    ) -> Self {
        Handler {
            dispatcher,
            audit_channel,
            snapshots,
        }
    }

    async fn audit(&self, event: AuditEvent) {
        let outcome = self.dispatcher.handle(PlatformEvent::Audit(event)).await;
        debug!("Audit event handled: {:?}", outcome);
    }
}

fn actor(user: &User) -> Actor {
    Actor::new(user.id.0, user.name.clone())
}

/// Registers every loaded slash command globally.
async fn register_global_commands(ctx: &Context, registry: &CommandRegistry) -> anyhow::Result<()> {
    let commands: Vec<CreateApplicationCommand> = registry
        .slash_data()
        .into_iter()
        .map(|data| {
            CreateApplicationCommand::default()
                .name(&data.name)
                .description(&data.description)
                .to_owned()
        })
        .collect();

    Command::set_global_application_commands(&ctx.http, |builder| {
        for command in commands {
            builder.add_application_command(command);
        }
        builder
    })
    .await?;

    Ok(())
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        self.audit_channel.attach_cache(ctx.cache.clone());

        if let Err(e) = register_global_commands(&ctx, self.dispatcher.registry()).await {
            error!("❌ Failed to register global slash commands: {}", e);
        } else {
            info!("✅ Successfully registered slash commands globally");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if msg.guild_id.is_some() {
            self.snapshots
                .record(msg.id.0, actor(&msg.author), msg.content.clone());
        }

        let event = PlatformEvent::MessageCreate(Arc::new(SerenityMessage::new(ctx, msg)));
        let outcome = self.dispatcher.handle(event).await;
        debug!("Message handled: {:?}", outcome);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                let event =
                    PlatformEvent::InteractionCreate(Arc::new(SerenityInteraction::new(ctx, command)));
                let outcome = self.dispatcher.handle(event).await;
                debug!("Interaction handled: {:?}", outcome);
            }
            _ => debug!("Ignoring non-command interaction"),
        }
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let previous = old.and_then(|state| state.channel_id).map(|id| id.0);
        let next = new.channel_id.map(|id| id.0);
        if previous == next {
            return;
        }

        let user = match new.member {
            Some(member) => actor(&member.user),
            None => match new.user_id.to_user(&ctx).await {
                Ok(user) => actor(&user),
                Err(e) => {
                    error!("Failed to resolve voice user {}: {}", new.user_id, e);
                    return;
                }
            },
        };

        self.audit(AuditEvent::VoiceStateUpdate {
            user,
            previous,
            next,
        })
        .await;
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        self.audit(AuditEvent::MemberAdd {
            user: actor(&new_member.user),
        })
        .await;
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        _guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.audit(AuditEvent::MemberRemove { user: actor(&user) })
            .await;
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        _channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        let Some(snapshot) = self.snapshots.take(deleted_message_id.0) else {
            debug!("Deleted message {} was not seen, skipping audit", deleted_message_id);
            return;
        };

        self.audit(AuditEvent::MessageDelete {
            author: snapshot.author,
            content: snapshot.content,
        })
        .await;
    }

    async fn message_update(
        &self,
        _ctx: Context,
        old_if_available: Option<Message>,
        _new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        // Embed unfurls and pins arrive as updates without new content.
        let (Some(guild_id), Some(new_content)) = (event.guild_id, event.content) else {
            return;
        };

        let before = self
            .snapshots
            .replace_content(event.id.0, new_content.clone())
            .map(|snapshot| (snapshot.author, snapshot.content))
            .or_else(|| old_if_available.map(|old| (actor(&old.author), old.content)));

        let Some((author, old_content)) = before else {
            debug!("Edited message {} was not seen, skipping audit", event.id);
            return;
        };
        if old_content == new_content {
            return;
        }

        self.audit(AuditEvent::MessageUpdate {
            author,
            guild_id: guild_id.0,
            channel_id: event.channel_id.0,
            message_id: event.id.0,
            old_content,
            new_content,
        })
        .await;
    }
}
