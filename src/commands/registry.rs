//! Command registry and loader.
//!
//! The registry is built in one pass before the gateway connects and is never
//! mutated afterwards, so dispatch always sees the complete command set.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    CommandData, CommandEnv, SlashCommand, SlashModule, SlashRegistration, TextCommand,
    TextModule, TextRegistration,
};

struct SlashEntry {
    data: CommandData,
    command: Arc<dyn SlashCommand>,
}

pub struct CommandRegistry {
    slash: HashMap<String, SlashEntry>,
    text: HashMap<String, Arc<dyn TextCommand>>,
}

impl CommandRegistry {
    /// Calls every registration function and keeps the well-formed modules.
    ///
    /// Modules missing a name or an `execute` are skipped without error.
    /// A duplicate identifier replaces the earlier module.
    pub fn load(
        slash: &[SlashRegistration],
        text: &[TextRegistration],
        env: &CommandEnv,
    ) -> Self {
        let mut registry = CommandRegistry {
            slash: HashMap::new(),
            text: HashMap::new(),
        };

        for register in text {
            registry.insert_text(register(env));
        }

        for register in slash {
            registry.insert_slash(register(env));
        }

        info!(
            "Loaded {} slash commands and {} text commands",
            registry.slash.len(),
            registry.text.len()
        );
        registry
    }

    fn insert_text(&mut self, module: TextModule) {
        let (name, command) = match module {
            TextModule {
                name: Some(name),
                execute: Some(command),
            } if !name.is_empty() => (name, command),
            TextModule { name, .. } => {
                debug!("Skipping malformed text command module {:?}", name);
                return;
            }
        };

        if self.text.insert(name.clone(), command).is_some() {
            warn!("Text command '{}' registered twice, keeping the later one", name);
        }
    }

    fn insert_slash(&mut self, module: SlashModule) {
        let (data, command) = match module {
            SlashModule {
                data: Some(data),
                execute: Some(command),
            } if !data.name.is_empty() => (data, command),
            SlashModule { data, .. } => {
                debug!(
                    "Skipping malformed slash command module {:?}",
                    data.map(|d| d.name)
                );
                return;
            }
        };

        info!("Loaded command: {}", data.name);
        let name = data.name.clone();
        if self.slash.insert(name.clone(), SlashEntry { data, command }).is_some() {
            warn!("Slash command '{}' registered twice, keeping the later one", name);
        }
    }

    pub fn slash(&self, name: &str) -> Option<&Arc<dyn SlashCommand>> {
        self.slash.get(name).map(|entry| &entry.command)
    }

    pub fn text(&self, name: &str) -> Option<&Arc<dyn TextCommand>> {
        self.text.get(name)
    }

    /// Descriptors of every slash command, sorted by name.
    pub fn slash_data(&self) -> Vec<&CommandData> {
        let mut data: Vec<&CommandData> = self.slash.values().map(|entry| &entry.data).collect();
        data.sort_by(|a, b| a.name.cmp(&b.name));
        data
    }

    /// Identifiers of every text command, sorted.
    pub fn text_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.text.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
