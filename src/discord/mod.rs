//! # Discord Adapter
//!
//! Glue between serenity's gateway callbacks and the platform-neutral
//! dispatcher: context implementations, the audit channel notifier, and the
//! message snapshots that let deletions be logged with their content.

mod audit_channel;
mod context;
mod handler;
mod snapshots;

pub use audit_channel::AuditChannel;
pub use context::{SerenityInteraction, SerenityMessage};
pub use handler::Handler;
pub use snapshots::{MessageSnapshot, MessageSnapshots};
