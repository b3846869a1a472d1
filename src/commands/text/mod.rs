//! # Text Commands
//!
//! Commands typed into chat behind the configured prefix, e.g. `+echo hi`.
//! The dispatcher only extracts the command name; each command re-reads the
//! raw message content for its own arguments.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

mod echo;
mod rewards;

use super::TextRegistration;

pub fn registrations() -> Vec<TextRegistration> {
    vec![echo::echo, rewards::points, rewards::leaderboard]
}
