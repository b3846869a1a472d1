//! # Slash Commands (/)
//!
//! Discord native application commands. Each module exposes a registration
//! function; the list below is what the bot loads at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

mod points;
mod utility;

use super::SlashRegistration;

pub fn registrations() -> Vec<SlashRegistration> {
    vec![utility::ping, utility::uptime, points::points]
}
