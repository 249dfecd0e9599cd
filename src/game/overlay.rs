//! Teleport message overlay state.
//!
//! The renderer draws the message while `show_teleport_message` is set.
//! The game loop exposes this state but never sets the flag itself.

use serde::{Serialize, Deserialize};

/// Headline shown after a teleport.
pub const TELEPORT_TITLE: &str = "TELEPORTED!";

/// Subtitle shown after a teleport.
pub const TELEPORT_SUBTITLE: &str = "You've been teleported to another location!";

/// Overlay state handed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportOverlay {
    /// Whether the teleport message is visible
    pub show_teleport_message: bool,
}

impl TeleportOverlay {
    /// Lines to draw, top to bottom. Empty when hidden.
    pub fn lines(&self) -> &'static [&'static str] {
        if self.show_teleport_message {
            &[TELEPORT_TITLE, TELEPORT_SUBTITLE]
        } else {
            &[]
        }
    }
}
