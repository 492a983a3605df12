//! Discrete input events

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys that open a side menu from the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuKey {
    /// Skin import tool
    Creator,
    /// Skin delete tool
    Delete,
}

/// One thing the player did since the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Click/tap (with screen position) or space bar (no position)
    PrimaryAction { pos: Option<Vec2> },
    /// Restart from the death screen
    Restart,
    MenuShortcut(MenuKey),
    /// Previous (-1) or next (+1) skin
    SkinCycle(i32),
    /// The skin tool finished and handed control back
    ToolClosed,
    /// Window closed / escape
    Quit,
}

impl InputEvent {
    pub fn click(x: f32, y: f32) -> Self {
        InputEvent::PrimaryAction {
            pos: Some(Vec2::new(x, y)),
        }
    }

    pub fn space() -> Self {
        InputEvent::PrimaryAction { pos: None }
    }
}

/// Collects events between ticks; each tick drains exactly one batch
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take everything queued since the previous drain, in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
