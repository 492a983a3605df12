//! Side effects the tick asks the outside world to perform
//!
//! The simulation never draws or plays anything itself. Each tick returns a
//! list of intents; render, audio and storage collaborators act on them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::menu::MenuState;
use super::obstacles::ObstacleStyle;
use super::score::Achievement;
use super::state::Backdrop;
use crate::platform::MenuKey;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    Flap,
    /// Gate passed
    Point,
    /// Collision
    Hit,
    /// Corpse falling
    Die,
}

/// Everything the HUD needs for this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    pub menu: MenuState,
    pub score: u32,
    pub best: u32,
    /// Badge earned by this run, shown on the score board
    pub badge: Option<Achievement>,
    pub decrypt_warning: bool,
    pub sound_on: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    DrawBackdrop(Backdrop),
    DrawObstacle {
        x: f32,
        gap_y: f32,
        gap: f32,
        width: f32,
        style: ObstacleStyle,
    },
    DrawGround {
        offset: f32,
    },
    DrawPlayer {
        pos: Vec2,
        angle: f32,
        frame: String,
    },
    DrawHud(HudState),
    PlaySound(SoundKind),
    /// Hand the new best score to the score store
    PersistBest(u32),
    /// Ask the skin tool to open
    OpenTool(MenuKey),
    AchievementUnlocked(Achievement),
    SkinChanged(String),
}

impl Effect {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Effect::DrawBackdrop(_)
                | Effect::DrawObstacle { .. }
                | Effect::DrawGround { .. }
                | Effect::DrawPlayer { .. }
                | Effect::DrawHud(_)
        )
    }
}
