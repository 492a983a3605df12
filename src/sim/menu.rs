//! Menu state machine
//!
//! ```text
//!   main ──primary──▶ play ──collision──▶ death ──restart──▶ main
//!   main ──C──▶ creator ──closed──▶ main
//!   main ──X──▶ delete  ──closed──▶ main
//! ```

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::platform::{InputEvent, MenuKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MenuState {
    /// Title screen with the attract-mode bounce
    #[default]
    Main,
    Play,
    /// Score board over the frozen field
    Death,
    /// Skin import tool is open
    Creator,
    /// Skin delete tool is open
    Delete,
}

impl MenuState {
    /// Field (player, obstacles, ground) is simulated and drawn
    pub fn shows_field(&self) -> bool {
        matches!(self, MenuState::Main | MenuState::Play | MenuState::Death)
    }

    pub fn player_alive(&self) -> bool {
        matches!(self, MenuState::Main | MenuState::Play)
    }
}

/// What the loop must do in response to one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Event means nothing in this state
    Ignored,
    /// main → play, with the first flap
    StartRun,
    Impulse,
    /// death → main
    Restart,
    ToggleSound,
    OpenTool(MenuKey),
    /// creator/delete → main
    CloseTool,
    CycleSkin(i32),
    Quit,
}

/// Screen areas owned by buttons rather than the game field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegions {
    /// Volume toggle, live on main and death screens
    pub volume: Rect,
    /// Restart button, live on the death screen
    pub restart: Rect,
}

impl HitRegions {
    pub fn for_screen(width: f32, height: f32) -> Self {
        let (restart_w, restart_h) = (104.0, 58.0);
        Self {
            volume: Rect::new(width - 70.0, 20.0, 50.0, 50.0),
            restart: Rect::new(
                width / 2.0 - restart_w / 2.0,
                height - 100.0 - restart_h / 2.0,
                restart_w,
                restart_h,
            ),
        }
    }
}

/// Single owner of the current menu state
#[derive(Debug, Clone, Default)]
pub struct MenuMachine {
    state: MenuState,
}

impl MenuMachine {
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Apply one input event
    pub fn handle(&mut self, event: &InputEvent, regions: &HitRegions) -> MenuAction {
        use MenuState::*;

        let action = match (self.state, *event) {
            (_, InputEvent::Quit) => MenuAction::Quit,

            (Main | Death, InputEvent::PrimaryAction { pos: Some(p) }) if regions.volume.contains(p) => {
                MenuAction::ToggleSound
            }
            (Main, InputEvent::PrimaryAction { .. }) => {
                self.transition(Play);
                MenuAction::StartRun
            }
            (Play, InputEvent::PrimaryAction { .. }) => MenuAction::Impulse,
            (Death, InputEvent::PrimaryAction { pos: Some(p) }) if regions.restart.contains(p) => {
                self.transition(Main);
                MenuAction::Restart
            }
            (Death, InputEvent::Restart) => {
                self.transition(Main);
                MenuAction::Restart
            }

            (Main, InputEvent::MenuShortcut(key)) => {
                self.transition(match key {
                    MenuKey::Creator => Creator,
                    MenuKey::Delete => Delete,
                });
                MenuAction::OpenTool(key)
            }
            (Main, InputEvent::SkinCycle(delta)) if delta != 0 => MenuAction::CycleSkin(delta.signum()),
            (Creator | Delete, InputEvent::ToolClosed) => {
                self.transition(Main);
                MenuAction::CloseTool
            }

            _ => MenuAction::Ignored,
        };

        if action == MenuAction::Ignored {
            log::trace!("Ignored {event:?} in {:?}", self.state);
        }
        action
    }

    /// play → death. Returns false when not playing.
    pub fn player_lost(&mut self) -> bool {
        if self.state == MenuState::Play {
            self.transition(MenuState::Death);
            true
        } else {
            false
        }
    }

    fn transition(&mut self, to: MenuState) {
        log::info!("Menu {:?} -> {:?}", self.state, to);
        self.state = to;
    }
}
