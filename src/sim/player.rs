//! Player body: gravity, impulses, rotation and sprite animation

use glam::Vec2;

use super::state::GameMode;
use crate::assets::{FrameTable, SkinCatalog};
use crate::error::GameError;
use crate::tuning::PlayerTuning;

/// The player character. Reset in place on restart, never recreated.
#[derive(Debug, Clone)]
pub struct Player {
    /// Sprite origin; x never changes
    pub pos: Vec2,
    /// Scroll speed of the world under the player
    pub vx: f32,
    pub vy: f32,
    /// Degrees, positive is nose-up
    pub angle: f32,
    pub alive: bool,
    /// Animation cursor in [1, frame count]
    pub frame: f32,
    frame_step: f32,
    /// Pixels travelled this run
    pub distance: f32,
    death_sound_played: bool,
    pub skin: FrameTable,
}

/// What one tick did to the body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStep {
    /// An impulse was applied (manual or attract mode)
    pub flapped: bool,
    /// The falling corpse crossed the death-sound velocity
    pub death_sound: bool,
}

/// Pose handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub angle: f32,
    pub frame: String,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, mode: GameMode, skin: FrameTable) -> Self {
        let mut player = Self {
            pos: Vec2::new(tuning.start_x, tuning.start_y),
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            alive: true,
            frame: 1.0,
            frame_step: tuning.frame_speed,
            distance: 0.0,
            death_sound_played: false,
            skin,
        };
        player.reset(tuning, mode);
        player
    }

    pub fn reset(&mut self, tuning: &PlayerTuning, mode: GameMode) {
        self.pos = Vec2::new(tuning.start_x, tuning.start_y);
        self.vx = mode.horizontal_speed();
        self.vy = mode.initial_vy();
        self.angle = 0.0;
        self.alive = true;
        self.frame = 1.0;
        self.frame_step = tuning.frame_speed;
        self.distance = 0.0;
        self.death_sound_played = false;
    }

    /// Swap the frame table and restart the animation
    pub fn set_skin(&mut self, skin: FrameTable) {
        self.skin = skin;
        self.frame = 1.0;
        self.frame_step = self.frame_step.abs();
    }

    /// Upward impulse: vy is overwritten, not added to
    pub fn apply_impulse(&mut self, tuning: &PlayerTuning) {
        self.vy = tuning.jump_strength;
    }

    pub fn die(&mut self) {
        self.vy = 0.0;
        self.alive = false;
    }

    /// One tick of movement.
    ///
    /// `impulse` collapses any number of flap inputs into one. `idle` is the
    /// attract mode on the main screen, which flaps by itself whenever the
    /// body sinks to `idle_flap_y`.
    pub fn advance(&mut self, impulse: bool, idle: bool, tuning: &PlayerTuning) -> PlayerStep {
        let mut step = PlayerStep::default();

        if impulse || (idle && self.pos.y >= tuning.idle_flap_y) {
            self.apply_impulse(tuning);
            step.flapped = true;
        }

        if self.alive {
            self.animate();
        }
        self.update_angle(tuning);

        // Position first, then velocity
        self.pos.y += self.vy;
        self.vy += tuning.gravity;

        if self.alive {
            self.distance += self.vx;
        } else if self.vy > tuning.death_sound_velocity
            && !self.death_sound_played
            && self.pos.y < tuning.death_sound_max_y
        {
            self.death_sound_played = true;
            step.death_sound = true;
        }

        if self.pos.y > tuning.ground_y {
            self.pos.y = tuning.ground_y;
        }
        if self.pos.y < tuning.ceiling_y {
            self.pos.y = tuning.ceiling_y;
            self.vy = 0.0;
        }

        step
    }

    fn update_angle(&mut self, tuning: &PlayerTuning) {
        if self.skin.stationary {
            self.angle = 0.0;
        } else if self.vy < 0.0 {
            self.angle = tuning.max_angle;
        } else if self.angle > tuning.min_angle {
            self.angle = (self.angle - tuning.angle_acceleration).max(tuning.min_angle);
        }
    }

    /// Triangle wave between 1 and the frame count
    fn animate(&mut self) {
        let last = self.skin.len() as f32;
        if last <= 1.0 {
            self.frame = 1.0;
            return;
        }

        let next = self.frame + self.frame_step;
        if next >= last {
            self.frame = last;
            self.frame_step = -self.frame_step.abs();
        } else if next <= 1.0 {
            self.frame = 1.0;
            self.frame_step = self.frame_step.abs();
        } else {
            self.frame = next;
        }
    }

    /// 1-based frame index currently shown
    pub fn frame_index(&self) -> u32 {
        (self.frame.floor() as u32).clamp(1, self.skin.len())
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            pos: self.pos,
            angle: self.angle,
            frame: self.skin.frame(self.frame_index()).to_string(),
        }
    }
}

/// Load `wanted`, falling back through the rest of the catalog.
///
/// Each unloadable skin is skipped once; if nothing loads the game cannot
/// draw a player at all, which is a configuration error.
pub fn load_skin(catalog: &dyn SkinCatalog, wanted: &str) -> Result<FrameTable, GameError> {
    let skins = catalog.list_skins();
    if skins.is_empty() {
        return Err(GameError::Configuration(
            "no player skins available".to_string(),
        ));
    }

    let start = skins.iter().position(|s| s == wanted);
    let mut candidates: Vec<&str> = Vec::with_capacity(skins.len() + 1);
    match start {
        Some(i) => candidates.extend(
            skins[i..]
                .iter()
                .chain(&skins[..i])
                .map(String::as_str),
        ),
        None => {
            candidates.push(wanted);
            candidates.extend(skins.iter().map(String::as_str));
        }
    }

    for skin in candidates {
        match catalog.load_frames(skin) {
            Ok(table) => {
                if skin != wanted {
                    log::warn!("Skin '{wanted}' unavailable, using '{skin}'");
                }
                return Ok(table);
            }
            Err(e) => log::warn!("Frame error: {e}"),
        }
    }

    Err(GameError::Configuration(format!(
        "none of {} skins could be loaded",
        skins.len()
    )))
}

/// Skin `delta` steps from `current` in catalog order, wrapping
pub fn cycle_skin(skins: &[String], current: &str, delta: i32) -> Option<String> {
    if skins.is_empty() {
        return None;
    }
    let len = skins.len() as i32;
    let index = skins.iter().position(|s| s == current).unwrap_or(0) as i32;
    let next = (index + delta).rem_euclid(len) as usize;
    Some(skins[next].clone())
}
