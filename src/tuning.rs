//! Data-driven game balance
//!
//! Every physics and difficulty constant lives here so it can be overridden
//! from a JSON file. Missing fields fall back to the compiled defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Player physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Fixed horizontal screen position of the sprite origin
    pub start_x: f32,
    /// Vertical position after a reset
    pub start_y: f32,
    /// Added to vy every tick
    pub gravity: f32,
    /// vy after an impulse (negative is up)
    pub jump_strength: f32,
    /// Nose-up angle (degrees)
    pub max_angle: f32,
    /// Nose-down limit (degrees)
    pub min_angle: f32,
    /// Angle lost per tick while falling
    pub angle_acceleration: f32,
    /// Ground clamp; y never exceeds this
    pub ground_y: f32,
    /// Ceiling clamp; crossing it zeroes vy
    pub ceiling_y: f32,
    /// Attract mode flaps whenever y reaches this
    pub idle_flap_y: f32,
    /// Animation cursor step per tick
    pub frame_speed: f32,
    /// Death sound plays once the corpse falls faster than this
    pub death_sound_velocity: f32,
    /// ...and only while above this line
    pub death_sound_max_y: f32,
    /// Hitbox offset from the sprite origin
    pub hitbox_offset: (f32, f32),
    /// Hitbox size
    pub hitbox_size: (f32, f32),
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: PLAYER_X,
            start_y: PLAYER_START_Y,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            max_angle: MAX_ANGLE,
            min_angle: MIN_ANGLE,
            angle_acceleration: ANGLE_ACCELERATION,
            ground_y: GROUND_Y,
            ceiling_y: CEILING_Y,
            idle_flap_y: IDLE_FLAP_Y,
            frame_speed: FRAME_SPEED,
            death_sound_velocity: 7.0,
            death_sound_max_y: 500.0,
            hitbox_offset: (15.0, 10.0),
            hitbox_size: (50.0, 50.0),
        }
    }
}

/// Obstacle stream and difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub width: f32,
    pub gap: f32,
    /// Lowest gap-top y
    pub min_gap_y: i32,
    /// Distance kept between the lowest gap-top y and the screen bottom
    pub bottom_margin: i32,
    /// Timer value at the start of a run
    pub max_timer: f32,
    /// Floor of the difficulty ramp
    pub min_timer: f32,
    /// max_timer shrinks by this after every spawn
    pub timer_step: f32,
    pub decrement_base: f32,
    pub decrement_factor: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            min_gap_y: 50,
            bottom_margin: 300,
            max_timer: 200.0,
            min_timer: 120.0,
            timer_step: 2.5,
            decrement_base: 0.1,
            decrement_factor: 0.3,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Width of one ground tile, for scroll wrapping
    pub ground_width: f32,
    /// Ticks the "failed to decrypt" warning stays on screen
    pub decrypt_warning_ticks: u32,
    pub player: PlayerTuning,
    pub obstacles: ObstacleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_width: 336.0,
            decrypt_warning_ticks: DECRYPT_WARNING_TICKS,
            player: PlayerTuning::default(),
            obstacles: ObstacleTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance sheet
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| GameError::Configuration(format!("invalid tuning JSON: {e}")))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from disk; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self, GameError> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let tuning = Self::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(GameError::Configuration(format!(
                "cannot read tuning file {}: {e}",
                path.display()
            ))),
        }
    }

    /// Highest gap-top y an obstacle may spawn with
    pub fn max_gap_y(&self) -> i32 {
        self.screen_height as i32 - self.obstacles.bottom_margin
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let o = &self.obstacles;
        let p = &self.player;

        if o.min_timer <= 0.0 || o.min_timer > o.max_timer {
            return Err(GameError::Configuration(format!(
                "obstacle timers must satisfy 0 < min_timer <= max_timer (got {} / {})",
                o.min_timer, o.max_timer
            )));
        }
        if o.min_gap_y > self.max_gap_y() {
            return Err(GameError::Configuration(format!(
                "gap range is empty: min_gap_y {} > max {}",
                o.min_gap_y,
                self.max_gap_y()
            )));
        }
        if o.decrement_base + o.decrement_factor <= 0.0 {
            return Err(GameError::Configuration(
                "obstacle timer would never expire".to_string(),
            ));
        }
        if p.ceiling_y >= p.ground_y {
            return Err(GameError::Configuration(format!(
                "ceiling ({}) must be above ground ({})",
                p.ceiling_y, p.ground_y
            )));
        }
        if p.min_angle > p.max_angle {
            return Err(GameError::Configuration(
                "min_angle must not exceed max_angle".to_string(),
            ));
        }
        if p.frame_speed <= 0.0 {
            return Err(GameError::Configuration(
                "frame_speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
