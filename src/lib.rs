//! Flappy Gates - A side-scrolling gate runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, scoring, menus)
//! - `game`: Fixed-step loop that feeds input in and hands effects out
//! - `platform`: Input events, timing, stop signal
//! - `assets`: Skin catalog and the skin import tool's file rules
//! - `persistence`: Best-score storage with integrity verification
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use game::{EffectSink, Game, InputSource};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; every speed below is per tick at this rate
    pub const TICK_RATE: u32 = 90;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults (y grows downward)
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 250.0;
    pub const GRAVITY: f32 = 0.3;
    pub const JUMP_STRENGTH: f32 = -7.5;
    pub const MAX_ANGLE: f32 = 30.0;
    pub const MIN_ANGLE: f32 = -30.0;
    pub const ANGLE_ACCELERATION: f32 = 2.0;
    pub const FRAME_SPEED: f32 = 0.25;

    /// Vertical bounds
    pub const GROUND_Y: f32 = 510.0;
    pub const CEILING_Y: f32 = -35.0;
    /// Attract mode flap line on the main screen
    pub const IDLE_FLAP_Y: f32 = 330.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 104.0;
    pub const OBSTACLE_GAP: f32 = 200.0;

    /// ~2.8 s at the tick rate
    pub const DECRYPT_WARNING_TICKS: u32 = 250;
}
