//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order for obstacles)
//! - No rendering, audio or storage; those are returned as [`Effect`]s

pub mod collision;
pub mod effects;
pub mod menu;
pub mod obstacles;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, PlayerBounds, Rect, check};
pub use effects::{Effect, HudState, SoundKind};
pub use menu::{HitRegions, MenuAction, MenuMachine, MenuState};
pub use obstacles::{Obstacle, ObstacleEvent, ObstacleGenerator, ObstacleStyle};
pub use player::{Player, PlayerSnapshot, PlayerStep, cycle_skin, load_skin};
pub use score::{Achievement, ScoreState};
pub use state::{Backdrop, GameMode, GameState};
pub use tick::{TickInput, TickOutput, tick};
