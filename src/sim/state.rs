//! Game state and core simulation types
//!
//! `GameState` owns every component's data. Components receive the pieces
//! they need from the tick; none of them hold references to each other.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::menu::MenuMachine;
use super::obstacles::ObstacleGenerator;
use super::player::Player;
use super::score::ScoreState;
use crate::assets::FrameTable;
use crate::tuning::Tuning;

/// Difficulty variant, chosen in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    Impossible,
    Crazy,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Impossible => "impossible",
            GameMode::Crazy => "crazy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "impossible" => Some(GameMode::Impossible),
            "crazy" => Some(GameMode::Crazy),
            _ => None,
        }
    }

    /// World scroll speed (pixels per tick)
    pub fn horizontal_speed(&self) -> f32 {
        match self {
            GameMode::Normal => 4.0,
            GameMode::Impossible => 10.0,
            GameMode::Crazy => 2.0,
        }
    }

    /// vy right after a reset
    pub fn initial_vy(&self) -> f32 {
        match self {
            GameMode::Crazy => 20.0,
            _ => 0.0,
        }
    }
}

/// Sky behind the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    Day,
    Night,
    Impossible,
}

impl Backdrop {
    /// Impossible mode has its own sky; the rest pick day or night
    pub fn pick(mode: GameMode, rng: &mut Pcg32) -> Self {
        match mode {
            GameMode::Impossible => Backdrop::Impossible,
            _ if rng.random_bool(0.5) => Backdrop::Day,
            _ => Backdrop::Night,
        }
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub mode: GameMode,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub menu: MenuMachine,
    pub player: Player,
    pub obstacles: ObstacleGenerator,
    pub score: ScoreState,
    pub backdrop: Backdrop,
    /// Ground scroll position in [0, ground_width)
    pub ground_offset: f32,
    /// Sound intents are dropped while off
    pub sound_on: bool,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, mode: GameMode, skin: FrameTable) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let backdrop = Backdrop::pick(mode, &mut rng);
        Self {
            seed,
            rng,
            mode,
            time_ticks: 0,
            menu: MenuMachine::default(),
            player: Player::new(&tuning.player, mode, skin),
            obstacles: ObstacleGenerator::new(&tuning.obstacles),
            score: ScoreState::default(),
            backdrop,
            ground_offset: 0.0,
            sound_on: true,
            tuning,
        }
    }

    /// Back to the main screen with a fresh run; best score survives
    pub fn restart(&mut self) {
        self.player.reset(&self.tuning.player, self.mode);
        self.score.reset_run();
        self.backdrop = Backdrop::pick(self.mode, &mut self.rng);
    }
}
