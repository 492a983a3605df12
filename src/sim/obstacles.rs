//! Obstacle stream: timed spawning, scrolling and retirement

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::menu::MenuState;
use crate::tuning::{ObstacleTuning, Tuning};

/// How an obstacle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleStyle {
    Pipe,
    Building,
}

impl ObstacleStyle {
    /// The plane skin flies between buildings
    pub fn for_skin(skin: &str) -> Self {
        if skin == "plane" {
            ObstacleStyle::Building
        } else {
            ObstacleStyle::Pipe
        }
    }
}

/// A gate: solid above `gap_y`, solid below `gap_y + gap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
    pub gap: f32,
    pub width: f32,
    /// Set once the player has passed it
    pub scored: bool,
    pub style: ObstacleStyle,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_y)
    }

    pub fn lower_rect(&self, screen_height: f32) -> Rect {
        let top = self.gap_y + self.gap;
        Rect::new(self.x, top, self.width, screen_height - top)
    }
}

/// What changed in the obstacle set this tick
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleEvent {
    Spawned { id: u32, gap_y: f32 },
    Retired { id: u32 },
    Cleared { count: usize },
}

/// Owns the live obstacles and the spawn countdown
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    timer: f32,
    max_timer: f32,
    /// Armed while away from main; the first main tick clears and disarms
    clear_on_main: bool,
    next_id: u32,
}

impl ObstacleGenerator {
    pub fn new(tuning: &ObstacleTuning) -> Self {
        Self {
            obstacles: Vec::new(),
            timer: tuning.max_timer,
            max_timer: tuning.max_timer,
            clear_on_main: true,
            next_id: 1,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn max_timer(&self) -> f32 {
        self.max_timer
    }

    /// Timer units consumed per tick at a given scroll speed
    pub fn decrement(tuning: &ObstacleTuning, speed: f32) -> f32 {
        tuning.decrement_base + speed * tuning.decrement_factor
    }

    pub fn advance(
        &mut self,
        menu: MenuState,
        speed: f32,
        style: ObstacleStyle,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> Vec<ObstacleEvent> {
        let mut events = Vec::new();
        let o = &tuning.obstacles;

        match menu {
            MenuState::Play => {
                self.clear_on_main = true;

                for obstacle in &mut self.obstacles {
                    obstacle.x -= speed;
                }
                self.obstacles.retain(|obstacle| {
                    let keep = obstacle.right() >= 0.0;
                    if !keep {
                        events.push(ObstacleEvent::Retired { id: obstacle.id });
                    }
                    keep
                });

                self.timer -= Self::decrement(o, speed);
                if self.timer <= 0.0 {
                    let obstacle = self.spawn(style, rng, tuning);
                    events.push(ObstacleEvent::Spawned {
                        id: obstacle.id,
                        gap_y: obstacle.gap_y,
                    });
                    self.obstacles.push(obstacle);
                    self.timer = self.max_timer;
                    self.max_timer = (self.max_timer - o.timer_step).max(o.min_timer);
                }
            }
            MenuState::Main => {
                if self.clear_on_main {
                    events.push(self.clear());
                    self.clear_on_main = false;
                }
                self.timer = o.max_timer;
                self.max_timer = o.max_timer;
            }
            // Frozen in place behind the score board
            MenuState::Death => {}
            MenuState::Creator | MenuState::Delete => {
                self.clear_on_main = true;
                if !self.obstacles.is_empty() {
                    events.push(self.clear());
                }
            }
        }

        events
    }

    fn spawn(&mut self, style: ObstacleStyle, rng: &mut Pcg32, tuning: &Tuning) -> Obstacle {
        let o = &tuning.obstacles;
        let gap_y = rng.random_range(o.min_gap_y..=tuning.max_gap_y());
        let id = self.next_id;
        self.next_id += 1;
        log::trace!("Spawn obstacle {id} with gap at {gap_y}");

        Obstacle {
            id,
            x: tuning.screen_width,
            gap_y: gap_y as f32,
            gap: o.gap,
            width: o.width,
            scored: false,
            style,
        }
    }

    fn clear(&mut self) -> ObstacleEvent {
        let count = self.obstacles.len();
        self.obstacles.clear();
        ObstacleEvent::Cleared { count }
    }
}
