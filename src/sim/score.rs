//! Run score, best-ever score and achievement badges

use serde::{Deserialize, Serialize};

use super::obstacles::Obstacle;

/// Badges unlocked by best-ever score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Achievement {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Achievement {
    /// Highest threshold first
    pub const DESCENDING: [Achievement; 4] = [
        Achievement::Platinum,
        Achievement::Gold,
        Achievement::Silver,
        Achievement::Bronze,
    ];

    pub fn threshold(&self) -> u32 {
        match self {
            Achievement::Bronze => 10,
            Achievement::Silver => 20,
            Achievement::Gold => 30,
            Achievement::Platinum => 40,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::Bronze => "bronze",
            Achievement::Silver => "silver",
            Achievement::Gold => "gold",
            Achievement::Platinum => "platinum",
        }
    }

    /// Best badge a single run earns (shown on the score board)
    pub fn badge_for(score: u32) -> Option<Achievement> {
        Self::DESCENDING
            .into_iter()
            .find(|a| score >= a.threshold())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Gates passed this run
    pub score: u32,
    /// Best ever, mirrored to the score store
    pub best: u32,
    /// Unlocked badges in unlock order
    pub achievements: Vec<Achievement>,
    /// Ticks left on the "failed to decrypt" warning
    pub decrypt_warning: u32,
    /// Last save of `best` failed; retried on the next new best or restart
    pub save_pending: bool,
}

impl ScoreState {
    /// Count gates the player has just passed. Each gate scores once.
    pub fn on_tick(&mut self, player_x: f32, obstacles: &mut [Obstacle]) -> u32 {
        let mut delta = 0;
        for obstacle in obstacles.iter_mut().filter(|o| !o.scored) {
            if obstacle.x <= player_x {
                obstacle.scored = true;
                delta += 1;
            }
        }
        self.score += delta;
        delta
    }

    /// Raise best to the run score if it beat it. Returns the value to persist.
    pub fn update_best(&mut self) -> Option<u32> {
        if self.score > self.best {
            self.on_new_best(self.score);
            Some(self.best)
        } else {
            None
        }
    }

    /// Adopt a best-ever value (new record or loaded from storage)
    pub fn on_new_best(&mut self, score: u32) {
        self.best = self.best.max(score);
    }

    /// Unlock every badge the best score qualifies for, highest first.
    /// Returns only the ones unlocked by this call.
    pub fn evaluate_achievements(&mut self) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        for achievement in Achievement::DESCENDING {
            if self.best >= achievement.threshold() && !self.achievements.contains(&achievement) {
                self.achievements.push(achievement);
                unlocked.push(achievement);
            }
        }
        unlocked
    }

    pub fn reset_run(&mut self) {
        self.score = 0;
    }

    pub fn flag_decrypt_error(&mut self, ticks: u32) {
        self.decrypt_warning = ticks;
    }

    /// Count the warning down by one tick
    pub fn tick_warning(&mut self) {
        self.decrypt_warning = self.decrypt_warning.saturating_sub(1);
    }

    pub fn warning_visible(&self) -> bool {
        self.decrypt_warning > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::ObstacleStyle;

    fn gate(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            gap_y: 100.0,
            gap: 200.0,
            width: 104.0,
            scored: false,
            style: ObstacleStyle::Pipe,
        }
    }

    #[test]
    fn test_pass_scores_once() {
        let mut score = ScoreState::default();
        let mut gates = vec![gate(1, 60.0)];
        assert_eq!(score.on_tick(50.0, &mut gates), 0);

        gates[0].x = 50.0;
        assert_eq!(score.on_tick(50.0, &mut gates), 1);
        for _ in 0..100 {
            gates[0].x -= 4.0;
            assert_eq!(score.on_tick(50.0, &mut gates), 0);
        }
        assert_eq!(score.score, 1);
    }

    #[test]
    fn test_two_gates_same_tick() {
        let mut score = ScoreState::default();
        let mut gates = vec![gate(1, 40.0), gate(2, 45.0), gate(3, 400.0)];
        assert_eq!(score.on_tick(50.0, &mut gates), 2);
        assert!(!gates[2].scored);
    }

    #[test]
    fn test_best_follows_score() {
        let mut score = ScoreState {
            best: 3,
            ..Default::default()
        };
        score.score = 3;
        assert_eq!(score.update_best(), None);
        score.score = 4;
        assert_eq!(score.update_best(), Some(4));
        assert_eq!(score.best, 4);

        score.reset_run();
        assert_eq!(score.score, 0);
        assert_eq!(score.best, 4);
    }

    #[test]
    fn test_jump_from_5_to_35_unlocks_descending() {
        let mut score = ScoreState {
            best: 5,
            ..Default::default()
        };
        assert!(score.evaluate_achievements().is_empty());

        score.score = 35;
        score.update_best();
        let unlocked: Vec<&str> = score
            .evaluate_achievements()
            .iter()
            .map(|a| a.as_str())
            .collect();
        assert_eq!(unlocked, ["gold", "silver", "bronze"]);
        assert!(score.evaluate_achievements().is_empty());
        assert_eq!(score.achievements.len(), 3);

        score.score = 40;
        score.update_best();
        assert_eq!(score.evaluate_achievements(), vec![Achievement::Platinum]);
    }

    #[test]
    fn test_badge_for_run_score() {
        assert_eq!(Achievement::badge_for(9), None);
        assert_eq!(Achievement::badge_for(10), Some(Achievement::Bronze));
        assert_eq!(Achievement::badge_for(39), Some(Achievement::Gold));
        assert_eq!(Achievement::badge_for(400), Some(Achievement::Platinum));
    }

    #[test]
    fn test_decrypt_warning_counts_down() {
        let mut score = ScoreState::default();
        score.flag_decrypt_error(2);
        assert!(score.warning_visible());
        score.tick_warning();
        assert!(score.warning_visible());
        score.tick_warning();
        assert!(!score.warning_visible());
        score.tick_warning();
        assert_eq!(score.decrypt_warning, 0);
    }
}
