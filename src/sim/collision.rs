//! Collision detection between the player hitbox and obstacle gates
//!
//! Axis-aligned boxes only. Overlap is strict: boxes that share an edge do
//! not collide, so a hitbox resting exactly on a gap edge is safe.

use glam::Vec2;

use super::obstacles::Obstacle;
use crate::tuning::PlayerTuning;

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }
}

/// Outcome of one collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResult {
    None,
    HitObstacle,
    /// Fell onto the ground line
    OutOfBounds,
}

/// The player's hitbox plus the height used for the ground check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBounds {
    pub hitbox: Rect,
    pub y: f32,
}

impl PlayerBounds {
    /// The hitbox is inset from the sprite so near misses stay misses
    pub fn from_position(pos: Vec2, tuning: &PlayerTuning) -> Self {
        let (dx, dy) = tuning.hitbox_offset;
        let (w, h) = tuning.hitbox_size;
        Self {
            hitbox: Rect::new(pos.x + dx, pos.y + dy, w, h),
            y: pos.y,
        }
    }
}

/// Pure check of the player against every live gate
pub fn check(
    player: &PlayerBounds,
    obstacles: &[Obstacle],
    screen_height: f32,
    ground_y: f32,
) -> CollisionResult {
    let hit = obstacles.iter().any(|obstacle| {
        player.hitbox.intersects(&obstacle.upper_rect())
            || player.hitbox.intersects(&obstacle.lower_rect(screen_height))
    });

    if hit {
        CollisionResult::HitObstacle
    } else if player.y >= ground_y {
        CollisionResult::OutOfBounds
    } else {
        CollisionResult::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::ObstacleStyle;
    use proptest::prelude::*;

    const SCREEN_H: f32 = 600.0;
    const GROUND: f32 = 510.0;

    fn gate(x: f32, gap_y: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_y,
            gap: 200.0,
            width: 104.0,
            scored: false,
            style: ObstacleStyle::Pipe,
        }
    }

    fn hitbox_at(x: f32, y: f32) -> PlayerBounds {
        PlayerBounds {
            hitbox: Rect::new(x, y, 50.0, 50.0),
            y,
        }
    }

    #[test]
    fn test_rect_intersection_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_hitbox_is_inset() {
        let bounds = PlayerBounds::from_position(Vec2::new(50.0, 250.0), &PlayerTuning::default());
        assert_eq!(bounds.hitbox, Rect::new(65.0, 260.0, 50.0, 50.0));
        assert_eq!(bounds.y, 250.0);
    }

    #[test]
    fn test_hit_upper_region() {
        let result = check(&hitbox_at(100.0, 80.0), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::HitObstacle);
    }

    #[test]
    fn test_hit_lower_region() {
        let result = check(&hitbox_at(100.0, 260.0), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::HitObstacle);
    }

    #[test]
    fn test_touching_gap_edges_is_safe() {
        // Top edge on the gap top
        let result = check(&hitbox_at(100.0, 100.0), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::None);
        // Bottom edge on the gap bottom
        let result = check(&hitbox_at(100.0, 250.0), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::None);
        // One pixel further is a hit
        let result = check(&hitbox_at(100.0, 250.5), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::HitObstacle);
    }

    #[test]
    fn test_beside_gate_is_safe() {
        let result = check(&hitbox_at(40.0, 0.0), &[gate(90.0, 100.0)], SCREEN_H, GROUND);
        assert_eq!(result, CollisionResult::None);
    }

    #[test]
    fn test_ground_is_out_of_bounds() {
        assert_eq!(check(&hitbox_at(65.0, GROUND), &[], SCREEN_H, GROUND), CollisionResult::OutOfBounds);
        assert_eq!(check(&hitbox_at(65.0, GROUND - 0.1), &[], SCREEN_H, GROUND), CollisionResult::None);
    }

    proptest! {
        #[test]
        fn prop_hit_iff_overlaps_a_region(
            px in 0.0f32..300.0,
            py in -35.0f32..500.0,
            gx in 0.0f32..300.0,
            gap_y in 50.0f32..300.0,
        ) {
            let player = hitbox_at(px, py);
            let obstacle = gate(gx, gap_y);
            let overlaps = player.hitbox.intersects(&obstacle.upper_rect())
                || player.hitbox.intersects(&obstacle.lower_rect(SCREEN_H));
            let result = check(&player, std::slice::from_ref(&obstacle), SCREEN_H, GROUND);
            prop_assert_eq!(result == CollisionResult::HitObstacle, overlaps);

            // Fully inside the gap column never hits
            let inside = hitbox_at(gx + 10.0, gap_y + 10.0);
            let result = check(&inside, std::slice::from_ref(&obstacle), SCREEN_H, GROUND);
            prop_assert_ne!(result, CollisionResult::HitObstacle);
        }
    }
}
