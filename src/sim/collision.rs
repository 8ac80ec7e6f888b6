//! Collision detection between the avatar and obstacles
//!
//! The avatar circle is approximated by its axis-aligned extents; no true
//! circle distance is computed, so gap corners collide a little earlier than
//! a pixel-perfect test would.

use super::avatar::Avatar;
use super::obstacle::Obstacle;

/// Axis-aligned extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Extents of a circle
    pub fn of_circle(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            left: cx - radius,
            right: cx + radius,
            top: cy - radius,
            bottom: cy + radius,
        }
    }
}

/// Which rectangle of the obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Top,
    Bottom,
}

/// Strict overlap of the horizontal extents
pub fn horizontal_overlap(bounds: &Bounds, obstacle: &Obstacle) -> bool {
    bounds.right > obstacle.x && bounds.left < obstacle.right()
}

/// Vertical extent pokes out of the gap
pub fn breaches_gap(bounds: &Bounds, obstacle: &Obstacle) -> Option<CollisionKind> {
    if bounds.top < obstacle.top_height {
        Some(CollisionKind::Top)
    } else if bounds.bottom > obstacle.bottom_y {
        Some(CollisionKind::Bottom)
    } else {
        None
    }
}

/// Avatar vs obstacle: horizontal overlap AND outside the gap
pub fn avatar_obstacle_collision(avatar: &Avatar, obstacle: &Obstacle) -> Option<CollisionKind> {
    let bounds = Bounds::of_circle(avatar.pos.x, avatar.pos.y, avatar.radius);
    if !horizontal_overlap(&bounds, obstacle) {
        return None;
    }
    breaches_gap(&bounds, obstacle)
}

/// The obstacle's trailing edge is strictly behind the avatar's centre
pub fn has_passed(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    avatar.pos.x > obstacle.right()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn setup(avatar_y: f32, obstacle_x: f32) -> (Avatar, Obstacle) {
        let tuning = Tuning::default();
        let mut avatar = Avatar::new(400.0, 600.0, &tuning);
        avatar.pos.y = avatar_y;
        // avatar x = 80, radius 20 -> horizontal extent [60, 100]
        let obstacle = Obstacle::with_top_height(1, obstacle_x, 200.0, &tuning);
        (avatar, obstacle)
    }

    #[test]
    fn test_inside_gap_no_collision() {
        let (avatar, obstacle) = setup(285.0, 70.0);
        assert_eq!(avatar.top(), 265.0);
        assert_eq!(avatar.bottom(), 305.0);
        assert_eq!(avatar_obstacle_collision(&avatar, &obstacle), None);
    }

    #[test]
    fn test_top_rectangle_hit() {
        let (avatar, obstacle) = setup(100.0, 70.0);
        assert_eq!(
            avatar_obstacle_collision(&avatar, &obstacle),
            Some(CollisionKind::Top)
        );
    }

    #[test]
    fn test_bottom_rectangle_hit() {
        let (avatar, obstacle) = setup(360.0, 70.0);
        assert_eq!(
            avatar_obstacle_collision(&avatar, &obstacle),
            Some(CollisionKind::Bottom)
        );
    }

    #[test]
    fn test_gap_edges_are_inclusive() {
        // top edge exactly on the gap top, bottom exactly on the gap bottom
        let (avatar, obstacle) = setup(220.0, 70.0);
        assert_eq!(avatar_obstacle_collision(&avatar, &obstacle), None);
        let (avatar, obstacle) = setup(350.0, 70.0);
        assert_eq!(avatar_obstacle_collision(&avatar, &obstacle), None);
    }

    #[test]
    fn test_no_horizontal_overlap_no_collision() {
        // obstacle starts exactly at the avatar's right extent
        let (avatar, obstacle) = setup(100.0, 100.0);
        assert_eq!(avatar_obstacle_collision(&avatar, &obstacle), None);
        // obstacle ends exactly at the avatar's left extent
        let (avatar, obstacle) = setup(100.0, 0.0);
        assert_eq!(avatar_obstacle_collision(&avatar, &obstacle), None);
        // one pixel of overlap is enough
        let (avatar, obstacle) = setup(100.0, 99.0);
        assert!(avatar_obstacle_collision(&avatar, &obstacle).is_some());
    }

    #[test]
    fn test_corner_uses_extents_not_distance() {
        // Circle centre is ~24 px from the obstacle corner (x=99, y=200):
        // a true circle test would miss, the extents test hits.
        let (avatar, obstacle) = setup(214.0, 99.0);
        assert!(avatar_obstacle_collision(&avatar, &obstacle).is_some());
    }

    #[test]
    fn test_has_passed() {
        let (avatar, obstacle) = setup(300.0, 20.0);
        // right edge 80 == avatar x: not yet
        assert!(!has_passed(&avatar, &obstacle));
        let (avatar, obstacle) = setup(300.0, 19.0);
        assert!(has_passed(&avatar, &obstacle));
    }
}
