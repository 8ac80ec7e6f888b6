//! Scripted player for demo mode and the headless runner
//!
//! Keeps the avatar hovering just above the bottom edge of the next gap.

use super::collision::Bounds;
use super::state::GameState;

/// Distance kept between the avatar's bottom edge and the gap bottom
const BOTTOM_MARGIN: f32 = 12.0;

/// Whether the autopilot wants to flap this frame
pub fn should_flap(state: &GameState) -> bool {
    let avatar = &state.avatar;
    let bounds = Bounds::of_circle(avatar.pos.x, avatar.pos.y, avatar.radius);

    // Next obstacle whose trailing edge is still ahead of the avatar's back
    let target_bottom = state
        .obstacles
        .iter()
        .find(|o| o.right() > bounds.left)
        .map(|o| o.bottom_y)
        .unwrap_or(state.height / 2.0 + state.tuning.obstacle_gap / 2.0);

    // Look one frame ahead so the flap lands before the edge is crossed
    let next_bottom = bounds.bottom + avatar.velocity + avatar.gravity;
    next_bottom > target_bottom - BOTTOM_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::Obstacle;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut s = GameState::new(400.0, 600.0, Tuning::default(), 5, 0);
        s.start(0.0);
        s
    }

    #[test]
    fn test_flaps_when_sinking_towards_gap_bottom() {
        let mut s = running();
        s.obstacles
            .push(Obstacle::with_top_height(1, 200.0, 200.0, &s.tuning));
        // gap bottom 370; bottom edge 345 + 3 velocity > 358
        s.avatar.pos.y = 325.0;
        s.avatar.velocity = 3.0;
        assert!(should_flap(&s));
    }

    #[test]
    fn test_holds_when_well_inside_gap() {
        let mut s = running();
        s.obstacles
            .push(Obstacle::with_top_height(1, 200.0, 200.0, &s.tuning));
        s.avatar.pos.y = 280.0;
        s.avatar.velocity = 0.0;
        assert!(!should_flap(&s));
    }

    #[test]
    fn test_ignores_obstacles_behind() {
        let mut s = running();
        // Fully behind the avatar: gap bottom at 70 must not matter
        s.obstacles
            .push(Obstacle::with_top_height(1, -10.0, 20.0, &s.tuning));
        s.avatar.pos.y = 300.0;
        s.avatar.velocity = 0.0;
        assert!(!should_flap(&s));
    }
}
