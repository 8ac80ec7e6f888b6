//! Scene building
//!
//! Turns a `GameState` into screen-space geometry. Pure and GPU free so the
//! layout can be checked in tests.

use glam::Vec2;

use super::shapes;
use super::vertex::{SpriteVertex, Vertex, colors};
use crate::sim::{Avatar, GamePhase, GameState, Obstacle};

/// Cap overhang on each side of an obstacle
const CAP_OVERHANG: f32 = 5.0;
const CAP_HEIGHT: f32 = 20.0;
const CIRCLE_SEGMENTS: u32 = 32;

/// Everything to draw for one frame, back to front
#[derive(Debug, Default)]
pub struct Scene {
    pub triangles: Vec<Vertex>,
    /// Textured avatar quad, drawn last
    pub sprite: Option<[SpriteVertex; 6]>,
}

/// Build the frame. `sprite_ready` selects the image avatar over the procedural one.
pub fn build_scene(state: &GameState, sprite_ready: bool) -> Scene {
    let mut scene = Scene::default();

    if state.phase != GamePhase::Idle {
        for obstacle in &state.obstacles {
            scene
                .triangles
                .extend(obstacle_triangles(obstacle, state.height));
        }
    }

    // No tilt on the welcome screen
    let tilt = if state.phase == GamePhase::Idle {
        0.0
    } else {
        state.avatar.tilt()
    };

    if sprite_ready {
        scene.sprite = Some(sprite_quad(&state.avatar, tilt));
    } else {
        scene.triangles.extend(avatar_triangles(&state.avatar, tilt));
    }

    scene
}

fn obstacle_triangles(obstacle: &Obstacle, height: f32) -> Vec<Vertex> {
    let x = obstacle.x;
    let w = obstacle.width;
    let cap_x = x - CAP_OVERHANG;
    let cap_w = w + 2.0 * CAP_OVERHANG;

    let mut v = shapes::rect(x, 0.0, w, obstacle.top_height, colors::PIPE);
    v.extend(shapes::rect(
        cap_x,
        obstacle.top_height - CAP_HEIGHT,
        cap_w,
        CAP_HEIGHT,
        colors::PIPE_CAP,
    ));
    v.extend(shapes::rect(
        x,
        obstacle.bottom_y,
        w,
        height - obstacle.bottom_y,
        colors::PIPE,
    ));
    v.extend(shapes::rect(
        cap_x,
        obstacle.bottom_y,
        cap_w,
        CAP_HEIGHT,
        colors::PIPE_CAP,
    ));
    v
}

/// Procedural bird: body, eye, pupil, beak
fn avatar_triangles(avatar: &Avatar, tilt: f32) -> Vec<Vertex> {
    let c = avatar.pos;
    let r = avatar.radius;

    let mut v = shapes::circle(c, r, colors::BIRD_BODY, CIRCLE_SEGMENTS);
    v.extend(shapes::circle(
        c + Vec2::new(r / 2.0, -r / 2.0),
        r / 3.0,
        colors::BIRD_EYE,
        CIRCLE_SEGMENTS / 2,
    ));
    v.extend(shapes::circle(
        c + Vec2::new(r / 2.0 + 2.0, -r / 2.0),
        r / 8.0,
        colors::BIRD_PUPIL,
        CIRCLE_SEGMENTS / 4,
    ));
    v.extend(shapes::triangle(
        c + Vec2::new(r / 2.0, 0.0),
        c + Vec2::new(r + 10.0, 5.0),
        c + Vec2::new(r / 2.0, 10.0),
        colors::BIRD_BEAK,
    ));

    shapes::rotate_vertices(&mut v, c, tilt);
    v
}

/// Sprite footprint is 4r x 3r centred on the avatar
fn sprite_quad(avatar: &Avatar, tilt: f32) -> [SpriteVertex; 6] {
    let c = avatar.pos;
    let half = Vec2::new(avatar.radius * 2.0, avatar.radius * 1.5);
    let corner = |dx: f32, dy: f32, u: f32, v: f32| {
        let p = shapes::rotate_about(c + Vec2::new(dx, dy), c, tilt);
        SpriteVertex::new(p.x, p.y, u, v)
    };

    let tl = corner(-half.x, -half.y, 0.0, 0.0);
    let tr = corner(half.x, -half.y, 1.0, 0.0);
    let bl = corner(-half.x, half.y, 0.0, 1.0);
    let br = corner(half.x, half.y, 1.0, 1.0);
    [tl, tr, bl, bl, tr, br]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn running_with_obstacle() -> GameState {
        let mut s = GameState::new(400.0, 600.0, Tuning::default(), 3, 0);
        s.start(0.0);
        s.obstacles
            .push(Obstacle::with_top_height(1, 200.0, 200.0, &s.tuning));
        s
    }

    #[test]
    fn test_idle_draws_only_avatar() {
        let s = GameState::new(400.0, 600.0, Tuning::default(), 3, 0);
        let scene = build_scene(&s, false);
        assert!(scene.sprite.is_none());
        assert!(
            scene
                .triangles
                .iter()
                .all(|v| v.color != colors::PIPE && v.color != colors::PIPE_CAP)
        );
    }

    #[test]
    fn test_obstacle_rectangles() {
        let s = running_with_obstacle();
        let scene = build_scene(&s, true);
        let pipe: Vec<&Vertex> = scene
            .triangles
            .iter()
            .filter(|v| v.color == colors::PIPE)
            .collect();
        // two bodies
        assert_eq!(pipe.len(), 12);
        let max_y = pipe.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 600.0);

        let caps: Vec<&Vertex> = scene
            .triangles
            .iter()
            .filter(|v| v.color == colors::PIPE_CAP)
            .collect();
        assert_eq!(caps.len(), 12);
        let min_x = caps.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        assert_eq!(min_x, 195.0);
    }

    #[test]
    fn test_sprite_replaces_procedural_avatar() {
        let s = running_with_obstacle();
        let with_sprite = build_scene(&s, true);
        let without = build_scene(&s, false);
        assert!(with_sprite.sprite.is_some());
        assert!(without.sprite.is_none());
        assert!(
            with_sprite
                .triangles
                .iter()
                .all(|v| v.color != colors::BIRD_BODY)
        );
        assert!(without.triangles.iter().any(|v| v.color == colors::BIRD_BODY));
    }

    #[test]
    fn test_sprite_footprint_unrotated() {
        let s = running_with_obstacle();
        // zero velocity -> zero tilt
        let quad = build_scene(&s, true).sprite.unwrap();
        assert_eq!(quad[0].position, [40.0, 270.0]);
        assert_eq!(quad[5].position, [120.0, 330.0]);
        assert_eq!(quad[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_falling_avatar_tilts_beak_down() {
        let mut s = running_with_obstacle();
        s.avatar.velocity = 20.0;
        let scene = build_scene(&s, false);
        let beak_tip = scene
            .triangles
            .iter()
            .filter(|v| v.color == colors::BIRD_BEAK)
            .nth(1)
            .unwrap();
        // unrotated tip would sit 5 px below the centre
        assert!(beak_tip.position[1] > s.avatar.pos.y + 5.0);
    }
}
