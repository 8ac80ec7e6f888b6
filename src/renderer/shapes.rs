//! Shape generation for 2D primitives
//!
//! All coordinates are screen pixels with y pointing down.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle (two triangles)
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let (x2, y2) = (x + width, y + height);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Single filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Rotate `point` by `angle` radians about `pivot` (clockwise on a y-down screen)
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}

/// Rotate every vertex in place about `pivot`
pub fn rotate_vertices(vertices: &mut [Vertex], pivot: Vec2, angle: f32) {
    if angle == 0.0 {
        return;
    }
    for v in vertices {
        let p = rotate_about(Vec2::from(v.position), pivot, angle);
        v.position = p.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(10.0, 20.0, 60.0, 100.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 70.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 120.0);
    }

    #[test]
    fn test_empty_rect() {
        assert!(rect(0.0, 0.0, 0.0, 10.0, [1.0; 4]).is_empty());
        assert!(rect(0.0, 0.0, 10.0, -1.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_circle_vertices_on_radius() {
        let center = Vec2::new(5.0, 5.0);
        let v = circle(center, 3.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for tri in v.chunks(3) {
            assert_eq!(Vec2::from(tri[0].position), center);
            assert!((Vec2::from(tri[1].position).distance(center) - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotate_about() {
        let p = rotate_about(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), PI / 2.0);
        // +x turns into +y (downwards on screen)
        assert!((p - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }
}
