//! Obstacles: a top and bottom rectangle with a fixed gap between them

use rand::Rng;

use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap: f32,
    /// Height of the top rectangle (gap top edge)
    pub top_height: f32,
    /// Where the bottom rectangle begins (gap bottom edge)
    pub bottom_y: f32,
    /// Already counted towards the score
    pub passed: bool,
    /// Fully off-screen, drop at end of frame
    pub retire: bool,
}

impl Obstacle {
    /// Spawn at `origin_x` with the gap placed uniformly within the feasible range.
    ///
    /// On a screen too short for the gap plus both minimum rectangles the gap
    /// is centred instead.
    pub fn new(id: u32, origin_x: f32, height: f32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let top_height = match tuning.top_height_range(height) {
            Some((lo, hi)) => rng.random_range(lo..=hi),
            None => ((height - tuning.obstacle_gap) / 2.0).max(0.0),
        };
        Self::with_top_height(id, origin_x, top_height, tuning)
    }

    pub fn with_top_height(id: u32, origin_x: f32, top_height: f32, tuning: &Tuning) -> Self {
        Self {
            id,
            x: origin_x,
            width: tuning.obstacle_width,
            gap: tuning.obstacle_gap,
            top_height,
            bottom_y: top_height + tuning.obstacle_gap,
            passed: false,
            retire: false,
        }
    }

    /// Drift left; mark for retirement once the trailing edge leaves the screen
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
        if self.right() < 0.0 {
            self.retire = true;
        }
    }

    /// Trailing (right) edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_geometry() {
        let o = Obstacle::with_top_height(1, 400.0, 200.0, &Tuning::default());
        assert_eq!(o.bottom_y, 370.0);
        assert_eq!(o.right(), 460.0);
        assert!(!o.passed && !o.retire);
    }

    #[test]
    fn test_retires_after_trailing_edge_leaves() {
        let mut o = Obstacle::with_top_height(1, 2.0, 200.0, &Tuning::default());
        // right edge 62 -> reaches exactly 0 after 31 steps, still on-screen
        for _ in 0..31 {
            o.advance(2.0);
        }
        assert_eq!(o.right(), 0.0);
        assert!(!o.retire);
        o.advance(2.0);
        assert!(o.retire);
    }

    #[test]
    fn test_short_screen_centres_gap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let o = Obstacle::new(1, 0.0, 200.0, &Tuning::default(), &mut rng);
        assert_eq!(o.top_height, 15.0);
        assert_eq!(o.bottom_y, 185.0);
    }

    proptest! {
        #[test]
        fn prop_top_height_leaves_min_rectangles(seed in any::<u64>(), height in 270.0f32..2000.0) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let o = Obstacle::new(1, 0.0, height, &tuning, &mut rng);
            prop_assert!(o.top_height >= tuning.obstacle_min_height);
            prop_assert!(height - (o.top_height + o.gap) >= tuning.obstacle_min_height - 1e-2);
            prop_assert!((o.bottom_y - o.top_height - tuning.obstacle_gap).abs() < 1e-2);
        }
    }
}
