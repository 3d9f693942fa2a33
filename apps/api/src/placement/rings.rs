//! Ring-weighted placement (`merkez`).
//!
//! The canvas is divided into annular segments by radius fractions of half the
//! shorter canvas side. A fixed probability ladder favors the innermost
//! segments; any draw past the ladder's total scatters the tile uniformly.

use std::f64::consts::TAU;

use rand::Rng;

use crate::placement::Generator;

/// Selection probability of the first four segments, innermost first.
/// Sums to 0.75; the remaining mass is uniform placement.
const SEGMENT_LADDER: [f64; 4] = [0.40, 0.20, 0.10, 0.05];

/// Segment draws before giving up on a degenerate layout.
const MAX_SEGMENT_ATTEMPTS: usize = 12;

/// Spread applied when the requested ring range collapses to a point.
const COLLAPSED_SPAN: f64 = 0.1;

/// Radius-fraction boundaries of the ring segments.
///
/// Always `segments + 1` entries, starting at 0, non-decreasing, within `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    boundaries: Vec<f64>,
}

impl RingLayout {
    /// Builds boundaries for `rings` segments between `ring_start` and `ring_end`.
    ///
    /// An empty or inverted range is widened by 0.1 (downward when the end is
    /// already at 1) so the layout is never degenerate.
    pub fn new(rings: u32, ring_start: f64, ring_end: f64) -> Self {
        let mut start = ring_start.clamp(0.0, 1.0);
        let mut end = ring_end.clamp(0.0, 1.0);
        if end <= start {
            if end >= 1.0 {
                start = (end - COLLAPSED_SPAN).clamp(0.0, 1.0);
            } else {
                end = (start + COLLAPSED_SPAN).clamp(0.0, 1.0);
            }
        }

        let segments = rings.max(1) as usize;
        let mut boundaries = vec![0.0; segments + 1];

        if segments == 1 {
            boundaries[1] = end.max(start);
            return Self { boundaries };
        }

        let mut span = end - start;
        if span <= 0.0 {
            span = COLLAPSED_SPAN;
            end = (start + span).clamp(start, 1.0);
        }
        let step = span / (segments - 1) as f64;

        let mut prev = 0.0;
        for (i, boundary) in boundaries.iter_mut().enumerate().skip(1) {
            let value = if i == 1 {
                start
            } else if i == segments {
                end
            } else {
                start + (i - 1) as f64 * step
            };
            *boundary = value.clamp(prev, 1.0);
            prev = *boundary;
        }

        Self { boundaries }
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn segments(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// Maps a uniform draw `r` in `[0, 1)` onto a segment index, or `None`
    /// when the draw falls past the ladder and placement should be uniform.
    pub fn select_segment(&self, r: f64) -> Option<usize> {
        let limit = self.segments().min(SEGMENT_LADDER.len());
        let mut cumulative = 0.0;
        for (i, p) in SEGMENT_LADDER.iter().take(limit).enumerate() {
            cumulative += p;
            if r < cumulative {
                return Some(i);
            }
        }
        None
    }

    /// Inner and outer radius fractions of `segment`, if it has any width.
    fn segment_bounds(&self, segment: usize) -> Option<(f64, f64)> {
        let inner = *self.boundaries.get(segment)?;
        let outer = *self.boundaries.get(segment + 1)?;
        (outer > inner).then_some((inner, outer))
    }
}

impl<R: Rng> Generator<R> {
    pub(crate) fn place_rings(&mut self, tw: u32, th: u32) -> (u32, u32) {
        let radius_max = self.min_dim() / 2.0;
        let (center_x, center_y) = self.canvas_center();

        for _ in 0..MAX_SEGMENT_ATTEMPTS {
            let r: f64 = self.rng.gen();
            let Some(segment) = self.rings.select_segment(r) else {
                return self.random_placement(tw, th);
            };
            let Some((inner, outer)) = self.rings.segment_bounds(segment) else {
                continue;
            };

            let radius_frac = inner + self.rng.gen::<f64>() * (outer - inner);
            let theta = self.rng.gen::<f64>() * TAU;
            let radius = radius_frac * radius_max;
            let cx = center_x + theta.cos() * radius;
            let cy = center_y + theta.sin() * radius;
            return self.clamp_tile(cx, cy, tw, th);
        }

        self.random_placement(tw, th)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::params::Mode;
    use crate::generation::seed::seeded_rng;
    use crate::placement::PlacementConfig;
    use rand::rngs::mock::StepRng;

    fn assert_well_formed(layout: &RingLayout) {
        let b = layout.boundaries();
        assert_eq!(b[0], 0.0);
        for pair in b.windows(2) {
            assert!(pair[0] <= pair[1], "not non-decreasing: {b:?}");
        }
        assert!(b.iter().all(|v| (0.0..=1.0).contains(v)), "out of range: {b:?}");
    }

    #[test]
    fn test_default_layout_interpolates() {
        let layout = RingLayout::new(10, 0.1, 0.8);
        let b = layout.boundaries();
        assert_eq!(b.len(), 11);
        assert_eq!(b[1], 0.1);
        assert_eq!(b[10], 0.8);
        assert!((b[5] - (0.1 + 4.0 * 0.7 / 9.0)).abs() < 1e-12);
        assert_well_formed(&layout);
    }

    #[test]
    fn test_single_segment_uses_end() {
        let layout = RingLayout::new(1, 0.2, 0.6);
        assert_eq!(layout.boundaries(), &[0.0, 0.6]);
    }

    #[test]
    fn test_zero_rings_treated_as_one() {
        let layout = RingLayout::new(0, 0.2, 0.6);
        assert_eq!(layout.segments(), 1);
    }

    #[test]
    fn test_inverted_range_self_corrects() {
        let layout = RingLayout::new(5, 0.7, 0.3);
        let b = layout.boundaries();
        assert_eq!(b[1], 0.7);
        assert!((b[5] - 0.8).abs() < 1e-12);
        assert_well_formed(&layout);
    }

    #[test]
    fn test_range_pinned_at_one_widens_downward() {
        let layout = RingLayout::new(3, 1.0, 1.0);
        let b = layout.boundaries();
        assert!((b[1] - 0.9).abs() < 1e-12);
        assert_eq!(b[3], 1.0);
        assert_well_formed(&layout);
    }

    #[test]
    fn test_boundaries_well_formed_across_inputs() {
        let fractions = [-0.5, 0.0, 0.05, 0.3, 0.5, 0.95, 1.0, 1.5];
        for rings in [1, 2, 3, 4, 7, 25] {
            for &start in &fractions {
                for &end in &fractions {
                    assert_well_formed(&RingLayout::new(rings, start, end));
                }
            }
        }
    }

    #[test]
    fn test_ladder_selection() {
        let layout = RingLayout::new(10, 0.1, 0.8);
        assert_eq!(layout.select_segment(0.0), Some(0));
        assert_eq!(layout.select_segment(0.39), Some(0));
        assert_eq!(layout.select_segment(0.45), Some(1));
        assert_eq!(layout.select_segment(0.65), Some(2));
        assert_eq!(layout.select_segment(0.72), Some(3));
        assert_eq!(layout.select_segment(0.76), None);
        assert_eq!(layout.select_segment(0.99), None);
    }

    #[test]
    fn test_ladder_truncated_to_ring_count() {
        let layout = RingLayout::new(2, 0.1, 0.8);
        assert_eq!(layout.select_segment(0.5), Some(1));
        assert_eq!(layout.select_segment(0.61), None);
    }

    #[test]
    fn test_zero_stream_lands_on_center() {
        // r = 0 picks segment 0 with radius 0: the tile is centered.
        let config = PlacementConfig {
            mode: Mode::Rings,
            ..PlacementConfig::default()
        };
        let mut generator = Generator::new(20, 10, &config, StepRng::new(0, 0));
        assert_eq!(generator.place(2, 2), (9, 4));
        assert_eq!(generator.place(1, 1), (10, 5));
    }

    #[test]
    fn test_zero_width_inner_segment_is_skipped() {
        // ringStart 0 leaves segment 0 as [0, 0]; an all-zero stream keeps
        // drawing it, exhausts the retries and lands on the uniform origin
        // instead of the center.
        let config = PlacementConfig {
            mode: Mode::Rings,
            rings: 4,
            ring_start: 0.0,
            ring_end: 0.8,
            ..PlacementConfig::default()
        };
        let layout = RingLayout::new(4, 0.0, 0.8);
        assert_eq!(layout.segment_bounds(0), None);
        assert!(layout.segment_bounds(1).is_some());

        let mut generator = Generator::new(20, 10, &config, StepRng::new(0, 0));
        assert_eq!(generator.place(2, 2), (0, 0));
    }

    #[test]
    fn test_zero_width_inner_segment_stays_in_bounds() {
        let config = PlacementConfig {
            mode: Mode::Rings,
            rings: 3,
            ring_start: 0.0,
            ring_end: 0.5,
            ..PlacementConfig::default()
        };
        let mut generator = Generator::new(30, 20, &config, seeded_rng(31));
        for _ in 0..500 {
            let (x, y) = generator.place(3, 2);
            assert!(x + 3 <= 30 && y + 2 <= 20, "({x}, {y}) out of bounds");
        }
    }

    #[test]
    fn test_fully_degenerate_layout_falls_back_to_uniform() {
        let mut generator = Generator::new(20, 20, &PlacementConfig::default(), seeded_rng(6));
        generator.rings = RingLayout {
            boundaries: vec![0.0; 5],
        };
        assert!((0..4).all(|s| generator.rings.segment_bounds(s).is_none()));

        let xs: Vec<u32> = (0..400).map(|_| generator.place(1, 1).0).collect();
        // Ring placement would pin every tile to the center column.
        assert!(xs.iter().any(|&x| x <= 2), "no tile near the left edge");
        assert!(xs.iter().any(|&x| x >= 17), "no tile near the right edge");

        let mut zero = Generator::new(20, 20, &PlacementConfig::default(), StepRng::new(0, 0));
        zero.rings = generator.rings.clone();
        assert_eq!(zero.place(1, 1), (0, 0));
    }

    #[test]
    fn test_ring_placements_concentrate_near_center() {
        let config = PlacementConfig {
            mode: Mode::Rings,
            ..PlacementConfig::default()
        };
        let mut generator = Generator::new(100, 100, &config, seeded_rng(2024));
        assert_eq!(generator.ring_layout().segments(), 10);
        let near = (0..2000)
            .map(|_| generator.place(1, 1))
            .filter(|&(x, y)| {
                let (dx, dy) = (f64::from(x) - 50.0, f64::from(y) - 50.0);
                (dx * dx + dy * dy).sqrt() <= 0.35 * 50.0
            })
            .count();
        // Uniform scatter would put ~10% inside this radius.
        assert!(near > 2000 / 2, "only {near} near center");
    }
}
