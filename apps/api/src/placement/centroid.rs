//! Centroid-balancing placement (`agirlik`).
//!
//! Each tile goes wherever it pulls the aggregate area-weighted centroid
//! closest to the canvas center. Candidates are the exact center, the mirror
//! of the current centroid through the center, and a bounded set of uniform
//! samples. Scores are computed from the running sums without mutating them;
//! the caller records the chosen placement afterwards.

use rand::Rng;

use crate::placement::{tile_center, Generator};

const RANDOM_CANDIDATES: usize = 24;

/// A random candidate at or below this fraction of the current distance
/// ends the search early.
const EARLY_EXIT_RATIO: f64 = 0.7;

impl<R: Rng> Generator<R> {
    pub(crate) fn place_centroid(&mut self, tw: u32, th: u32) -> (u32, u32) {
        let (target_x, target_y) = self.canvas_center();

        let mut best = self.clamp_tile(target_x, target_y, tw, th);
        let mut best_score = self.distance_after(best, tw, th);

        let current_dist = match self.centroid() {
            Some((cx, cy)) => {
                let mirror = self.clamp_tile(target_x * 2.0 - cx, target_y * 2.0 - cy, tw, th);
                let mirror_score = self.distance_after(mirror, tw, th);
                if mirror_score < best_score {
                    best_score = mirror_score;
                    best = mirror;
                }
                Some((cx - target_x).hypot(cy - target_y))
            }
            None => None,
        };

        for _ in 0..RANDOM_CANDIDATES {
            let candidate = self.random_placement(tw, th);
            let score = self.distance_after(candidate, tw, th);
            if score < best_score {
                best_score = score;
                best = candidate;
                if current_dist.is_some_and(|d| score <= d * EARLY_EXIT_RATIO) {
                    break;
                }
            }
        }

        best
    }

    /// Distance from canvas center of the aggregate centroid if a `tw x th`
    /// tile were added at `pos`.
    pub(crate) fn distance_after(&self, pos: (u32, u32), tw: u32, th: u32) -> f64 {
        let (target_x, target_y) = self.canvas_center();
        let area = f64::from(tw) * f64::from(th);
        if area <= 0.0 {
            return self
                .centroid()
                .map_or(0.0, |(cx, cy)| (cx - target_x).hypot(cy - target_y));
        }

        let total = self.stats.total_area + area;
        let (tile_x, tile_y) = tile_center(pos.0, pos.1, tw, th);
        let new_cx = (self.stats.sum_x + tile_x * area) / total;
        let new_cy = (self.stats.sum_y + tile_y * area) / total;
        (new_cx - target_x).hypot(new_cy - target_y)
    }
}
