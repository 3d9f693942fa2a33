//! Island-cluster placement (`adalar`).

use std::f64::consts::TAU;

use rand::Rng;

use crate::generation::params::DEFAULT_ISLAND_RADIUS_FRAC;
use crate::placement::{Generator, Point};

/// Cluster count used when the request asks for none.
const DEFAULT_ISLAND_COUNT: usize = 3;

/// Inset of the center-sampling area, as a fraction of the shorter side.
const CENTER_MARGIN_FRAC: f64 = 0.1;

/// Draws `count` cluster centers inside a 10% margin of the canvas.
///
/// Non-positive counts fall back to three clusters.
pub fn island_centers<R: Rng>(width: u32, height: u32, count: i64, rng: &mut R) -> Vec<Point> {
    let count = usize::try_from(count)
        .ok()
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_ISLAND_COUNT);
    let min_dim = f64::from(width.min(height));
    let margin = (min_dim * CENTER_MARGIN_FRAC) as i64;
    let span_x = (i64::from(width) - 2 * margin).max(1);
    let span_y = (i64::from(height) - 2 * margin).max(1);

    (0..count)
        .map(|_| Point {
            x: margin + rng.gen_range(0..span_x),
            y: margin + rng.gen_range(0..span_y),
        })
        .collect()
}

impl<R: Rng> Generator<R> {
    pub(crate) fn place_islands(&mut self, tw: u32, th: u32) -> (u32, u32) {
        if self.island_centers.is_empty() {
            return self.place_rings(tw, th);
        }
        let center = self.island_centers[self.rng.gen_range(0..self.island_centers.len())];

        let radius_frac = if self.island_radius_frac > 0.0 {
            self.island_radius_frac
        } else {
            DEFAULT_ISLAND_RADIUS_FRAC
        };
        let max_radius = radius_frac * self.min_dim();
        let radius = self.rng.gen::<f64>() * max_radius;
        let theta = self.rng.gen::<f64>() * TAU;

        let cx = center.x as f64 + theta.cos() * radius;
        let cy = center.y as f64 + theta.sin() * radius;
        self.clamp_tile(cx, cy, tw, th)
    }
}
