//! Bimodal continent placement (`iki-kita`).
//!
//! Two fixed lobes at a quarter and three quarters of the width, sampled with
//! independent normal offsets (sigma = width/10 horizontally, height/6
//! vertically). Samples that leave the canvas are redrawn a few times before
//! falling back to ring placement.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::placement::{Generator, Point};

const MAX_SAMPLE_ATTEMPTS: usize = 6;

pub fn continent_centers(width: u32, height: u32) -> Vec<Point> {
    let (w, h) = (i64::from(width), i64::from(height));
    vec![
        Point { x: w / 4, y: h / 2 },
        Point {
            x: (3 * w) / 4,
            y: h / 2,
        },
    ]
}

impl<R: Rng> Generator<R> {
    pub(crate) fn place_continents(&mut self, tw: u32, th: u32) -> (u32, u32) {
        if self.continent_centers.is_empty() {
            return self.place_rings(tw, th);
        }
        let center = self.continent_centers[self.rng.gen_range(0..self.continent_centers.len())];
        let sigma_x = f64::from(self.width) / 10.0;
        let sigma_y = f64::from(self.height) / 6.0;
        let max_x = i64::from(self.width) - i64::from(tw);
        let max_y = i64::from(self.height) - i64::from(th);

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let nx: f64 = self.rng.sample(StandardNormal);
            let ny: f64 = self.rng.sample(StandardNormal);
            let x = (center.x as f64 + nx * sigma_x).round() as i64;
            let y = (center.y as f64 + ny * sigma_y).round() as i64;
            if (0..=max_x).contains(&x) && (0..=max_y).contains(&y) {
                return (x as u32, y as u32);
            }
        }

        self.place_rings(tw, th)
    }
}
