//! Placement Generator — decides where each tile instance lands on the canvas.
//!
//! One `Generator` is built per request and owns everything it needs: the
//! seeded PRNG, the mode-specific geometry computed at construction, and the
//! running area-weighted centroid of the tiles placed so far. Nothing is shared
//! between requests.
//!
//! # Strategies
//! - `rings` (merkez) — probability ladder over annular segments around center
//! - `centroid` (agirlik) — greedy pull of the aggregate centroid to center
//! - `islands` (adalar) — uniform disks around random cluster centers
//! - `continents` (iki-kita) — two Gaussian lobes left and right of center
//!
//! Every strategy ends in `random_placement` when its geometry is unusable, so
//! `place` cannot fail and every retry loop is bounded.

pub mod centroid;
pub mod continents;
pub mod islands;
pub mod rings;

use rand::Rng;

use crate::generation::params::{GenerationParams, Mode, DEFAULT_ISLAND_RADIUS_FRAC};
use crate::placement::rings::RingLayout;

/// An integer canvas coordinate used for cluster centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// A placed tile rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Construction-time knobs for the generator, taken from normalized params.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub mode: Mode,
    pub rings: u32,
    pub ring_start: f64,
    pub ring_end: f64,
    pub islands: i64,
    pub island_radius_frac: f64,
}

impl From<&GenerationParams> for PlacementConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            mode: params.mode,
            rings: params.rings,
            ring_start: params.ring_start,
            ring_end: params.ring_end,
            islands: params.islands,
            island_radius_frac: params.island_radius_frac,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            rings: 10,
            ring_start: 0.1,
            ring_end: 0.8,
            islands: 4,
            island_radius_frac: DEFAULT_ISLAND_RADIUS_FRAC,
        }
    }
}

/// Running area-weighted sums of placed tile centers.
#[derive(Debug, Clone, Copy, Default)]
struct PlacementStats {
    total_area: f64,
    sum_x: f64,
    sum_y: f64,
}

/// Per-request placement engine that owns its PRNG and the running centroid.
pub struct Generator<R> {
    width: u32,
    height: u32,
    mode: Mode,
    /// Built for every mode: other strategies fall back to ring placement.
    rings: RingLayout,
    /// Cluster centers; empty unless the mode is `Islands`.
    island_centers: Vec<Point>,
    island_radius_frac: f64,
    /// Lobe centers; empty unless the mode is `Continents`.
    continent_centers: Vec<Point>,
    stats: PlacementStats,
    rng: R,
}

impl<R: Rng> Generator<R> {
    /// Builds the generator, drawing any cluster centers from `rng` up front.
    pub fn new(width: u32, height: u32, config: &PlacementConfig, mut rng: R) -> Self {
        let island_centers = match config.mode {
            Mode::Islands => islands::island_centers(width, height, config.islands, &mut rng),
            _ => Vec::new(),
        };
        let continent_centers = match config.mode {
            Mode::Continents => continents::continent_centers(width, height),
            _ => Vec::new(),
        };

        Self {
            width,
            height,
            mode: config.mode,
            rings: RingLayout::new(config.rings, config.ring_start, config.ring_end),
            island_centers,
            island_radius_frac: config.island_radius_frac,
            continent_centers,
            stats: PlacementStats::default(),
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ring_layout(&self) -> &RingLayout {
        &self.rings
    }

    /// Returns a top-left position with `0 <= x <= width - tw` and
    /// `0 <= y <= height - th`, or `(0, 0)` when the tile cannot fit.
    pub fn place(&mut self, tw: u32, th: u32) -> (u32, u32) {
        if !self.fits(tw, th) {
            return (0, 0);
        }
        match self.mode {
            Mode::Rings => self.place_rings(tw, th),
            Mode::Centroid => self.place_centroid(tw, th),
            Mode::Islands => self.place_islands(tw, th),
            Mode::Continents => self.place_continents(tw, th),
        }
    }

    /// True when a `tw x th` tile fits inside the canvas.
    pub fn fits(&self, tw: u32, th: u32) -> bool {
        tw > 0 && th > 0 && tw <= self.width && th <= self.height
    }

    /// Swaps a non-square tile's orientation with probability 1/2.
    pub fn maybe_rotate(&mut self, tw: u32, th: u32) -> (u32, u32) {
        if tw != th && self.rng.gen_range(0..2) == 0 {
            (th, tw)
        } else {
            (tw, th)
        }
    }

    /// Uniform position over every valid top-left coordinate.
    pub fn random_placement(&mut self, tw: u32, th: u32) -> (u32, u32) {
        let span_x = self.width.saturating_sub(tw);
        let span_y = self.height.saturating_sub(th);
        let x = if span_x > 0 {
            self.rng.gen_range(0..=span_x)
        } else {
            0
        };
        let y = if span_y > 0 {
            self.rng.gen_range(0..=span_y)
        } else {
            0
        };
        (x, y)
    }

    /// Folds a placed tile into the running centroid.
    pub fn record(&mut self, placement: Placement) {
        let area = f64::from(placement.width) * f64::from(placement.height);
        if area <= 0.0 {
            return;
        }
        let (cx, cy) = tile_center(placement.x, placement.y, placement.width, placement.height);
        self.stats.total_area += area;
        self.stats.sum_x += cx * area;
        self.stats.sum_y += cy * area;
    }

    /// Area-weighted center of everything recorded so far.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.stats.total_area <= 0.0 {
            return None;
        }
        Some((
            self.stats.sum_x / self.stats.total_area,
            self.stats.sum_y / self.stats.total_area,
        ))
    }

    fn canvas_center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    fn min_dim(&self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Converts a desired tile center into a clamped top-left position.
    fn clamp_tile(&self, cx: f64, cy: f64, tw: u32, th: u32) -> (u32, u32) {
        let x = clamp_axis(cx, tw, self.width);
        let y = clamp_axis(cy, th, self.height);
        (x, y)
    }
}

fn tile_center(x: u32, y: u32, tw: u32, th: u32) -> (f64, f64) {
    (
        f64::from(x) + f64::from(tw) / 2.0,
        f64::from(y) + f64::from(th) / 2.0,
    )
}

/// `round(center) - size/2`, clamped to `[0, extent - size]`.
fn clamp_axis(center: f64, size: u32, extent: u32) -> u32 {
    let max = i64::from(extent.saturating_sub(size));
    let origin = center.round() as i64 - i64::from(size / 2);
    origin.clamp(0, max) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
