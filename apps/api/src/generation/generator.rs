//! Map Generation — orchestrates one request from parameters to raster.
//!
//! Flow: allocate batches → resolve seed → build placement generator →
//!       place + stamp every tile → color the coverage grid.
//!
//! Purely synchronous and CPU-bound; handlers run it on the blocking pool.
//! Once allocation succeeds nothing below can fail.

use image::{ImageBuffer, Rgba, RgbaImage};
use rand::Rng;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::allocator::{allocate, TileBatch};
use crate::generation::params::GenerationParams;
use crate::generation::seed::{seed_from_string, seeded_rng};
use crate::placement::{Generator, Placement, PlacementConfig};
use crate::raster::{CoverageGrid, Palette, ToneMapper};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Scalar diagnostics surfaced as response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStats {
    /// Batches emitted by the allocator.
    pub batches: usize,
    /// Tile instances that actually landed on the canvas.
    pub total_placements: u64,
    /// Resolved integer seed; replaying it reproduces the raster.
    pub seed: i64,
}

/// A finished map: the RGBA raster plus its diagnostics.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub image: RgbaImage,
    pub stats: MapStats,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline with a PRNG seeded from `params.seed`.
pub fn generate_map(params: &GenerationParams, palette: Palette) -> Result<RenderedMap, AppError> {
    let batches = allocate(
        &params.tiles,
        params.legacy,
        params.ka,
        params.cap,
        params.max_tiles,
    )?;
    let seed = seed_from_string(&params.seed);
    let rng = seeded_rng(seed);
    Ok(render_batches(params, &batches, palette, seed, rng))
}

/// Places every batch with `rng` and paints the result.
///
/// Split from `generate_map` so tests can drive it with a fixed stream.
pub fn render_batches<R: Rng>(
    params: &GenerationParams,
    batches: &[TileBatch],
    palette: Palette,
    seed: i64,
    rng: R,
) -> RenderedMap {
    let mut generator = Generator::new(
        params.width,
        params.height,
        &PlacementConfig::from(params),
        rng,
    );
    let mut coverage = CoverageGrid::new(params.width, params.height);
    let total_placements = place_batches(&mut generator, &mut coverage, batches, params.rotate);

    debug!(
        mode = %generator.mode(),
        ring_boundaries = ?generator.ring_layout().boundaries(),
        covered = coverage.total(),
        max_coverage = coverage.max(),
        "placement finished"
    );

    let mapper = ToneMapper::new(palette, params.brown_cap, params.log_tone);
    let image = paint(&coverage, &mapper, params.bg_alpha);

    RenderedMap {
        image,
        stats: MapStats {
            batches: batches.len(),
            total_placements,
            seed,
        },
    }
}

/// Places and stamps every tile instance, returning how many landed.
///
/// Tiles that do not fit (after the optional rotation) are skipped and not
/// counted.
fn place_batches<R: Rng>(
    generator: &mut Generator<R>,
    coverage: &mut CoverageGrid,
    batches: &[TileBatch],
    rotate: bool,
) -> u64 {
    let mut placed = 0u64;
    let mut skipped = 0u64;

    for batch in batches {
        for _ in 0..batch.count {
            let (tw, th) = if rotate {
                generator.maybe_rotate(batch.width, batch.height)
            } else {
                (batch.width, batch.height)
            };
            if !generator.fits(tw, th) {
                skipped += 1;
                continue;
            }

            let (x, y) = generator.place(tw, th);
            generator.record(Placement {
                x,
                y,
                width: tw,
                height: th,
            });
            coverage.stamp(x, y, tw, th);
            placed += 1;
        }
    }

    if skipped > 0 {
        debug!(
            skipped,
            canvas_width = coverage.width(),
            canvas_height = coverage.height(),
            "tiles larger than the canvas were not placed"
        );
    }
    placed
}

/// Paints covered cells over a black background with alpha `bg_alpha`.
fn paint(coverage: &CoverageGrid, mapper: &ToneMapper, bg_alpha: u8) -> RgbaImage {
    let mut image: RgbaImage =
        ImageBuffer::from_pixel(coverage.width(), coverage.height(), Rgba([0, 0, 0, bg_alpha]));
    for y in 0..coverage.height() {
        for x in 0..coverage.width() {
            if let Some(color) = mapper.color_for(coverage.get(x, y)) {
                image.put_pixel(x, y, color);
            }
        }
    }
    image
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
