//! Tile Quota Allocator — turns a tile list into an exact integer placement plan.
//!
//! # Pipeline
//! 1. `parse_tile_list` — `WxH` / `WxH*count` tokens into fractional `TileSpec`s
//! 2. `apply_legacy_tiles` — merge the fixed 2x2 / 2x1 / 1x1 counts
//! 3. `apply_multiplier` — scale every requested count by `ka`
//! 4. `finalize_batches` — cap-aware largest-remainder apportionment
//!
//! The total that survives the cap is checked against a tile ceiling before
//! apportionment, so every batch count fits in a `u32` and the placement loop
//! is bounded.
//!
//! The tie-break order in step 4 (equal fractions resolved by ascending tile
//! index) decides which shape gets the last unit, so it is part of the
//! reproducibility contract.

use std::cmp::Ordering;

use tracing::debug;

use crate::errors::AppError;

/// Tile list used when the request leaves `tiles` blank.
pub const DEFAULT_TILE_LIST: &str = "2x2*400,2x1*300,1x1*100";

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// A requested tile shape with a (possibly fractional) quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSpec {
    pub width: u32,
    pub height: u32,
    pub count: f64,
}

/// A final, integer group of identical tiles to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBatch {
    pub width: u32,
    pub height: u32,
    pub count: u32,
}

/// Legacy fixed-count overrides for the three classic shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyCounts {
    pub n22: i64,
    pub n21: i64,
    pub n11: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Parses a comma-separated tile list.
///
/// Malformed tokens and non-positive dimensions are errors; tokens whose count
/// is zero or negative are dropped. A blank input yields the default list.
pub fn parse_tile_list(input: &str) -> Result<Vec<TileSpec>, AppError> {
    let input = if input.trim().is_empty() {
        DEFAULT_TILE_LIST
    } else {
        input
    };

    let mut specs = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(spec) = parse_tile_token(part)? {
            specs.push(spec);
        }
    }

    if specs.is_empty() {
        return Err(AppError::Validation(
            "no valid tile definitions found".to_string(),
        ));
    }
    Ok(specs)
}

fn parse_tile_token(part: &str) -> Result<Option<TileSpec>, AppError> {
    let (dims, count_str) = match part.split_once('*') {
        Some((dims, count)) => (dims, Some(count.trim())),
        None => (part, None),
    };

    let count = match count_str {
        Some(raw) if !raw.is_empty() => {
            let value = raw.parse::<f64>().map_err(|e| {
                AppError::Validation(format!("invalid tile count in {part:?}: {e}"))
            })?;
            if !value.is_finite() {
                return Err(AppError::Validation(format!(
                    "invalid tile count in {part:?}: not a finite number"
                )));
            }
            value
        }
        _ => 1.0,
    };

    let (w_str, h_str) = dims
        .split_once('x')
        .ok_or_else(|| AppError::Validation(format!("invalid tile dimensions in {part:?}")))?;

    let width = w_str
        .trim()
        .parse::<i64>()
        .map_err(|e| AppError::Validation(format!("invalid tile width in {part:?}: {e}")))?;
    let height = h_str
        .trim()
        .parse::<i64>()
        .map_err(|e| AppError::Validation(format!("invalid tile height in {part:?}: {e}")))?;

    if width <= 0 || height <= 0 {
        return Err(AppError::Validation(format!(
            "tile dimensions must be positive in {part:?}"
        )));
    }
    let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(AppError::Validation(format!(
                "tile dimensions too large in {part:?}"
            )))
        }
    };

    if count <= 0.0 {
        return Ok(None);
    }
    Ok(Some(TileSpec {
        width,
        height,
        count,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Adjustments
// ────────────────────────────────────────────────────────────────────────────

/// Adds the legacy counts to matching `WxH` entries, appending any shape not
/// already listed. Non-positive legacy counts are ignored.
pub fn apply_legacy_tiles(specs: &mut Vec<TileSpec>, legacy: LegacyCounts) {
    let entries = [(2, 2, legacy.n22), (2, 1, legacy.n21), (1, 1, legacy.n11)];

    for (width, height, n) in entries {
        if n <= 0 {
            continue;
        }
        match specs
            .iter_mut()
            .find(|s| s.width == width && s.height == height)
        {
            Some(spec) => spec.count += n as f64,
            None => specs.push(TileSpec {
                width,
                height,
                count: n as f64,
            }),
        }
    }
}

/// Scales every count by `ka`.
///
/// `ka == 0` means "leave unscaled"; a negative `ka` clamps to zero, which
/// zeroes every count and makes the later allocation fail.
pub fn apply_multiplier(specs: &mut [TileSpec], ka: f64) {
    if ka == 0.0 {
        return;
    }
    let ka = ka.max(0.0);
    if ka == 1.0 {
        return;
    }
    for spec in specs.iter_mut() {
        spec.count *= ka;
    }
}

/// Rejects plans whose placed total would exceed `max_tiles`.
///
/// The total is what apportionment will target: the rounded sum of counts,
/// or `cap` when the cap binds.
pub fn check_tile_total(specs: &[TileSpec], cap: i64, max_tiles: u32) -> Result<(), AppError> {
    let sum_counts: f64 = specs.iter().map(|s| s.count).sum();
    let placed = if cap > 0 {
        sum_counts.min(cap as f64)
    } else {
        sum_counts
    };
    if placed.round() > f64::from(max_tiles) {
        return Err(AppError::Validation(format!(
            "requested {placed} tiles, above the limit of {max_tiles} per map"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Largest-remainder apportionment
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Remainder {
    index: usize,
    frac: f64,
}

fn by_frac_then_index(a: &Remainder, b: &Remainder) -> Ordering {
    a.frac
        .partial_cmp(&b.frac)
        .unwrap_or(Ordering::Equal)
        .then(a.index.cmp(&b.index))
}

/// Apportions integer counts from fractional tile counts, honoring `cap` when > 0.
///
/// Returns batches in input order with zero-count entries dropped. An empty
/// vector means nothing is left to place. A count too large for a batch is a
/// validation error; `check_tile_total` rules that out up front.
pub fn finalize_batches(specs: &[TileSpec], cap: i64) -> Result<Vec<TileBatch>, AppError> {
    let sum_counts: f64 = specs.iter().map(|s| s.count).sum();
    if sum_counts == 0.0 {
        return Ok(Vec::new());
    }

    let scale = if cap > 0 && sum_counts > cap as f64 {
        cap as f64 / sum_counts
    } else {
        1.0
    };

    let mut floors = vec![0i64; specs.len()];
    let mut remainders = Vec::with_capacity(specs.len());
    let mut total_floors = 0i64;
    let mut sum_scaled = 0.0;

    for (index, spec) in specs.iter().enumerate() {
        let adjusted = spec.count * scale;
        if adjusted <= 0.0 {
            continue;
        }
        sum_scaled += adjusted;
        let base = adjusted.floor();
        floors[index] = base as i64;
        total_floors = total_floors
            .checked_add(base as i64)
            .ok_or_else(|| AppError::Validation("tile counts are too large".to_string()))?;

        let frac = adjusted - base;
        if frac > 0.0 {
            remainders.push(Remainder { index, frac });
        }
    }

    let target_total = if cap > 0 {
        if scale < 1.0 {
            cap
        } else {
            cap.min(sum_scaled.round() as i64)
        }
    } else {
        sum_scaled.round() as i64
    };

    if target_total < total_floors {
        // Take units back from the smallest remainders first.
        remainders.sort_by(by_frac_then_index);
        let excess = total_floors - target_total;
        for r in remainders.iter().take(excess as usize) {
            if floors[r.index] > 0 {
                floors[r.index] -= 1;
            }
        }
        total_floors -= excess.min(remainders.len() as i64);
    }

    if total_floors < target_total {
        remainders.sort_by(|a, b| {
            b.frac
                .partial_cmp(&a.frac)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        let shortfall = (target_total - total_floors) as usize;
        for r in remainders.iter().take(shortfall) {
            floors[r.index] += 1;
        }
    }

    debug!(
        scale,
        target_total,
        specs = specs.len(),
        "apportioned tile quotas"
    );

    specs
        .iter()
        .zip(floors)
        .filter(|(_, count)| *count > 0)
        .map(|(spec, count)| {
            let count = u32::try_from(count).map_err(|_| {
                AppError::Validation(format!(
                    "tile count {count} for {}x{} is too large",
                    spec.width, spec.height
                ))
            })?;
            Ok(TileBatch {
                width: spec.width,
                height: spec.height,
                count,
            })
        })
        .collect()
}

/// Runs the whole allocator: parse, merge legacy counts, scale, bound the
/// total by `max_tiles`, apportion.
pub fn allocate(
    tiles: &str,
    legacy: LegacyCounts,
    ka: f64,
    cap: i64,
    max_tiles: u32,
) -> Result<Vec<TileBatch>, AppError> {
    let mut specs = parse_tile_list(tiles)?;
    apply_legacy_tiles(&mut specs, legacy);
    apply_multiplier(&mut specs, ka);
    check_tile_total(&specs, cap, max_tiles)?;

    let batches = finalize_batches(&specs, cap)?;
    if batches.is_empty() {
        return Err(AppError::Allocation(
            "no tiles to place after cap adjustment".to_string(),
        ));
    }
    Ok(batches)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
