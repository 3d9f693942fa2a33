//! Request body and its normalization into fully-defaulted generation parameters.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::allocator::LegacyCounts;

const DEFAULT_CANVAS: u32 = 100;
const DEFAULT_RINGS: u32 = 10;
const DEFAULT_RING_START: f64 = 0.1;
const DEFAULT_RING_END: f64 = 0.8;
const RING_END_NUDGE: f64 = 0.05;
const DEFAULT_BROWN_CAP: u32 = 8;
const DEFAULT_ISLANDS: i64 = 4;
/// Ring and island counts size per-request allocations.
const MAX_RINGS: i64 = 1024;
const MAX_ISLANDS: i64 = 1024;
pub const DEFAULT_ISLAND_RADIUS_FRAC: f64 = 0.25;

// ────────────────────────────────────────────────────────────────────────────
// Distribution mode
// ────────────────────────────────────────────────────────────────────────────

/// Spatial distribution strategy, addressed on the wire by its Turkish name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// `merkez` — ring-weighted around the canvas center.
    #[default]
    Rings,
    /// `agirlik` — keeps the area-weighted centroid near the center.
    Centroid,
    /// `adalar` — uniform-disk clusters around random island centers.
    Islands,
    /// `iki-kita` — two Gaussian continents left and right of center.
    Continents,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Rings => "merkez",
            Mode::Centroid => "agirlik",
            Mode::Islands => "adalar",
            Mode::Continents => "iki-kita",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    /// Case-insensitive; blank selects the default (`merkez`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "" => Ok(Mode::default()),
            "merkez" => Ok(Mode::Rings),
            "agirlik" => Ok(Mode::Centroid),
            "adalar" => Ok(Mode::Islands),
            "iki-kita" => Ok(Mode::Continents),
            _ => Err(AppError::Validation(format!("unsupported mode {lowered:?}"))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire request
// ────────────────────────────────────────────────────────────────────────────

/// JSON body of `POST /generate`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapRequest {
    #[serde(default)]
    pub w: i64,
    #[serde(default)]
    pub h: i64,
    #[serde(default)]
    pub tiles: String,
    pub ka: Option<f64>,
    pub cap: Option<i64>,
    #[serde(default)]
    pub mode: String,
    pub rings: Option<i64>,
    #[serde(rename = "ringStart")]
    pub ring_start: Option<f64>,
    #[serde(rename = "ringEnd")]
    pub ring_end: Option<f64>,
    #[serde(default)]
    pub seed: String,
    #[serde(rename = "logTone")]
    pub log_tone: Option<i64>,
    #[serde(rename = "brownCap")]
    pub brown_cap: Option<i64>,
    #[serde(rename = "bgA")]
    pub bg_alpha: Option<i64>,
    pub islands: Option<i64>,
    #[serde(rename = "islandRFrac")]
    pub island_radius_frac: Option<f64>,
    #[serde(rename = "rot")]
    pub rotate: Option<i64>,
    pub n22: Option<i64>,
    pub n21: Option<i64>,
    pub n11: Option<i64>,
}

/// Fully-defaulted parameter record consumed by the generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
    pub tiles: String,
    pub ka: f64,
    /// Total placement cap; 0 means uncapped.
    pub cap: i64,
    pub mode: Mode,
    pub rings: u32,
    pub ring_start: f64,
    pub ring_end: f64,
    pub seed: String,
    pub log_tone: bool,
    pub brown_cap: u32,
    /// Background alpha, already clamped to 0..=255.
    pub bg_alpha: u8,
    /// Requested island count; non-positive becomes the generator default.
    pub islands: i64,
    pub island_radius_frac: f64,
    pub rotate: bool,
    pub legacy: LegacyCounts,
    /// Ceiling on the placed total, checked by the allocator.
    pub max_tiles: u32,
}

fn canvas_dimension(value: i64, label: &str) -> Result<u32, AppError> {
    match value {
        0 => Ok(DEFAULT_CANVAS),
        v if v < 0 => Err(AppError::Validation(format!("{label} must be positive"))),
        v => u32::try_from(v)
            .map_err(|_| AppError::Validation(format!("{label} is too large"))),
    }
}

impl MapRequest {
    /// Applies defaults and validates the request.
    ///
    /// `config.max_canvas_pixels` bounds `width * height` and
    /// `config.max_tile_count` is carried along for the allocator. The checks
    /// here are pure, so a rejected request can be corrected and resubmitted.
    pub fn normalize(&self, config: &Config) -> Result<GenerationParams, AppError> {
        let max_canvas_pixels = config.max_canvas_pixels;
        let width = canvas_dimension(self.w, "width")?;
        let height = canvas_dimension(self.h, "height")?;
        let area = width as usize * height as usize;
        if area > max_canvas_pixels {
            return Err(AppError::Validation(format!(
                "canvas {width}x{height} exceeds the {max_canvas_pixels} pixel limit"
            )));
        }

        let mode: Mode = self.mode.parse()?;

        let rings = match self.rings {
            Some(r) if r > MAX_RINGS => {
                return Err(AppError::Validation(format!(
                    "rings must be at most {MAX_RINGS}"
                )))
            }
            Some(r) if r > 0 => r as u32,
            _ => DEFAULT_RINGS,
        };

        let islands = self.islands.unwrap_or(DEFAULT_ISLANDS);
        if islands > MAX_ISLANDS {
            return Err(AppError::Validation(format!(
                "islands must be at most {MAX_ISLANDS}"
            )));
        }

        let ring_start = self
            .ring_start
            .map_or(DEFAULT_RING_START, |v| v.clamp(0.0, 1.0));
        let mut ring_end = self.ring_end.map_or(DEFAULT_RING_END, |v| v.clamp(0.0, 1.0));
        if ring_end <= ring_start {
            let adjusted = (ring_start + RING_END_NUDGE).clamp(ring_start, 1.0);
            if adjusted == ring_start {
                return Err(AppError::Validation(
                    "ringEnd must be greater than ringStart".to_string(),
                ));
            }
            ring_end = adjusted;
        }

        let brown_cap = self
            .brown_cap
            .map_or(DEFAULT_BROWN_CAP, |v| v.clamp(1, u32::MAX as i64) as u32);

        let island_radius_frac = match self.island_radius_frac {
            Some(v) if v > 0.0 => v,
            _ => DEFAULT_ISLAND_RADIUS_FRAC,
        };

        Ok(GenerationParams {
            width,
            height,
            tiles: self.tiles.clone(),
            ka: self.ka.unwrap_or(1.0),
            cap: self.cap.unwrap_or(0).max(0),
            mode,
            rings,
            ring_start,
            ring_end,
            seed: self.seed.clone(),
            log_tone: self.log_tone.map_or(true, |v| v != 0),
            brown_cap,
            bg_alpha: self.bg_alpha.unwrap_or(0).clamp(0, 255) as u8,
            islands,
            island_radius_frac,
            rotate: self.rotate.map_or(true, |v| v != 0),
            legacy: LegacyCounts {
                n22: self.n22.unwrap_or(0),
                n21: self.n21.unwrap_or(0),
                n11: self.n11.unwrap_or(0),
            },
            max_tiles: config.max_tile_count,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
