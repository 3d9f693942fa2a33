// Coverage accumulation and coverage-to-color mapping.
// The grid is filled during placement and consumed once when the raster is painted.

pub mod color;
pub mod coverage;

pub use color::{Palette, ToneMapper};
pub use coverage::CoverageGrid;
