use crate::config::Config;
use crate::raster::color::Palette;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Nothing here is mutated after startup: every generation owns its own PRNG,
/// placement state and coverage grid, so requests never contend.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Base and saturated colors used by the coverage gradient.
    pub palette: Palette,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            palette: Palette::default(),
        }
    }
}
