use anyhow::{Context, Result};

/// Canvas area ceiling when `MAX_CANVAS_PIXELS` is unset (4096 x 4096).
const DEFAULT_MAX_CANVAS_PIXELS: usize = 16_777_216;

/// Placed-tile ceiling per map when `MAX_TILE_COUNT` is unset.
const DEFAULT_MAX_TILE_COUNT: u32 = 1_000_000;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Largest `w * h` a single request may ask for.
    pub max_canvas_pixels: usize,
    /// Largest number of tiles a single map may place.
    pub max_tile_count: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_canvas_pixels: match std::env::var("MAX_CANVAS_PIXELS") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_CANVAS_PIXELS must be a non-negative integer")?,
                Err(_) => DEFAULT_MAX_CANVAS_PIXELS,
            },
            max_tile_count: match std::env::var("MAX_TILE_COUNT") {
                Ok(raw) => raw
                    .parse::<u32>()
                    .context("MAX_TILE_COUNT must be an integer in 0..=4294967295")?,
                Err(_) => DEFAULT_MAX_TILE_COUNT,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            max_tile_count: DEFAULT_MAX_TILE_COUNT,
        }
    }
}
