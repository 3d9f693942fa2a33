//! Coverage-to-color mapping.
//!
//! Count 0 is left to the background, count 1 is the base color unchanged,
//! and higher counts blend toward the saturated color on a log or linear
//! scale that reaches it around `brown_cap`.

use image::Rgba;

/// Forest green: single coverage.
pub const BASE_COLOR: Rgba<u8> = Rgba([34, 139, 34, 255]);
/// Saddle brown: heavy overlap.
pub const SATURATED_COLOR: Rgba<u8> = Rgba([139, 69, 19, 255]);

/// The two ends of the coverage gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Rgba<u8>,
    pub saturated: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: BASE_COLOR,
            saturated: SATURATED_COLOR,
        }
    }
}

/// Maps coverage counts onto the palette gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMapper {
    palette: Palette,
    brown_cap: u32,
    log_tone: bool,
}

impl ToneMapper {
    /// `brown_cap` below 1 is raised to 1.
    pub fn new(palette: Palette, brown_cap: u32, log_tone: bool) -> Self {
        Self {
            palette,
            brown_cap: brown_cap.max(1),
            log_tone,
        }
    }

    /// Blend ratio for a coverage count above 1, clamped to `[0, 1]`.
    pub fn ratio(&self, coverage: u32) -> f64 {
        let c = f64::from(coverage);
        let cap = f64::from(self.brown_cap);
        let ratio = if self.log_tone {
            c.ln() / (cap + 1.0).ln()
        } else {
            (c - 1.0) / cap
        };
        ratio.clamp(0.0, 1.0)
    }

    /// Color for `coverage`, or `None` for uncovered pixels.
    pub fn color_for(&self, coverage: u32) -> Option<Rgba<u8>> {
        match coverage {
            0 => None,
            1 => Some(self.palette.base),
            c => Some(blend(self.palette.base, self.palette.saturated, self.ratio(c))),
        }
    }
}

/// Per-channel linear interpolation, alpha included. A fully transparent
/// result is forced opaque so dense overlap never disappears.
pub fn blend(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let lerp = |from: u8, to: u8| (1.0 - t) * f64::from(from) + t * f64::from(to);
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;

    let mut alpha = lerp(a[3], b[3]);
    if alpha == 0.0 {
        alpha = 255.0;
    }

    Rgba([
        channel(lerp(a[0], b[0])),
        channel(lerp(a[1], b[1])),
        channel(lerp(a[2], b[2])),
        channel(alpha),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_coverage_is_background() {
        let mapper = ToneMapper::new(Palette::default(), 8, true);
        assert_eq!(mapper.color_for(0), None);
    }

    #[test]
    fn test_single_coverage_is_base_in_both_tones() {
        for log_tone in [true, false] {
            let mapper = ToneMapper::new(Palette::default(), 8, log_tone);
            assert_eq!(mapper.color_for(1), Some(BASE_COLOR));
        }
    }

    #[test]
    fn test_log_ratio() {
        let mapper = ToneMapper::new(Palette::default(), 8, true);
        assert!((mapper.ratio(3) - 3f64.ln() / 9f64.ln()).abs() < 1e-12);
        assert_eq!(mapper.ratio(9), 1.0);
        assert_eq!(mapper.ratio(500), 1.0);
    }

    #[test]
    fn test_linear_ratio() {
        let mapper = ToneMapper::new(Palette::default(), 4, false);
        assert_eq!(mapper.ratio(3), 0.5);
        assert_eq!(mapper.ratio(5), 1.0);
        assert_eq!(mapper.ratio(40), 1.0);
    }

    #[test]
    fn test_brown_cap_floor_is_one() {
        let mapper = ToneMapper::new(Palette::default(), 0, false);
        // (2 - 1) / 1
        assert_eq!(mapper.color_for(2), Some(SATURATED_COLOR));
    }

    #[test]
    fn test_high_coverage_reaches_saturated() {
        for log_tone in [true, false] {
            let mapper = ToneMapper::new(Palette::default(), 8, log_tone);
            assert_eq!(mapper.color_for(100), Some(SATURATED_COLOR));
        }
    }

    #[test]
    fn test_coverage_at_cap_is_near_saturated() {
        let mapper = ToneMapper::new(Palette::default(), 8, true);
        let c = mapper.color_for(8).unwrap();
        for ch in 0..3 {
            let diff = (i32::from(c[ch]) - i32::from(SATURATED_COLOR[ch])).abs();
            assert!(diff <= 8, "channel {ch}: {c:?}");
        }
    }

    #[test]
    fn test_blend_midpoint() {
        let c = blend(Rgba([0, 100, 200, 255]), Rgba([100, 0, 0, 255]), 0.5);
        assert_eq!(c, Rgba([50, 50, 100, 255]));
    }

    #[test]
    fn test_transparent_blend_forced_opaque() {
        let c = blend(Rgba([10, 10, 10, 0]), Rgba([20, 20, 20, 0]), 0.5);
        assert_eq!(c[3], 255);
    }
}
