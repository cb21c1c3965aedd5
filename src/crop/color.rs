//! ARGB color metric
//!
//! Euclidean distance over the four 8-bit channels, normalised against the
//! largest possible distance, and the background/foreground predicates built
//! on top of it.
//!
//! # Classification
//!
//! A pixel is *background* when its normalised distance from the base color
//! is at most the tolerance, and *foreground* otherwise. Every caller goes
//! through [`is_background`] / [`is_foreground`] so the comparison direction
//! lives in exactly one place.

use image::Rgba;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::types::{CropError, Result};

// ============================================================
// Constants
// ============================================================

/// Largest channel value
const CHANNEL_MAX: i64 = 255;

/// Distance between (0,0,0,0) and (255,255,255,255): sqrt(4 * 255^2)
pub const MAX_ARGB_DISTANCE: f64 = 510.0;

/// Alpha used when a color is given without one
pub const OPAQUE: u8 = 255;

// ============================================================
// Pixel
// ============================================================

/// A color as four independent 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Argb {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Argb {
    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Opaque color from red, green and blue
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(OPAQUE, red, green, blue)
    }

    /// Build a color from unchecked channel values.
    ///
    /// Every channel must lie in `0..=255`. A missing alpha means opaque.
    pub fn from_components(alpha: Option<i64>, red: i64, green: i64, blue: i64) -> Result<Self> {
        let alpha = match alpha {
            Some(value) => checked_channel("alpha", value)?,
            None => OPAQUE,
        };
        Ok(Self {
            alpha,
            red: checked_channel("red", red)?,
            green: checked_channel("green", green)?,
            blue: checked_channel("blue", blue)?,
        })
    }

    fn channels(&self) -> [u8; 4] {
        [self.alpha, self.red, self.green, self.blue]
    }
}

fn checked_channel(name: &str, value: i64) -> Result<u8> {
    if (0..=CHANNEL_MAX).contains(&value) {
        Ok(value as u8)
    } else {
        Err(CropError::InvalidColorComponent(format!(
            "{} value {} is not in 0..=255",
            name, value
        )))
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.alpha, self.red, self.green, self.blue)
    }
}

impl FromStr for Argb {
    type Err = CropError;

    /// Parse `r,g,b` (opaque) or `a,r,g,b`
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i64>().map_err(|_| {
                    CropError::InvalidColorComponent(format!(
                        "\"{}\" in base color \"{}\" is not an integer",
                        part, s
                    ))
                })
            })
            .collect::<Result<Vec<i64>>>()?;

        match parts.as_slice() {
            [r, g, b] => Self::from_components(None, *r, *g, *b),
            [a, r, g, b] => Self::from_components(Some(*a), *r, *g, *b),
            _ => Err(CropError::InvalidColorComponent(format!(
                "base color \"{}\" needs 3 or 4 components, found {}",
                s,
                parts.len()
            ))),
        }
    }
}

impl From<Rgba<u8>> for Argb {
    fn from(pixel: Rgba<u8>) -> Self {
        let [red, green, blue, alpha] = pixel.0;
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }
}

impl From<Argb> for Rgba<u8> {
    fn from(color: Argb) -> Self {
        Rgba([color.red, color.green, color.blue, color.alpha])
    }
}

// ============================================================
// Metric
// ============================================================

/// Euclidean distance over (alpha, red, green, blue)
pub fn distance(a: Argb, b: Argb) -> f64 {
    let sum: i32 = a
        .channels()
        .iter()
        .zip(b.channels().iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            d * d
        })
        .sum();
    (sum as f64).sqrt()
}

/// Distance as a fraction of [`MAX_ARGB_DISTANCE`]
pub fn percent_away(a: Argb, b: Argb) -> f64 {
    distance(a, b) / MAX_ARGB_DISTANCE
}

/// `pixel` is close enough to `base` to count as border
pub fn is_background(base: Argb, pixel: Argb, tolerance: f64) -> bool {
    percent_away(base, pixel) <= tolerance
}

/// `pixel` is part of the content to keep
pub fn is_foreground(base: Argb, pixel: Argb, tolerance: f64) -> bool {
    !is_background(base, pixel, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK_CLEAR: Argb = Argb::new(0, 0, 0, 0);
    const WHITE: Argb = Argb::new(255, 255, 255, 255);

    #[test]
    fn test_distance_to_self_is_zero() {
        for color in [BLACK_CLEAR, WHITE, Argb::new(12, 200, 3, 99)] {
            assert_eq!(distance(color, color), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Argb::new(255, 10, 20, 30);
        let b = Argb::new(128, 250, 0, 31);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_distance_uses_unsigned_channels() {
        // 0 vs 255 on one channel must be 255, not a wrapped signed value
        let a = Argb::new(255, 0, 0, 0);
        let b = Argb::new(255, 255, 0, 0);
        assert_eq!(distance(a, b), 255.0);
    }

    #[test]
    fn test_max_distance() {
        assert_eq!(MAX_ARGB_DISTANCE, (4.0f64 * 255.0 * 255.0).sqrt());
        assert_eq!(distance(BLACK_CLEAR, WHITE), MAX_ARGB_DISTANCE);
        assert_eq!(distance(WHITE, BLACK_CLEAR), MAX_ARGB_DISTANCE);
        assert_eq!(percent_away(BLACK_CLEAR, WHITE), 1.0);
    }

    #[test]
    fn test_distance_below_max_for_other_pairs() {
        let samples = [
            Argb::new(0, 0, 0, 255),
            Argb::new(255, 0, 0, 0),
            Argb::new(255, 255, 255, 254),
            Argb::new(1, 255, 255, 255),
            Argb::new(128, 64, 32, 16),
        ];
        for &a in &samples {
            for &b in &samples {
                assert!(distance(a, b) < MAX_ARGB_DISTANCE);
            }
            assert!(distance(a, WHITE) < MAX_ARGB_DISTANCE);
            assert!(distance(a, BLACK_CLEAR) < MAX_ARGB_DISTANCE);
        }
    }

    #[test]
    fn test_background_is_inclusive() {
        let base = Argb::new(255, 0, 0, 0);
        let pixel = Argb::new(255, 51, 0, 0); // 51 / 510 = 0.1
        assert!(is_background(base, pixel, 0.1));
        assert!(!is_foreground(base, pixel, 0.1));
        assert!(is_foreground(base, pixel, 0.09));
    }

    #[test]
    fn test_zero_tolerance_keeps_exact_matches_only() {
        let base = Argb::rgb(10, 10, 10);
        assert!(is_background(base, base, 0.0));
        assert!(is_foreground(base, Argb::rgb(10, 10, 11), 0.0));
    }

    #[test]
    fn test_full_tolerance_matches_everything() {
        assert!(is_background(BLACK_CLEAR, WHITE, 1.0));
        assert!(is_background(WHITE, BLACK_CLEAR, 1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Argb::new(255, 1, 22, 133).to_string(), "(255,1,22,133)");
    }

    #[test]
    fn test_from_components_range() {
        assert_eq!(
            Argb::from_components(Some(0), 255, 0, 255).unwrap(),
            Argb::new(0, 255, 0, 255)
        );
        assert_eq!(
            Argb::from_components(None, 1, 2, 3).unwrap(),
            Argb::new(OPAQUE, 1, 2, 3)
        );
        assert!(matches!(
            Argb::from_components(Some(256), 0, 0, 0),
            Err(CropError::InvalidColorComponent(_))
        ));
        assert!(matches!(
            Argb::from_components(None, -1, 0, 0),
            Err(CropError::InvalidColorComponent(_))
        ));
        assert!(matches!(
            Argb::from_components(None, 0, 0, 300),
            Err(CropError::InvalidColorComponent(_))
        ));
    }

    #[test]
    fn test_parse_rgb_and_argb() {
        assert_eq!("255,255,255".parse::<Argb>().unwrap(), Argb::rgb(255, 255, 255));
        assert_eq!(" 10 , 20,30 , 40 ".parse::<Argb>().unwrap(), Argb::new(10, 20, 30, 40));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in ["1,2", "1,2,3,4,5", "", "a,b,c", "0,0,256", "-1,0,0,0"] {
            let result = input.parse::<Argb>();
            assert!(
                matches!(result, Err(CropError::InvalidColorComponent(_))),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_rgba_conversion() {
        let pixel = Rgba([1, 2, 3, 4]);
        let color = Argb::from(pixel);
        assert_eq!(color, Argb::new(4, 1, 2, 3));
        assert_eq!(Rgba::<u8>::from(color), pixel);
    }
}
