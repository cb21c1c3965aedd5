//! Border Detection & Auto-Crop module
//!
//! Finds the background color of an image, classifies every pixel against it
//! and crops the image to the bounding box of the remaining content.
//!
//! # Features
//!
//! - 4-channel ARGB color distance with a normalised tolerance
//! - Corner voting to infer the background color
//! - Explicit background color override
//! - Pixel-exact crop, or a no-op when nothing stands out
//! - Closeness map for debugging tolerance choices
//!
//! # Example
//!
//! ```rust,no_run
//! use bordercrop::{BorderCropper, CropOptions};
//!
//! let image = image::open("scan.png").unwrap().to_rgba8();
//! let options = CropOptions::builder().tolerance(0.05).build();
//!
//! match BorderCropper::crop_with_options(&image, &options).unwrap().into_image() {
//!     Some(cropped) => println!("Cropped to {}x{}", cropped.width(), cropped.height()),
//!     None => println!("No border found"),
//! }
//! ```

// Submodules
pub mod color;
mod corners;
mod detect;
mod types;

use image::RgbaImage;

// Re-export public API
pub use color::{
    distance, is_background, is_foreground, percent_away, Argb, MAX_ARGB_DISTANCE, OPAQUE,
};
pub use corners::{Corner, CornerVote, EdgeDistances};
pub use types::{BoundingBox, CropError, CropOutcome, EdgeAdjustments, Result, ScanReport};

// ============================================================
// Constants
// ============================================================

/// Default tolerance as a fraction of the maximum color distance
pub const DEFAULT_TOLERANCE: f64 = 0.10;

// ============================================================
// Options
// ============================================================

/// Auto-crop options
#[derive(Debug, Clone, PartialEq)]
pub struct CropOptions {
    /// Fraction of the maximum ARGB distance still counted as background
    pub tolerance: f64,
    /// Background color; inferred from the corners when `None`
    pub base_color: Option<Argb>,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            base_color: None,
        }
    }
}

impl CropOptions {
    /// Create a new options builder
    pub fn builder() -> CropOptionsBuilder {
        CropOptionsBuilder::default()
    }
}

/// Builder for CropOptions
#[derive(Debug, Default)]
pub struct CropOptionsBuilder {
    options: CropOptions,
}

impl CropOptionsBuilder {
    /// Set tolerance (not clamped; <= 0 keeps exact matches only, >= 1 matches everything)
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Use an explicit background color
    #[must_use]
    pub fn base_color(mut self, color: Argb) -> Self {
        self.options.base_color = Some(color);
        self
    }

    /// Infer the background color from the corners
    #[must_use]
    pub fn auto_base_color(mut self) -> Self {
        self.options.base_color = None;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> CropOptions {
        self.options
    }
}

// ============================================================
// Cropper
// ============================================================

/// Border detector and cropper.
///
/// Stateless; every call reads its input and allocates a fresh output, so
/// independent images can be processed concurrently.
pub struct BorderCropper;

impl BorderCropper {
    fn check_dimensions(image: &RgbaImage) -> Result<()> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CropError::DegenerateImage { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_options_default() {
        let options = CropOptions::default();
        assert_eq!(options.tolerance, DEFAULT_TOLERANCE);
        assert!(options.base_color.is_none());
    }

    #[test]
    fn test_crop_options_builder() {
        let options = CropOptions::builder()
            .tolerance(0.3)
            .base_color(Argb::rgb(1, 2, 3))
            .build();
        assert_eq!(options.tolerance, 0.3);
        assert_eq!(options.base_color, Some(Argb::new(255, 1, 2, 3)));

        let options = CropOptions::builder()
            .base_color(Argb::rgb(1, 2, 3))
            .auto_base_color()
            .build();
        assert!(options.base_color.is_none());
    }

    #[test]
    fn test_check_dimensions() {
        assert!(BorderCropper::check_dimensions(&RgbaImage::new(1, 1)).is_ok());
        assert!(BorderCropper::check_dimensions(&RgbaImage::new(0, 1)).is_err());
    }
}
