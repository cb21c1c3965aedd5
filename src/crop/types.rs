//! Auto-crop core types
//!
//! Error type, bounding box and scan diagnostics shared by the color metric,
//! corner voting and the classification scan.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Auto-crop error types
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Invalid color component: {0}")]
    InvalidColorComponent(String),

    #[error("Degenerate image: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },

    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Encode failed: {0}")]
    EncodeFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Inclusive bounding box of the foreground pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top_x: u32,
    pub top_y: u32,
    pub bottom_x: u32,
    pub bottom_y: u32,
}

impl BoundingBox {
    /// Width of the box (both ends inclusive)
    pub fn width(&self) -> u32 {
        self.bottom_x - self.top_x + 1
    }

    /// Height of the box (both ends inclusive)
    pub fn height(&self) -> u32 {
        self.bottom_y - self.top_y + 1
    }
}

/// How often each extremum moved away from its sentinel during a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeAdjustments {
    pub top_x: u32,
    pub top_y: u32,
    pub bottom_x: u32,
    pub bottom_y: u32,
}

impl EdgeAdjustments {
    /// True when no extremum was ever updated
    pub fn is_empty(&self) -> bool {
        self.top_x == 0 && self.top_y == 0 && self.bottom_x == 0 && self.bottom_y == 0
    }
}

/// Result of classifying every pixel against a base color
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Foreground bounding box, `None` when nothing differs from the base color
    pub bounding_box: Option<BoundingBox>,
    /// Total number of pixels scanned
    pub pixels: u64,
    /// Pixels classified as background
    pub background: u64,
    /// Pixels classified as foreground
    pub foreground: u64,
    /// Extremum update counts
    pub adjustments: EdgeAdjustments,
}

/// Outcome of a single crop request
#[derive(Debug, Clone)]
pub enum CropOutcome {
    /// The foreground region, copied out of the source
    Cropped {
        image: image::RgbaImage,
        bounding_box: BoundingBox,
    },
    /// No foreground was found, the source should be used as-is
    Unchanged,
}

impl CropOutcome {
    /// Whether a cropped image was produced
    pub fn is_cropped(&self) -> bool {
        matches!(self, CropOutcome::Cropped { .. })
    }

    /// Consume the outcome, returning the cropped image if any
    pub fn into_image(self) -> Option<image::RgbaImage> {
        match self {
            CropOutcome::Cropped { image, .. } => Some(image),
            CropOutcome::Unchanged => None,
        }
    }
}
