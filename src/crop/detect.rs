//! Classification scan and crop
//!
//! Every pixel is compared with the base color. The extrema of the
//! foreground pixels form the crop rectangle; when no pixel is foreground
//! the image is left unchanged.

use image::{imageops, Rgba, RgbaImage};
use tracing::{debug, info};

use super::color::{is_background, Argb};
use super::types::{BoundingBox, CropOutcome, EdgeAdjustments, Result, ScanReport};
use super::{BorderCropper, CropOptions};

/// Closeness map color for background pixels
const CLOSENESS_BACKGROUND: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Closeness map color for foreground pixels
const CLOSENESS_FOREGROUND: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Running extrema of the foreground pixels
struct Extrema {
    top_x: u32,
    top_y: u32,
    bottom_x: Option<u32>,
    bottom_y: Option<u32>,
    adjustments: EdgeAdjustments,
}

impl Extrema {
    fn new() -> Self {
        Self {
            top_x: u32::MAX,
            top_y: u32::MAX,
            bottom_x: None,
            bottom_y: None,
            adjustments: EdgeAdjustments::default(),
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        if x < self.top_x {
            self.top_x = x;
            self.adjustments.top_x += 1;
        }
        if y < self.top_y {
            self.top_y = y;
            self.adjustments.top_y += 1;
        }
        if self.bottom_x.map_or(true, |bx| x > bx) {
            self.bottom_x = Some(x);
            self.adjustments.bottom_x += 1;
        }
        if self.bottom_y.map_or(true, |by| y > by) {
            self.bottom_y = Some(y);
            self.adjustments.bottom_y += 1;
        }
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        if self.adjustments.is_empty() {
            return None;
        }
        Some(BoundingBox {
            top_x: self.top_x,
            top_y: self.top_y,
            bottom_x: self.bottom_x?,
            bottom_y: self.bottom_y?,
        })
    }
}

impl BorderCropper {
    /// Classify every pixel against `base_color` and collect the foreground box
    pub fn scan(image: &RgbaImage, base_color: Argb, tolerance: f64) -> Result<ScanReport> {
        Self::check_dimensions(image)?;

        let mut extrema = Extrema::new();
        let mut background = 0u64;
        let mut foreground = 0u64;

        for (x, y, pixel) in image.enumerate_pixels() {
            if is_background(base_color, Argb::from(*pixel), tolerance) {
                background += 1;
            } else {
                foreground += 1;
                extrema.include(x, y);
            }
        }

        let report = ScanReport {
            bounding_box: extrema.bounding_box(),
            pixels: background + foreground,
            background,
            foreground,
            adjustments: extrema.adjustments,
        };

        info!(
            "Pixels/in tolerance/out tolerance={}/{}/{}",
            report.pixels, report.background, report.foreground
        );
        if let Some(bbox) = report.bounding_box {
            debug!(
                "Edge adjustments: topX={}, topY={}, bottomX={}, bottomY={}",
                bbox.top_x, bbox.top_y, bbox.bottom_x, bbox.bottom_y
            );
        }
        debug!(
            "Edge adjustment counts: topX={}, topY={}, bottomX={}, bottomY={}",
            report.adjustments.top_x,
            report.adjustments.top_y,
            report.adjustments.bottom_x,
            report.adjustments.bottom_y
        );

        Ok(report)
    }

    /// Crop `image` to its content.
    ///
    /// With no `base_color` the background is inferred from the corners.
    /// Returns `Ok(None)` when nothing differs from the background.
    pub fn auto_crop(
        image: &RgbaImage,
        base_color: Option<Argb>,
        tolerance: f64,
    ) -> Result<Option<RgbaImage>> {
        let options = CropOptions {
            tolerance,
            base_color,
        };
        Self::crop_with_options(image, &options).map(CropOutcome::into_image)
    }

    /// Crop `image` according to `options`, keeping the bounding box
    pub fn crop_with_options(image: &RgbaImage, options: &CropOptions) -> Result<CropOutcome> {
        Self::check_dimensions(image)?;

        let base_color = match options.base_color {
            Some(color) => color,
            None => Self::determine_base_color(image)?,
        };
        info!("Base color={}", base_color);

        let report = Self::scan(image, base_color, options.tolerance)?;
        let Some(bounding_box) = report.bounding_box else {
            info!("No pixel outside tolerance, image unchanged");
            return Ok(CropOutcome::Unchanged);
        };

        let cropped = imageops::crop_imm(
            image,
            bounding_box.top_x,
            bounding_box.top_y,
            bounding_box.width(),
            bounding_box.height(),
        )
        .to_image();

        Ok(CropOutcome::Cropped {
            image: cropped,
            bounding_box,
        })
    }

    /// Debug image: red where a pixel is background, green where it is content
    pub fn closeness_map(image: &RgbaImage, base_color: Argb, tolerance: f64) -> Result<RgbaImage> {
        Self::check_dimensions(image)?;
        let (width, height) = image.dimensions();
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            if is_background(base_color, Argb::from(*image.get_pixel(x, y)), tolerance) {
                CLOSENESS_BACKGROUND
            } else {
                CLOSENESS_FOREGROUND
            }
        }))
    }
}
