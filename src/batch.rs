//! Batch auto-crop over files and directories
//!
//! Decodes each image, runs [`BorderCropper`] on it and writes the result
//! with a suffix added to the file stem (`page.png` -> `page-c.png`).
//! Files are processed in parallel; one failing file does not stop the rest.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::crop::{Argb, BorderCropper, CropError, CropOptions, CropOutcome, Result};

/// Extensions accepted when walking a directory
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "jpeg", "jpg", "pbm", "pgm", "png", "pnm", "ppm", "tga", "tif", "tiff",
    "webp",
];

/// Suffix for the closeness map written next to a cropped image
const CLOSENESS_SUFFIX: &str = "-closeness";

/// Whether `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive)
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Collect image files from an input path (file or directory, not recursive)
pub fn collect_image_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(CropError::ImageNotFound(input.to_path_buf()));
    }

    let mut files = Vec::new();
    if input.is_file() {
        files.push(input.to_path_buf());
    } else if input.is_dir() {
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }
        files.sort();
    }
    Ok(files)
}

/// Insert `suffix` between the file stem and extension of `src`, inside `dir`
pub fn suffixed_path(src: &Path, dir: &Path, suffix: &str) -> PathBuf {
    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match src.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    dir.join(name)
}

/// Where the cropped version of `src` goes.
///
/// `dest` is used as the output file itself only when it is not an existing
/// directory and its extension names an image format. Otherwise it is a
/// directory (created on write) holding a suffixed copy of the source name.
pub fn output_path_for(src: &Path, dest: &Path, suffix: &str) -> PathBuf {
    if dest.is_dir() || ImageFormat::from_path(dest).is_err() {
        suffixed_path(src, dest, suffix)
    } else {
        dest.to_path_buf()
    }
}

/// Output paths for a batch into `dest`, one per source, all distinct.
///
/// A name already taken by an earlier source gets the source's parent
/// directory name prepended (`b/page.png` -> `b_page-c.png`), then a counter.
pub fn plan_outputs(sources: &[PathBuf], dest: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let name = suffixed_path(source, Path::new(""), suffix);
            let name = name.to_string_lossy();
            let parent = source
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut output = dest.join(&*name);
            let mut attempt = 1;
            while taken.contains(&output) {
                let prefix = match (parent.is_empty(), attempt) {
                    (false, 1) => format!("{}_", parent),
                    (false, n) => format!("{}_{}_", parent, n),
                    (true, n) => format!("{}_", n),
                };
                output = dest.join(format!("{}{}", prefix, name));
                attempt += 1;
            }
            taken.insert(output.clone());
            output
        })
        .collect()
}

/// Decode an image file into an RGBA buffer
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(CropError::ImageNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|e| CropError::InvalidImage(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Encode `image` to `path`, choosing the format from the extension.
///
/// JPEG has no alpha channel, so it is dropped and `jpeg_quality` applies.
pub fn save_image(image: &RgbaImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| CropError::EncodeFailed(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if format == ImageFormat::Jpeg {
        let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(writer, jpeg_quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CropError::EncodeFailed(e.to_string()))
    } else {
        image
            .save_with_format(path, format)
            .map_err(|e| CropError::EncodeFailed(e.to_string()))
    }
}

/// Outcome of one file
#[derive(Debug)]
pub enum FileStatus {
    /// Cropped image written to `output`
    Cropped {
        output: PathBuf,
        width: u32,
        height: u32,
    },
    /// Nothing to crop, no file written
    Unchanged,
    /// Decode, crop or encode failed
    Failed(CropError),
}

/// Per-file batch report
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub status: FileStatus,
}

/// Totals over a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub cropped: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match report.status {
                FileStatus::Cropped { .. } => summary.cropped += 1,
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Runs the cropper over many files
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Crop one file into `output`
    pub fn process_file(&self, source: &Path, output: &Path) -> FileStatus {
        match self.try_process_file(source, output) {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to process \"{}\": {}", source.display(), e);
                FileStatus::Failed(e)
            }
        }
    }

    fn try_process_file(&self, source: &Path, output: &Path) -> Result<FileStatus> {
        let image = load_image(source)?;
        info!(
            "Input image \"{}\" size={}x{}",
            source.display(),
            image.width(),
            image.height()
        );

        let options = &self.config.crop;
        let base_color = match options.base_color {
            Some(color) => color,
            None => BorderCropper::determine_base_color(&image)?,
        };
        let resolved = CropOptions {
            base_color: Some(base_color),
            ..options.clone()
        };

        match BorderCropper::crop_with_options(&image, &resolved)? {
            CropOutcome::Cropped { image: cropped, .. } => {
                save_image(&cropped, output, self.config.jpeg_quality)?;
                info!(
                    "Output image \"{}\" size={}x{}",
                    output.display(),
                    cropped.width(),
                    cropped.height()
                );
                if self.config.closeness_map {
                    self.write_closeness_map(&image, base_color, output)?;
                }
                Ok(FileStatus::Cropped {
                    output: output.to_path_buf(),
                    width: cropped.width(),
                    height: cropped.height(),
                })
            }
            CropOutcome::Unchanged => {
                info!("Input image \"{}\" no adjustments", source.display());
                Ok(FileStatus::Unchanged)
            }
        }
    }

    fn write_closeness_map(
        &self,
        image: &RgbaImage,
        base_color: Argb,
        output: &Path,
    ) -> Result<()> {
        let map = BorderCropper::closeness_map(image, base_color, self.config.crop.tolerance)?;
        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        let map_path = suffixed_path(output, dir, CLOSENESS_SUFFIX).with_extension("png");
        save_image(&map, &map_path, self.config.jpeg_quality)
    }

    /// Crop every file in `sources` into the `dest` directory.
    ///
    /// Output names come from [`plan_outputs`], so no two workers write the
    /// same file. `on_done` is called once per file, from worker threads.
    pub fn run<F>(&self, sources: &[PathBuf], dest: &Path, on_done: F) -> Result<Vec<FileReport>>
    where
        F: Fn(&FileReport) + Sync,
    {
        std::fs::create_dir_all(dest)?;
        let outputs = plan_outputs(sources, dest, &self.config.suffix);

        let work = || {
            sources
                .par_iter()
                .zip(outputs.par_iter())
                .map(|(source, output)| {
                    let report = FileReport {
                        source: source.clone(),
                        status: self.process_file(source, output),
                    };
                    on_done(&report);
                    report
                })
                .collect::<Vec<_>>()
        };

        let reports = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build()
                .map_err(|e| CropError::IoError(std::io::Error::other(e.to_string())))?
                .install(work),
            None => work(),
        };

        Ok(reports)
    }
}
