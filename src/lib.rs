//! bordercrop - border detection and auto-crop for scanned images
//!
//! The [`crop`] module holds the algorithm: a 4-channel color metric, a
//! corner vote that picks the background color, and a scan that crops the
//! image to everything that differs from it. [`batch`] runs it over files
//! and directories; [`config`] and [`cli`] back the `bordercrop` binary.

pub mod batch;
pub mod cli;
pub mod config;
pub mod crop;
pub mod progress;

pub use batch::{
    collect_image_files, load_image, output_path_for, save_image, BatchProcessor, BatchSummary,
    FileReport, FileStatus,
};
pub use cli::{Cli, Commands, CornersArgs, CropArgs};
pub use config::{BatchConfig, CliOverrides, Config, ConfigError};
pub use crop::{
    Argb, BorderCropper, BoundingBox, Corner, CornerVote, CropError, CropOptions,
    CropOptionsBuilder, CropOutcome, ScanReport,
};
pub use progress::{OutputMode, ProgressTracker};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
}
