//! Command line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CliOverrides;

/// Crop uniform borders off scanned images
#[derive(Debug, Parser)]
#[command(name = "bordercrop", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Crop images (files or directories) to their content
    Crop(CropArgs),
    /// Show the corner vote for an image's background color
    Corners(CornersArgs),
    /// Show version and config locations
    Info,
}

/// Arguments for `crop`
#[derive(Debug, Args)]
pub struct CropArgs {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory, or output image file for a single input image
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Fraction of the maximum color distance counted as border (default 0.10)
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Border color as r,g,b or a,r,g,b (default: vote on the corners)
    #[arg(short, long, value_name = "COLOR")]
    pub base_color: Option<String>,

    /// Suffix added to output file names in directory mode (default "-c")
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// JPEG quality 1-100 (default 90)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Worker threads (default: number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Also write a closeness map (content green, border red) for every cropped image
    #[arg(long)]
    pub closeness_map: bool,

    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the plan without processing
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CropArgs {
    /// Values given explicitly on the command line
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            tolerance: self.tolerance,
            base_color: self.base_color.clone(),
            suffix: self.suffix.clone(),
            jpeg_quality: self.jpeg_quality,
            threads: self.threads,
            closeness_map: self.closeness_map.then_some(true),
        }
    }
}

/// Arguments for `corners`
#[derive(Debug, Args)]
pub struct CornersArgs {
    /// Image to inspect
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Print the vote as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
