use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use vigocam::pipeline::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "vigocam")]
#[command(about = "Vigo traffic camera snapshot downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the camera list and download one snapshot per camera
    Fetch(PipelineArgs),
    /// Repeat `fetch` at a fixed interval for a bounded time
    Schedule(ScheduleArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Maximum number of cameras to download (at least 1)
    #[arg(long)]
    pub max_cameras: Option<NonZeroUsize>,

    /// Download only the camera with this id
    #[arg(long)]
    pub test_camera: Option<String>,

    /// Only write the metadata exports
    #[arg(long)]
    pub metadata_only: bool,

    /// Output directory for images
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Always fetch the camera list, ignoring the local cache
    #[arg(long)]
    pub no_cache: bool,

    /// Configuration file (defaults to $VIGOCAM_CONFIG or config/vigocam.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl PipelineArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            max_cameras: self.max_cameras.map(NonZeroUsize::get),
            test_camera: self.test_camera.clone(),
            metadata_only: self.metadata_only,
            use_cache: !self.no_cache,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Seconds to wait between runs
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Total seconds during which runs are started
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Stop after this many runs
    #[arg(long)]
    pub max_iterations: Option<u32>,
}
