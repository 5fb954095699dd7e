//! Command-line interface for the studio demo

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Record, list and export recordings on a virtual camera and microphone
#[derive(Parser, Debug)]
#[command(name = "studio-demo")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the recordings database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Encrypt stored blobs with the demo key
    #[arg(long, global = true)]
    pub encrypt: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cameras, microphones and outputs
    Devices {
        /// Behave as if capture permission was already granted
        #[arg(long)]
        granted: bool,
    },
    /// Record from the default devices and save the result
    Record {
        /// How long to record, in seconds
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,
        /// Record a screen capture instead of camera and microphone
        #[arg(long)]
        screen: bool,
        /// Size of each synthetic chunk in bytes
        #[arg(long, default_value_t = 4096)]
        chunk_size: usize,
    },
    /// List saved recordings
    List,
    /// Write a recording to a directory
    Export {
        id: u64,
        /// Target directory (defaults to the download directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a recording
    Delete { id: u64 },
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    /// Store location: `--data-dir`, else the platform data directory.
    pub fn store_directory(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("recorder-studio")
        })
    }
}

/// Initialize logging from the verbosity flags. `RUST_LOG` still wins when set.
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module("studio_demo", args.log_level());
    builder.filter_module("recorder_core", args.log_level());
    builder.filter_module("recorder_virtual", args.log_level());
    builder.parse_default_env();
    builder.format_timestamp_millis().init();
}
