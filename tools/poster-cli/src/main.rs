//! Poster Studio CLI: crop photos and turn them into template posters.
//!
//! Usage:
//!   poster crop <IMAGE>           Cut a rectangle out of an image
//!   poster compose <CROPPED>      Compose a poster from a cropped image
//!   poster batch <MANIFEST>       Export every image of a manifest as a poster
//!   poster info <IMAGE>           Show image dimensions and suggested crops
//!   poster init <MANIFEST> <IMG>  Write a manifest with fitted crops

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use poster_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "poster",
    about = "Crop photos and compose them into template posters",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut a rectangle out of an image at native resolution
    Crop {
        /// Source image
        image: PathBuf,

        /// Left edge in pixels
        #[arg(long, allow_hyphen_values = true)]
        x: Option<i64>,

        /// Top edge in pixels
        #[arg(long, allow_hyphen_values = true)]
        y: Option<i64>,

        /// Width in pixels
        #[arg(long, allow_hyphen_values = true)]
        width: Option<i64>,

        /// Height in pixels
        #[arg(long, allow_hyphen_values = true)]
        height: Option<i64>,

        /// Use the largest centered crop for an aspect mode (landscape|portrait)
        #[arg(long, conflicts_with_all = ["x", "y", "width", "height"])]
        fit: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose a poster from an already cropped image
    Compose {
        /// Cropped image
        cropped: PathBuf,

        /// Template overlay (defaults to the configured or bundled one)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Produce a portrait (1200x1600) poster
        #[arg(long)]
        portrait: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crop and export every image listed in a manifest
    Batch {
        /// Path to manifest.json
        manifest: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Failure handling: skip|abort
        #[arg(long)]
        policy: Option<String>,

        /// Pause between posters in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Show image information
    Info {
        /// Path to the image
        image: PathBuf,
    },

    /// Create a batch manifest from a list of images
    Init {
        /// Manifest file to write
        manifest: PathBuf,

        /// Images to include, in export order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Fit crops for portrait posters
        #[arg(long)]
        portrait: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    poster_common::logging::init_logging(&logging);
    tracing::debug!(output_dir = %config.output_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Crop {
            image,
            x,
            y,
            width,
            height,
            fit,
            output,
        } => {
            let region = match fit {
                Some(mode) => commands::crop::Region::Fit(commands::parse_mode(&mode)?),
                None => commands::crop::Region::Explicit { x, y, width, height },
            };
            commands::crop::run(image, region, output).await
        }
        Commands::Compose {
            cropped,
            template,
            portrait,
            output,
        } => commands::compose::run(&config, cropped, template, portrait, output).await,
        Commands::Batch {
            manifest,
            output,
            policy,
            delay_ms,
        } => commands::batch::run(&config, manifest, output, policy, delay_ms).await,
        Commands::Info { image } => commands::info::run(image),
        Commands::Init {
            manifest,
            images,
            portrait,
        } => commands::init::run(manifest, images, portrait),
    }
}
