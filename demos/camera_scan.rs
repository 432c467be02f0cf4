//! Live camera scan.
//!
//! Captures one still from the default camera and submits it for
//! screening. If the camera cannot be opened the scan falls back to
//! --fallback-image when one is given, mirroring how the capture view
//! keeps its file input available.
//!
//! Usage:
//!   HABSCAN_API_KEY=... cargo run --example camera_scan --features camera -- [--torch] [--fallback-image <path>]

use clap::Parser;
use hab_scan::capture::{CameraSettings, CameraSource, FileSource, FrameSource};
use hab_scan::{report, DetectionClient, ScanConfig, ScanPipeline, Verdict};
use std::path::PathBuf;

/// Command line parameters for the live capture demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Requested stream width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Requested stream height
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Ask the source for its illumination aid before capturing
    #[arg(long, default_value_t = false)]
    torch: bool,

    /// Image used when no camera is available
    #[arg(long)]
    fallback_image: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

async fn scan_with<S: FrameSource>(
    source: S,
    client: DetectionClient,
) -> Result<Verdict, Box<dyn std::error::Error>> {
    let mut pipeline = ScanPipeline::new(source, client);
    Ok(pipeline.scan().await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", if args.debug { "debug" } else { "info" });
    }
    env_logger::init();

    let config = ScanConfig::from_env()?;
    let client = DetectionClient::from_config(&config);

    let settings = CameraSettings {
        width: args.width,
        height: args.height,
    };

    let verdict = match CameraSource::start(settings) {
        Ok(mut source) => {
            if args.torch {
                source.set_illumination(true);
            }
            scan_with(source, client).await?
        }
        Err(err) => {
            eprintln!("Camera unavailable ({err}); falling back to file input");
            let path = args
                .fallback_image
                .ok_or("no camera and no --fallback-image given")?;
            scan_with(FileSource::open(&path)?, client).await?
        }
    };

    println!("{}", report::render(&verdict));
    Ok(())
}
