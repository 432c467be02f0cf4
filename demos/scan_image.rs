//! Scan a fish sample photo from disk.
//!
//! Usage:
//!   HABSCAN_API_KEY=... cargo run --example scan_image -- --image <path> [--export <dir>] [--debug]

use clap::Parser;
use hab_scan::capture::FileSource;
use hab_scan::{report, DetectionClient, ScanConfig, ScanPipeline};
use std::path::PathBuf;

/// Command line parameters for the file scan demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the image file to scan
    #[arg(short, long)]
    image: PathBuf,

    /// Directory to export the plain-text report into
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Override the detection host (e.g. a local mock)
    #[arg(long)]
    host: Option<String>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", if args.debug { "debug" } else { "info" });
    }
    env_logger::init();

    let mut config = ScanConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }

    let source = FileSource::open(&args.image)?;
    let client = DetectionClient::from_config(&config);
    let mut pipeline = ScanPipeline::new(source, client);

    let verdict = pipeline.scan().await?;
    println!("{}", report::render(&verdict));

    if let Some(dir) = args.export {
        let path = report::export(&verdict, &dir)?;
        println!("Report written to {}", path.display());
    }

    println!("Learn more about harmful algal blooms: {}", config.info_url);
    Ok(())
}
