//! Scan an image and write the full result bundle: the text report, the
//! frame with detection overlays, and a zoomed crop of the first box.
//!
//! Usage:
//!   HABSCAN_API_KEY=... cargo run --example export_report -- --image <path> --out <dir>

use clap::Parser;
use hab_scan::capture::FileSource;
use hab_scan::report::{self, overlay};
use hab_scan::{DetectionClient, ScanConfig, ScanPipeline};
use std::path::PathBuf;

const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];

/// Command line parameters for the report bundle demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the image file to scan
    #[arg(short, long)]
    image: PathBuf,

    /// Directory the bundle is written into
    #[arg(short, long)]
    out: PathBuf,

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

    let config = ScanConfig::from_env()?;
    let source = FileSource::open(&args.image)?;
    let client = DetectionClient::from_config(&config);
    let mut pipeline = ScanPipeline::new(source, client);

    let verdict = pipeline.scan().await?;
    std::fs::create_dir_all(&args.out)?;

    let report_path = report::export(&verdict, &args.out)?;
    println!("Report written to {}", report_path.display());

    if verdict.bounding_boxes.is_empty() {
        println!("No detections; skipping overlay and crop images");
        return Ok(());
    }

    let mut frame = image::load_from_memory(verdict.image.payload())?.to_rgb8();
    let crop = overlay::zoom_crop(&frame, &verdict.bounding_boxes[0], 0.2);
    overlay::draw_boxes(&mut frame, &verdict.bounding_boxes, OVERLAY_COLOR);

    let overlay_path = args.out.join("overlay.jpg");
    frame.save(&overlay_path)?;
    println!("Overlay written to {}", overlay_path.display());

    let crop_path = args.out.join("zoom.jpg");
    crop.save(&crop_path)?;
    println!("Zoomed crop written to {}", crop_path.display());

    Ok(())
}
