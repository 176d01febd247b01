use anyhow::Result;
use eframe::egui;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wagon_defect_detector::api::DetectionApiClient;
use wagon_defect_detector::app::DefectDetectorApp;
use wagon_defect_detector::config::Config;

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting Train Wagon Defect Detector v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!("Configuration loaded:");
    info!("  Detection API: {}", config.api_base);
    info!("  Download folder: {}", config.download_dir.display());

    let client = DetectionApiClient::new(&config.api_base)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([640.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Train Wagon Defect Detector",
        options,
        Box::new(move |cc| Box::new(DefectDetectorApp::new(cc, config, client, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start UI: {}", e))
}
