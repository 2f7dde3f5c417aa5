mod app;
mod engine;
mod live;
mod model;
mod store;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the atlas description file.
    #[arg(default_value = "atlas.json")]
    graph_path: PathBuf,

    /// Path to the live status report refreshed by the stats backend.
    #[arg(long, default_value = "status.json")]
    status_path: PathBuf,

    /// Override the view-state file location.
    #[arg(long)]
    state_path: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "system atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::AtlasApp::new(
                cc,
                args.graph_path.clone(),
                args.status_path.clone(),
                args.state_path.clone(),
            )))
        }),
    )
}
