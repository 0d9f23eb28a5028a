//! Four-viewport quadric visualization with a description panel
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use isoview::cli::DemoArgs;
use isoview::demos::project::project_scene;
use isoview::VisualizationApp;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let _args = DemoArgs::parse();

    let scene = project_scene().context("failed to build the project scene")?;
    VisualizationApp::new(scene)
        .run()
        .context("render window failed")
}
