//! Quadric isosurfaces, cutting planes and contour lines side by side
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use isoview::cli::DemoArgs;
use isoview::demos::quadric::quadric_scene;
use isoview::VisualizationApp;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let _args = DemoArgs::parse();

    let scene = quadric_scene().context("failed to build the quadric scene")?;
    VisualizationApp::new(scene)
        .run()
        .context("render window failed")
}
