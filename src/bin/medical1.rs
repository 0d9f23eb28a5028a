//! Skin isosurface of a CT head volume
use anyhow::{Context, Result};
use env_logger::Env;
use isoview::cli::{MedicalArgs, MedicalDemo};
use isoview::demos::medical::skin_scene;
use isoview::VisualizationApp;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = MedicalArgs::parse_for(MedicalDemo::Skin);

    let scene = skin_scene(&args.filename).with_context(|| {
        format!(
            "failed to build the skin scene from {}",
            args.filename.display()
        )
    })?;
    VisualizationApp::new(scene)
        .run()
        .context("render window failed")
}
