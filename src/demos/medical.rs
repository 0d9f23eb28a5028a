//! Skin and bone isosurfaces of a CT head volume

use std::path::Path;

use log::info;

use crate::color::NamedColors;
use crate::data::{metaimage, ImageData};
use crate::error::Result;
use crate::filters::{outline, MarchingCubes};
use crate::gfx::scene::{Actor, Mapper, Property, RenderWindow, Viewport};

/// Iso-value known to correspond to the skin of the patient
pub const SKIN_ISO_VALUE: f64 = 500.0;

/// Iso-value known to correspond to bone
pub const BONE_ISO_VALUE: f64 = 1150.0;

/// Named colors with the two entries these scenes add
pub fn medical_colors() -> NamedColors {
    let mut colors = NamedColors::new();
    colors.set_color("SkinColor", [255, 125, 64, 255]);
    colors.set_color("BkgColor", [51, 77, 102, 255]);
    colors
}

/// Skin isosurface at 500 inside a black outline
pub fn skin_scene(path: impl AsRef<Path>) -> Result<RenderWindow> {
    let colors = medical_colors();
    let volume = metaimage::read(path)?;

    let skin = extract_surface(&volume, SKIN_ISO_VALUE)?
        .with_property(Property::default().with_color(colors.color3d("SkinColor")?));

    let mut viewport = Viewport::new().with_background(colors.color3d("BkgColor")?);
    viewport.add_actor(outline_actor(&volume, &colors)?);
    viewport.add_actor(skin);
    initial_view(&mut viewport);

    let mut window = RenderWindow::new("Medical 1", 640, 480);
    window.add_viewport(viewport);
    Ok(window)
}

/// Translucent skin over ivory bone inside a black outline
pub fn skin_and_bone_scene(path: impl AsRef<Path>) -> Result<RenderWindow> {
    let colors = medical_colors();
    let volume = metaimage::read(path)?;

    let skin = extract_surface(&volume, SKIN_ISO_VALUE)?.with_property(
        Property::default()
            .with_color(colors.color3d("SkinColor")?)
            .with_specular(0.3, 20.0)
            .with_opacity(0.5),
    );
    let bone = extract_surface(&volume, BONE_ISO_VALUE)?
        .with_property(Property::default().with_color(colors.color3d("Ivory")?));

    let mut viewport = Viewport::new().with_background(colors.color3d("BkgColor")?);
    viewport.add_actor(outline_actor(&volume, &colors)?);
    viewport.add_actor(skin);
    viewport.add_actor(bone);
    initial_view(&mut viewport);

    let mut window = RenderWindow::new("Medical 2", 640, 480);
    window.add_viewport(viewport);
    Ok(window)
}

fn extract_surface(volume: &ImageData, value: f64) -> Result<Actor> {
    let surface = MarchingCubes::new(value).execute(volume)?;
    info!(
        "Isosurface at {value}: {} points, {} triangles",
        surface.point_count(),
        surface.triangle_count()
    );
    Ok(Actor::new(Mapper::new(surface).scalar_visibility_off()))
}

fn outline_actor(volume: &ImageData, colors: &NamedColors) -> Result<Actor> {
    Ok(Actor::new(Mapper::new(outline(volume.bounds())))
        .with_property(Property::default().with_color(colors.color3d("Black")?)))
}

/// Faces the patient from the front, then swings up and around by 30°
/// and moves in so the head fills the window
fn initial_view(viewport: &mut Viewport) {
    let camera = &mut viewport.camera;
    camera.set_view_up([0.0, 0.0, -1.0]);
    camera.set_position([0.0, -1.0, 0.0]);
    camera.set_focal_point([0.0, 0.0, 0.0]);
    camera.azimuth(30.0);
    camera.elevation(30.0);
    viewport.reset_camera();
    viewport.camera.dolly(1.5);
    viewport.reset_camera_clipping_range();
}
