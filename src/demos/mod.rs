//! # Demo Scenes
//!
//! Scene builders behind the binaries. Each one runs its whole pipeline on
//! the CPU and returns a ready [`RenderWindow`], so they can be tested
//! without a GPU or a display.
//!
//! - [`medical`] - skin and bone isosurfaces of a CT volume
//! - [`quadric`] - isosurfaces, cutting planes and contours side by side
//! - [`project`] - the same three views plus a caption, in four viewports
//!
//! [`RenderWindow`]: crate::gfx::scene::RenderWindow

pub mod medical;
pub mod project;
pub mod quadric;

use log::info;

use crate::data::{ImageData, PolyData};
use crate::error::Result;
use crate::filters::{generate_values, image_surface, outline, ContourFilter, SlicePlan};
use crate::gfx::scene::{Actor, Mapper, Property, Viewport};
use crate::implicit::{Quadric, SampleFunction};

/// Coefficients of `x² + 2y² + 3z² + yz`
pub const QUADRIC_COEFFICIENTS: [f64; 10] = [1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];

/// Contour values of the quadric demos span this range
pub const CONTOUR_RANGE: [f64; 2] = [1.0, 6.0];

/// Scalar range the quadric mappers stretch their lookup table over
pub const SCALAR_RANGE: [f64; 2] = [0.0, 7.0];

/// Samples the demo quadric over `[-1, 1]³`
pub(crate) fn sample_quadric(samples: usize) -> Result<ImageData> {
    let quadric = Quadric::new(QUADRIC_COEFFICIENTS);
    let image = SampleFunction::new([samples; 3]).sample(&quadric)?;
    info!(
        "Sampled quadric on {samples}³ points, range {:?}",
        image.scalar_range()
    );
    Ok(image)
}

/// Nested isosurfaces colored by their contour value
pub(crate) fn isosurface_actor(image: &ImageData, contours: usize) -> Result<Actor> {
    let mut filter = ContourFilter::new();
    filter.generate_values(contours, CONTOUR_RANGE);
    let surface = filter.execute(image)?;
    info!("Isosurfaces: {} triangles", surface.triangle_count());
    Ok(Actor::new(Mapper::new(surface).with_scalar_range(SCALAR_RANGE)))
}

/// Evenly spaced z slices drawn as flat colored sheets
pub(crate) fn planes_actor(image: &ImageData, planes: usize) -> Result<Actor> {
    let plan = SlicePlan::new(image.dimensions()[2], planes)?;
    let mut sheets = PolyData::new();
    for slice in plan.extract(image)? {
        sheets.append(image_surface(&slice)?);
    }
    info!("Cutting planes at z indices {:?}", plan.indices());
    Ok(Actor::new(Mapper::new(sheets).with_scalar_range(SCALAR_RANGE))
        .with_property(Property::default().with_ambient(1.0)))
}

/// Contour lines traced on evenly spaced z slices
pub(crate) fn contours_actor(image: &ImageData, planes: usize, contours: usize) -> Result<Actor> {
    let plan = SlicePlan::new(image.dimensions()[2], planes)?;
    let filter = ContourFilter::with_values(generate_values(contours, CONTOUR_RANGE));
    let mut lines = PolyData::new();
    for slice in plan.extract(image)? {
        lines.append(filter.execute(&slice)?);
    }
    info!(
        "Contour lines: {} segments on {} planes",
        lines.line_count(),
        plan.indices().len()
    );
    Ok(Actor::new(Mapper::new(lines).with_scalar_range(SCALAR_RANGE))
        .with_property(Property::default().with_ambient(1.0)))
}

/// White box around the sampled grid
pub(crate) fn outline_actor(image: &ImageData) -> Actor {
    Actor::new(Mapper::new(outline(image.bounds())))
}

/// Looks down -y with z pointing down the screen, then tilts a little
pub(crate) fn book_view(viewport: &mut Viewport) {
    let camera = &mut viewport.camera;
    camera.set_position([0.0, -1.0, 0.0]);
    camera.set_focal_point([0.0, 0.0, 0.0]);
    camera.set_view_up([0.0, 0.0, -1.0]);
    viewport.reset_camera();
    viewport.camera.elevation(20.0);
    viewport.camera.azimuth(10.0);
    viewport.camera.dolly(1.2);
    viewport.reset_camera_clipping_range();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planes_sit_inside_the_grid() {
        let image = sample_quadric(25).unwrap();
        let actor = planes_actor(&image, 3).unwrap();
        let [_, _, _, _, zmin, zmax] = actor.bounds().unwrap();
        // Slices 6, 12 and 18 of 25 samples over [-1, 1]
        assert!((zmin - (-0.5)).abs() < 1e-6);
        assert!((zmax - 0.5).abs() < 1e-6);
        assert_eq!(actor.property().ambient, 1.0);
    }

    #[test]
    fn test_contours_are_lines_only() {
        let image = sample_quadric(25).unwrap();
        let actor = contours_actor(&image, 3, 15).unwrap();
        let data = actor.mapper().input();
        assert!(data.line_count() > 0);
        assert_eq!(data.triangle_count(), 0);
        assert!(actor.mapper().colors_by_scalars());
    }

    #[test]
    fn test_too_many_planes_is_an_error() {
        let image = sample_quadric(4).unwrap();
        assert!(planes_actor(&image, 5).is_err());
    }

    #[test]
    fn test_book_view_is_repeatable() {
        let image = sample_quadric(10).unwrap();
        let mut first = Viewport::new();
        first.add_actor(outline_actor(&image));
        book_view(&mut first);
        let mut second = Viewport::new();
        second.add_actor(outline_actor(&image));
        book_view(&mut second);
        book_view(&mut second);

        let a: [f64; 3] = first.camera.position().into();
        let b: [f64; 3] = second.camera.position().into();
        for axis in 0..3 {
            assert!((a[axis] - b[axis]).abs() < 1e-9);
        }
    }
}
