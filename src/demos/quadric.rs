//! A quadric shown three ways in one viewport
//!
//! Isosurfaces sit at the origin; cutting planes and contour lines are
//! shifted along -x by two and four times the isosurface x-min so the three
//! views line up side by side.

use crate::color::NamedColors;
use crate::error::Result;
use crate::gfx::scene::{RenderWindow, Viewport};

use super::{
    book_view, contours_actor, isosurface_actor, outline_actor, planes_actor, sample_quadric,
};

pub const SAMPLES: usize = 25;
pub const ISOSURFACES: usize = 5;
pub const PLANES: usize = 3;
pub const CONTOURS: usize = 15;

pub fn quadric_scene() -> Result<RenderWindow> {
    let colors = NamedColors::new();
    let sample = sample_quadric(SAMPLES)?;

    let iso = isosurface_actor(&sample, ISOSURFACES)?;
    let iso_outline = outline_actor(&sample);
    let x_min = iso.bounds().map_or(0.0, |bounds| bounds[0]);

    let mut planes = planes_actor(&sample, PLANES)?;
    let mut planes_outline = outline_actor(&sample);
    planes.add_position([x_min * 2.0, 0.0, 0.0]);
    planes_outline.add_position([x_min * 2.0, 0.0, 0.0]);

    let mut contours = contours_actor(&sample, PLANES, CONTOURS)?;
    let mut contours_outline = outline_actor(&sample);
    contours.add_position([x_min * 4.0, 0.0, 0.0]);
    contours_outline.add_position([x_min * 4.0, 0.0, 0.0]);

    let mut viewport = Viewport::new()
        .with_background(colors.color3d("SlateGray")?)
        .with_two_sided_lighting(true);
    for actor in [planes, planes_outline, contours, contours_outline, iso, iso_outline] {
        viewport.add_actor(actor);
    }
    book_view(&mut viewport);

    let mut window = RenderWindow::new("Quadric", 640, 480);
    window.add_viewport(viewport);
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actors_are_laid_out_along_x() {
        let window = quadric_scene().unwrap();
        assert_eq!(window.size, (640, 480));
        assert_eq!(window.viewports.len(), 1);

        let viewport = &window.viewports[0];
        assert!(viewport.two_sided_lighting());
        assert_eq!(viewport.actors.len(), 6);

        let iso = &viewport.actors[4];
        let x_min = iso.bounds().unwrap()[0];
        assert!(x_min < 0.0);
        assert_eq!(iso.position(), [0.0, 0.0, 0.0]);
        assert_eq!(viewport.actors[0].position(), [x_min * 2.0, 0.0, 0.0]);
        assert_eq!(viewport.actors[1].position(), [x_min * 2.0, 0.0, 0.0]);
        assert_eq!(viewport.actors[2].position(), [x_min * 4.0, 0.0, 0.0]);
        assert_eq!(viewport.actors[3].position(), [x_min * 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_isosurfaces_carry_contour_values() {
        let window = quadric_scene().unwrap();
        let iso = &window.viewports[0].actors[4];
        assert_eq!(iso.mapper().scalar_range(), [0.0, 7.0]);
        let scalars = iso.mapper().input().scalars.as_ref().unwrap();
        for value in scalars {
            assert!((1.0..=6.0).contains(value));
        }
    }

    #[test]
    fn test_camera_sees_every_actor() {
        let window = quadric_scene().unwrap();
        let viewport = &window.viewports[0];
        let bounds = viewport.visible_bounds().unwrap();
        let [near, far] = viewport.camera.clipping_range();
        let position: [f64; 3] = viewport.camera.position().into();
        // Every corner of the scene lies between the clipping planes
        let dop = viewport.camera.direction_of_projection();
        for i in 0..2 {
            for j in 2..4 {
                for k in 4..6 {
                    let corner = [bounds[i], bounds[j], bounds[k]];
                    let depth = (0..3)
                        .map(|a| (corner[a] - position[a]) * dop[a])
                        .sum::<f64>();
                    assert!(depth > near && depth < far);
                }
            }
        }
    }
}
