//! Four viewports: a caption, isosurfaces, cutting planes and contour lines

use log::debug;

use crate::color::{create_color_table, make_cell_data, NamedColors};
use crate::error::Result;
use crate::gfx::scene::{RenderWindow, Viewport};

use super::{
    book_view, contours_actor, isosurface_actor, outline_actor, planes_actor, sample_quadric,
};

pub const TABLE_SIZE: usize = 7;
pub const SAMPLES: usize = 50;
pub const ISOSURFACES: usize = 5;
pub const PLANES: usize = 5;
pub const CONTOURS: usize = 15;

pub const TITLE: &str = "Visualization Project #3";

pub const DESCRIPTION: &str = "\
Assignment #3
Visualization

The following visualizations were created with isoview.
A quadric is generated with multiple layers. This is then sampled in a
50x50x50-cell cube. Then, the following visualizations are created:

    1) Isosurfaces
    2) Cutting Planes
    3) Contour Lines

A custom color-table was used to get the coloring at each isosurface value.
An interactor was added because it is fun to watch the objects spin.";

pub fn project_scene() -> Result<RenderWindow> {
    let colors = NamedColors::new();
    let background = colors.color3d("SlateGray")?;
    let lut = create_color_table(TABLE_SIZE);
    debug!("Cell colors: {:?}", make_cell_data(TABLE_SIZE, &lut));

    let sample = sample_quadric(SAMPLES)?;

    let mut window = RenderWindow::new(TITLE, 1700, 900);

    let mut text = Viewport::new()
        .with_rect([0.0, 0.5, 0.5, 1.0])
        .with_caption(DESCRIPTION, colors.color3d("White")?);
    text.reset_camera();
    window.add_viewport(text);

    let mut iso = isosurface_actor(&sample, ISOSURFACES)?;
    iso.mapper_mut().set_lookup_table(lut);
    let mut isosurfaces = scene_viewport([0.5, 0.5, 1.0, 1.0], background);
    isosurfaces.add_actor(iso);
    isosurfaces.add_actor(outline_actor(&sample));
    book_view(&mut isosurfaces);
    window.add_viewport(isosurfaces);

    let mut planes = scene_viewport([0.0, 0.0, 0.5, 0.5], background);
    planes.add_actor(planes_actor(&sample, PLANES)?);
    planes.add_actor(outline_actor(&sample));
    book_view(&mut planes);
    window.add_viewport(planes);

    let mut contours = scene_viewport([0.5, 0.0, 1.0, 0.5], background);
    contours.add_actor(contours_actor(&sample, PLANES, CONTOURS)?);
    contours.add_actor(outline_actor(&sample));
    book_view(&mut contours);
    window.add_viewport(contours);

    Ok(window)
}

fn scene_viewport(rect: [f64; 4], background: [f32; 3]) -> Viewport {
    Viewport::new()
        .with_rect(rect)
        .with_background(background)
        .with_two_sided_lighting(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_layout() {
        let window = project_scene().unwrap();
        assert_eq!(window.title, TITLE);
        assert_eq!(window.size, (1700, 900));

        let rects: Vec<_> = window.viewports.iter().map(Viewport::rect).collect();
        assert_eq!(
            rects,
            vec![
                [0.0, 0.5, 0.5, 1.0],
                [0.5, 0.5, 1.0, 1.0],
                [0.0, 0.0, 0.5, 0.5],
                [0.5, 0.0, 1.0, 0.5],
            ]
        );
        assert_eq!(window.actor_count(), 6);
    }

    #[test]
    fn test_caption_viewport() {
        let window = project_scene().unwrap();
        let text = &window.viewports[0];
        assert!(text.actors.is_empty());
        assert!(!text.two_sided_lighting());
        assert_eq!(text.background(), [0.0, 0.0, 0.0]);

        let caption = text.caption().unwrap();
        assert_eq!(caption.color, [1.0, 1.0, 1.0]);
        assert!(caption.text.contains("3) Contour Lines"));
        assert!(window.viewports[1..].iter().all(|v| v.caption().is_none()));
    }

    #[test]
    fn test_scene_viewports_share_style() {
        let window = project_scene().unwrap();
        let slate = NamedColors::new().color3d("SlateGray").unwrap();
        for viewport in &window.viewports[1..] {
            assert_eq!(viewport.background(), slate);
            assert!(viewport.two_sided_lighting());
            assert_eq!(viewport.actors.len(), 2);
        }
    }

    #[test]
    fn test_isosurfaces_use_the_custom_table() {
        let window = project_scene().unwrap();
        let iso = &window.viewports[1].actors[0];
        let property = *iso.property();
        let vertices = iso.mapper().build_vertices(&property);
        assert!(!vertices.is_empty());

        // Value 1 falls in entry 1 of seven spread over [0, 7]
        let lut = create_color_table(TABLE_SIZE);
        let entry = lut.table_value(1).unwrap();
        let lowest = iso
            .mapper()
            .input()
            .scalars
            .as_ref()
            .unwrap()
            .iter()
            .position(|&s| s == 1.0)
            .unwrap();
        let color = vertices[lowest].color;
        for channel in 0..3 {
            assert!((color[channel] as f64 - entry[channel]).abs() < 1e-6);
        }
    }
}
