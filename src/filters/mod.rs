//! # Filters
//!
//! Algorithms turning [`ImageData`](crate::data::ImageData) into renderable
//! [`PolyData`](crate::data::PolyData):
//!
//! - [`isosurface`] - triangulated isosurfaces of volumes
//! - [`isolines`] - contour lines of planar slices
//! - [`contour`] - value generation and dispatch between the two
//! - [`extract`] - evenly spaced slices and sheet triangulation
//! - [`outline`] - bounding box wireframes

pub mod contour;
pub mod extract;
pub mod isolines;
pub mod isosurface;
pub mod outline;

pub use contour::{generate_values, ContourFilter};
pub use extract::{image_surface, SlicePlan};
pub use isolines::contour_lines;
pub use isosurface::MarchingCubes;
pub use outline::outline;

/// Linear interpolation parameter of `value` between `a` and `b`
#[inline]
pub(crate) fn crossing(a: f32, b: f32, value: f32) -> f32 {
    let delta = b - a;
    if delta.abs() > f32::EPSILON {
        ((value - a) / delta).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[inline]
pub(crate) fn lerp3(a: [f64; 3], b: [f64; 3], t: f64) -> [f32; 3] {
    [
        (a[0] + t * (b[0] - a[0])) as f32,
        (a[1] + t * (b[1] - a[1])) as f32,
        (a[2] + t * (b[2] - a[2])) as f32,
    ]
}
