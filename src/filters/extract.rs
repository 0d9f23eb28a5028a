//! Evenly spaced slices through a volume, and sheets built from them

use log::debug;

use crate::data::{ImageData, PolyData, Voi};
use crate::error::{Error, Result};

/// Indices of `n` evenly spaced slices along one axis of a grid
///
/// The spacing between slices is `(dimension - 1) / (n + 1)` samples, rounded
/// down, and slice `k` (counting from one) sits at `k * increment`. Slices
/// therefore never touch either face of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    axis: usize,
    increment: usize,
    indices: Vec<usize>,
}

impl SlicePlan {
    /// Plans `slices` cuts across the z axis of a grid with `dimension` samples
    pub fn new(dimension: usize, slices: usize) -> Result<Self> {
        Self::along(2, dimension, slices)
    }

    /// Plans `slices` cuts across `axis` (0, 1 or 2 for x, y or z)
    pub fn along(axis: usize, dimension: usize, slices: usize) -> Result<Self> {
        if axis > 2 {
            return Err(Error::invalid("axis", &axis.to_string()));
        }
        if slices == 0 {
            return Err(Error::invalid("slices", "0"));
        }
        let increment = dimension.saturating_sub(1) / (slices + 1);
        if increment == 0 {
            return Err(Error::TooManySlices { slices, dimension });
        }
        let indices = (1..=slices).map(|k| k * increment).collect();
        Ok(Self {
            axis,
            increment,
            indices,
        })
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// One single-sample-thick box per slice, spanning the other two axes
    pub fn vois(&self, dimensions: [usize; 3]) -> impl Iterator<Item = Voi> + '_ {
        self.indices.iter().map(move |&index| {
            let mut voi = [
                0,
                dimensions[0].saturating_sub(1),
                0,
                dimensions[1].saturating_sub(1),
                0,
                dimensions[2].saturating_sub(1),
            ];
            voi[self.axis * 2] = index;
            voi[self.axis * 2 + 1] = index;
            voi
        })
    }

    /// Copies every planned slice out of `image`
    pub fn extract(&self, image: &ImageData) -> Result<Vec<ImageData>> {
        self.vois(image.dimensions())
            .map(|voi| image.extract_voi(voi))
            .collect()
    }
}

/// Triangulates a planar image into a sheet with per-point scalars
///
/// Each cell becomes two triangles and normals point along the flat axis.
pub fn image_surface(image: &ImageData) -> Result<PolyData> {
    let dims = image.dimensions();
    let flat = image.flat_axis().ok_or(Error::NotPlanar(dims))?;
    let (u, v) = match flat {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let mut normal = [0.0f32; 3];
    normal[flat] = 1.0;

    let mut sheet = PolyData::new();
    for k in 0..dims[2] {
        for j in 0..dims[1] {
            for i in 0..dims[0] {
                let p = image.point(i, j, k);
                sheet.push_point(
                    [p[0] as f32, p[1] as f32, p[2] as f32],
                    normal,
                    Some(image.value(i, j, k)),
                );
            }
        }
    }

    // Storage order matches `ImageData::index`, so point ids are sample indices
    let id = |p: usize, q: usize| {
        let mut ijk = [0; 3];
        ijk[u] = p;
        ijk[v] = q;
        image.index(ijk[0], ijk[1], ijk[2]) as u32
    };
    for q in 0..dims[v] - 1 {
        for p in 0..dims[u] - 1 {
            let (a, b, c, d) = (id(p, q), id(p + 1, q), id(p + 1, q + 1), id(p, q + 1));
            sheet.triangles.push([a, b, c]);
            sheet.triangles.push([a, c, d]);
        }
    }

    debug!(
        "Sheet of {} points, {} triangles",
        sheet.point_count(),
        sheet.triangle_count()
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_strictly_increase_inside_grid() {
        for dimension in [2usize, 5, 25, 26, 50, 51, 100] {
            for slices in 1..dimension {
                let Ok(plan) = SlicePlan::new(dimension, slices) else {
                    assert!((dimension - 1) / (slices + 1) == 0);
                    continue;
                };
                let indices = plan.indices();
                assert_eq!(indices.len(), slices);
                assert!(indices.windows(2).all(|w| w[0] < w[1]));
                assert!(indices[0] > 0);
                assert!(*indices.last().unwrap() < dimension - 1);
            }
        }
    }

    #[test]
    fn test_plans_for_the_quadric_grids() {
        assert_eq!(SlicePlan::new(25, 3).unwrap().indices(), &[6, 12, 18]);
        assert_eq!(SlicePlan::new(50, 5).unwrap().indices(), &[8, 16, 24, 32, 40]);
    }

    #[test]
    fn test_rejects_impossible_plans() {
        assert!(matches!(
            SlicePlan::new(25, 0),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            SlicePlan::new(5, 4),
            Err(Error::TooManySlices {
                slices: 4,
                dimension: 5
            })
        ));
        match SlicePlan::along(7, 25, 3) {
            Err(Error::InvalidValue { key, value }) => {
                assert_eq!(key, "axis");
                assert_eq!(value, "7");
            }
            other => panic!("expected an invalid axis, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_gives_flat_slices() {
        let image =
            ImageData::from_fn([4, 3, 9], [1.0; 3], [0.0; 3], |i, j, k| (i + j + k) as f32)
                .unwrap();
        let plan = SlicePlan::new(9, 3).unwrap();
        assert_eq!(plan.indices(), &[2, 4, 6]);

        let slices = plan.extract(&image).unwrap();
        assert_eq!(slices.len(), 3);
        for (slice, &k) in slices.iter().zip(plan.indices()) {
            assert_eq!(slice.dimensions(), [4, 3, 1]);
            assert_eq!(slice.flat_axis(), Some(2));
            assert_eq!(slice.origin()[2], k as f64);
            assert_eq!(slice.value(3, 2, 0), (5 + k) as f32);
        }
    }

    #[test]
    fn test_slices_along_other_axes() {
        let plan = SlicePlan::along(0, 9, 1).unwrap();
        let vois: Vec<_> = plan.vois([9, 3, 2]).collect();
        assert_eq!(vois, vec![[4, 4, 0, 2, 0, 1]]);
    }

    #[test]
    fn test_image_surface_covers_plane() {
        let slice =
            ImageData::from_fn([3, 1, 4], [0.5, 1.0, 0.5], [1.0, 2.0, 3.0], |i, _, k| {
                (i * k) as f32
            })
            .unwrap();
        let sheet = image_surface(&slice).unwrap();
        assert_eq!(sheet.point_count(), 12);
        assert_eq!(sheet.triangle_count(), 2 * 2 * 3);
        assert!(sheet.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert_eq!(sheet.scalars.as_ref().unwrap()[11], 6.0);
        assert_eq!(sheet.bounds(), Some([1.0, 2.0, 2.0, 2.0, 3.0, 4.5]));
    }

    #[test]
    fn test_image_surface_rejects_volume() {
        let image = ImageData::from_fn([2, 2, 2], [1.0; 3], [0.0; 3], |_, _, _| 0.0).unwrap();
        assert!(matches!(image_surface(&image), Err(Error::NotPlanar(_))));
    }
}
