//! Isosurface extraction from 3-D images
//!
//! Each grid cell is split into six tetrahedra sharing the diagonal from
//! corner 0 to corner 7. Neighbouring cells then cut their shared faces along
//! the same diagonal, so the surface has no cracks and no ambiguous cases.
//! Corners are numbered with bit 0 = +x, bit 1 = +y, bit 2 = +z.

use std::collections::HashMap;

use log::debug;
use rayon::prelude::*;

use super::{contour::generate_values, crossing, lerp3};
use crate::data::{ImageData, PolyData};
use crate::error::{Error, Result};

const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

#[inline]
fn corner(c: usize) -> [usize; 3] {
    [c & 1, (c >> 1) & 1, (c >> 2) & 1]
}

/// Triangulated isosurfaces at one or more scalar values
///
/// Output points carry the contour value as their scalar and the normalised
/// negative gradient as their normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarchingCubes {
    values: Vec<f64>,
}

impl MarchingCubes {
    pub fn new(value: f64) -> Self {
        Self {
            values: vec![value],
        }
    }

    pub fn with_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn set_value(&mut self, index: usize, value: f64) {
        if index >= self.values.len() {
            self.values.resize(index + 1, 0.0);
        }
        self.values[index] = value;
    }

    pub fn generate_values(&mut self, n: usize, range: [f64; 2]) {
        self.values = generate_values(n, range);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn execute(&self, image: &ImageData) -> Result<PolyData> {
        let dims = image.dimensions();
        if dims.iter().any(|&n| n < 2) {
            return Err(Error::BadDimensions(dims));
        }

        let mut output = PolyData::new();
        for &value in &self.values {
            let slabs: Vec<PolyData> = (0..dims[2] - 1)
                .into_par_iter()
                .map(|k| Slab::new(image, value as f32).extract(k))
                .collect();
            for slab in slabs {
                output.append(slab);
            }
        }

        debug!(
            "Isosurface at {:?}: {} points, {} triangles",
            self.values,
            output.point_count(),
            output.triangle_count()
        );
        Ok(output)
    }
}

/// Working state for one layer of cells
struct Slab<'a> {
    image: &'a ImageData,
    value: f32,
    edges: HashMap<(usize, usize), u32>,
    output: PolyData,
}

impl<'a> Slab<'a> {
    fn new(image: &'a ImageData, value: f32) -> Self {
        Self {
            image,
            value,
            edges: HashMap::new(),
            output: PolyData::new(),
        }
    }

    fn extract(mut self, k: usize) -> PolyData {
        let [nx, ny, _] = self.image.dimensions();
        for j in 0..ny - 1 {
            for i in 0..nx - 1 {
                self.cell([i, j, k]);
            }
        }
        self.output
    }

    fn cell(&mut self, base: [usize; 3]) {
        let mut ijk = [[0usize; 3]; 8];
        let mut values = [0.0f32; 8];
        for (c, (p, v)) in ijk.iter_mut().zip(values.iter_mut()).enumerate() {
            let offset = corner(c);
            *p = [base[0] + offset[0], base[1] + offset[1], base[2] + offset[2]];
            *v = self.image.value(p[0], p[1], p[2]);
        }

        let above = values.iter().filter(|&&v| v >= self.value).count();
        if above == 0 || above == 8 {
            return;
        }

        for tet in TETRAHEDRA {
            self.tetrahedron(tet.map(|c| (ijk[c], values[c])));
        }
    }

    fn tetrahedron(&mut self, corners: [([usize; 3], f32); 4]) {
        let (inside, outside): (Vec<_>, Vec<_>) =
            corners.iter().partition(|(_, v)| *v >= self.value);

        match (inside.as_slice(), outside.as_slice()) {
            ([a], [b, c, d]) | ([b, c, d], [a]) => {
                let p = [self.vertex(a, b), self.vertex(a, c), self.vertex(a, d)];
                self.triangle(p);
            }
            ([a, b], [c, d]) => {
                let p = [
                    self.vertex(a, c),
                    self.vertex(a, d),
                    self.vertex(b, d),
                    self.vertex(b, c),
                ];
                self.triangle([p[0], p[1], p[2]]);
                self.triangle([p[0], p[2], p[3]]);
            }
            _ => {}
        }
    }

    /// Point where the surface crosses the edge between two samples
    ///
    /// Always interpolated from the lower sample index so that neighbouring
    /// slabs compute bit-identical positions for shared edges.
    fn vertex(&mut self, a: &([usize; 3], f32), b: &([usize; 3], f32)) -> u32 {
        let ia = self.image.index(a.0[0], a.0[1], a.0[2]);
        let ib = self.image.index(b.0[0], b.0[1], b.0[2]);
        let (lo, hi) = if ia < ib { (a, b) } else { (b, a) };
        let key = (ia.min(ib), ia.max(ib));
        if let Some(&id) = self.edges.get(&key) {
            return id;
        }

        let t = crossing(lo.1, hi.1, self.value);
        let image = self.image;
        let point = lerp3(
            image.point(lo.0[0], lo.0[1], lo.0[2]),
            image.point(hi.0[0], hi.0[1], hi.0[2]),
            t as f64,
        );
        let ga = image.gradient(lo.0[0], lo.0[1], lo.0[2]);
        let gb = image.gradient(hi.0[0], hi.0[1], hi.0[2]);
        let normal = normalize([
            -(ga[0] + t * (gb[0] - ga[0])),
            -(ga[1] + t * (gb[1] - ga[1])),
            -(ga[2] + t * (gb[2] - ga[2])),
        ]);

        let id = self.output.push_point(point, normal, Some(self.value));
        self.edges.insert(key, id);
        id
    }

    /// Adds a triangle wound so its face normal agrees with the point normals
    fn triangle(&mut self, [a, b, c]: [u32; 3]) {
        let p = &self.output.points;
        let n = &self.output.normals;
        let (pa, pb, pc) = (p[a as usize], p[b as usize], p[c as usize]);
        let e1 = sub(pb, pa);
        let e2 = sub(pc, pa);
        let face = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let mut facing = 0.0;
        for id in [a, b, c] {
            let normal = n[id as usize];
            facing += face[0] * normal[0] + face[1] * normal[1] + face[2] * normal[2];
        }

        if facing < 0.0 {
            self.output.triangles.push([a, c, b]);
        } else {
            self.output.triangles.push([a, b, c]);
        }
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implicit::{Quadric, SampleFunction};

    fn single_cell(hot: usize) -> ImageData {
        ImageData::from_fn([2, 2, 2], [1.0; 3], [0.0; 3], |i, j, k| {
            if i + 2 * j + 4 * k == hot {
                1.0
            } else {
                0.0
            }
        })
        .unwrap()
    }

    fn sphere(radius: f64, n: usize) -> ImageData {
        let mut quadric = Quadric::default();
        quadric.coefficients[9] = -radius * radius;
        SampleFunction::new([n, n, n]).sample(&quadric).unwrap()
    }

    #[test]
    fn test_diagonal_corner_is_in_every_tetrahedron() {
        for hot in [0, 7] {
            let surface = MarchingCubes::new(0.5).execute(&single_cell(hot)).unwrap();
            assert_eq!(surface.triangle_count(), 6);
            assert_eq!(surface.point_count(), 7);
        }
    }

    #[test]
    fn test_off_diagonal_corner() {
        let surface = MarchingCubes::new(0.5).execute(&single_cell(1)).unwrap();
        assert_eq!(surface.triangle_count(), 2);
        assert_eq!(surface.point_count(), 4);
        // Midpoints of the edges from corner 1 to corners 0, 3, 5 and 7
        let expected = [
            [0.5, 0.0, 0.0],
            [1.0, 0.5, 0.0],
            [1.0, 0.0, 0.5],
            [1.0, 0.5, 0.5],
        ];
        for p in &surface.points {
            assert!(expected.contains(p), "unexpected point {p:?}");
        }
    }

    #[test]
    fn test_points_lie_on_sphere() {
        let surface = MarchingCubes::new(0.0).execute(&sphere(0.8, 20)).unwrap();
        assert!(surface.triangle_count() > 100);
        for (p, n) in surface.points.iter().zip(&surface.normals) {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 0.8).abs() < 0.02, "radius {r}");
            // Values grow outward, so normals point at the centre
            let dot = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
            assert!(dot < 0.0);
        }
    }

    #[test]
    fn test_surface_is_closed() {
        let surface = MarchingCubes::new(0.0).execute(&sphere(0.8, 12)).unwrap();

        let key = |id: u32| surface.points[id as usize].map(f32::to_bits);
        let mut edges: HashMap<([u32; 3], [u32; 3]), usize> = HashMap::new();
        for tri in &surface.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (ka, kb) = (key(a), key(b));
                let edge = if ka < kb { (ka, kb) } else { (kb, ka) };
                *edges.entry(edge).or_default() += 1;
            }
        }
        assert!(!edges.is_empty());
        assert!(edges.values().all(|&count| count == 2));
    }

    #[test]
    fn test_multiple_values_carry_scalars() {
        let image = ImageData::from_fn([4, 4, 4], [1.0; 3], [0.0; 3], |i, j, _| (i + j) as f32)
            .unwrap();
        let surface = MarchingCubes::with_values(vec![1.5, 3.5]).execute(&image).unwrap();
        let scalars = surface.scalars.as_ref().unwrap();
        assert_eq!(scalars.len(), surface.point_count());
        assert!(scalars.contains(&1.5));
        assert!(scalars.contains(&3.5));
        assert!(scalars.iter().all(|&s| s == 1.5 || s == 3.5));
    }

    #[test]
    fn test_value_outside_range_is_empty() {
        let surface = MarchingCubes::new(10.0).execute(&single_cell(0)).unwrap();
        assert!(surface.is_empty());
        assert_eq!(surface.triangle_count(), 0);
    }

    #[test]
    fn test_rejects_flat_input() {
        let plane = ImageData::from_fn([3, 3, 1], [1.0; 3], [0.0; 3], |_, _, _| 0.0).unwrap();
        let err = MarchingCubes::new(0.5).execute(&plane);
        assert!(matches!(err, Err(Error::BadDimensions([3, 3, 1]))));
    }
}
