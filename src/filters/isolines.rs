//! Contour lines of planar images
//!
//! Every cell of the plane is cut into two triangles along its rising
//! diagonal and each triangle crossed by a contour value contributes one
//! segment, so lines are continuous across cells.

use std::collections::HashMap;

use log::debug;

use super::{crossing, lerp3};
use crate::data::{ImageData, PolyData};
use crate::error::{Error, Result};

/// Extracts line segments at each of `values` from an image with one flat axis
///
/// Points carry the contour value as their scalar; normals are zero since
/// lines are drawn unlit.
pub fn contour_lines(image: &ImageData, values: &[f64]) -> Result<PolyData> {
    let dims = image.dimensions();
    let flat = image.flat_axis().ok_or(Error::NotPlanar(dims))?;
    let (u, v) = match flat {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let mut output = PolyData::new();
    for &value in values {
        let mut plane = Plane {
            image,
            axes: (u, v),
            value: value as f32,
            edges: HashMap::new(),
            output: PolyData::new(),
        };
        for q in 0..dims[v] - 1 {
            for p in 0..dims[u] - 1 {
                plane.cell(p, q);
            }
        }
        output.append(plane.output);
    }

    debug!(
        "Contour lines at {} values: {} points, {} segments",
        values.len(),
        output.point_count(),
        output.line_count()
    );
    Ok(output)
}

struct Plane<'a> {
    image: &'a ImageData,
    axes: (usize, usize),
    value: f32,
    edges: HashMap<(usize, usize), u32>,
    output: PolyData,
}

impl Plane<'_> {
    fn sample(&self, p: usize, q: usize) -> [usize; 3] {
        let mut ijk = [0; 3];
        ijk[self.axes.0] = p;
        ijk[self.axes.1] = q;
        ijk
    }

    fn cell(&mut self, p: usize, q: usize) {
        let c00 = self.sample(p, q);
        let c10 = self.sample(p + 1, q);
        let c01 = self.sample(p, q + 1);
        let c11 = self.sample(p + 1, q + 1);
        self.triangle([c00, c10, c11]);
        self.triangle([c00, c11, c01]);
    }

    fn triangle(&mut self, corners: [[usize; 3]; 3]) {
        let image = self.image;
        let inside = corners.map(|[i, j, k]| image.value(i, j, k) >= self.value);

        // The lone corner on its side of the contour, with the other two
        let lone = match inside {
            [true, false, false] | [false, true, true] => 0,
            [false, true, false] | [true, false, true] => 1,
            [false, false, true] | [true, true, false] => 2,
            _ => return,
        };
        let a = corners[lone];
        let b = corners[(lone + 1) % 3];
        let c = corners[(lone + 2) % 3];

        let start = self.vertex(a, b);
        let end = self.vertex(a, c);
        self.output.lines.push([start, end]);
    }

    fn vertex(&mut self, a: [usize; 3], b: [usize; 3]) -> u32 {
        let image = self.image;
        let ia = image.index(a[0], a[1], a[2]);
        let ib = image.index(b[0], b[1], b[2]);
        let (lo, hi) = if ia < ib { (a, b) } else { (b, a) };
        let key = (ia.min(ib), ia.max(ib));
        if let Some(&id) = self.edges.get(&key) {
            return id;
        }

        let t = crossing(
            image.value(lo[0], lo[1], lo[2]),
            image.value(hi[0], hi[1], hi[2]),
            self.value,
        );
        let point = lerp3(
            image.point(lo[0], lo[1], lo[2]),
            image.point(hi[0], hi[1], hi[2]),
            t as f64,
        );
        let id = self.output.push_point(point, [0.0; 3], Some(self.value));
        self.edges.insert(key, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_gives_straight_line() {
        let image = ImageData::from_fn([5, 4, 1], [1.0; 3], [0.0; 3], |i, _, _| i as f32).unwrap();
        let lines = contour_lines(&image, &[2.5]).unwrap();

        // Three rows of cells, two triangles each
        assert_eq!(lines.line_count(), 6);
        // Four horizontal edges plus three diagonals
        assert_eq!(lines.point_count(), 7);
        for p in &lines.points {
            assert_eq!(p[0], 2.5);
            assert_eq!(p[2], 0.0);
        }
        assert!(lines.scalars.as_ref().unwrap().iter().all(|&s| s == 2.5));
        assert!(lines.normals.iter().all(|n| *n == [0.0; 3]));
    }

    #[test]
    fn test_circle_is_closed() {
        let n = 21;
        let image = ImageData::from_fn([n, 1, n], [0.1, 1.0, 0.1], [-1.0, 3.0, -1.0], |i, _, k| {
            let x = -1.0 + i as f32 * 0.1;
            let z = -1.0 + k as f32 * 0.1;
            x * x + z * z
        })
        .unwrap();
        let lines = contour_lines(&image, &[0.385]).unwrap();
        assert!(lines.line_count() > 10);

        let mut uses = vec![0usize; lines.point_count()];
        for [a, b] in &lines.lines {
            uses[*a as usize] += 1;
            uses[*b as usize] += 1;
        }
        assert!(uses.iter().all(|&count| count == 2));
        // Flat along y, so every point sits on the slice
        assert!(lines.points.iter().all(|p| p[1] == 3.0));
    }

    #[test]
    fn test_several_values_share_one_output() {
        let image = ImageData::from_fn([5, 4, 1], [1.0; 3], [0.0; 3], |i, _, _| i as f32).unwrap();
        let lines = contour_lines(&image, &[0.5, 1.5, 2.5]).unwrap();
        assert_eq!(lines.line_count(), 18);
        assert_eq!(lines.scalars.as_ref().unwrap().len(), lines.point_count());
    }

    #[test]
    fn test_rejects_volume() {
        let image = ImageData::from_fn([3, 3, 3], [1.0; 3], [0.0; 3], |_, _, _| 0.0).unwrap();
        assert!(matches!(
            contour_lines(&image, &[0.5]),
            Err(Error::NotPlanar([3, 3, 3]))
        ));
    }
}
