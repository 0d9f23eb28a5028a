//! Polygonal geometry produced by the filters

use super::image_data::Bounds;

/// Points with per-point attributes plus triangle and line cells
///
/// `normals` always has one entry per point (zero for unlit geometry such as
/// outlines); `scalars` is either absent or has one entry per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    pub points: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub scalars: Option<Vec<f32>>,
    pub triangles: Vec<[u32; 3]>,
    pub lines: Vec<[u32; 2]>,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a point and returns its index
    pub fn push_point(&mut self, point: [f32; 3], normal: [f32; 3], scalar: Option<f32>) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(point);
        self.normals.push(normal);
        self.scalars = match (self.scalars.take(), scalar) {
            (Some(mut scalars), Some(s)) => {
                scalars.push(s);
                Some(scalars)
            }
            (None, Some(s)) if index == 0 => Some(vec![s]),
            // Mixed input drops the scalar array rather than misaligning it
            _ => None,
        };
        index
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends `other`, offsetting its cell indices
    ///
    /// Scalars survive only if both inputs carry them (an empty side counts
    /// as carrying them).
    pub fn append(&mut self, other: PolyData) {
        let offset = self.points.len() as u32;

        self.scalars = match (self.scalars.take(), other.scalars) {
            (Some(mut a), Some(b)) => {
                a.extend(b);
                Some(a)
            }
            (None, Some(b)) if self.points.is_empty() => Some(b),
            (Some(a), None) if other.points.is_empty() => Some(a),
            _ => None,
        };

        self.points.extend(other.points);
        self.normals.extend(other.normals);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
        self.lines.extend(
            other
                .lines
                .into_iter()
                .map(|[a, b]| [a + offset, b + offset]),
        );
    }

    /// Bounds of all points, or `None` if there are none
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let mut bounds = [
            first[0] as f64,
            first[0] as f64,
            first[1] as f64,
            first[1] as f64,
            first[2] as f64,
            first[2] as f64,
        ];
        for p in &self.points[1..] {
            for axis in 0..3 {
                let v = p[axis] as f64;
                bounds[axis * 2] = bounds[axis * 2].min(v);
                bounds[axis * 2 + 1] = bounds[axis * 2 + 1].max(v);
            }
        }
        Some(bounds)
    }
}
