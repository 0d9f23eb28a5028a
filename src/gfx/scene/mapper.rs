//! Turns poly data into GPU vertex and index arrays

use crate::color::LookupTable;
use crate::data::{Bounds, PolyData};

use super::{property::Property, vertex::Vertex3D};

/// Poly data plus the rules for coloring it
///
/// With scalar visibility on and scalars present, each point is colored by
/// its scalar through the lookup table stretched over `scalar_range`.
/// Otherwise the actor's property color is used.
#[derive(Debug, Clone)]
pub struct Mapper {
    input: PolyData,
    scalar_visibility: bool,
    scalar_range: [f64; 2],
    lookup_table: LookupTable,
}

impl Mapper {
    pub fn new(input: PolyData) -> Self {
        Self {
            input,
            scalar_visibility: true,
            scalar_range: [0.0, 1.0],
            lookup_table: LookupTable::default(),
        }
    }

    pub fn with_scalar_range(mut self, range: [f64; 2]) -> Self {
        self.scalar_range = range;
        self
    }

    pub fn with_lookup_table(mut self, lookup_table: LookupTable) -> Self {
        self.lookup_table = lookup_table;
        self
    }

    pub fn set_lookup_table(&mut self, lookup_table: LookupTable) {
        self.lookup_table = lookup_table;
    }

    pub fn scalar_visibility_off(mut self) -> Self {
        self.scalar_visibility = false;
        self
    }

    pub fn input(&self) -> &PolyData {
        &self.input
    }

    pub fn scalar_range(&self) -> [f64; 2] {
        self.scalar_range
    }

    pub fn colors_by_scalars(&self) -> bool {
        self.scalar_visibility && self.input.scalars.is_some()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.input.bounds()
    }

    pub fn build_vertices(&self, property: &Property) -> Vec<Vertex3D> {
        let [r, g, b] = property.color;
        let uniform = [r, g, b, 1.0];
        let scalars = self
            .input
            .scalars
            .as_deref()
            .filter(|_| self.scalar_visibility);

        self.input
            .points
            .iter()
            .zip(&self.input.normals)
            .enumerate()
            .map(|(i, (&position, &normal))| {
                let color = match scalars {
                    Some(scalars) => self
                        .lookup_table
                        .map_scalar(scalars[i] as f64, self.scalar_range)
                        .map(|c| c as f32),
                    None => uniform,
                };
                Vertex3D {
                    position,
                    normal,
                    color,
                }
            })
            .collect()
    }

    pub fn triangle_indices(&self) -> Vec<u32> {
        self.input.triangles.iter().flatten().copied().collect()
    }

    pub fn line_indices(&self) -> Vec<u32> {
        self.input.lines.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(scalar: Option<f32>) -> PolyData {
        let mut data = PolyData::new();
        let a = data.push_point([0.0, 0.0, 0.0], [0.0; 3], scalar);
        let b = data.push_point([1.0, 2.0, 3.0], [0.0; 3], scalar.map(|s| s + 1.0));
        data.lines.push([a, b]);
        data
    }

    #[test]
    fn test_colors_by_scalars_through_table() {
        let mapper = Mapper::new(segment(Some(0.0))).with_scalar_range([0.0, 1.0]);
        assert!(mapper.colors_by_scalars());
        let vertices = mapper.build_vertices(&Property::default());
        // Rainbow runs from red to blue
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].color[2], 1.0);
        assert_eq!(mapper.line_indices(), vec![0, 1]);
        assert!(mapper.triangle_indices().is_empty());
    }

    #[test]
    fn test_property_color_without_scalars() {
        let property = Property::default().with_color([1.0, 0.49, 0.25]);
        let mapper = Mapper::new(segment(Some(0.5))).scalar_visibility_off();
        assert!(!mapper.colors_by_scalars());
        let vertices = mapper.build_vertices(&property);
        assert!(vertices.iter().all(|v| v.color == [1.0, 0.49, 0.25, 1.0]));

        let unscaled = Mapper::new(segment(None));
        assert!(!unscaled.colors_by_scalars());
        assert_eq!(unscaled.build_vertices(&property)[1].position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_bounds_come_from_input() {
        let mapper = Mapper::new(segment(None));
        assert_eq!(mapper.bounds(), Some([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]));
        assert_eq!(Mapper::new(PolyData::new()).bounds(), None);
    }
}
