use crate::data::{Bounds, PolyData};

/// Wireframe of an axis-aligned box: eight corners, twelve edges
pub fn outline(bounds: Bounds) -> PolyData {
    let mut data = PolyData::new();
    for c in 0..8 {
        let point = [
            bounds[c & 1] as f32,
            bounds[2 + ((c >> 1) & 1)] as f32,
            bounds[4 + ((c >> 2) & 1)] as f32,
        ];
        data.push_point(point, [0.0; 3], None);
    }

    // Corner ids use bit 0 for +x, bit 1 for +y and bit 2 for +z
    data.lines = vec![
        [0, 1],
        [2, 3],
        [4, 5],
        [6, 7],
        [0, 2],
        [1, 3],
        [4, 6],
        [5, 7],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_edges_are_axis_aligned() {
        let bounds = [-1.0, 1.0, 0.0, 2.0, 5.0, 6.5];
        let data = outline(bounds);
        assert_eq!(data.point_count(), 8);
        assert_eq!(data.line_count(), 12);
        assert_eq!(data.bounds(), Some(bounds));
        assert!(data.scalars.is_none());

        for [a, b] in &data.lines {
            let pa = data.points[*a as usize];
            let pb = data.points[*b as usize];
            let differing = (0..3).filter(|&axis| pa[axis] != pb[axis]).count();
            assert_eq!(differing, 1);
        }
    }
}
