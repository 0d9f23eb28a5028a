//! Sampling implicit functions onto regular grids

use rayon::prelude::*;

use super::ImplicitFunction;
use crate::data::{Bounds, ImageData};
use crate::error::{Error, Result};

/// Samples an [`ImplicitFunction`] on a regular grid spanning `model_bounds`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFunction {
    pub sample_dimensions: [usize; 3],
    pub model_bounds: Bounds,
}

impl Default for SampleFunction {
    fn default() -> Self {
        Self {
            sample_dimensions: [50, 50, 50],
            model_bounds: [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0],
        }
    }
}

impl SampleFunction {
    pub fn new(sample_dimensions: [usize; 3]) -> Self {
        Self {
            sample_dimensions,
            ..Default::default()
        }
    }

    pub fn with_model_bounds(mut self, model_bounds: Bounds) -> Self {
        self.model_bounds = model_bounds;
        self
    }

    /// Evaluates `function` at every grid point
    ///
    /// Every axis needs at least two samples so the grid spans the bounds.
    pub fn sample<F: ImplicitFunction + ?Sized>(&self, function: &F) -> Result<ImageData> {
        let dims = self.sample_dimensions;
        if dims.iter().any(|&n| n < 2) {
            return Err(Error::BadDimensions(dims));
        }

        let b = &self.model_bounds;
        let origin = [b[0], b[2], b[4]];
        let spacing = [
            (b[1] - b[0]) / (dims[0] - 1) as f64,
            (b[3] - b[2]) / (dims[1] - 1) as f64,
            (b[5] - b[4]) / (dims[2] - 1) as f64,
        ];

        let slab = dims[0] * dims[1];
        let mut scalars = vec![0.0f32; slab * dims[2]];
        scalars
            .par_chunks_mut(slab)
            .enumerate()
            .for_each(|(k, layer)| {
                let z = origin[2] + k as f64 * spacing[2];
                for j in 0..dims[1] {
                    let y = origin[1] + j as f64 * spacing[1];
                    for i in 0..dims[0] {
                        let x = origin[0] + i as f64 * spacing[0];
                        layer[i + j * dims[0]] = function.evaluate([x, y, z]) as f32;
                    }
                }
            });

        ImageData::new(dims, spacing, origin, scalars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implicit::Quadric;

    #[test]
    fn test_grid_spans_model_bounds() {
        let image = SampleFunction::new([3, 5, 2])
            .with_model_bounds([0.0, 1.0, -2.0, 2.0, 4.0, 5.0])
            .sample(&|p: [f64; 3]| p[0] + p[1] + p[2])
            .unwrap();
        assert_eq!(image.dimensions(), [3, 5, 2]);
        assert_eq!(image.bounds(), [0.0, 1.0, -2.0, 2.0, 4.0, 5.0]);
        assert_eq!(image.value(2, 4, 1), 1.0 + 2.0 + 5.0);
        assert_eq!(image.value(0, 0, 0), 0.0 - 2.0 + 4.0);
    }

    #[test]
    fn test_quadric_sample_matches_direct_evaluation() {
        let quadric = Quadric::new([1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let image = SampleFunction::new([25, 25, 25]).sample(&quadric).unwrap();
        for &(i, j, k) in &[(0, 0, 0), (12, 12, 12), (24, 3, 17)] {
            let direct = quadric.evaluate(image.point(i, j, k)) as f32;
            assert_eq!(image.value(i, j, k), direct);
        }
        // Corner (1, 1, 1): 1 + 2 + 3 + yz = 7
        approx::assert_relative_eq!(image.scalar_range()[1], 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let err = SampleFunction::new([25, 1, 25]).sample(&Quadric::default());
        assert!(matches!(err, Err(Error::BadDimensions([25, 1, 25]))));
    }
}
