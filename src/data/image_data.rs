//! Regular grids of scalar samples
//!
//! [`ImageData`] is the common currency between readers, implicit-function
//! sampling and the contouring filters. Samples are stored x-fastest, then y,
//! then z, and every sample has a world position `origin + index * spacing`.

use crate::error::{Error, Result};

/// Axis-aligned bounds as `[xmin, xmax, ymin, ymax, zmin, zmax]`
pub type Bounds = [f64; 6];

/// Inclusive index box as `[i0, i1, j0, j1, k0, k1]`
pub type Voi = [usize; 6];

#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    dimensions: [usize; 3],
    spacing: [f64; 3],
    origin: [f64; 3],
    scalars: Vec<f32>,
}

impl ImageData {
    /// Wraps an existing scalar buffer
    ///
    /// Fails if any dimension is zero or if the buffer length does not match
    /// the number of samples.
    pub fn new(
        dimensions: [usize; 3],
        spacing: [f64; 3],
        origin: [f64; 3],
        scalars: Vec<f32>,
    ) -> Result<Self> {
        if dimensions.contains(&0) {
            return Err(Error::BadDimensions(dimensions));
        }
        let expected = dimensions
            .iter()
            .try_fold(1usize, |count, &n| count.checked_mul(n))
            .ok_or(Error::BadDimensions(dimensions))?;
        if scalars.len() != expected {
            return Err(Error::BadScalarCount(scalars.len(), expected));
        }
        Ok(Self {
            dimensions,
            spacing,
            origin,
            scalars,
        })
    }

    /// Builds a grid by calling `f(i, j, k)` for every sample
    pub fn from_fn<F>(
        dimensions: [usize; 3],
        spacing: [f64; 3],
        origin: [f64; 3],
        mut f: F,
    ) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let [nx, ny, nz] = dimensions;
        let mut scalars = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    scalars.push(f(i, j, k));
                }
            }
        }
        Self::new(dimensions, spacing, origin, scalars)
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn scalars(&self) -> &[f32] {
        &self.scalars
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    /// Linear index of sample `(i, j, k)`
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.dimensions[0] * (j + self.dimensions[1] * k)
    }

    #[inline]
    pub fn value(&self, i: usize, j: usize, k: usize) -> f32 {
        self.scalars[self.index(i, j, k)]
    }

    /// World position of sample `(i, j, k)`
    pub fn point(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        [
            self.origin[0] + i as f64 * self.spacing[0],
            self.origin[1] + j as f64 * self.spacing[1],
            self.origin[2] + k as f64 * self.spacing[2],
        ]
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = [0.0; 6];
        for axis in 0..3 {
            let a = self.origin[axis];
            let b = a + (self.dimensions[axis] - 1) as f64 * self.spacing[axis];
            bounds[axis * 2] = a.min(b);
            bounds[axis * 2 + 1] = a.max(b);
        }
        bounds
    }

    /// Minimum and maximum sample value
    pub fn scalar_range(&self) -> [f32; 2] {
        self.scalars
            .iter()
            .fold([f32::INFINITY, f32::NEG_INFINITY], |[lo, hi], &v| {
                [lo.min(v), hi.max(v)]
            })
    }

    /// Gradient at a sample, in world units
    ///
    /// Central differences in the interior, one-sided differences on the
    /// border, zero along axes with a single sample.
    pub fn gradient(&self, i: usize, j: usize, k: usize) -> [f32; 3] {
        let ijk = [i, j, k];
        let mut g = [0.0f32; 3];
        for axis in 0..3 {
            let n = self.dimensions[axis];
            if n < 2 {
                continue;
            }
            let (lo, hi) = match ijk[axis] {
                0 => (0, 1),
                x if x == n - 1 => (n - 2, n - 1),
                x => (x - 1, x + 1),
            };
            let mut a = ijk;
            let mut b = ijk;
            a[axis] = lo;
            b[axis] = hi;
            let dv = self.value(b[0], b[1], b[2]) - self.value(a[0], a[1], a[2]);
            let dx = (hi - lo) as f64 * self.spacing[axis];
            g[axis] = (dv as f64 / dx) as f32;
        }
        g
    }

    /// Copies out the sub-volume `voi`, clamped to the grid extent
    ///
    /// Samples keep their world positions: the returned grid's origin is moved
    /// to the first extracted sample.
    pub fn extract_voi(&self, voi: Voi) -> Result<Self> {
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        for axis in 0..3 {
            let last = self.dimensions[axis] - 1;
            lo[axis] = voi[axis * 2].min(last);
            hi[axis] = voi[axis * 2 + 1].min(last);
            if lo[axis] > hi[axis] {
                return Err(Error::BadDimensions([
                    voi[1].saturating_sub(voi[0]) + 1,
                    voi[3].saturating_sub(voi[2]) + 1,
                    voi[5].saturating_sub(voi[4]) + 1,
                ]));
            }
        }

        let dimensions = [
            hi[0] - lo[0] + 1,
            hi[1] - lo[1] + 1,
            hi[2] - lo[2] + 1,
        ];
        let origin = self.point(lo[0], lo[1], lo[2]);
        Self::from_fn(dimensions, self.spacing, origin, |i, j, k| {
            self.value(lo[0] + i, lo[1] + j, lo[2] + k)
        })
    }

    /// Returns the single axis with one sample, if there is exactly one
    pub fn flat_axis(&self) -> Option<usize> {
        let mut flat = self.dimensions.iter().enumerate().filter(|(_, &n)| n == 1);
        match (flat.next(), flat.next()) {
            (Some((axis, _)), None) => Some(axis),
            _ => None,
        }
    }
}
