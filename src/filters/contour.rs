//! Contour values and the volume/plane dispatching filter

use log::debug;

use super::{isolines, isosurface::MarchingCubes};
use crate::data::{ImageData, PolyData};
use crate::error::Result;

/// `n` evenly spaced values over `[lo, hi]`, both ends included
///
/// A single value sits at `lo`.
pub fn generate_values(n: usize, [lo, hi]: [f64; 2]) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + i as f64 * step).collect()
        }
    }
}

/// Contours volumes into surfaces and planar images into lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourFilter {
    values: Vec<f64>,
}

impl ContourFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Sets contour `index`, growing the list with zeros if needed
    pub fn set_value(&mut self, index: usize, value: f64) {
        if index >= self.values.len() {
            self.values.resize(index + 1, 0.0);
        }
        self.values[index] = value;
    }

    /// Replaces all contour values with `n` values spanning `range`
    pub fn generate_values(&mut self, n: usize, range: [f64; 2]) {
        self.values = generate_values(n, range);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn execute(&self, image: &ImageData) -> Result<PolyData> {
        match image.flat_axis() {
            Some(axis) => {
                debug!("Contouring plane flat along axis {axis} at {:?}", self.values);
                isolines::contour_lines(image, &self.values)
            }
            None => MarchingCubes::with_values(self.values.clone()).execute(image),
        }
    }
}
