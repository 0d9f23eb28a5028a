//! # Data Module
//!
//! Datasets flowing through the visualization pipelines:
//!
//! - [`ImageData`] - regular grids of scalars (CT volumes, sampled functions, slices)
//! - [`PolyData`] - points, triangles and lines produced by the filters
//! - [`metaimage`] - reader for MetaImage `.mhd` / `.mha` volumes

pub mod image_data;
pub mod metaimage;
pub mod polydata;

pub use image_data::{Bounds, ImageData, Voi};
pub use polydata::PolyData;
