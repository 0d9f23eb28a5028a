// src/lib.rs
//! isoview
//!
//! Isosurfaces, cutting planes and contour lines of CT volumes and sampled
//! implicit functions, shown in interactive multi-viewport windows built on
//! wgpu and winit.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod demos;
pub mod error;
pub mod filters;
pub mod gfx;
pub mod implicit;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::VisualizationApp;
pub use error::{Error, Result};
