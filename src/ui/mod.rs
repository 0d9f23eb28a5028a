//! # User Interface Module
//!
//! Dear ImGui overlay drawn after the 3D viewports. Its only job is to put
//! each viewport's caption text in the viewport's top-left corner.
//!
//! The overlay is driven by [`VisualizationApp`]; captions are attached to
//! viewports when the scene is built:
//!
//! ```no_run
//! use isoview::gfx::scene::Viewport;
//!
//! let viewport = Viewport::new()
//!     .with_rect([0.0, 0.5, 0.5, 1.0])
//!     .with_caption("Isosurfaces at 1, 2.25, 3.5, 4.75 and 6", [1.0, 1.0, 1.0]);
//! ```
//!
//! [`VisualizationApp`]: crate::app::VisualizationApp

pub mod manager;

// Re-export main types
pub use manager::UiManager;
