//! # isoview Prelude
//!
//! Brings the types needed to build and show a scene into scope.
//!
//! ```no_run
//! use isoview::prelude::*;
//!
//! fn main() -> isoview::Result<()> {
//!     let quadric = Quadric::new([1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
//!     let volume = SampleFunction::new([25, 25, 25]).sample(&quadric)?;
//!     let surface = MarchingCubes::new(2.0).execute(&volume)?;
//!
//!     let mut viewport = Viewport::new().with_background([0.2, 0.3, 0.4]);
//!     viewport.add_actor(Actor::new(Mapper::new(surface)));
//!     viewport.reset_camera();
//!
//!     let mut window = RenderWindow::new("quadric", 640, 480);
//!     window.add_viewport(viewport);
//!     VisualizationApp::new(window).run()
//! }
//! ```

// Re-export core application types
pub use crate::app::VisualizationApp;
pub use crate::error::{Error, Result};

// Data and pipeline
pub use crate::color::{create_color_table, LookupTable, NamedColors};
pub use crate::data::{metaimage, Bounds, ImageData, PolyData};
pub use crate::filters::{outline, ContourFilter, MarchingCubes, SlicePlan};
pub use crate::implicit::{ImplicitFunction, Quadric, SampleFunction};

// Scene types
pub use crate::gfx::camera::Camera;
pub use crate::gfx::scene::{Actor, Mapper, Property, RenderWindow, Viewport};
