//! # Graphics Module
//!
//! Everything between filter output and pixels on screen: cameras, the
//! scene description, GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Position / focal point / view-up camera
//!   with azimuth, elevation and dolly, plus a trackball-style controller
//! - **Scene Description** ([`scene`]) - Render window, viewports, actors,
//!   mappers and surface properties
//! - **Resource Management** ([`resources`]) - Uniform buffers, bind groups
//!   and vertex/index buffers per viewport and actor
//! - **Rendering Pipeline** ([`rendering`]) - Pipelines for backgrounds,
//!   opaque and translucent surfaces and lines, drawn per viewport
//!
//! ## Usage
//!
//! Scenes are built without a GPU; the [`RenderEngine`] uploads them when
//! the window opens:
//!
//! ```no_run
//! use isoview::gfx::scene::{RenderWindow, Viewport};
//!
//! let mut window = RenderWindow::new("demo", 640, 480);
//! window.add_viewport(Viewport::new().with_background([0.44, 0.5, 0.56]));
//! // let engine = RenderEngine::new(surface_target, 640, 480).await?;
//! // engine.init_resources(&mut window);
//! ```

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::render_engine::RenderEngine;
