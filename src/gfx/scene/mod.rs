//! # Scene Module
//!
//! Describes what is drawn: viewports with cameras and backgrounds, and the
//! actors inside them. Nothing here touches the GPU until the render engine
//! asks an actor or viewport to upload itself.
//!
//! ## Key Components
//!
//! - [`RenderWindow`] - Window title, size and viewports
//! - [`Viewport`] - Normalized rectangle with camera, background and actors
//! - [`Actor`] - Mapped geometry with a [`Property`] and position offset
//! - [`Mapper`] - Poly data plus scalar coloring rules
//! - [`Vertex3D`] - GPU vertex with position, normal and color
//!
//! ## Usage
//!
//! ```no_run
//! use isoview::data::PolyData;
//! use isoview::gfx::scene::{Actor, Mapper, RenderWindow, Viewport};
//!
//! let mut viewport = Viewport::new().with_background([0.2, 0.3, 0.4]);
//! viewport.add_actor(Actor::new(Mapper::new(PolyData::new())));
//! viewport.reset_camera();
//!
//! let mut window = RenderWindow::new("demo", 640, 480);
//! window.add_viewport(viewport);
//! ```

pub mod actor;
pub mod mapper;
pub mod property;
pub mod render_window;
pub mod vertex;
pub mod viewport;

// Re-export main types
pub use actor::{Actor, CellKind, DrawActor};
pub use mapper::Mapper;
pub use property::Property;
pub use render_window::RenderWindow;
pub use vertex::Vertex3D;
pub use viewport::{Caption, PixelRect, Viewport};
