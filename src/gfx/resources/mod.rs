// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles the depth texture, geometry buffers and bind groups for rendering.

pub mod actor_bindings;
pub mod texture_resource;
pub mod viewport_bindings;

// Re-export main types
pub use actor_bindings::{ActorBindings, ActorGpuResources, ActorUBOContent};
pub use texture_resource::TextureResource;
pub use viewport_bindings::{ViewportBindings, ViewportGpuResources, ViewportUBOContent};
