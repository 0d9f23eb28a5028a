//! Per-viewport uniform bindings
//!
//! Every viewport owns one uniform buffer holding its camera matrices,
//! headlight direction and background color. It is bound to slot 0 in all
//! render pipelines.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Viewport uniform buffer content
///
/// MUST match the ViewportUniform struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportUBOContent {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    light_direction: [f32; 4],
    background: [f32; 4],
    /// x: two-sided lighting flag
    options: [f32; 4],
}
// Total: 64 + 16 + 16 + 16 + 16 = 128 bytes

impl ViewportUBOContent {
    pub fn new(camera: CameraUniform, background: [f32; 3], two_sided_lighting: bool) -> Self {
        let [r, g, b] = background;
        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            light_direction: camera.light_direction,
            background: [r, g, b, 1.0],
            options: [if two_sided_lighting { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Type alias for the viewport uniform buffer
pub type ViewportUBO = UniformBuffer<ViewportUBOContent>;

/// GPU state owned by one viewport
pub struct ViewportGpuResources {
    pub ubo: ViewportUBO,
    pub bind_group: wgpu::BindGroup,
}

/// Layout shared by all viewport bind groups
pub struct ViewportBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ViewportBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Viewport Bind Group Layout");

        ViewportBindings { bind_group_layout }
    }

    /// Allocates the uniform buffer and bind group for one viewport
    pub fn create_resources(
        &self,
        device: &wgpu::Device,
        content: &ViewportUBOContent,
    ) -> ViewportGpuResources {
        let ubo = ViewportUBO::new_with_data(device, content);
        let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Viewport Bind Group");
        ViewportGpuResources { ubo, bind_group }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_layout() {
        assert_eq!(std::mem::size_of::<ViewportUBOContent>(), 128);
        let content = ViewportUBOContent::new(CameraUniform::default(), [0.2, 0.3, 0.4], true);
        assert_eq!(content.background, [0.2, 0.3, 0.4, 1.0]);
        assert_eq!(content.options[0], 1.0);
    }
}
