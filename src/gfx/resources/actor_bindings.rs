//! Per-actor GPU buffers and uniform bindings

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    gfx::{camera::camera_utils::convert_matrix4_to_array, scene::Property, scene::Vertex3D},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Actor uniform buffer content
///
/// MUST match the ActorUniform struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ActorUBOContent {
    model: [[f32; 4]; 4],
    /// ambient, diffuse, specular, specular power
    material: [f32; 4],
    /// x: opacity
    extra: [f32; 4],
}

impl ActorUBOContent {
    pub fn new(model: Matrix4<f32>, property: &Property) -> Self {
        Self {
            model: convert_matrix4_to_array(model),
            material: [
                property.ambient,
                property.diffuse,
                property.specular,
                property.specular_power,
            ],
            extra: [property.opacity, 0.0, 0.0, 0.0],
        }
    }
}

pub type ActorUBO = UniformBuffer<ActorUBOContent>;

/// Index buffer and the number of indices it holds
pub struct IndexedBuffer {
    pub buffer: wgpu::Buffer,
    pub count: u32,
}

/// GPU state owned by one actor
pub struct ActorGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub triangles: Option<IndexedBuffer>,
    pub lines: Option<IndexedBuffer>,
    pub ubo: ActorUBO,
    pub bind_group: wgpu::BindGroup,
}

/// Layout shared by all actor bind groups
pub struct ActorBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ActorBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Actor Bind Group Layout");

        ActorBindings { bind_group_layout }
    }

    /// Uploads geometry and creates the uniform bind group for one actor
    pub fn create_resources(
        &self,
        device: &wgpu::Device,
        vertices: &[Vertex3D],
        triangle_indices: &[u32],
        line_indices: &[u32],
        content: &ActorUBOContent,
    ) -> ActorGpuResources {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Actor Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ubo = ActorUBO::new_with_data(device, content);
        let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Actor Bind Group");

        ActorGpuResources {
            vertex_buffer,
            triangles: index_buffer(device, triangle_indices, "Actor Triangle Index Buffer"),
            lines: index_buffer(device, line_indices, "Actor Line Index Buffer"),
            ubo,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

fn index_buffer(device: &wgpu::Device, indices: &[u32], label: &str) -> Option<IndexedBuffer> {
    if indices.is_empty() {
        return None;
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    Some(IndexedBuffer {
        buffer,
        count: indices.len() as u32,
    })
}
