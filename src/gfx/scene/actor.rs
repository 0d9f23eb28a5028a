use cgmath::{Matrix4, Vector3};
use log::debug;
use wgpu::Device;

use crate::data::Bounds;
use crate::gfx::resources::{ActorBindings, ActorGpuResources, ActorUBOContent};

use super::{mapper::Mapper, property::Property};

/// A mapped dataset placed in the scene
///
/// The position is a pure translation applied on the GPU; bounds include it.
pub struct Actor {
    mapper: Mapper,
    property: Property,
    position: [f64; 3],
    visible: bool,
    pub gpu_resources: Option<ActorGpuResources>, // None until init_gpu_resources called
}

impl Actor {
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper,
            property: Property::default(),
            position: [0.0; 3],
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut Mapper {
        &mut self.mapper
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn set_position(&mut self, position: [f64; 3]) {
        self.position = position;
    }

    /// Moves the actor by `offset`
    pub fn add_position(&mut self, offset: [f64; 3]) {
        for axis in 0..3 {
            self.position[axis] += offset[axis];
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_translucent(&self) -> bool {
        self.property.is_translucent()
    }

    /// Bounds of the mapped data shifted by the actor position
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = self.mapper.bounds()?;
        for axis in 0..3 {
            bounds[axis * 2] += self.position[axis];
            bounds[axis * 2 + 1] += self.position[axis];
        }
        Some(bounds)
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.position.map(|c| c as f32);
        Matrix4::from_translation(Vector3::new(x, y, z))
    }

    fn uniform_content(&self) -> ActorUBOContent {
        ActorUBOContent::new(self.model_matrix(), &self.property)
    }

    /// Uploads vertices, indices and the actor uniform
    pub fn init_gpu_resources(&mut self, device: &Device, bindings: &ActorBindings) {
        let vertices = self.mapper.build_vertices(&self.property);
        let triangles = self.mapper.triangle_indices();
        let lines = self.mapper.line_indices();
        debug!(
            "Uploading actor: {} vertices, {} triangles, {} lines",
            vertices.len(),
            triangles.len() / 3,
            lines.len() / 2
        );
        self.gpu_resources = Some(bindings.create_resources(
            device,
            &vertices,
            &triangles,
            &lines,
            &self.uniform_content(),
        ));
    }

    /// Syncs position and property changes to the GPU if resources exist
    pub fn update_uniform(&mut self, queue: &wgpu::Queue) {
        let content = self.uniform_content();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.ubo.update_content(queue, content);
        }
    }
}

/// Which cells of an actor a draw call covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Triangles,
    Lines,
}

pub trait DrawActor {
    /// Draws one kind of cell with the actor bound at `actor_group`
    fn draw_actor(&mut self, actor: &Actor, cells: CellKind, actor_group: u32);
}

impl DrawActor for wgpu::RenderPass<'_> {
    fn draw_actor(&mut self, actor: &Actor, cells: CellKind, actor_group: u32) {
        let Some(gpu_resources) = &actor.gpu_resources else {
            return; // Skip drawing if not uploaded
        };
        let indexed = match cells {
            CellKind::Triangles => &gpu_resources.triangles,
            CellKind::Lines => &gpu_resources.lines,
        };
        let Some(indexed) = indexed else {
            return;
        };

        self.set_bind_group(actor_group, &gpu_resources.bind_group, &[]);
        self.set_vertex_buffer(0, gpu_resources.vertex_buffer.slice(..));
        self.set_index_buffer(indexed.buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..indexed.count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PolyData;

    fn unit_segment() -> Actor {
        let mut data = PolyData::new();
        let a = data.push_point([0.0, 0.0, 0.0], [0.0; 3], None);
        let b = data.push_point([1.0, 1.0, 1.0], [0.0; 3], None);
        data.lines.push([a, b]);
        Actor::new(Mapper::new(data))
    }

    #[test]
    fn test_bounds_include_position() {
        let mut actor = unit_segment();
        actor.add_position([2.0, 0.0, 0.0]);
        actor.add_position([0.5, -1.0, 0.0]);
        assert_eq!(actor.position(), [2.5, -1.0, 0.0]);
        assert_eq!(actor.bounds(), Some([2.5, 3.5, -1.0, 0.0, 0.0, 1.0]));
        let model = actor.model_matrix();
        assert_eq!(model.w.x, 2.5);
        assert_eq!(model.w.y, -1.0);
    }

    #[test]
    fn test_translucency_follows_opacity() {
        let mut actor = unit_segment();
        assert!(!actor.is_translucent());
        actor.property_mut().opacity = 0.5;
        assert!(actor.is_translucent());
        assert!(actor.gpu_resources.is_none());
        assert!(Actor::new(Mapper::new(PolyData::new())).bounds().is_none());
    }
}
