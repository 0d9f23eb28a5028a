//! Named render pipelines
//!
//! Pipelines are registered as configurations, then built together once
//! their shaders are loaded. Drawing code looks them up by name.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// How a pipeline uses the depth buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthMode {
    /// Test with `Less` and write
    #[default]
    Opaque,
    /// Test with `Less`, never write; for blended geometry drawn last
    ReadOnly,
    /// Test with `LessEqual` and write, so edges drawn over coincident
    /// faces stay visible
    Coplanar,
    /// Always pass and write; clears depth inside a viewport
    Overwrite,
}

impl DepthMode {
    fn state(self, format: TextureFormat) -> DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            DepthMode::Opaque => (true, CompareFunction::Less),
            DepthMode::ReadOnly => (false, CompareFunction::Less),
            DepthMode::Coplanar => (true, CompareFunction::LessEqual),
            DepthMode::Overwrite => (true, CompareFunction::Always),
        };
        DepthStencilState {
            format,
            depth_write_enabled,
            depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }
    }
}

/// Everything that varies between the pipelines of a [`PipelineManager`]
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub layouts: Vec<BindGroupLayout>,
    pub topology: PrimitiveTopology,
    pub depth_format: TextureFormat,
    pub depth: DepthMode,
    pub target_format: TextureFormat,
    pub blend: BlendState,
    /// Vertices come from [`Vertex3D`] buffers; off for full-viewport quads
    pub vertex_input: bool,
}

impl PipelineConfig {
    pub fn new(label: &str, shader: &str, target_format: TextureFormat) -> Self {
        Self {
            label: label.to_owned(),
            shader: shader.to_owned(),
            layouts: Vec::new(),
            topology: PrimitiveTopology::TriangleList,
            depth_format: TextureFormat::Depth32Float,
            depth: DepthMode::default(),
            target_format,
            blend: BlendState::REPLACE,
            vertex_input: true,
        }
    }

    /// Layouts bind to groups in the order given
    pub fn with_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn with_depth(mut self, format: TextureFormat, mode: DepthMode) -> Self {
        self.depth_format = format;
        self.depth = mode;
        self
    }

    pub fn with_blend(mut self, blend: BlendState) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn without_vertex_input(mut self) -> Self {
        self.vertex_input = false;
        self
    }
}

/// Shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    shaders: HashMap<String, ShaderModule>,
    configs: HashMap<String, PipelineConfig>,
    pipelines: HashMap<String, RenderPipeline>,
    pending: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            shaders: HashMap::new(),
            configs: HashMap::new(),
            pipelines: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(name.to_owned(), module);
    }

    /// Queues a pipeline; it is built by [`Self::build_pending`]
    pub fn register(&mut self, name: &str, config: PipelineConfig) {
        self.configs.insert(name.to_owned(), config);
        self.pending.push(name.to_owned());
    }

    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Builds every queued pipeline
    ///
    /// Pipelines that fail stay queued and are reported by name.
    pub fn build_pending(&mut self) -> Result<(), Vec<String>> {
        let mut failures = Vec::new();
        for name in std::mem::take(&mut self.pending) {
            let Some(config) = self.configs.get(&name) else {
                continue;
            };
            match self.build(config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name, pipeline);
                }
                Err(reason) => {
                    failures.push(format!("{name}: {reason}"));
                    self.pending.push(name);
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }

    fn build(&self, config: &PipelineConfig) -> Result<RenderPipeline, String> {
        let module = self
            .shaders
            .get(&config.shader)
            .ok_or_else(|| format!("no shader named {}", config.shader))?;

        let layouts: Vec<&BindGroupLayout> = config.layouts.iter().collect();
        let layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&config.label),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let vertex_layouts = [Vertex3D::desc()];
        let buffers: &[VertexBufferLayout] = if config.vertex_input {
            &vertex_layouts
        } else {
            &[]
        };
        let targets = [Some(ColorTargetState {
            format: config.target_format,
            blend: Some(config.blend),
            write_mask: ColorWrites::ALL,
        })];

        Ok(self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&layout),
                vertex: VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    targets: &targets,
                    compilation_options: Default::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.topology,
                    // Two-sided lighting happens in the shader
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(config.depth.state(config.depth_format)),
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            }))
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            built: self.pipelines.len(),
            pending: self.pending.len(),
            shaders: self.shaders.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub built: usize,
    pub pending: usize,
    pub shaders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translucent_config() {
        let config = PipelineConfig::new("TRANSLUCENT", "surface.wgsl", TextureFormat::Rgba8Unorm)
            .with_depth(TextureFormat::Depth32Float, DepthMode::ReadOnly)
            .with_blend(BlendState::ALPHA_BLENDING);
        assert_eq!(config.label, "TRANSLUCENT");
        assert_eq!(config.blend, BlendState::ALPHA_BLENDING);
        assert_eq!(config.target_format, TextureFormat::Rgba8Unorm);
        assert!(config.vertex_input);

        let depth = config.depth.state(config.depth_format);
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, CompareFunction::Less);
    }

    #[test]
    fn test_line_and_background_configs() {
        let lines = PipelineConfig::new("LINES", "surface.wgsl", TextureFormat::Bgra8Unorm)
            .with_depth(TextureFormat::Depth32Float, DepthMode::Coplanar)
            .with_topology(PrimitiveTopology::LineList);
        assert_eq!(lines.topology, PrimitiveTopology::LineList);
        let depth = lines.depth.state(lines.depth_format);
        assert!(depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, CompareFunction::LessEqual);

        let background =
            PipelineConfig::new("BACKGROUND", "background.wgsl", TextureFormat::Bgra8Unorm)
                .with_depth(TextureFormat::Depth32Float, DepthMode::Overwrite)
                .without_vertex_input();
        assert!(!background.vertex_input);
        assert_eq!(
            background.depth.state(background.depth_format).depth_compare,
            CompareFunction::Always
        );
    }
}
