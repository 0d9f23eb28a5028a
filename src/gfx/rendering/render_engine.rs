//! WGPU-based rendering engine
//!
//! Owns the surface, device and pipelines, uploads scene resources on demand
//! and draws every viewport of a [`RenderWindow`] into a single render pass.

use std::sync::Arc;
use log::{debug, info, warn};
use wgpu::{Device, TextureFormat};

use crate::error::{Error, Result};
use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        texture_resource::TextureResource, ActorBindings, ViewportBindings, ViewportUBOContent,
    },
    scene::{CellKind, DrawActor, RenderWindow, Viewport},
};

use super::pipeline_manager::{DepthMode, PipelineConfig, PipelineManager};

const BACKGROUND_PIPELINE: &str = "Background";
const SURFACE_PIPELINE: &str = "Surface";
const TRANSLUCENT_PIPELINE: &str = "Translucent";
const LINES_PIPELINE: &str = "Lines";

/// Bind group slots shared by every pipeline
const VIEWPORT_GROUP: u32 = 0;
const ACTOR_GROUP: u32 = 1;

/// Core rendering engine managing GPU resources and draw calls
///
/// Each viewport gets its own camera uniform and is drawn through a
/// viewport/scissor rectangle: first its background, then opaque surfaces,
/// then lines, then translucent surfaces without depth writes.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    viewport_bindings: ViewportBindings,
    actor_bindings: ActorBindings,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Gpu(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Gpu(format!("failed to request adapter: {e}")))?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| Error::Gpu(format!("failed to request a device: {e}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| Error::Gpu("surface reports no formats".to_owned()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let viewport_bindings = ViewportBindings::new(&device);
        let actor_bindings = ActorBindings::new(&device);

        let device: Arc<Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("surface.wgsl", include_str!("surface.wgsl"));
        pipeline_manager.load_shader("background.wgsl", include_str!("background.wgsl"));

        let viewport_layout = viewport_bindings.bind_group_layout().clone();
        let actor_layout = actor_bindings.bind_group_layout().clone();
        let scene_pipeline = |label: &str, depth: DepthMode| {
            PipelineConfig::new(label, "surface.wgsl", format)
                .with_layouts(vec![viewport_layout.clone(), actor_layout.clone()])
                .with_depth(TextureResource::DEPTH_FORMAT, depth)
        };

        pipeline_manager.register(
            BACKGROUND_PIPELINE,
            PipelineConfig::new("BACKGROUND", "background.wgsl", format)
                .with_layouts(vec![viewport_layout.clone()])
                .with_depth(TextureResource::DEPTH_FORMAT, DepthMode::Overwrite)
                .without_vertex_input(),
        );
        pipeline_manager.register(SURFACE_PIPELINE, scene_pipeline("SURFACE", DepthMode::Opaque));
        pipeline_manager.register(
            LINES_PIPELINE,
            scene_pipeline("LINES", DepthMode::Coplanar)
                .with_topology(wgpu::PrimitiveTopology::LineList),
        );
        pipeline_manager.register(
            TRANSLUCENT_PIPELINE,
            scene_pipeline("TRANSLUCENT", DepthMode::ReadOnly)
                .with_blend(wgpu::BlendState::ALPHA_BLENDING),
        );

        pipeline_manager
            .build_pending()
            .map_err(|failures| Error::Gpu(failures.join("; ")))?;
        debug!("Pipelines ready: {:?}", pipeline_manager.stats());

        Ok(RenderEngine {
            device,
            config,
            format,
            surface,
            queue,
            depth_texture,
            pipeline_manager,
            viewport_bindings,
            actor_bindings,
        })
    }

    /// Uploads every viewport and actor that has no GPU resources yet
    pub fn init_resources(&self, window: &mut RenderWindow) {
        let (width, height) = self.get_surface_size();
        for viewport in &mut window.viewports {
            if viewport.gpu_resources.is_none() {
                let content = viewport_content(viewport, width, height);
                viewport.gpu_resources =
                    Some(self.viewport_bindings.create_resources(&self.device, &content));
            }
            for actor in &mut viewport.actors {
                if actor.gpu_resources.is_none() {
                    actor.init_gpu_resources(&self.device, &self.actor_bindings);
                }
            }
        }
    }

    /// Writes current camera and actor state into the uniform buffers
    pub fn update(&mut self, window: &mut RenderWindow) {
        let (width, height) = self.get_surface_size();
        for viewport in &mut window.viewports {
            let content = viewport_content(viewport, width, height);
            if let Some(gpu_resources) = &mut viewport.gpu_resources {
                gpu_resources.ubo.update_content(&self.queue, content);
            }
            for actor in &mut viewport.actors {
                actor.update_uniform(&self.queue);
            }
        }
    }

    /// Draws all viewports, then lets `ui_callback` record overlay passes
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<F>(&mut self, window: &RenderWindow, ui_callback: Option<F>) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next surface texture");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("failed to acquire surface texture: {e}"))),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for viewport in &window.viewports {
                self.draw_viewport(&mut render_pass, viewport);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn draw_viewport(&self, render_pass: &mut wgpu::RenderPass<'_>, viewport: &Viewport) {
        let (width, height) = self.get_surface_size();
        let rect = viewport.pixel_rect(width, height);
        let Some(gpu_resources) = &viewport.gpu_resources else {
            return;
        };
        if rect.width == 0 || rect.height == 0 {
            return;
        }

        render_pass.set_viewport(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
            0.0,
            1.0,
        );
        render_pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
        render_pass.set_bind_group(VIEWPORT_GROUP, &gpu_resources.bind_group, &[]);

        if let Some(pipeline) = self.pipeline_manager.pipeline(BACKGROUND_PIPELINE) {
            render_pass.set_pipeline(pipeline);
            render_pass.draw(0..3, 0..1);
        }

        let visible = || viewport.actors.iter().filter(|actor| actor.is_visible());

        if let Some(pipeline) = self.pipeline_manager.pipeline(SURFACE_PIPELINE) {
            render_pass.set_pipeline(pipeline);
            for actor in visible().filter(|actor| !actor.is_translucent()) {
                render_pass.draw_actor(actor, CellKind::Triangles, ACTOR_GROUP);
            }
        }

        if let Some(pipeline) = self.pipeline_manager.pipeline(LINES_PIPELINE) {
            render_pass.set_pipeline(pipeline);
            for actor in visible() {
                render_pass.draw_actor(actor, CellKind::Lines, ACTOR_GROUP);
            }
        }

        if let Some(pipeline) = self.pipeline_manager.pipeline(TRANSLUCENT_PIPELINE) {
            render_pass.set_pipeline(pipeline);
            for actor in visible().filter(|actor| actor.is_translucent()) {
                render_pass.draw_actor(actor, CellKind::Triangles, ACTOR_GROUP);
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Uniform content for `viewport` drawn into a `width` × `height` surface
fn viewport_content(viewport: &Viewport, width: u32, height: u32) -> ViewportUBOContent {
    let aspect = viewport.pixel_rect(width, height).aspect();
    ViewportUBOContent::new(
        CameraUniform::from_camera(&viewport.camera, aspect),
        viewport.background(),
        viewport.two_sided_lighting(),
    )
}
