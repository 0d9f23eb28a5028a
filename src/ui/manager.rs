// src/ui/manager.rs
//! ImGui UI manager
//!
//! Handles ImGui integration with wgpu and winit and draws viewport captions
//! as transparent, input-less windows laid over the 3D scene.

use imgui::{Condition, Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

use crate::gfx::scene::{Caption, PixelRect};

/// Inset of caption text from the viewport corner, in pixels
const CAPTION_MARGIN: f32 = 8.0;

/// ImGui UI manager
///
/// Manages ImGui context, platform integration, and rendering pipeline.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Uses locked DPI mode so caption positions are plain physical pixels,
    /// matching the viewport rectangles.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Updates ImGui's display size to match render target
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards window events ImGui cares about
    ///
    /// Captions never take input, so this only keeps ImGui's view of the
    /// window current and always returns false.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        if let Event::WindowEvent {
            event:
                WindowEvent::CursorMoved { .. }
                | WindowEvent::Focused(_)
                | WindowEvent::Resized(_)
                | WindowEvent::ScaleFactorChanged { .. },
            ..
        } = event
        {
            self.platform
                .handle_event(self.context.io_mut(), window, event);
        }
        false
    }

    /// Starts a new ImGui frame and builds it with `run_ui`
    ///
    /// Returns false if the platform could not prepare the frame.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("Failed to prepare UI frame: {e}");
            return false;
        }

        let ui = self.context.frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
        true
    }

    /// Renders the UI built in the last `update_logic()` call
    ///
    /// Uses LoadOp::Load to preserve the existing 3D scene content.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load, // Preserve 3D scene
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            warn!("Failed to render UI: {e}");
        }
    }

    /// Draws each caption in the top-left corner of its viewport rectangle
    pub fn draw_captions(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        captions: &[(PixelRect, Caption)],
    ) {
        let prepared = self.update_logic(window, |ui| {
            for (index, (rect, caption)) in captions.iter().enumerate() {
                let [r, g, b] = caption.color;
                ui.window(format!("##caption{index}"))
                    .position(
                        [rect.x as f32 + CAPTION_MARGIN, rect.y as f32 + CAPTION_MARGIN],
                        Condition::Always,
                    )
                    .size(
                        [
                            (rect.width as f32 - 2.0 * CAPTION_MARGIN).max(1.0),
                            (rect.height as f32 - 2.0 * CAPTION_MARGIN).max(1.0),
                        ],
                        Condition::Always,
                    )
                    .no_decoration()
                    .no_inputs()
                    .movable(false)
                    .bg_alpha(0.0)
                    .build(|| {
                        ui.text_colored([r, g, b, 1.0], &caption.text);
                    });
            }
        });
        if prepared {
            self.render_display_only(device, queue, encoder, color_attachment);
        }
    }
}
