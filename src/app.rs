use log::{debug, error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::error::{Error, Result};
use crate::gfx::{
    camera::{CameraController, KeyAction},
    rendering::render_engine::RenderEngine,
    scene::RenderWindow,
};
use crate::ui::UiManager;

/// Interactive window showing a [`RenderWindow`]
///
/// Mouse and keyboard input goes to the camera of the viewport under the
/// cursor. Frames are drawn only when something changed.
pub struct VisualizationApp {
    app_state: AppState,
}

struct AppState {
    scene: RenderWindow,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    controller: CameraController,
    cursor: Option<PhysicalPosition<f64>>,
    // Viewport a drag started in; keeps the drag there when the cursor leaves it
    active_viewport: Option<usize>,
    error: Option<Error>,
}

impl VisualizationApp {
    pub fn new(scene: RenderWindow) -> Self {
        Self {
            app_state: AppState {
                scene,
                window: None,
                render_engine: None,
                ui_manager: None,
                controller: CameraController::default(),
                cursor: None,
                active_viewport: None,
                error: None,
            },
        }
    }

    pub fn scene(&self) -> &RenderWindow {
        &self.app_state.scene
    }

    pub fn scene_mut(&mut self) -> &mut RenderWindow {
        &mut self.app_state.scene
    }

    /// Opens the window and blocks until it is closed
    ///
    /// Errors raised while the loop runs end it and are returned here.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        info!(
            "Opening \"{}\" with {} viewports and {} actors",
            self.app_state.scene.title,
            self.app_state.scene.viewports.len(),
            self.app_state.scene.actor_count()
        );
        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| Error::Window(e.to_string()))?;

        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn surface_size(&self) -> (u32, u32) {
        self.render_engine
            .as_ref()
            .map_or(self.scene.size, RenderEngine::get_surface_size)
    }

    /// Viewport under the cursor, or the one a drag is still running in
    fn target_viewport(&self) -> Option<usize> {
        if self.controller.is_rotating() || self.controller.is_panning() {
            if let Some(index) = self.active_viewport {
                return Some(index);
            }
        }
        let cursor = self.cursor?;
        let (width, height) = self.surface_size();
        self.scene.viewport_at(cursor.x, cursor.y, width, height)
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) =
            (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };
        render_engine.update(&mut self.scene);

        let (width, height) = render_engine.get_surface_size();
        let captions: Vec<_> = self
            .scene
            .viewports
            .iter()
            .filter_map(|viewport| {
                viewport
                    .caption()
                    .map(|caption| (viewport.pixel_rect(width, height), caption.clone()))
            })
            .collect();

        let ui_manager = self.ui_manager.as_mut().filter(|_| !captions.is_empty());
        let window_clone = window.clone();
        let draw_ui = |device: &wgpu::Device,
                       queue: &wgpu::Queue,
                       encoder: &mut wgpu::CommandEncoder,
                       color_attachment: &wgpu::TextureView| {
            if let Some(ui_manager) = ui_manager {
                ui_manager.draw_captions(
                    device,
                    queue,
                    encoder,
                    &window_clone,
                    color_attachment,
                    &captions,
                );
            }
        };
        let result = render_engine.render_frame(&self.scene, Some(draw_ui));
        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.scene.size;
        let attributes = WindowAttributes::default()
            .with_title(self.scene.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));
        let window_handle = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, Error::Window(e.to_string())),
        };
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let window_clone = window_handle.clone();
        let renderer = match pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height).await
        }) {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, e),
        };

        renderer.init_resources(&mut self.scene);

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );
        ui_manager.update_display_size(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        window_handle.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(ui_manager), Some(window)) =
            (self.ui_manager.as_mut(), self.window.as_ref())
        {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            ui_manager.handle_input(window, &ui_event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
                self.request_redraw();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.controller.set_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
                let Some(index) = self.target_viewport() else {
                    return;
                };
                let (width, height) = self.surface_size();
                let viewport = &mut self.scene.viewports[index];
                let size = viewport.pixel_rect(width, height).size();
                if self
                    .controller
                    .process_cursor_moved(position, &mut viewport.camera, size)
                {
                    viewport.reset_camera_clipping_range();
                    self.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Pressed {
                    self.active_viewport = self.target_viewport();
                }
                self.controller.process_mouse_button(button, state);
                if state == ElementState::Released {
                    self.active_viewport = None;
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let Some(index) = self.target_viewport() else {
                    return;
                };
                let viewport = &mut self.scene.viewports[index];
                if self.controller.process_scroll(&delta, &mut viewport.camera) {
                    viewport.reset_camera_clipping_range();
                    self.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                match self.controller.process_keyboard(&event) {
                    KeyAction::Exit => event_loop.exit(),
                    KeyAction::ResetCamera => {
                        if let Some(index) = self.target_viewport() {
                            debug!("Resetting camera of viewport {index}");
                            self.scene.viewports[index].reset_camera();
                            self.request_redraw();
                        }
                    }
                    KeyAction::None => {}
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }
}
