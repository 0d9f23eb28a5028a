use cgmath::InnerSpace;
use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey},
};

use super::camera::Camera;

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ResetCamera,
    Exit,
    None,
}

/// Trackball-style mouse interaction for one camera at a time
///
/// Left drag rotates around the focal point, shift + left drag pans, the
/// wheel dollies. Deltas are in physical pixels of the viewport the drag
/// started in.
pub struct CameraController {
    pub motion_factor: f64,
    pub wheel_factor: f64,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(10.0, 1.0)
    }
}

impl CameraController {
    pub fn new(motion_factor: f64, wheel_factor: f64) -> Self {
        Self {
            motion_factor,
            wheel_factor,
            is_shift_held: false,
            is_mouse_pressed: false,
            last_cursor: None,
        }
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        if self.is_shift_held != modifiers.shift_key() {
            debug!("Shift state changed: {}", modifiers.shift_key());
        }
        self.is_shift_held = modifiers.shift_key();
    }

    /// Tracks the left button; returns true if the event was consumed
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        self.is_mouse_pressed = state == ElementState::Pressed;
        true
    }

    /// Applies a drag to `camera`; returns true if the camera moved
    ///
    /// `viewport_size` is the pixel size of the viewport owning the camera.
    pub fn process_cursor_moved(
        &mut self,
        position: PhysicalPosition<f64>,
        camera: &mut Camera,
        viewport_size: (f64, f64),
    ) -> bool {
        let last = self.last_cursor.replace(position);
        let Some(last) = last else {
            return false;
        };
        if !self.is_mouse_pressed {
            return false;
        }

        let dx = position.x - last.x;
        let dy = position.y - last.y;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        if self.is_shift_held {
            self.pan(camera, dx, dy, viewport_size.1);
        } else {
            self.rotate(camera, dx, dy, viewport_size);
        }
        true
    }

    /// Dollies `camera` by the wheel delta; returns true if the camera moved
    pub fn process_scroll(&mut self, delta: &MouseScrollDelta, camera: &mut Camera) -> bool {
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, lines) => *lines as f64,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y / 40.0,
        };
        if steps == 0.0 {
            return false;
        }
        self.zoom(camera, steps);
        true
    }

    /// Maps a key press to an action; releases and repeats map to nothing
    pub fn process_keyboard(&mut self, event: &KeyEvent) -> KeyAction {
        if event.state != ElementState::Pressed || event.repeat {
            return KeyAction::None;
        }
        match (&event.physical_key, &event.logical_key) {
            (PhysicalKey::Code(KeyCode::Escape), _) | (_, Key::Named(NamedKey::Escape)) => {
                KeyAction::Exit
            }
            (PhysicalKey::Code(KeyCode::KeyQ | KeyCode::KeyE), _) => KeyAction::Exit,
            (PhysicalKey::Code(KeyCode::KeyR), _) => KeyAction::ResetCamera,
            _ => KeyAction::None,
        }
    }

    /// Orbits the focal point; a full-height drag is `20 * motion_factor` degrees
    pub fn rotate(&self, camera: &mut Camera, dx: f64, dy: f64, (width, height): (f64, f64)) {
        let delta_azimuth = -20.0 / width.max(1.0);
        let delta_elevation = -20.0 / height.max(1.0);
        // Screen y grows downward
        camera.azimuth(dx * delta_azimuth * self.motion_factor);
        camera.elevation(-dy * delta_elevation * self.motion_factor);
        camera.orthogonalize_view_up();
    }

    /// Moves the scene with the cursor at the depth of the focal point
    pub fn pan(&self, camera: &mut Camera, dx: f64, dy: f64, height: f64) {
        let world_per_pixel =
            2.0 * camera.distance() * (camera.view_angle().to_radians() / 2.0).tan()
                / height.max(1.0);
        let right = camera
            .direction_of_projection()
            .cross(camera.view_up())
            .normalize();
        let up = right.cross(camera.direction_of_projection()).normalize();
        camera.pan((right * -dx + up * dy) * world_per_pixel);
    }

    /// Dollies by `1.1^(0.2 * motion_factor * wheel_factor * steps)`
    pub fn zoom(&self, camera: &mut Camera, steps: f64) {
        let factor = 1.1f64.powf(0.2 * self.motion_factor * self.wheel_factor * steps);
        camera.dolly(factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_drag_without_button_does_nothing() {
        let mut controller = CameraController::default();
        let mut camera = Camera::new();
        let before = camera;
        assert!(!controller.process_cursor_moved(PhysicalPosition::new(10.0, 10.0), &mut camera, (100.0, 100.0)));
        assert!(!controller.process_cursor_moved(PhysicalPosition::new(50.0, 10.0), &mut camera, (100.0, 100.0)));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_left_drag_rotates_around_focal_point() {
        let mut controller = CameraController::default();
        let mut camera = Camera::new();
        controller.process_cursor_moved(PhysicalPosition::new(0.0, 0.0), &mut camera, (200.0, 200.0));
        assert!(controller.process_mouse_button(MouseButton::Left, ElementState::Pressed));
        assert!(controller.is_rotating());
        assert!(controller.process_cursor_moved(PhysicalPosition::new(10.0, 0.0), &mut camera, (200.0, 200.0)));

        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-12);
        // 10 px of a 200 px viewport is 10 degrees of azimuth
        let p = camera.position();
        assert_relative_eq!(p.x.atan2(p.z).to_degrees(), -10.0, epsilon = 1e-9);
        assert!(camera.view_up().dot(camera.direction_of_projection()).abs() < 1e-12);
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut controller = CameraController::default();
        let mut camera = Camera::new();
        controller.set_modifiers(ModifiersState::SHIFT);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_panning());
        controller.process_cursor_moved(PhysicalPosition::new(0.0, 0.0), &mut camera, (100.0, 100.0));
        controller.process_cursor_moved(PhysicalPosition::new(10.0, 0.0), &mut camera, (100.0, 100.0));

        let focal = camera.focal_point();
        assert!(focal.x < 0.0, "{focal:?}");
        assert_relative_eq!(focal.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(camera.distance(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_release_stops_interaction() {
        let mut controller = CameraController::default();
        let mut camera = Camera::new();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!controller.process_mouse_button(MouseButton::Right, ElementState::Pressed));
        controller.process_cursor_moved(PhysicalPosition::new(0.0, 0.0), &mut camera, (100.0, 100.0));
        assert!(!controller.process_cursor_moved(PhysicalPosition::new(5.0, 5.0), &mut camera, (100.0, 100.0)));
    }

    #[test]
    fn test_wheel_dollies() {
        let mut controller = CameraController::default();
        let mut camera = Camera::new();
        camera.set_position([0.0, 0.0, 10.0]);
        assert!(controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0), &mut camera));
        assert_relative_eq!(camera.distance(), 10.0 / 1.21, epsilon = 1e-9);
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, -1.0), &mut camera);
        assert_relative_eq!(camera.distance(), 10.0, epsilon = 1e-9);
        assert!(!controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 0.0), &mut camera));
    }
}
