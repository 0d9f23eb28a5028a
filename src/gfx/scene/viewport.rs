use log::info;

use crate::data::Bounds;
use crate::gfx::camera::Camera;
use crate::gfx::resources::ViewportGpuResources;

use super::actor::Actor;

/// Text drawn in the top-left corner of a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub color: [f32; 3],
}

/// Pixel rectangle with the origin at the top-left of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// A region of the window with its own camera, background and actors
///
/// `rect` is `[xmin, ymin, xmax, ymax]` in normalized window coordinates
/// with the origin at the bottom-left.
pub struct Viewport {
    rect: [f64; 4],
    background: [f32; 3],
    two_sided_lighting: bool,
    caption: Option<Caption>,
    pub camera: Camera,
    pub actors: Vec<Actor>,
    pub gpu_resources: Option<ViewportGpuResources>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            rect: [0.0, 0.0, 1.0, 1.0],
            background: [0.0; 3],
            two_sided_lighting: false,
            caption: None,
            camera: Camera::default(),
            actors: Vec::new(),
            gpu_resources: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport covering `[xmin, ymin]..[xmax, ymax]`, clamped to the window
    pub fn with_rect(mut self, [xmin, ymin, xmax, ymax]: [f64; 4]) -> Self {
        let xmin = xmin.clamp(0.0, 1.0);
        let ymin = ymin.clamp(0.0, 1.0);
        self.rect = [xmin, ymin, xmax.clamp(xmin, 1.0), ymax.clamp(ymin, 1.0)];
        self
    }

    pub fn with_background(mut self, background: [f32; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_two_sided_lighting(mut self, enabled: bool) -> Self {
        self.two_sided_lighting = enabled;
        self
    }

    pub fn with_caption(mut self, text: impl Into<String>, color: [f32; 3]) -> Self {
        self.caption = Some(Caption {
            text: text.into(),
            color,
        });
        self
    }

    pub fn rect(&self) -> [f64; 4] {
        self.rect
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    pub fn two_sided_lighting(&self) -> bool {
        self.two_sided_lighting
    }

    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Union of the bounds of all visible actors
    pub fn visible_bounds(&self) -> Option<Bounds> {
        self.actors
            .iter()
            .filter(|actor| actor.is_visible())
            .filter_map(Actor::bounds)
            .reduce(|mut acc, b| {
                for axis in 0..3 {
                    acc[axis * 2] = acc[axis * 2].min(b[axis * 2]);
                    acc[axis * 2 + 1] = acc[axis * 2 + 1].max(b[axis * 2 + 1]);
                }
                acc
            })
    }

    /// Fits the camera to the visible actors; no-op for an empty viewport
    pub fn reset_camera(&mut self) {
        match self.visible_bounds() {
            Some(bounds) => {
                self.camera.reset(&bounds);
                info!("Camera reset to bounds {bounds:?}");
            }
            None => info!("No visible actors, camera left unchanged"),
        }
    }

    pub fn reset_camera_clipping_range(&mut self) {
        if let Some(bounds) = self.visible_bounds() {
            self.camera.reset_clipping_range(&bounds);
        }
    }

    /// Pixel rectangle inside a `width` × `height` window
    pub fn pixel_rect(&self, width: u32, height: u32) -> PixelRect {
        let [xmin, ymin, xmax, ymax] = self.rect;
        let (w, h) = (width as f64, height as f64);
        let x = (xmin * w).round() as u32;
        let y = ((1.0 - ymax) * h).round() as u32;
        let right = ((xmax * w).round() as u32).min(width);
        let bottom = (((1.0 - ymin) * h).round() as u32).min(height);
        PixelRect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    /// Whether the pixel `(px, py)` (origin top-left) lies inside the viewport
    pub fn contains(&self, px: f64, py: f64, width: u32, height: u32) -> bool {
        let rect = self.pixel_rect(width, height);
        px >= rect.x as f64
            && px < (rect.x + rect.width) as f64
            && py >= rect.y as f64
            && py < (rect.y + rect.height) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PolyData;
    use crate::gfx::scene::Mapper;

    fn point_actor(p: [f32; 3]) -> Actor {
        let mut data = PolyData::new();
        data.push_point(p, [0.0; 3], None);
        Actor::new(Mapper::new(data))
    }

    #[test]
    fn test_pixel_rect_flips_y() {
        let viewport = Viewport::new().with_rect([0.5, 0.5, 1.0, 1.0]);
        assert_eq!(
            viewport.pixel_rect(1700, 900),
            PixelRect {
                x: 850,
                y: 0,
                width: 850,
                height: 450
            }
        );
        let lower_left = Viewport::new().with_rect([0.0, 0.0, 0.5, 0.5]);
        assert_eq!(lower_left.pixel_rect(1700, 900).y, 450);
        assert!(lower_left.contains(10.0, 890.0, 1700, 900));
        assert!(!lower_left.contains(10.0, 10.0, 1700, 900));
    }

    #[test]
    fn test_visible_bounds_skip_hidden_actors() {
        let mut viewport = Viewport::new();
        assert_eq!(viewport.visible_bounds(), None);
        viewport.add_actor(point_actor([0.0, 0.0, 0.0]));
        viewport.add_actor(point_actor([1.0, 2.0, 3.0]));
        let mut hidden = point_actor([10.0, 10.0, 10.0]);
        hidden.set_visible(false);
        viewport.add_actor(hidden);
        assert_eq!(viewport.visible_bounds(), Some([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]));
    }

    #[test]
    fn test_reset_camera_centers_on_actors() {
        let mut viewport = Viewport::new();
        let before = viewport.camera;
        viewport.reset_camera();
        assert_eq!(viewport.camera, before);

        viewport.add_actor(point_actor([2.0, 2.0, 2.0]));
        viewport.add_actor(point_actor([4.0, 4.0, 4.0]));
        viewport.reset_camera();
        let focal = viewport.camera.focal_point();
        assert_eq!([focal.x, focal.y, focal.z], [3.0, 3.0, 3.0]);
    }
}
