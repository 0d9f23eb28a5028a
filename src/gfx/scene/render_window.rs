use super::viewport::Viewport;

/// Window configuration plus the viewports drawn into it
pub struct RenderWindow {
    pub title: String,
    pub size: (u32, u32),
    pub viewports: Vec<Viewport>,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self {
            title: "isoview".to_owned(),
            size: (640, 480),
            viewports: Vec::new(),
        }
    }
}

impl RenderWindow {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            size: (width, height),
            viewports: Vec::new(),
        }
    }

    pub fn add_viewport(&mut self, viewport: Viewport) {
        self.viewports.push(viewport);
    }

    /// Index of the viewport under the pixel `(px, py)`
    ///
    /// Later viewports are drawn on top, so they win where rectangles overlap.
    pub fn viewport_at(&self, px: f64, py: f64, width: u32, height: u32) -> Option<usize> {
        self.viewports
            .iter()
            .rposition(|viewport| viewport.contains(px, py, width, height))
    }

    pub fn actor_count(&self) -> usize {
        self.viewports.iter().map(|v| v.actors.len()).sum()
    }
}
