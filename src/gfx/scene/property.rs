//! Surface appearance of an actor

/// Lighting coefficients and color of an actor
///
/// `color` is used for every point when the mapper does not color by
/// scalars. Coefficients combine as
/// `color * (ambient + diffuse * n·l) + specular * (r·v)^specular_power`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    pub color: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub specular_power: f32,
    pub opacity: f32,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
            opacity: 1.0,
        }
    }
}

impl Property {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_specular(mut self, specular: f32, specular_power: f32) -> Self {
        self.specular = specular;
        self.specular_power = specular_power;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}
