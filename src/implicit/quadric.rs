use super::ImplicitFunction;

/// General quadric surface
///
/// `a0 x² + a1 y² + a2 z² + a3 xy + a4 yz + a5 xz + a6 x + a7 y + a8 z + a9`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric {
    pub coefficients: [f64; 10],
}

impl Quadric {
    pub fn new(coefficients: [f64; 10]) -> Self {
        Self { coefficients }
    }
}

impl Default for Quadric {
    /// The unit sphere offset by one, `x² + y² + z² - 1`
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0])
    }
}

impl ImplicitFunction for Quadric {
    fn evaluate(&self, [x, y, z]: [f64; 3]) -> f64 {
        let a = &self.coefficients;
        a[0] * x * x
            + a[1] * y * y
            + a[2] * z * z
            + a[3] * x * y
            + a[4] * y * z
            + a[5] * x * z
            + a[6] * x
            + a[7] * y
            + a[8] * z
            + a[9]
    }
}
