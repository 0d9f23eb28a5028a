//! Implicit functions and grid sampling

pub mod quadric;
pub mod sample;

pub use quadric::Quadric;
pub use sample::SampleFunction;

/// A scalar field defined in closed form
pub trait ImplicitFunction: Sync {
    fn evaluate(&self, point: [f64; 3]) -> f64;
}

impl<F> ImplicitFunction for F
where
    F: Fn([f64; 3]) -> f64 + Sync,
{
    fn evaluate(&self, point: [f64; 3]) -> f64 {
        self(point)
    }
}
