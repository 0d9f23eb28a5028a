use cgmath::*;
use log::warn;

use crate::data::Bounds;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Breathing room added on both sides of the fitted clipping range
const CLIPPING_RANGE_EXPANSION: f64 = 0.5;
/// Smallest near/far ratio, matched to a 32-bit depth buffer
const NEAR_CLIPPING_PLANE_TOLERANCE: f64 = 0.001;

/// Perspective camera looking from `position` at `focal_point`
///
/// Angles are in degrees. Rotations orbit the focal point, so the distance
/// between the two points only changes through [`Camera::dolly`] and
/// [`Camera::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Point3<f64>,
    focal_point: Point3<f64>,
    view_up: Vector3<f64>,
    view_angle: f64,
    clipping_range: [f64; 2],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 1.0),
            focal_point: Point3::origin(),
            view_up: Vector3::unit_y(),
            view_angle: 30.0,
            clipping_range: [0.01, 1000.01],
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn focal_point(&self) -> Point3<f64> {
        self.focal_point
    }

    pub fn view_up(&self) -> Vector3<f64> {
        self.view_up
    }

    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    pub fn clipping_range(&self) -> [f64; 2] {
        self.clipping_range
    }

    pub fn distance(&self) -> f64 {
        self.position.distance(self.focal_point)
    }

    pub fn set_position(&mut self, position: [f64; 3]) {
        self.position = Point3::from(position);
    }

    pub fn set_focal_point(&mut self, focal_point: [f64; 3]) {
        self.focal_point = Point3::from(focal_point);
    }

    /// Sets the view-up direction; a zero vector is ignored
    pub fn set_view_up(&mut self, view_up: [f64; 3]) {
        let up = Vector3::from(view_up);
        if up.magnitude2() > 0.0 {
            self.view_up = up.normalize();
        }
    }

    pub fn set_view_angle(&mut self, degrees: f64) {
        self.view_angle = degrees.clamp(0.00000001, 179.0);
    }

    pub fn set_clipping_range(&mut self, near: f64, far: f64) {
        let near = near.max(f64::EPSILON);
        self.clipping_range = [near, far.max(near + f64::EPSILON)];
    }

    /// Unit vector from the camera toward the focal point
    pub fn direction_of_projection(&self) -> Vector3<f64> {
        let direction = self.focal_point - self.position;
        if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    /// Normal of the view plane, pointing back toward the camera
    pub fn compute_view_plane_normal(&self) -> Vector3<f64> {
        -self.direction_of_projection()
    }

    /// Right-hand screen axis in world space
    fn right(&self) -> Vector3<f64> {
        let right = self.direction_of_projection().cross(self.view_up);
        if right.magnitude2() > 0.0 {
            right.normalize()
        } else {
            Vector3::unit_x()
        }
    }

    /// Rotates the position about the view-up vector centered at the focal point
    pub fn azimuth(&mut self, degrees: f64) {
        let rotation = Matrix3::from_axis_angle(self.view_up, Deg(degrees));
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Rotates the position about the screen's horizontal axis centered at the
    /// focal point
    ///
    /// The view-up vector is left untouched; call
    /// [`Camera::orthogonalize_view_up`] afterwards when it must stay
    /// perpendicular to the view direction.
    pub fn elevation(&mut self, degrees: f64) {
        let axis = -self.right();
        let rotation = Matrix3::from_axis_angle(axis, Deg(degrees));
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Moves the camera toward the focal point, dividing the distance by `factor`
    pub fn dolly(&mut self, factor: f64) {
        if factor <= 0.0 {
            return;
        }
        let distance = self.distance() / factor;
        self.position = self.focal_point - self.direction_of_projection() * distance;
    }

    /// Makes view-up perpendicular to the direction of projection
    pub fn orthogonalize_view_up(&mut self) {
        self.view_up = self
            .right()
            .cross(self.direction_of_projection())
            .normalize();
    }

    /// Translates position and focal point together
    pub fn pan(&mut self, offset: Vector3<f64>) {
        self.position += offset;
        self.focal_point += offset;
    }

    /// Centers the camera on `bounds` at a distance where their bounding sphere
    /// fills the view angle, keeping the current view direction
    pub fn reset(&mut self, bounds: &Bounds) {
        let center = Point3::new(
            (bounds[0] + bounds[1]) / 2.0,
            (bounds[2] + bounds[3]) / 2.0,
            (bounds[4] + bounds[5]) / 2.0,
        );
        let diagonal2 = (bounds[1] - bounds[0]).powi(2)
            + (bounds[3] - bounds[2]).powi(2)
            + (bounds[5] - bounds[4]).powi(2);
        let radius = if diagonal2 == 0.0 {
            0.5
        } else {
            diagonal2.sqrt() * 0.5
        };
        let distance = radius / (self.view_angle.to_radians() * 0.5).sin();

        let normal = self.compute_view_plane_normal();
        if self.view_up.dot(normal).abs() > 0.999 {
            warn!("Resetting view-up since view plane normal is parallel");
            let up = self.view_up;
            self.view_up = Vector3::new(-up.z, up.x, up.y);
        }

        self.focal_point = center;
        self.position = center + normal * distance;
        self.reset_clipping_range(bounds);
    }

    /// Fits the near and far planes around the eight corners of `bounds`
    pub fn reset_clipping_range(&mut self, bounds: &Bounds) {
        let direction = self.direction_of_projection();
        let d = -direction.dot(self.position.to_vec());

        let mut range = [f64::MAX, 1e-18];
        for i in 0..2 {
            for j in 2..4 {
                for k in 4..6 {
                    let corner = Vector3::new(bounds[i], bounds[j], bounds[k]);
                    let dist = direction.dot(corner) + d;
                    range[0] = range[0].min(dist);
                    range[1] = range[1].max(dist);
                }
            }
        }

        // Geometry behind the camera does not count
        range[0] = range[0].max(0.0);

        let depth = range[1] - range[0];
        range[0] = 0.99 * range[0] - depth * CLIPPING_RANGE_EXPANSION;
        range[1] = 1.01 * range[1] + depth * CLIPPING_RANGE_EXPANSION;

        if range[0] >= range[1] {
            range[0] = 0.01 * range[1];
        }
        if range[0] < NEAR_CLIPPING_PLANE_TOLERANCE * range[1] {
            range[0] = NEAR_CLIPPING_PLANE_TOLERANCE * range[1];
        }
        self.clipping_range = range;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = self.position.map(|c| c as f32);
        let target = self.focal_point.map(|c| c as f32);
        let up = self.view_up.map(|c| c as f32);
        Matrix4::look_at_rh(eye, target, up)
    }

    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        let [near, far] = self.clipping_range;
        let proj = perspective(
            Deg(self.view_angle as f32),
            aspect.max(f32::EPSILON),
            near as f32,
            far as f32,
        );
        OPENGL_TO_WGPU_MATRIX * proj * self.view_matrix()
    }
}
