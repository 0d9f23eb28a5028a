use cgmath::{Matrix4, SquareMatrix};

use super::camera::Camera;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],

    /// Direction the headlight shines in, which is the view direction.
    pub light_direction: [f32; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
            light_direction: [0.0, 0.0, -1.0, 0.0],
        }
    }
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        let eye = camera.position();
        let direction = camera.direction_of_projection();
        Self {
            view_position: [eye.x as f32, eye.y as f32, eye.z as f32, 1.0],
            view_proj: convert_matrix4_to_array(camera.view_projection(aspect)),
            light_direction: [direction.x as f32, direction.y as f32, direction.z as f32, 0.0],
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_follows_camera() {
        let mut camera = Camera::new();
        camera.set_position([0.0, -4.0, 0.0]);
        let uniform = CameraUniform::from_camera(&camera, 1.0);
        assert_eq!(uniform.view_position, [0.0, -4.0, 0.0, 1.0]);
        assert_eq!(uniform.light_direction, [0.0, 1.0, 0.0, 0.0]);
        assert_ne!(uniform.view_proj, CameraUniform::default().view_proj);
    }

    #[test]
    fn test_matrix_conversion_is_column_major() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(convert_matrix4_to_array(m)[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
