//! Look-at camera and the per-frame uniforms shared by every pipeline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective camera aimed at a point.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 50.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn look(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
    /// Camera right axis in world space, for billboards.
    pub right: [f32; 4],
    /// Camera up axis in world space, for billboards.
    pub up: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
            right: [1.0, 0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn update(&mut self, camera: &Camera) {
        let view = camera.view_matrix();
        self.view_proj = (camera.projection_matrix() * view).to_cols_array_2d();
        let pos = camera.position;
        self.position = [pos.x, pos.y, pos.z, 1.0];
        // Rows of the view rotation are the camera axes in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        self.right = right.extend(0.0).into();
        self.up = up.extend(0.0).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Ambient fill plus one point light with linear falloff to zero at `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Linear ambient colour (already scaled by intensity).
    pub ambient: Vec3,
    pub light_position: Vec3,
    /// Linear light colour.
    pub light_color: Vec3,
    pub light_intensity: f32,
    pub light_range: f32,
}

/// Light uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    /// xyz position, w range.
    pub position: [f32; 4],
    /// rgb colour, a intensity.
    pub color: [f32; 4],
}

impl From<&Lighting> for LightUniform {
    fn from(l: &Lighting) -> Self {
        Self {
            ambient: l.ambient.extend(1.0).into(),
            position: l.light_position.extend(l.light_range).into(),
            color: l.light_color.extend(l.light_intensity).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_centre() {
        let mut camera = Camera::default();
        camera.look(Vec3::new(100.0, 25.0, 0.0), Vec3::new(100.0, 20.0, -30.0));
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn aspect_follows_viewport() {
        let mut camera = Camera::default();
        camera.set_aspect(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }

    #[test]
    fn billboard_axes_are_orthonormal() {
        let mut camera = Camera::default();
        camera.look(Vec3::new(10.0, 5.0, 30.0), Vec3::new(0.0, 0.0, 0.0));
        let mut uniform = CameraUniform::new();
        uniform.update(&camera);
        let right = Vec3::from_slice(&uniform.right[..3]);
        let up = Vec3::from_slice(&uniform.up[..3]);
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(up).abs() < 1e-5);
        let forward = (camera.target - camera.position).normalize();
        assert!(right.dot(forward).abs() < 1e-5);
    }
}
