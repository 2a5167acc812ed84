use crate::arcball::Viewport;
use crate::transform::{AxisAngles, compose_model};
use crate::{Mat4, Vec3, math, vec3};

pub const NEAR: f32 = 1.0;
pub const FAR: f32 = 5.0;
/// Fixed eye position of the look-at camera.
pub const EYE: Vec3 = vec3(0.0, 0.0, 2.0);
pub const MIN_FOVY_DEG: f32 = 1.0;
pub const MAX_FOVY_DEG: f32 = 179.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

/// Camera and keyboard/pan model state, read every frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraState {
    /// Vertical field of view in degrees, kept in [`MIN_FOVY_DEG`, `MAX_FOVY_DEG`].
    pub fovy_deg: f32,
    pub mode: ProjectionMode,
    pub translation_x: f32,
    pub axis_angles: AxisAngles,
    pub width: u32,
    pub height: u32,
}

impl CameraState {
    pub fn new(width: u32, height: u32, fovy_deg: f32) -> Self {
        Self {
            fovy_deg: fovy_deg.clamp(MIN_FOVY_DEG, MAX_FOVY_DEG),
            mode: ProjectionMode::Perspective,
            translation_x: 0.0,
            axis_angles: AxisAngles::zero(),
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn toggle_projection(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Change the field of view by `delta_deg`; positive zooms out.
    pub fn zoom(&mut self, delta_deg: f32) {
        self.fovy_deg = (self.fovy_deg + delta_deg).clamp(MIN_FOVY_DEG, MAX_FOVY_DEG);
    }

    /// Shift the model along world X by a horizontal cursor delta in pixels.
    pub fn pan(&mut self, dx_px: f32, speed: f32) {
        self.translation_x += dx_px * speed;
    }

    pub fn projection(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => math::perspective(self.fovy_deg, self.aspect(), NEAR, FAR),
            // Far plane matches the perspective one; near is behind the eye.
            ProjectionMode::Orthographic => math::orthographic(-1.0, 1.0, -1.0, 1.0, -1.0, FAR),
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        math::look_at(EYE, Vec3::ZERO, Vec3::Y)
    }

    #[inline]
    pub fn model(&self, rotation_model: Mat4) -> Mat4 {
        compose_model(self.translation_x, rotation_model, &self.axis_angles)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(640, 480, 45.0)
    }
}

/// Per-frame transform set handed to the renderer.
///
/// Matrices are column-major; [`FrameMatrices::mvp_cols`] and friends give the
/// 16 floats in upload order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

impl FrameMatrices {
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    #[inline]
    pub fn mvp_cols(&self) -> [f32; 16] {
        self.mvp().to_cols_array()
    }

    #[inline]
    pub fn model_cols(&self) -> [f32; 16] {
        self.model.to_cols_array()
    }
}

pub fn build_matrices(camera: &CameraState, rotation_model: Mat4) -> FrameMatrices {
    FrameMatrices {
        projection: camera.projection(),
        view: camera.view(),
        model: camera.model(rotation_model),
    }
}
