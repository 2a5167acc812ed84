//! Core types: math re-exports, arcball, camera, scene state.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod arcball;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod scene;
pub mod transform;

pub use arcball::{AnchorMode, ArcballConfig, ArcballState};
pub use camera::{CameraState, FrameMatrices, ProjectionMode};
pub use config::ViewerConfig;
pub use error::{CoreError, CoreResult};
pub use input::{InputEvent, Key, MouseButton};
pub use scene::{Response, Scene};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_frame_is_finite() {
        let scene = Scene::default();
        let frame = scene.frame_matrices();
        assert_eq!(frame.model, Mat4::IDENTITY);
        assert!(frame.mvp_cols().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn orthographic_frame_keeps_unit_cube_visible() {
        let mut scene = Scene::default();
        scene.handle(InputEvent::KeyPressed {
            key: Key::P,
            shift: false,
        });
        let mvp = scene.frame_matrices().mvp();
        for corner in [vec3(1.0, 1.0, 1.0), vec3(-1.0, -1.0, -1.0)] {
            let clip = mvp.project_point3(corner * 0.66);
            assert!(clip.abs().max_element() <= 1.0, "{corner:?} -> {clip:?}");
        }
    }
}
