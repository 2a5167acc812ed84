//! Scene state machine: owns camera and arcball state and mutates them in
//! response to [`InputEvent`]s.

use crate::arcball::ArcballState;
use crate::camera::{CameraState, FrameMatrices, build_matrices};
use crate::config::ViewerConfig;
use crate::input::{InputEvent, Key, MouseButton};
use crate::transform::Axis;

/// What the caller should do after an event was handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub redraw: bool,
    pub quit: bool,
}

impl Response {
    pub const NONE: Self = Self {
        redraw: false,
        quit: false,
    };
    pub const REDRAW: Self = Self {
        redraw: true,
        quit: false,
    };
    pub const QUIT: Self = Self {
        redraw: false,
        quit: true,
    };
}

pub struct Scene {
    config: ViewerConfig,
    pub camera: CameraState,
    pub arcball: ArcballState,
    pub animate: bool,
    /// Last cursor x while the secondary button is held.
    pan_anchor: Option<f32>,
}

impl Scene {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            camera: CameraState::new(config.width, config.height, config.fovy_deg),
            arcball: ArcballState::new(config.arcball),
            animate: false,
            pan_anchor: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn handle(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::MousePressed { button, x, y } => match button {
                MouseButton::Primary => {
                    self.arcball.press(x, y, self.camera.viewport());
                    Response::NONE
                }
                MouseButton::Secondary => {
                    self.pan_anchor = Some(x);
                    Response::NONE
                }
                MouseButton::Other => Response::NONE,
            },
            InputEvent::MouseReleased { button, .. } => {
                match button {
                    MouseButton::Primary => self.arcball.release(),
                    MouseButton::Secondary => self.pan_anchor = None,
                    MouseButton::Other => {}
                }
                Response::NONE
            }
            InputEvent::CursorMoved { x, y } => {
                let mut changed = self.arcball.drag(x, y, self.camera.viewport());
                if let Some(prev) = self.pan_anchor.replace(x) {
                    let dx = x - prev;
                    if dx != 0.0 {
                        self.camera.pan(dx, self.config.pan_speed);
                        changed = true;
                    }
                }
                if changed { Response::REDRAW } else { Response::NONE }
            }
            InputEvent::Scroll { delta_y } => {
                if delta_y < 0.0 {
                    self.camera.zoom(self.config.scroll_zoom_step);
                } else if delta_y > 0.0 {
                    self.camera.zoom(-self.config.scroll_zoom_step);
                } else {
                    return Response::NONE;
                }
                log::debug!("fovy = {:.1}", self.camera.fovy_deg);
                Response::REDRAW
            }
            InputEvent::KeyPressed { key, shift } => self.handle_key(key, shift),
            InputEvent::Resized { width, height } => {
                self.camera.resize(width, height);
                Response::REDRAW
            }
        }
    }

    fn handle_key(&mut self, key: Key, shift: bool) -> Response {
        let step = if shift {
            -self.config.key_rotation_step
        } else {
            self.config.key_rotation_step
        };

        match key {
            Key::Escape => return Response::QUIT,
            Key::A => {
                self.animate = !self.animate;
                log::info!("animation {}", if self.animate { "on" } else { "off" });
            }
            Key::P => {
                self.camera.toggle_projection();
                log::info!("projection: {:?}", self.camera.mode);
            }
            Key::X => self.camera.axis_angles.rotate(Axis::X, step),
            Key::Y => self.camera.axis_angles.rotate(Axis::Y, step),
            Key::Z => self.camera.axis_angles.rotate(Axis::Z, step),
            Key::Digit1 => self.camera.zoom(-self.config.key_zoom_step),
            Key::Digit2 => self.camera.zoom(self.config.key_zoom_step),
            Key::R => self.reset_view(),
            Key::Other => return Response::NONE,
        }
        Response::REDRAW
    }

    /// Drop accumulated rotation, pan and zoom. Projection mode and animation
    /// flag are kept.
    pub fn reset_view(&mut self) {
        let mode = self.camera.mode;
        let (width, height) = (self.camera.width, self.camera.height);
        self.camera = CameraState::new(width, height, self.config.fovy_deg);
        self.camera.mode = mode;
        self.arcball.reset();
        self.pan_anchor = None;
        log::info!("view reset");
    }

    /// Per-frame step.
    pub fn update(&mut self) {
        if self.animate {
            self.camera
                .axis_angles
                .rotate(Axis::X, self.config.animation_step);
        }
    }

    #[inline]
    pub fn frame_matrices(&self) -> FrameMatrices {
        build_matrices(&self.camera, self.arcball.rotation_model)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
