//! Viewer tuning knobs.

use crate::arcball::{AnchorMode, ArcballConfig};
use crate::error::{CoreError, CoreResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub fovy_deg: f32,
    pub arcball: ArcballConfig,
    /// Degrees per X/Y/Z key press.
    pub key_rotation_step: f32,
    /// Degrees of field of view per `1`/`2` key press.
    pub key_zoom_step: f32,
    /// Degrees of field of view per scroll notch.
    pub scroll_zoom_step: f32,
    /// World units per pixel of horizontal secondary-button drag.
    pub pan_speed: f32,
    /// Degrees about X per frame while animating.
    pub animation_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fovy_deg: 45.0,
            arcball: ArcballConfig {
                radius: 1000.0,
                sensitivity: 10.0,
                anchor: AnchorMode::Chained,
            },
            key_rotation_step: 15.0,
            key_zoom_step: 5.0,
            scroll_zoom_step: 1.0,
            pan_speed: 0.002,
            animation_step: 1.0,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fovy_deg > 0.0 && self.fovy_deg < 180.0) {
            return Err(CoreError::InvalidConfig(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fovy_deg
            )));
        }

        let positive = [
            ("arcball radius", self.arcball.radius),
            ("arcball sensitivity", self.arcball.sensitivity),
            ("key rotation step", self.key_rotation_step),
            ("key zoom step", self.key_zoom_step),
            ("scroll zoom step", self.scroll_zoom_step),
            ("pan speed", self.pan_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        // Zero is allowed: animation toggles but nothing moves.
        if !self.animation_step.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "animation step must be finite, got {}",
                self.animation_step
            )));
        }
        Ok(())
    }
}
