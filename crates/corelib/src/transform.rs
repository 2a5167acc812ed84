use crate::{Mat4, Vec3, math};

/// Discrete per-axis rotation angles in degrees, driven by the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Principal axis selector for keyboard rotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl AxisAngles {
    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Add `step_deg` to one axis, wrapped into [0, 360).
    pub fn rotate(&mut self, axis: Axis, step_deg: f32) {
        let angle = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *angle = (*angle + step_deg).rem_euclid(360.0);
    }

    /// Rx * Ry * Rz, so Z is applied to the mesh first.
    pub fn matrix(&self) -> Mat4 {
        math::rotate_x(self.x.to_radians())
            * math::rotate_y(self.y.to_radians())
            * math::rotate_z(self.z.to_radians())
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Build the model matrix:
/// `T(translation_x, 0, 0) * arcball * Rx * Ry * Rz`.
///
/// Keyboard rotations act on the mesh first, then the accumulated arcball
/// rotation, then the pan translation.
#[inline]
pub fn compose_model(translation_x: f32, arcball: Mat4, angles: &AxisAngles) -> Mat4 {
    math::translate(translation_x, 0.0, 0.0) * arcball * angles.matrix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_is_identity() {
        let m = compose_model(0.0, Mat4::IDENTITY, &AxisAngles::zero());
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn angles_wrap_into_full_turn() {
        let mut a = AxisAngles::zero();
        a.rotate(Axis::X, 350.0);
        a.rotate(Axis::X, 15.0);
        assert!((a.x - 5.0).abs() < 1e-4);
        a.rotate(Axis::Y, -15.0);
        assert!((a.y - 345.0).abs() < 1e-4);
        assert_eq!(a.z, 0.0);
    }

    #[test]
    fn keyboard_rotation_is_applied_before_arcball() {
        // Keyboard: 90 deg about Z turns +X into +Y.
        // Arcball: 90 deg about X then turns +Y into +Z.
        let mut angles = AxisAngles::zero();
        angles.rotate(Axis::Z, 90.0);
        let arcball = math::rotate_x(std::f32::consts::FRAC_PI_2);

        let m = compose_model(0.0, arcball, &angles);
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-5), "got {p:?}");
    }

    #[test]
    fn translation_is_applied_last() {
        let arcball = math::rotate_z(std::f32::consts::FRAC_PI_2);
        let m = compose_model(0.5, arcball, &AxisAngles::zero());
        // Rotated first (+X -> +Y), then shifted along world X.
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-5), "got {p:?}");
    }

    #[test]
    fn axis_order_is_x_y_z() {
        let mut angles = AxisAngles::zero();
        angles.rotate(Axis::X, 30.0);
        angles.rotate(Axis::Y, 45.0);
        angles.rotate(Axis::Z, 60.0);
        let expected = math::rotate_x(30f32.to_radians())
            * math::rotate_y(45f32.to_radians())
            * math::rotate_z(60f32.to_radians());
        assert!(angles.matrix().abs_diff_eq(expected, 1e-6));
    }
}
