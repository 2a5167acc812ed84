//! Homogeneous 4x4 matrix builders on top of glam.
//!
//! All matrices are column-major (`Mat4::to_cols_array` gives upload order) and
//! follow the OpenGL clip-space convention (z in [-1, 1]). Angles are radians
//! unless the parameter name says otherwise.

use crate::{Mat4, Vec3};

/// Below this length a vector is treated as zero.
pub const LENGTH_EPSILON: f32 = 1e-12;

/// Unit-length copy of `v`, or `None` for a zero or non-finite vector.
#[inline]
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    let len = v.length();
    if len.is_finite() && len > LENGTH_EPSILON {
        Some(v / len)
    } else {
        None
    }
}

#[inline]
pub fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// Rotation by `angle` about an arbitrary `axis`.
///
/// The axis does not need to be unit length. A zero axis has no direction to
/// rotate about, so the identity is returned.
pub fn rotate(angle: f32, axis: Vec3) -> Mat4 {
    match safe_normalize(axis) {
        Some(axis) => Mat4::from_axis_angle(axis, angle),
        None => Mat4::IDENTITY,
    }
}

#[inline]
pub fn rotate_x(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(angle)
}

#[inline]
pub fn rotate_y(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

#[inline]
pub fn rotate_z(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}

/// Right-handed perspective projection, vertical field of view in degrees.
pub fn perspective(fovy_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fovy_deg.to_radians(), aspect.max(1e-6), near, far)
}

#[inline]
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
}

#[inline]
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn zero_axis_rotation_is_identity() {
        assert_eq!(rotate(1.0, Vec3::ZERO), Mat4::IDENTITY);
        assert_eq!(rotate(1.0, Vec3::new(f32::NAN, 0.0, 0.0)), Mat4::IDENTITY);
    }

    #[test]
    fn axis_rotation_matches_named_rotations() {
        let a = 0.7;
        assert!(approx_eq(rotate(a, Vec3::X), rotate_x(a)));
        assert!(approx_eq(rotate(a, Vec3::new(0.0, 3.0, 0.0)), rotate_y(a)));
        assert!(approx_eq(rotate(a, Vec3::Z), rotate_z(a)));
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let m = rotate(std::f32::consts::FRAC_PI_2, Vec3::Z);
        let p = m.transform_vector3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn translation_lands_in_last_column() {
        let m = translate(1.0, 2.0, 3.0).to_cols_array();
        assert_eq!(&m[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let view = look_at(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y);
        let eye = view.transform_point3(Vec3::new(0.0, 0.0, 2.0));
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-6));
        let target = view.transform_point3(Vec3::ZERO);
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-6));
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_clip_bounds() {
        let p = perspective(45.0, 4.0 / 3.0, 1.0, 5.0);
        let near = p.project_point3(Vec3::new(0.0, 0.0, -1.0));
        let far = p.project_point3(Vec3::new(0.0, 0.0, -5.0));
        assert!((near.z + 1.0).abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_survives_zero_aspect() {
        let p = perspective(45.0, 0.0, 1.0, 5.0);
        assert!(p.to_cols_array().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn safe_normalize_rejects_zero() {
        assert!(safe_normalize(Vec3::ZERO).is_none());
        let n = safe_normalize(Vec3::new(3.0, 4.0, 0.0)).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
