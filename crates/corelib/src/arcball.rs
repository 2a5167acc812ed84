//! Arcball rotation: cursor positions are lifted onto a virtual sphere and the
//! rotation between two such points is accumulated into the model rotation.

use crate::{Mat4, Quat, Vec3, math, vec3};

/// Cross products shorter than this are treated as degenerate (coincident or
/// antipodal sphere points).
pub const AXIS_EPSILON: f32 = 1e-7;

/// How the drag anchor `p1` evolves while the button is held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorMode {
    /// `p1` is re-anchored to `p2` after every applied move; each move adds the
    /// small rotation since the previous move.
    #[default]
    Chained,
    /// `p1` stays at the press point; the rotation shown is the one from the
    /// press point to the current cursor, applied on top of the rotation the
    /// model had when the drag started.
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcballConfig {
    /// Sphere radius in pixels.
    pub radius: f32,
    /// Multiplier applied to the angle between `p1` and `p2`.
    pub sensitivity: f32,
    pub anchor: AnchorMode,
}

impl Default for ArcballConfig {
    fn default() -> Self {
        Self {
            radius: 1000.0,
            sensitivity: 10.0,
            anchor: AnchorMode::Chained,
        }
    }
}

/// Viewport size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Map window pixel `(x, y)` onto the arcball sphere.
///
/// The pixel frame has its origin at the top-left corner; the sphere is
/// centered in the viewport with +Y up and +Z toward the viewer. Cursors
/// outside the sphere's silhouette are clamped onto it at `z = 0`. The result is
/// unit length except in the degenerate case of a zero-length point (cursor at
/// the exact center of a zero-radius sphere), which is returned as is.
pub fn project_to_sphere(x: f32, y: f32, viewport: Viewport, radius: f32) -> Vec3 {
    let px = x - viewport.width / 2.0;
    let py = viewport.height / 2.0 - y;
    let d2 = px * px + py * py;
    let r2 = radius * radius;

    let p = if d2 <= r2 {
        vec3(px, py, (r2 - d2).sqrt())
    } else {
        let s = radius / d2.sqrt();
        vec3(px * s, py * s, 0.0)
    };

    math::safe_normalize(p).unwrap_or(p)
}

/// Mouse-driven rotation state.
///
/// `rotation_model` accumulates across drags and is only reset by
/// [`ArcballState::reset`]. The accumulation is kept as a unit quaternion that
/// is renormalized after every increment; `rotation_model` is its matrix form.
#[derive(Clone, Copy, Debug)]
pub struct ArcballState {
    pub config: ArcballConfig,
    pub p1: Vec3,
    pub p2: Vec3,
    /// Axis of the last applied increment (`p1 x p2`, not normalized).
    pub axis: Vec3,
    /// Angle of the last applied increment in radians, sensitivity included.
    pub angle: f32,
    pub dragging: bool,
    pub rotation_model: Mat4,
    orientation: Quat,
    /// `orientation` at press time; only read in [`AnchorMode::Fixed`].
    drag_start: Quat,
}

impl ArcballState {
    pub fn new(config: ArcballConfig) -> Self {
        Self {
            config,
            p1: Vec3::Z,
            p2: Vec3::Z,
            axis: Vec3::Z,
            angle: 0.0,
            dragging: false,
            rotation_model: Mat4::IDENTITY,
            orientation: Quat::IDENTITY,
            drag_start: Quat::IDENTITY,
        }
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
        self.rotation_model = Mat4::from_quat(self.orientation);
    }

    /// Back to startup defaults (identity rotation, idle).
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Idle -> Dragging.
    pub fn press(&mut self, x: f32, y: f32, viewport: Viewport) {
        self.p1 = project_to_sphere(x, y, viewport, self.config.radius);
        self.p2 = self.p1;
        self.drag_start = self.orientation;
        self.dragging = true;
        log::debug!("arcball press at ({x:.1}, {y:.1}) -> p1={:?}", self.p1);
    }

    /// Dragging -> Dragging. Returns `true` when `rotation_model` was updated.
    ///
    /// Ignored while idle. A move whose sphere point is antipodal to `p1`
    /// leaves all state except `p2` untouched, as does a coincident one in
    /// [`AnchorMode::Chained`]. In [`AnchorMode::Fixed`] a cursor back on the
    /// press point restores the rotation the drag started from.
    pub fn drag(&mut self, x: f32, y: f32, viewport: Viewport) -> bool {
        if !self.dragging {
            return false;
        }

        self.p2 = project_to_sphere(x, y, viewport, self.config.radius);
        let axis = self.p1.cross(self.p2);
        if axis.length() < AXIS_EPSILON {
            if self.config.anchor == AnchorMode::Fixed && self.p1.dot(self.p2) > 0.0 {
                self.angle = 0.0;
                self.set_orientation(self.drag_start);
                return true;
            }
            return false;
        }

        let cos = self.p1.dot(self.p2).clamp(-1.0, 1.0);
        self.axis = axis;
        self.angle = cos.acos() * self.config.sensitivity;

        let increment = Quat::from_axis_angle(axis.normalize(), self.angle);
        match self.config.anchor {
            AnchorMode::Chained => {
                self.set_orientation(increment * self.orientation);
                self.p1 = self.p2;
            }
            AnchorMode::Fixed => {
                self.set_orientation(increment * self.drag_start);
            }
        }
        true
    }

    /// Dragging -> Idle. The accumulated rotation is kept.
    pub fn release(&mut self) {
        self.dragging = false;
    }
}

impl Default for ArcballState {
    fn default() -> Self {
        Self::new(ArcballConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 640.0,
        height: 480.0,
    };

    #[test]
    fn center_maps_to_near_pole() {
        let p = project_to_sphere(320.0, 240.0, VP, 100.0);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn projected_points_are_unit_length() {
        for &(x, y) in &[(0.0, 0.0), (320.0, 10.0), (600.0, 400.0), (5000.0, -300.0)] {
            let p = project_to_sphere(x, y, VP, 200.0);
            assert!((p.length() - 1.0).abs() < 1e-5, "({x}, {y}) -> {p:?}");
        }
    }

    #[test]
    fn y_axis_points_up() {
        let above = project_to_sphere(320.0, 140.0, VP, 200.0);
        assert!(above.y > 0.0);
        let right = project_to_sphere(420.0, 240.0, VP, 200.0);
        assert!(right.x > 0.0);
    }

    #[test]
    fn far_cursor_is_clamped_to_silhouette() {
        let p = project_to_sphere(10_000.0, 240.0, VP, 100.0);
        assert_eq!(p.z, 0.0);
        assert!(p.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn zero_radius_center_returns_zero_vector() {
        let p = project_to_sphere(320.0, 240.0, VP, 0.0);
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn drag_one_pixel_right_rotates_about_vertical_axis() {
        let mut ball = ArcballState::default();
        ball.press(320.0, 240.0, VP);
        assert!(ball.drag(321.0, 240.0, VP));

        assert!(ball.angle > 0.0 && ball.angle < 0.1);
        let axis = ball.axis.normalize();
        assert!(axis.y > 0.99, "axis = {axis:?}");
    }

    #[test]
    fn axis_is_orthogonal_to_both_points() {
        let mut ball = ArcballState::new(ArcballConfig {
            radius: 250.0,
            ..Default::default()
        });
        ball.press(200.0, 150.0, VP);
        let p1 = ball.p1;
        assert!(ball.drag(260.0, 310.0, VP));
        assert!(ball.axis.dot(p1).abs() < 1e-6);
        assert!(ball.axis.dot(ball.p2).abs() < 1e-6);
    }

    #[test]
    fn identity_drag_leaves_rotation_unchanged() {
        let mut ball = ArcballState::default();
        ball.press(100.0, 100.0, VP);
        assert!(!ball.drag(100.0, 100.0, VP));
        ball.release();
        assert_eq!(ball.rotation_model, Mat4::IDENTITY);
        assert!(!ball.dragging);
    }

    #[test]
    fn drag_while_idle_is_ignored() {
        let mut ball = ArcballState::default();
        assert!(!ball.drag(500.0, 100.0, VP));
        assert_eq!(ball.rotation_model, Mat4::IDENTITY);
    }

    #[test]
    fn rotation_persists_across_drags() {
        let mut ball = ArcballState::default();
        ball.press(320.0, 240.0, VP);
        ball.drag(330.0, 240.0, VP);
        ball.release();
        let after_first = ball.rotation_model;
        assert_ne!(after_first, Mat4::IDENTITY);

        ball.press(320.0, 240.0, VP);
        ball.drag(320.0, 250.0, VP);
        ball.release();
        assert_ne!(ball.rotation_model, after_first);

        ball.reset();
        assert_eq!(ball.rotation_model, Mat4::IDENTITY);
    }

    #[test]
    fn chained_anchor_follows_cursor() {
        let mut ball = ArcballState::default();
        ball.press(320.0, 240.0, VP);
        ball.drag(330.0, 240.0, VP);
        assert_eq!(ball.p1, ball.p2);
    }

    #[test]
    fn fixed_anchor_depends_only_on_endpoints() {
        let config = ArcballConfig {
            anchor: AnchorMode::Fixed,
            ..Default::default()
        };

        let mut stepped = ArcballState::new(config);
        stepped.press(320.0, 240.0, VP);
        for x in 321..=340 {
            stepped.drag(x as f32, 240.0, VP);
        }

        let mut direct = ArcballState::new(config);
        direct.press(320.0, 240.0, VP);
        direct.drag(340.0, 240.0, VP);

        assert!(stepped.rotation_model.abs_diff_eq(direct.rotation_model, 1e-5));
        assert!(stepped.p1.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn drag_increment_matches_axis_angle_matrix() {
        let mut ball = ArcballState::default();
        ball.press(300.0, 200.0, VP);
        assert!(ball.drag(310.0, 215.0, VP));
        let expected = math::rotate(ball.angle, ball.axis);
        assert!(ball.rotation_model.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn fixed_anchor_returns_to_drag_start_when_cursor_comes_back() {
        let mut ball = ArcballState::new(ArcballConfig {
            anchor: AnchorMode::Fixed,
            ..Default::default()
        });
        ball.press(320.0, 240.0, VP);
        assert!(ball.drag(360.0, 240.0, VP));
        assert_ne!(ball.rotation_model, Mat4::IDENTITY);

        assert!(ball.drag(320.0, 240.0, VP));
        assert_eq!(ball.rotation_model, Mat4::IDENTITY);
        assert_eq!(ball.angle, 0.0);
    }

    #[test]
    fn fixed_anchor_return_keeps_earlier_drags() {
        let mut ball = ArcballState::new(ArcballConfig {
            anchor: AnchorMode::Fixed,
            ..Default::default()
        });
        ball.press(320.0, 240.0, VP);
        ball.drag(330.0, 250.0, VP);
        ball.release();
        let before = ball.rotation_model;

        ball.press(100.0, 100.0, VP);
        ball.drag(140.0, 90.0, VP);
        assert!(ball.drag(100.0, 100.0, VP));
        assert!(ball.rotation_model.abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn rotation_stays_orthonormal_after_many_moves() {
        let mut ball = ArcballState::default();
        ball.press(320.0, 240.0, VP);
        for i in 0..150_000 {
            let t = i as f32 * 0.05;
            ball.drag(320.0 + 80.0 * t.cos(), 240.0 + 60.0 * t.sin(), VP);
        }
        ball.release();
        let r = ball.rotation_model;
        let should_be_identity = r.transpose() * r;
        assert!(
            should_be_identity.abs_diff_eq(Mat4::IDENTITY, 1e-5),
            "RtR = {should_be_identity:?}"
        );
        assert!((r.determinant() - 1.0).abs() < 1e-5, "det = {}", r.determinant());
    }
}
