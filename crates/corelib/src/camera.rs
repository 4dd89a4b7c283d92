use crate::{Mat4, Quat, Vec3};

/// Simple perspective camera (right-handed, wgpu depth range).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Rotate the eye around the target: `yaw` about the up axis, `pitch`
    /// about the camera-right axis. Preserves the eye-target distance.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.eye - self.target;
        let up = self.up.normalize_or_zero();
        let mut rot = Quat::from_axis_angle(up, yaw);
        let right = up.cross(offset);
        // Pitch is skipped when the eye sits on the up axis (no defined right).
        if right.length_squared() > 1e-12 {
            rot *= Quat::from_axis_angle(right.normalize(), pitch);
        }
        self.eye = self.target + rot * offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn orbit_preserves_distance() {
        let mut cam = Camera::new_perspective(
            vec3(75.0, 75.0, 75.0),
            Vec3::ZERO,
            Vec3::Y,
            50f32.to_radians(),
            0.1,
            10_000.0,
            16.0 / 9.0,
        );
        let before = cam.eye.length();
        cam.orbit(0.3, -0.2);
        cam.orbit(-1.1, 0.7);
        let after = cam.eye.length();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn half_turn_yaw_mirrors_eye() {
        let mut cam = Camera::new_perspective(
            vec3(4.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            1.0,
        );
        cam.orbit(std::f32::consts::PI, 0.0);
        assert!((cam.eye.x + 4.0).abs() < 1e-4);
        assert!(cam.eye.z.abs() < 1e-3);
    }

    #[test]
    fn orbit_on_up_axis_does_not_produce_nan() {
        let mut cam = Camera::new_perspective(
            vec3(0.0, 5.0, 0.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            1.0,
        );
        cam.orbit(0.5, 0.5);
        assert!(cam.eye.is_finite());
    }
}
