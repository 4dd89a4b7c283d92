use crate::{Mat4, Vec3};

/// Model placement: translation plus uniform scale.
/// The viewer exposes no model rotation, so none is carried here.
#[derive(Clone, Copy, Debug)]
pub struct ModelTransform {
    pub translation: Vec3,
    pub scale: f32,
}

impl ModelTransform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Build matrix = T * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}
