//! Transform value type for 3D spatial data
//!
//! `Transform` is a plain `Copy` value. Matrices are always derived from the
//! position/rotation/scale triple and never stored, so two copies can never
//! disagree about what they represent.

use glam::{Mat4, Quat, Vec3};

/// Position, orientation and scale of a scene object or selection.
///
/// Scale components may be negative (mirroring) but are never NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform
    #[inline]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        debug_assert!(!scale.is_nan(), "transform scale must not be NaN");
        Self { position, rotation, scale }
    }

    /// Create from position only
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self::IDENTITY.with_position(position)
    }

    /// Create from position and rotation
    #[inline]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self::IDENTITY.with_position(position).with_rotation(rotation)
    }

    /// Copy with a different position
    #[inline]
    #[must_use]
    pub fn with_position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    /// Copy with a different rotation
    #[inline]
    #[must_use]
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    /// Copy with a different scale
    #[inline]
    #[must_use]
    pub fn with_scale(self, scale: Vec3) -> Self {
        debug_assert!(!scale.is_nan(), "transform scale must not be NaN");
        Self { scale, ..self }
    }

    /// Local-to-world matrix (scale, then rotate, then translate).
    #[inline]
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-to-local matrix. Singular when a scale component is zero.
    #[inline]
    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }

    /// Decompose an affine matrix back into a transform.
    ///
    /// A mirrored basis comes back as a negative scale component. Returns
    /// `None` if any resulting component is not finite (singular or
    /// degenerate input).
    pub fn from_matrix(matrix: &Mat4) -> Option<Self> {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        let candidate = Self {
            position,
            rotation: rotation.normalize(),
            scale,
        };
        candidate.is_finite().then_some(candidate)
    }

    /// True when no component is NaN or infinite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Transform a point from local into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.scale)
    }

    /// Transform a point from world into local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.rotation.inverse() * (point - self.position)) / self.scale
    }

    /// Transform a direction (ignores position and scale)
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Compose: `self` is the parent, `local` is expressed in its frame.
    #[inline]
    pub fn mul_matrix(&self, local: &Mat4) -> Mat4 {
        self.local_to_world() * *local
    }

    /// Approximate equality, for tests and snapping decisions
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
