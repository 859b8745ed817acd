use std::ops::Mul;

use nalgebra::{Isometry3, Matrix3, Point3, Quaternion, Rotation3, Translation3, UnitQuaternion};

use super::GeometryError;

/// Tolerance used when checking that a rotation matrix is orthonormal.
const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// A rigid transform (rotation followed by translation).
///
/// Maps points of a local frame into the enclosing frame: `p' = R·p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TransformRecord", into = "TransformRecord")
)]
pub struct Transform(Isometry3<f64>);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for Transform {
    fn from(isometry: Isometry3<f64>) -> Self {
        Self(isometry)
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self(Isometry3::identity())
    }

    pub fn new(translation: [f64; 3], rotation: UnitQuaternion<f64>) -> Self {
        Self(Isometry3::from_parts(Translation3::from(translation), rotation))
    }

    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self::new(translation, UnitQuaternion::identity())
    }

    /// Build from a translation and a quaternion given as `[w, x, y, z]`.
    ///
    /// The quaternion is normalized; a zero or non-finite quaternion is rejected.
    pub fn from_quaternion(translation: [f64; 3], wxyz: [f64; 4]) -> Result<Self, GeometryError> {
        let [w, x, y, z] = wxyz;
        let q = Quaternion::new(w, x, y, z);
        if !wxyz.iter().all(|c| c.is_finite()) || q.norm() <= f64::EPSILON {
            return Err(GeometryError::InvalidRotation(format!(
                "quaternion {wxyz:?} cannot be normalized"
            )));
        }
        Ok(Self::new(translation, UnitQuaternion::from_quaternion(q)))
    }

    /// Build from a translation and a row-major 3×3 rotation matrix.
    ///
    /// The matrix must be a proper rotation: orthonormal with determinant +1.
    pub fn from_matrix(translation: [f64; 3], rows: [f64; 9]) -> Result<Self, GeometryError> {
        let m = Matrix3::from_row_slice(&rows);
        if !rows.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::InvalidRotation(format!(
                "matrix {rows:?} has non-finite entries"
            )));
        }
        let deviation = (m.transpose() * m - Matrix3::identity()).abs().max();
        if deviation > ORTHONORMAL_TOLERANCE {
            return Err(GeometryError::InvalidRotation(format!(
                "matrix {rows:?} is not orthonormal (deviation {deviation:e})"
            )));
        }
        if m.determinant() < 0.0 {
            return Err(GeometryError::InvalidRotation(format!(
                "matrix {rows:?} is a reflection"
            )));
        }
        let rotation = Rotation3::from_matrix_unchecked(m);
        Ok(Self::new(
            translation,
            UnitQuaternion::from_rotation_matrix(&rotation),
        ))
    }

    pub fn translation(&self) -> [f64; 3] {
        let v = &self.0.translation.vector;
        [v.x, v.y, v.z]
    }

    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.0.rotation
    }

    /// Rotation as `[w, x, y, z]`.
    pub fn quaternion(&self) -> [f64; 4] {
        let q = self.0.rotation.quaternion();
        [q.w, q.i, q.j, q.k]
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.0.rotation.to_rotation_matrix().into_inner()
    }

    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.0
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// Compose so that `self` is applied first and `outer` second.
    ///
    /// For a child-to-parent `self` and a parent-to-grandparent `outer` this yields the
    /// child-to-grandparent transform.
    #[must_use]
    pub fn then(&self, outer: &Transform) -> Self {
        Self(outer.0 * self.0)
    }

    pub fn apply_point(&self, point: Point3<f64>) -> Point3<f64> {
        self.0.transform_point(&point)
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum RotationRecord {
    Quaternion([f64; 4]),
    Matrix([f64; 9]),
}

/// Wire form of a [`Transform`]: translation plus an optional rotation.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TransformRecord {
    #[serde(default)]
    translation: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<RotationRecord>,
}

#[cfg(feature = "serde")]
impl TryFrom<TransformRecord> for Transform {
    type Error = GeometryError;

    fn try_from(record: TransformRecord) -> Result<Self, Self::Error> {
        match record.rotation {
            None => Ok(Self::from_translation(record.translation)),
            Some(RotationRecord::Quaternion(q)) => Self::from_quaternion(record.translation, q),
            Some(RotationRecord::Matrix(m)) => Self::from_matrix(record.translation, m),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Transform> for TransformRecord {
    fn from(transform: Transform) -> Self {
        Self {
            translation: transform.translation(),
            rotation: Some(RotationRecord::Quaternion(transform.quaternion())),
        }
    }
}
