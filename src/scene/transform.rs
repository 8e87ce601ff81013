//! Translation / rotation / scale transforms
//!
//! A [`Transform`] is the local, parent-relative placement of a scene node.
//! It produces a single 4x4 matrix on demand and is otherwise plain data,
//! mutated between frames by whatever drives the animation.

use cgmath::{Deg, InnerSpace, Matrix4, One, Quaternion, Rad, Rotation3, Vector3, Zero};

/// Rotation part of a [`Transform`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    /// Rotation of `angle` around `axis` (the axis does not need to be normalized)
    AxisAngle { axis: Vector3<f32>, angle: Rad<f32> },
    /// Quaternion rotation, normalized when converted
    Quaternion(Quaternion<f32>),
}

impl Rotation {
    /// No rotation
    pub fn identity() -> Self {
        Rotation::Quaternion(Quaternion::one())
    }

    /// Converts the rotation to a quaternion
    ///
    /// A zero-length axis or quaternion yields the identity rotation.
    pub fn to_quaternion(&self) -> Quaternion<f32> {
        match *self {
            Rotation::AxisAngle { axis, angle } => {
                if axis.magnitude2() <= f32::EPSILON {
                    Quaternion::one()
                } else {
                    Quaternion::from_axis_angle(axis.normalize(), angle)
                }
            }
            Rotation::Quaternion(q) => {
                if q.magnitude2() <= f32::EPSILON {
                    Quaternion::one()
                } else {
                    q.normalize()
                }
            }
        }
    }

    /// Returns the rotation as a 4x4 matrix
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.to_quaternion())
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Local TRS transform of a scene node
///
/// The matrix is composed as `T * R * S`: scale first, then rotation,
/// then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Rotation,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zero(),
            rotation: Rotation::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: Vector3::new(scale, scale, scale),
            ..Self::identity()
        }
    }

    pub fn from_rotation(rotation: Rotation) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Builder: set translation
    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.translation = translation;
        self
    }

    /// Builder: set rotation from an axis and an angle in degrees
    pub fn with_axis_angle(mut self, axis: Vector3<f32>, angle: Deg<f32>) -> Self {
        self.rotation = Rotation::AxisAngle {
            axis,
            angle: angle.into(),
        };
        self
    }

    /// Builder: set rotation from a quaternion
    pub fn with_quaternion(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = Rotation::Quaternion(rotation);
        self
    }

    /// Builder: set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Builder: set non-uniform scale
    pub fn with_scale_xyz(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the local transformation matrix (`T * R * S`)
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translation);
        let r = self.rotation.to_matrix();
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform as _};

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::identity().to_matrix(), Matrix4::one());
    }

    #[test]
    fn test_trs_order() {
        let transform = Transform::identity()
            .with_translation(Vector3::new(1.0, 2.0, 3.0))
            .with_axis_angle(Vector3::unit_z(), Deg(90.0))
            .with_scale(2.0);

        // Scale (1,0,0) -> (2,0,0), rotate about z -> (0,2,0), translate -> (1,4,3)
        let p = transform.to_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 4.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_axis_angle_matches_quaternion() {
        let axis = Vector3::new(0.0, 2.0, 0.0);
        let a = Rotation::AxisAngle {
            axis,
            angle: Deg(30.0).into(),
        };
        let b = Rotation::Quaternion(Quaternion::from_angle_y(Deg(30.0)));
        assert_relative_eq!(a.to_matrix(), b.to_matrix(), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let r = Rotation::AxisAngle {
            axis: Vector3::zero(),
            angle: Deg(45.0).into(),
        };
        assert_eq!(r.to_matrix(), Matrix4::one());
    }

    #[test]
    fn test_quaternion_is_normalized() {
        let unit = Quaternion::from_angle_x(Deg(60.0));
        let r = Rotation::Quaternion(unit * 3.0);
        assert_relative_eq!(r.to_matrix(), Matrix4::from(unit), epsilon = 1e-6);

        let zero = Rotation::Quaternion(Quaternion::zero());
        assert_eq!(zero.to_matrix(), Matrix4::one());
    }
}
