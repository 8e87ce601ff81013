//! The four matrices propagated down the scene graph

use cgmath::{Matrix, Matrix3, Matrix4, One, SquareMatrix};

use crate::config::NormalMatrixMode;

/// Accumulated matrices handed from a parent to its children
///
/// At the root these are the camera-level matrices supplied by the caller.
/// cgmath matrices are column-major with column vectors, so `parent * local`
/// applies the child's local transform inside the parent's space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawMatrices {
    pub mvp: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub normal: Matrix4<f32>,
    pub model: Matrix4<f32>,
}

impl Default for DrawMatrices {
    fn default() -> Self {
        Self::identity()
    }
}

impl DrawMatrices {
    /// All four matrices set to identity
    pub fn identity() -> Self {
        Self {
            mvp: Matrix4::one(),
            model_view: Matrix4::one(),
            normal: Matrix4::one(),
            model: Matrix4::one(),
        }
    }

    /// Camera-level matrices for a root draw
    ///
    /// `normal` starts out as the view matrix, the model matrix as identity.
    pub fn from_camera(projection: Matrix4<f32>, view: Matrix4<f32>) -> Self {
        Self {
            mvp: projection * view,
            model_view: view,
            normal: view,
            model: Matrix4::one(),
        }
    }

    /// Applies a node's local matrix to every accumulated matrix
    pub fn compose(&self, local: &Matrix4<f32>, mode: NormalMatrixMode) -> Self {
        let model_view = self.model_view * local;
        let normal = match mode {
            NormalMatrixMode::Composed => self.normal * local,
            NormalMatrixMode::InverseTranspose => inverse_transpose_3x3(&model_view),
        };

        Self {
            mvp: self.mvp * local,
            model_view,
            normal,
            model: self.model * local,
        }
    }
}

/// Inverse-transpose of the upper-left 3x3, embedded back into a 4x4
///
/// Singular matrices fall back to the plain upper 3x3.
pub fn inverse_transpose_3x3(m: &Matrix4<f32>) -> Matrix4<f32> {
    let upper = Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate());
    let normal = upper.invert().map(|inv| inv.transpose()).unwrap_or(upper);
    Matrix4::from(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    #[test]
    fn test_compose_is_parent_times_local() {
        let parent = DrawMatrices::from_camera(
            Matrix4::from_scale(0.5),
            Matrix4::from_translation(Vector3::new(0.0, 0.0, -5.0)),
        );
        let local = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));

        let child = parent.compose(&local, NormalMatrixMode::Composed);
        assert_eq!(child.mvp, parent.mvp * local);
        assert_eq!(child.model_view, parent.model_view * local);
        assert_eq!(child.normal, parent.normal * local);
        assert_eq!(child.model, parent.model * local);
    }

    #[test]
    fn test_inverse_transpose_non_uniform_scale() {
        let local = Matrix4::from_nonuniform_scale(2.0, 4.0, 1.0);
        let child = DrawMatrices::identity().compose(&local, NormalMatrixMode::InverseTranspose);

        assert_relative_eq!(
            child.normal,
            Matrix4::from_nonuniform_scale(0.5, 0.25, 1.0),
            epsilon = 1e-6
        );
        // The other three are unaffected by the mode.
        assert_eq!(child.model_view, local);
    }

    #[test]
    fn test_inverse_transpose_drops_translation() {
        let m = Matrix4::from_translation(Vector3::new(3.0, 2.0, 1.0));
        assert_eq!(inverse_transpose_3x3(&m), Matrix4::one());
    }
}
