//! Island transforms reconstructed from pack solutions.

use crate::types::IslandPackSolution;
use nalgebra::{Matrix4, Rotation3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A homogeneous 4x4 transform applied to UV coordinates.
///
/// Column-vector convention: a point `p` maps to `M * p`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvTransform {
    matrix: Matrix4<f64>,
}

impl UvTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Builds the transform for one island solution.
    ///
    /// Starting from the identity, each step right-multiplies the
    /// accumulated matrix:
    ///
    /// 1. translate by the post-scale offset
    /// 2. scale x and y by `1 / scale`
    /// 3. translate by the offset
    /// 4. translate to the pivot
    /// 5. rotate about Z by the angle (counter-clockwise for positive angles)
    /// 6. translate back from the pivot
    /// 7. scale x and y by the pre-scale
    ///
    /// A point therefore sees the steps in reverse: pre-scale first,
    /// post-scale offset last. Reordering them moves islands to the wrong
    /// place.
    pub fn from_solution(solution: &IslandPackSolution) -> Self {
        let inv_scale = 1.0 / f64::from(solution.scale);
        let pre_scale = f64::from(solution.pre_scale);
        let [px, py] = solution.pivot.map(f64::from);

        let mut m = Matrix4::identity();
        m = m * translation(solution.post_scale_offset);
        m = m * Matrix4::new_nonuniform_scaling(&Vector3::new(inv_scale, inv_scale, 1.0));
        m = m * translation(solution.offset);
        m = m * Matrix4::new_translation(&Vector3::new(px, py, 0.0));
        m = m * Rotation3::from_axis_angle(&Vector3::z_axis(), f64::from(solution.angle))
            .to_homogeneous();
        m = m * Matrix4::new_translation(&Vector3::new(-px, -py, 0.0));
        m = m * Matrix4::new_nonuniform_scaling(&Vector3::new(pre_scale, pre_scale, 1.0));

        Self { matrix: m }
    }

    /// Returns the underlying matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Transforms a point `(x, y, 0, 1)` and divides by the resulting `w`.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.matrix * Vector4::new(x, y, 0.0, 1.0);
        (p.x / p.w, p.y / p.w)
    }

    /// Transforms a UV coordinate pair.
    pub fn transform_uv(&self, uv: [f32; 2]) -> [f32; 2] {
        let (u, v) = self.transform_point(f64::from(uv[0]), f64::from(uv[1]));
        [u as f32, v as f32]
    }
}

impl Default for UvTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<&IslandPackSolution> for UvTransform {
    fn from(solution: &IslandPackSolution) -> Self {
        Self::from_solution(solution)
    }
}

fn translation(t: [f32; 2]) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(f64::from(t[0]), f64::from(t[1]), 0.0))
}
