//! Model-view-projection construction.
//!
//! Matrices are accumulated in row-major order: conceptually `data[i][j]` is
//! row `i`, column `j`, and a product `left * right` follows the usual
//! row-major definition. The accumulated `data` is handed to the GPU unchanged
//! and read there as column-major (`data[i]` becomes column `i`), exactly like
//! a `glUniformMatrix4fv(.., GL_FALSE, ..)` upload.
//!
//! A [`Mat4`] is stored by columns, so this module keeps `data[i]` in the
//! `i`-th glam column. [`Mat4::to_cols_array_2d`] therefore returns `data`
//! and is the byte layout uploaded to uniform buffers.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Clip planes of a perspective frustum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frustum {
    /// Left clip plane at the near distance.
    pub left: f32,
    /// Right clip plane at the near distance.
    pub right: f32,
    /// Bottom clip plane at the near distance.
    pub bottom: f32,
    /// Top clip plane at the near distance.
    pub top: f32,
    /// Distance to the near plane.
    pub near: f32,
    /// Distance to the far plane.
    pub far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -2.8,
            right: 2.8,
            bottom: -2.8,
            top: 2.8,
            near: 3.0,
            far: 200.0,
        }
    }
}

impl Frustum {
    /// Returns this frustum with its vertical extents multiplied by `aspect_ratio`.
    ///
    /// The aspect ratio is `height / width`, so the horizontal extent stays fixed
    /// and the vertical extent follows the viewport.
    #[must_use]
    pub fn with_aspect_ratio(self, aspect_ratio: f32) -> Self {
        Self {
            bottom: self.bottom * aspect_ratio,
            top: self.top * aspect_ratio,
            ..self
        }
    }

    /// Builds the perspective projection for this frustum.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        let delta_x = self.right - self.left;
        let delta_y = self.top - self.bottom;
        let delta_z = self.far - self.near;

        Mat4::from_cols_array_2d(&[
            [2.0 * self.near / delta_x, 0.0, 0.0, 0.0],
            [0.0, 2.0 * self.near / delta_y, 0.0, 0.0],
            [
                (self.right + self.left) / delta_x,
                (self.top + self.bottom) / delta_y,
                -(self.near + self.far) / delta_z,
                -1.0,
            ],
            [0.0, 0.0, -2.0 * self.near * self.far / delta_z, 0.0],
        ])
    }
}

/// Fixed parameters of the per-frame model-view-projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Non-uniform scale applied in the rotated basis.
    pub scale: Vec3,
    /// Camera-distance offset written into the translation row.
    pub translation: Vec3,
    /// Projection clip planes before aspect correction.
    pub frustum: Frustum,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            scale: Vec3::new(2.5, 2.5, 1.0),
            translation: Vec3::new(0.0, 0.0, -7.0),
            frustum: Frustum::default(),
        }
    }
}

/// Multiplies `left * right` with row-major semantics.
#[must_use]
pub fn row_major_multiply(left: &Mat4, right: &Mat4) -> Mat4 {
    // Columns hold the rows of `data`, so the transpose identity
    // (L * R)^T = R^T * L^T turns the product around.
    *right * *left
}

/// Builds an axis-angle rotation with the Rodrigues formula.
///
/// The axis is normalized first. A zero-length axis yields the identity.
#[must_use]
pub fn axis_rotation(angle_degrees: f32, axis: Vec3) -> Mat4 {
    let magnitude = axis.length();
    if magnitude <= 0.0 {
        return Mat4::IDENTITY;
    }

    let (sin_angle, cos_angle) = angle_degrees.to_radians().sin_cos();
    let Vec3 { x, y, z } = axis / magnitude;

    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, yz, zx) = (x * y, y * z, z * x);
    let (xs, ys, zs) = (x * sin_angle, y * sin_angle, z * sin_angle);
    let one_minus_cos = 1.0 - cos_angle;

    Mat4::from_cols_array_2d(&[
        [
            one_minus_cos * xx + cos_angle,
            one_minus_cos * xy - zs,
            one_minus_cos * zx + ys,
            0.0,
        ],
        [
            one_minus_cos * xy + zs,
            one_minus_cos * yy + cos_angle,
            one_minus_cos * yz - xs,
            0.0,
        ],
        [
            one_minus_cos * zx - ys,
            one_minus_cos * yz + xs,
            one_minus_cos * zz + cos_angle,
            0.0,
        ],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-multiplies `matrix` by a rotation about `axis`.
///
/// Returns `matrix` untouched when the axis has zero length.
#[must_use]
pub fn rotated(matrix: &Mat4, angle_degrees: f32, axis: Vec3) -> Mat4 {
    if axis.length() <= 0.0 {
        return *matrix;
    }
    row_major_multiply(matrix, &axis_rotation(angle_degrees, axis))
}

/// Scales the basis columns of `matrix` in place of a full matrix multiply.
///
/// Column `0` of every basis row is multiplied by `scale.x`, column `1` by
/// `scale.y` and column `2` by `scale.z`. The translation row is left alone, so
/// the scale acts in the already rotated basis.
#[must_use]
pub fn scaled(matrix: &Mat4, scale: Vec3) -> Mat4 {
    let mut result = *matrix;
    for row in [&mut result.x_axis, &mut result.y_axis, &mut result.z_axis] {
        row.x *= scale.x;
        row.y *= scale.y;
        row.z *= scale.z;
    }
    result
}

/// Overwrites the translation row of `matrix`.
#[must_use]
pub fn translated(matrix: &Mat4, translation: Vec3) -> Mat4 {
    let mut result = *matrix;
    result.w_axis = Vec4::new(translation.x, translation.y, translation.z, 1.0);
    result
}

/// Builds the model-view part: rotations about X, Y, Z, then scale, then translation.
#[must_use]
pub fn model_view_matrix(angle_degrees: f32, options: &TransformOptions) -> Mat4 {
    let mut model_view = Mat4::IDENTITY;
    model_view = rotated(&model_view, angle_degrees, Vec3::X);
    model_view = rotated(&model_view, angle_degrees, Vec3::Y);
    model_view = rotated(&model_view, angle_degrees, Vec3::Z);
    model_view = scaled(&model_view, options.scale);
    translated(&model_view, options.translation)
}

/// Computes the model-view-projection for one frame.
///
/// `angle_degrees` is the rotation rate multiplied by the frame's time
/// parameter (see [`crate::FrameClock`]). `aspect_ratio` is `height / width`.
#[must_use]
pub fn compute_model_view_projection(
    angle_degrees: f32,
    aspect_ratio: f32,
    options: &TransformOptions,
) -> Mat4 {
    let model_view = model_view_matrix(angle_degrees, options);
    let projection = options
        .frustum
        .with_aspect_ratio(aspect_ratio)
        .projection_matrix();
    row_major_multiply(&model_view, &projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: &Mat4, b: &Mat4) -> bool {
        a.abs_diff_eq(*b, 1e-5)
    }

    proptest! {
        #[test]
        fn zero_axis_rotation_is_identity(angle in -720.0f32..720.0) {
            prop_assert_eq!(axis_rotation(angle, Vec3::ZERO), Mat4::IDENTITY);
            let m = Mat4::from_cols_array(&[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0,
                9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
            ]);
            prop_assert_eq!(rotated(&m, angle, Vec3::ZERO), m);
        }

        #[test]
        fn axis_is_normalized(angle in -360.0f32..360.0, length in 0.1f32..50.0) {
            let unit = axis_rotation(angle, Vec3::Y);
            let long = axis_rotation(angle, Vec3::Y * length);
            prop_assert!(approx_eq(&unit, &long));
        }
    }

    #[test]
    fn test_row_major_multiply_matches_data_product() {
        // data rows of a translation-like matrix and a scale matrix
        let left = Mat4::from_cols_array_2d(&[
            [1.0, 2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let right = Mat4::from_cols_array_2d(&[
            [3.0, 0.0, 0.0, 0.0],
            [0.0, 5.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let data = row_major_multiply(&left, &right).to_cols_array_2d();
        // row 0 of left times right: [1*3, 2*5, 0, 0]
        assert_eq!(data[0], [3.0, 10.0, 0.0, 0.0]);
        assert_eq!(data[1], [0.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_z_rotation_convention() {
        let rotation = axis_rotation(90.0, Vec3::Z);
        let data = rotation.to_cols_array_2d();
        assert!((data[0][1] - -1.0).abs() < 1e-6);
        assert!((data[1][0] - 1.0).abs() < 1e-6);

        // Read column-major on the GPU, +X is carried to -Y.
        let x = rotation * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(x.abs_diff_eq(Vec4::new(0.0, -1.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_projection_matrix_exact_entries() {
        // 800x600 viewport: aspect = 600 / 800
        let frustum = Frustum::default().with_aspect_ratio(600.0 / 800.0);
        let data = frustum.projection_matrix().to_cols_array_2d();

        let expected = 2.0_f32 * 3.0 / (2.8 - (-2.8));
        assert_eq!(data[0][0], expected);
        assert!((data[0][0] - 15.0 / 14.0).abs() < 1e-6);

        let delta_y = 2.8 * 0.75 - (-2.8 * 0.75);
        assert_eq!(data[1][1], 2.0 * 3.0 / delta_y);
        assert_eq!(data[2][2], -(3.0 + 200.0) / (200.0 - 3.0));
        assert_eq!(data[2][3], -1.0);
        assert_eq!(data[3][2], -2.0 * 3.0 * 200.0 / (200.0 - 3.0));
        assert_eq!(data[3][3], 0.0);
    }

    #[test]
    fn test_scale_touches_basis_only() {
        let base = axis_rotation(30.0, Vec3::new(1.0, 1.0, 0.0));
        let base = translated(&base, Vec3::new(4.0, 5.0, 6.0));
        let result = scaled(&base, Vec3::new(2.5, 2.5, 1.0));

        let before = base.to_cols_array_2d();
        let after = result.to_cols_array_2d();
        for row in 0..3 {
            assert_eq!(after[row][0], before[row][0] * 2.5);
            assert_eq!(after[row][1], before[row][1] * 2.5);
            assert_eq!(after[row][2], before[row][2]);
            assert_eq!(after[row][3], before[row][3]);
        }
        assert_eq!(after[3], before[3]);
    }

    #[test]
    fn test_translation_overwrites_row() {
        let base = scaled(&axis_rotation(45.0, Vec3::Z), Vec3::splat(3.0));
        let base = translated(&base, Vec3::new(1.0, 1.0, 1.0));
        let result = translated(&base, Vec3::new(0.0, 0.0, -7.0));
        assert_eq!(result.to_cols_array_2d()[3], [0.0, 0.0, -7.0, 1.0]);
        assert_eq!(result.x_axis, base.x_axis);
    }

    #[test]
    fn test_model_view_order_is_x_then_y_then_z() {
        let options = TransformOptions::default();
        let angle = 37.0;

        let mut expected = Mat4::IDENTITY;
        expected = row_major_multiply(&expected, &axis_rotation(angle, Vec3::X));
        expected = row_major_multiply(&expected, &axis_rotation(angle, Vec3::Y));
        expected = row_major_multiply(&expected, &axis_rotation(angle, Vec3::Z));
        expected = scaled(&expected, options.scale);
        expected = translated(&expected, options.translation);
        assert_eq!(model_view_matrix(angle, &options), expected);

        let mut swapped = Mat4::IDENTITY;
        swapped = row_major_multiply(&swapped, &axis_rotation(angle, Vec3::Z));
        swapped = row_major_multiply(&swapped, &axis_rotation(angle, Vec3::Y));
        swapped = row_major_multiply(&swapped, &axis_rotation(angle, Vec3::X));
        swapped = scaled(&swapped, options.scale);
        swapped = translated(&swapped, options.translation);
        assert!(!approx_eq(&model_view_matrix(angle, &options), &swapped));
    }

    #[test]
    fn test_mvp_is_model_view_then_projection() {
        let options = TransformOptions::default();
        let aspect = 0.75;
        let mvp = compute_model_view_projection(12.5, aspect, &options);

        let model_view = model_view_matrix(12.5, &options);
        let projection = options.frustum.with_aspect_ratio(aspect).projection_matrix();
        assert_eq!(mvp, projection * model_view);
    }

    #[test]
    fn test_mvp_is_deterministic() {
        let options = TransformOptions::default();
        let a = compute_model_view_projection(0.0725 * 17.0, 0.75, &options);
        let b = compute_model_view_projection(0.0725 * 17.0, 0.75, &options);
        let bits = |m: &Mat4| m.to_cols_array().map(f32::to_bits);
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_cube_center_lands_in_front_of_camera() {
        let mvp = compute_model_view_projection(0.0, 0.75, &TransformOptions::default());
        let clip = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        // Eye-space depth 7 gives w = 7 and a GL-style NDC depth inside [-1, 1].
        assert!((clip.w - 7.0).abs() < 1e-5);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > -1.0 && ndc_z < 1.0);
    }
}
