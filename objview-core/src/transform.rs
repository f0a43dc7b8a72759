/// Model-space transformation matrices
///
/// All matrices act on column vectors (`v' = M * v`) in a right-handed
/// coordinate system.
use crate::error::MathResult;
use crate::geometry::ModelTransform;
use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Create a non-uniform scale matrix
pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix4 {
    let mut m = Matrix4::identity();
    m.set(0, 0, sx);
    m.set(1, 1, sy);
    m.set(2, 2, sz);
    m
}

pub fn uniform_scale(s: f64) -> Matrix4 {
    scale(s, s, s)
}

/// Create a translation matrix
pub fn translate(tx: f64, ty: f64, tz: f64) -> Matrix4 {
    let mut m = Matrix4::identity();
    m.set(0, 3, tx);
    m.set(1, 3, ty);
    m.set(2, 3, tz);
    m
}

/// Rotation about +X; positive angles turn +Y towards +Z.
pub fn rotate_x(angle: f64) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_array([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos, -sin, 0.0],
        [0.0, sin, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation about +Y; positive angles turn +Z towards +X.
pub fn rotate_y(angle: f64) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_array([
        [cos, 0.0, sin, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-sin, 0.0, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation about +Z; positive angles turn +X towards +Y.
pub fn rotate_z(angle: f64) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_array([
        [cos, -sin, 0.0, 0.0],
        [sin, cos, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotation by `angle` about an arbitrary axis (Rodrigues' formula).
///
/// The axis is normalized first; a zero-length axis is an error.
pub fn rotate(angle: f64, axis: Vector3) -> MathResult<Matrix4> {
    let Vector3 { x, y, z } = axis.normalized()?;
    let (sin, cos) = angle.sin_cos();
    let t = 1.0 - cos;

    Ok(Matrix4::from_array([
        [cos + x * x * t, x * y * t - z * sin, x * z * t + y * sin, 0.0],
        [y * x * t + z * sin, cos + y * y * t, y * z * t - x * sin, 0.0],
        [z * x * t - y * sin, z * y * t + x * sin, cos + z * z * t, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}

/// Compose `T * (Rx * Ry * Rz) * S`: scale first, then the Euler
/// rotations, then translation.
pub fn create_model_matrix(translation: Vector3, rotation: Vector3, scale_factors: Vector3) -> Matrix4 {
    let t = translate(translation.x, translation.y, translation.z);
    let r = rotate_x(rotation.x) * rotate_y(rotation.y) * rotate_z(rotation.z);
    let s = scale(scale_factors.x, scale_factors.y, scale_factors.z);
    t * r * s
}

pub fn model_matrix(transform: &ModelTransform) -> Matrix4 {
    create_model_matrix(transform.translation(), transform.rotation(), transform.scale())
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(model: &Matrix4, view: &Matrix4, projection: &Matrix4) -> Matrix4 {
    *projection * *view * *model
}
