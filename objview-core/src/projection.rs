/// Camera, view/projection matrices and the mapping to pixel space
///
/// Conventions: right-handed world, the camera looks down -Z in view space,
/// and the perspective matrix puts `-z_view` into `w`, so points in front of
/// the camera end up with positive `w` that grows with distance.
use crate::error::MathResult;
use crate::matrix::Matrix4;
use crate::transform::translate;
use crate::vector::{Vector2, Vector3, EPSILON};

/// Build a view matrix: rotation into the camera basis composed with the
/// translation of `eye` to the origin.
pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> MathResult<Matrix4> {
    // Camera +Z points from the target back to the eye.
    let z_axis = (eye - target).normalized()?;
    let x_axis = up.cross(&z_axis).normalized()?;
    let y_axis = z_axis.cross(&x_axis);

    let rotation = Matrix4::from_array([
        [x_axis.x, x_axis.y, x_axis.z, 0.0],
        [y_axis.x, y_axis.y, y_axis.z, 0.0],
        [z_axis.x, z_axis.y, z_axis.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    Ok(rotation * translate(-eye.x, -eye.y, -eye.z))
}

/// Perspective projection for a vertical field of view in radians.
pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Matrix4 {
    let f = 1.0 / (fov * 0.5).tan();
    let range = near - far;

    let mut m = Matrix4::zero();
    m.set(0, 0, f / aspect);
    m.set(1, 1, f);
    m.set(2, 2, (far + near) / range);
    m.set(2, 3, 2.0 * far * near / range);
    m.set(3, 2, -1.0);
    m
}

/// Transform `point` as (x, y, z, 1) and dehomogenize.
///
/// The divide only happens when `|w| > EPSILON`; otherwise the undivided
/// xyz is returned.
pub fn multiply_matrix4_by_vector3(matrix: &Matrix4, point: Vector3) -> Vector3 {
    let h = *matrix * point.to_point();
    if h.w.abs() > EPSILON {
        Vector3::new(h.x / h.w, h.y / h.w, h.z / h.w)
    } else {
        h.xyz()
    }
}

/// Map normalized device coordinates onto a `width` x `height` pixel grid.
///
/// NDC x = -1 lands on column 0 and +1 on column `width - 1`; y is flipped
/// so NDC y = +1 lands on row 0.
pub fn vertex_to_point(ndc: Vector3, width: u32, height: u32) -> Vector2 {
    let max_x = width.saturating_sub(1) as f64;
    let max_y = height.saturating_sub(1) as f64;
    Vector2::new((ndc.x + 1.0) * 0.5 * max_x, (1.0 - ndc.y) * 0.5 * max_y)
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vector3,
    target: Vector3,
    up: Vector3,
    fov: f64,
    aspect: f64,
    near: f64,
    far: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::builder().build();
        camera.set_viewport(width, height);
        camera
    }

    pub fn builder() -> CameraBuilder {
        CameraBuilder {
            position: Vector3::new(0.0, 0.0, 100.0),
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            fov: 1.0,
            aspect: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    /// Pan: eye and target move together, so the view direction is kept.
    pub fn move_position(&mut self, delta: Vector3) {
        self.position += delta;
        self.target += delta;
    }

    pub fn set_aspect_ratio(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    /// Recompute the aspect ratio from a viewport size. Zero-height
    /// viewports keep the previous ratio.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f64 / height as f64;
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> MathResult<Matrix4> {
        look_at(self.position, self.target, self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4 {
        perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Project a model-space point to pixel coordinates
    pub fn project_to_screen(
        &self,
        point: Vector3,
        model_matrix: &Matrix4,
        width: u32,
        height: u32,
    ) -> MathResult<Vector2> {
        let mvp = self.projection_matrix() * self.view_matrix()? * *model_matrix;
        let ndc = multiply_matrix4_by_vector3(&mvp, point);
        Ok(vertex_to_point(ndc, width, height))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct CameraBuilder {
    position: Vector3,
    target: Vector3,
    up: Vector3,
    fov: f64,
    aspect: f64,
    near: f64,
    far: f64,
}

impl CameraBuilder {
    pub fn position(&mut self, position: Vector3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn target(&mut self, target: Vector3) -> &mut Self {
        self.target = target;
        self
    }

    pub fn up(&mut self, up: Vector3) -> &mut Self {
        self.up = up;
        self
    }

    pub fn fov(&mut self, fov: f64) -> &mut Self {
        const MIN: f64 = 0.01;
        const MAX: f64 = std::f64::consts::PI - 0.01;

        self.fov = fov.clamp(MIN, MAX);
        if (self.fov - fov).abs() > 1e-9 {
            log::warn!("Fov out of bounds: {} <= `{}` <= {}", MIN, fov, MAX);
        }
        self
    }

    pub fn aspect(&mut self, aspect: f64) -> &mut Self {
        self.aspect = aspect;
        self
    }

    pub fn near(&mut self, near: f64) -> &mut Self {
        if near <= 0.0 {
            log::warn!("Near is not positive: `{}`", near);
        }
        self.near = near;
        self
    }

    pub fn far(&mut self, far: f64) -> &mut Self {
        if far <= 0.0 {
            log::warn!("Far is not positive: `{}`", far);
        }
        self.far = far;
        self
    }

    pub fn build(&mut self) -> Camera {
        if self.far < self.near {
            log::warn!("Far is closer than near: `{}` `{}`", self.far, self.near);
        }

        Camera {
            position: self.position,
            target: self.target,
            up: self.up,
            fov: self.fov,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point3;

    fn assert_matches_nalgebra(ours: &Matrix4, theirs: &nalgebra::Matrix4<f64>) {
        for r in 0..4 {
            for c in 0..4 {
                assert_abs_diff_eq!(ours.get(r, c), theirs[(r, c)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Vector3::new(3.0, 4.0, 10.0);
        let target = Vector3::new(-1.0, 0.5, 0.0);
        let ours = look_at(eye, target, Vector3::unit_y()).unwrap();
        let theirs = nalgebra::Matrix4::look_at_rh(
            &Point3::new(3.0, 4.0, 10.0),
            &Point3::new(-1.0, 0.5, 0.0),
            &nalgebra::Vector3::y(),
        );
        assert_matches_nalgebra(&ours, &theirs);
    }

    #[test]
    fn test_look_at_basis() {
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let view = look_at(eye, Vector3::zero(), Vector3::unit_y()).unwrap();

        assert_eq!(multiply_matrix4_by_vector3(&view, eye), Vector3::zero());
        // target straight ahead, down -Z
        let t = multiply_matrix4_by_vector3(&view, Vector3::zero());
        assert_eq!(t, Vector3::new(0.0, 0.0, -5.0));
        // world +X stays to the right
        let r = multiply_matrix4_by_vector3(&view, Vector3::new(1.0, 0.0, 5.0));
        assert_eq!(r, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_look_at_degenerate() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(look_at(p, p, Vector3::unit_y()), Err(MathError::ZeroLengthVector));
        // up parallel to the view direction
        let err = look_at(Vector3::new(0.0, 5.0, 0.0), Vector3::zero(), Vector3::unit_y());
        assert_eq!(err, Err(MathError::ZeroLengthVector));
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = perspective(1.0, 16.0 / 9.0, 0.1, 100.0);
        let theirs = nalgebra::Matrix4::new_perspective(16.0 / 9.0, 1.0, 0.1, 100.0);
        assert_matches_nalgebra(&ours, &theirs);
    }

    #[test]
    fn test_perspective_w_grows_with_distance() {
        let p = perspective(1.0, 1.0, 0.1, 100.0);
        let near = p * Vector3::new(1.0, 1.0, -2.0).to_point();
        let far = p * Vector3::new(1.0, 1.0, -20.0).to_point();
        assert!(near.w > 0.0);
        assert!(far.w > near.w);

        let near_ndc = multiply_matrix4_by_vector3(&p, Vector3::new(1.0, 1.0, -2.0));
        let far_ndc = multiply_matrix4_by_vector3(&p, Vector3::new(1.0, 1.0, -20.0));
        assert!(far_ndc.x.abs() < near_ndc.x.abs());
    }

    #[test]
    fn test_perspective_depth_range() {
        let p = perspective(1.0, 1.0, 0.5, 50.0);
        let at_near = multiply_matrix4_by_vector3(&p, Vector3::new(0.0, 0.0, -0.5));
        let at_far = multiply_matrix4_by_vector3(&p, Vector3::new(0.0, 0.0, -50.0));
        assert_abs_diff_eq!(at_near.z, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(at_far.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_divide_guard() {
        // w row is all zero: no divide
        let mut m = translate(1.0, 2.0, 3.0);
        m.set(3, 3, 0.0);
        let r = multiply_matrix4_by_vector3(&m, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(r, Vector3::new(2.0, 3.0, 4.0));

        // tiny w is still treated as degenerate
        m.set(3, 3, 1e-11);
        let r = multiply_matrix4_by_vector3(&m, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(r, Vector3::new(2.0, 3.0, 4.0));

        m.set(3, 3, 2.0);
        let r = multiply_matrix4_by_vector3(&m, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(r, Vector3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_vertex_to_point_corners() {
        let top_left = vertex_to_point(Vector3::new(-1.0, 1.0, 0.0), 801, 601);
        assert_eq!(top_left, Vector2::new(0.0, 0.0));

        let bottom_right = vertex_to_point(Vector3::new(1.0, -1.0, 0.0), 801, 601);
        assert_eq!(bottom_right, Vector2::new(800.0, 600.0));

        let centre = vertex_to_point(Vector3::zero(), 801, 601);
        assert_eq!(centre, Vector2::new(400.0, 300.0));
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-12);
        assert_eq!(camera.up(), Vector3::unit_y());

        let mut camera = Camera::default();
        camera.set_viewport(100, 0);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn test_camera_pan_keeps_direction() {
        let mut camera = Camera::default();
        let before = camera.target() - camera.position();
        camera.move_position(Vector3::new(2.5, 0.0, -2.5));
        assert_eq!(camera.position(), Vector3::new(2.5, 0.0, 97.5));
        assert_eq!(camera.target() - camera.position(), before);
    }

    #[test]
    fn test_builder_clamps_fov() {
        let camera = Camera::builder().fov(10.0).near(0.5).far(20.0).build();
        assert!(camera.fov() < std::f64::consts::PI);
        assert_eq!(camera.near(), 0.5);
        assert_eq!(camera.far(), 20.0);
    }

    #[test]
    fn test_project_to_screen_centre() {
        let camera = Camera::new(101, 101);
        let p = camera
            .project_to_screen(Vector3::zero(), &Matrix4::identity(), 101, 101)
            .unwrap();
        assert_eq!(p, Vector2::new(50.0, 50.0));
    }
}
