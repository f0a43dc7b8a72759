/// Wireframe render driver
///
/// Projects every polygon of a model through projection * view * model and
/// hands the closed outlines to a [`Surface`]. No depth sorting, clipping
/// or fill.
use crate::error::MathResult;
use crate::geometry::Model;
use crate::projection::{multiply_matrix4_by_vector3, vertex_to_point, Camera};
use crate::transform::{model_matrix, mvp_matrix};
use crate::vector::Vector2;

/// A 2D drawing target addressed in pixel coordinates
pub trait Surface {
    fn clear(&mut self);

    fn draw_line(&mut self, from: Vector2, to: Vector2);
}

/// Pixel-space outline of one polygon, in vertex order
pub type Outline = Vec<Vector2>;

/// Project every polygon of `model` onto a `width` x `height` viewport.
///
/// Indices outside the vertex array are skipped.
pub fn project_model(camera: &Camera, model: &Model, width: u32, height: u32) -> MathResult<Vec<Outline>> {
    let mvp = mvp_matrix(
        &model_matrix(&model.transform),
        &camera.view_matrix()?,
        &camera.projection_matrix(),
    );

    let outlines = model
        .polygons
        .iter()
        .map(|polygon| {
            polygon
                .vertex_indices()
                .iter()
                .filter_map(|&i| model.vertices.get(i))
                .map(|&v| vertex_to_point(multiply_matrix4_by_vector3(&mvp, v), width, height))
                .collect()
        })
        .collect();

    Ok(outlines)
}

/// Draw the closed outline of every polygon of `model`.
pub fn render_model<S: Surface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    model: &Model,
    width: u32,
    height: u32,
) -> MathResult<()> {
    for outline in project_model(camera, model, width, height)? {
        draw_outline(surface, &outline);
    }
    Ok(())
}

/// Edges between consecutive points, wrapping last to first
pub fn draw_outline<S: Surface + ?Sized>(surface: &mut S, outline: &[Vector2]) {
    if outline.len() < 2 {
        return;
    }
    for (i, &from) in outline.iter().enumerate() {
        let to = outline[(i + 1) % outline.len()];
        surface.draw_line(from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use crate::geometry::Polygon;
    use crate::vector::{Axis, Vector3};

    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        lines: Vec<(Vector2, Vector2)>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn draw_line(&mut self, from: Vector2, to: Vector2) {
            self.lines.push((from, to));
        }
    }

    fn triangle() -> Model {
        let mut model = Model::new();
        model.add_vertex(Vector3::new(0.0, 0.0, 0.0));
        model.add_vertex(Vector3::new(10.0, 0.0, 0.0));
        model.add_vertex(Vector3::new(0.0, 10.0, 0.0));
        model.add_polygon(Polygon::triangle(0, 1, 2));
        model
    }

    #[test]
    fn test_outline_is_closed() {
        let mut surface = RecordingSurface::default();
        render_model(&mut surface, &Camera::new(201, 201), &triangle(), 201, 201).unwrap();

        assert_eq!(surface.clears, 0);
        assert_eq!(surface.lines.len(), 3);
        assert_eq!(surface.lines[2].1, surface.lines[0].0);
        // origin sits in the middle of the viewport
        assert_eq!(surface.lines[0].0, Vector2::new(100.0, 100.0));
    }

    #[test]
    fn test_projection_orientation() {
        let outlines = project_model(&Camera::new(201, 201), &triangle(), 201, 201).unwrap();
        let outline = &outlines[0];
        // +X goes right, +Y goes up (smaller row)
        assert!(outline[1].x > outline[0].x);
        assert!(outline[2].y < outline[0].y);
    }

    #[test]
    fn test_model_transform_is_applied() {
        let mut model = triangle();
        let plain = project_model(&Camera::new(201, 201), &model, 201, 201).unwrap();
        model.transform.translate_by(Axis::X, 5.0);
        let moved = project_model(&Camera::new(201, 201), &model, 201, 201).unwrap();
        assert!(moved[0][0].x > plain[0][0].x);
        assert_eq!(moved[0][0].y, plain[0][0].y);
    }

    #[test]
    fn test_bad_indices_are_skipped() {
        let mut model = triangle();
        model.add_polygon(Polygon::triangle(0, 1, 7));
        let outlines = project_model(&Camera::default(), &model, 100, 100).unwrap();
        assert_eq!(outlines[1].len(), 2);
    }

    #[test]
    fn test_degenerate_camera_is_reported() {
        let camera = Camera::builder().position(Vector3::zero()).build();
        let mut surface = RecordingSurface::default();
        let result = render_model(&mut surface, &camera, &triangle(), 100, 100);
        assert_eq!(result, Err(MathError::ZeroLengthVector));
        assert!(surface.lines.is_empty());
    }
}
