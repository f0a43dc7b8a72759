/// Indexed mesh model: attribute arrays, polygons and the per-model transform
use crate::error::{ModelError, ModelResult};
use crate::vector::{Axis, Vector2, Vector3};

/// A face referencing vertex, and optionally texture and normal, entries by index.
///
/// Texture and normal index lists are either empty or exactly as long as the
/// vertex list; the constructors reject anything in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertex_indices: Vec<usize>,
    texture_indices: Vec<usize>,
    normal_indices: Vec<usize>,
}

impl Polygon {
    pub fn new(vertex_indices: Vec<usize>) -> ModelResult<Self> {
        Self::with_attributes(vertex_indices, Vec::new(), Vec::new())
    }

    pub fn with_attributes(
        vertex_indices: Vec<usize>,
        texture_indices: Vec<usize>,
        normal_indices: Vec<usize>,
    ) -> ModelResult<Self> {
        let count = vertex_indices.len();
        if count < 3 {
            return Err(ModelError::TooFewVertices(count));
        }
        for (attribute, indices) in [("texture", &texture_indices), ("normal", &normal_indices)] {
            if !indices.is_empty() && indices.len() != count {
                return Err(ModelError::PartialAttributes {
                    attribute,
                    expected: count,
                    actual: indices.len(),
                });
            }
        }

        Ok(Self {
            vertex_indices,
            texture_indices,
            normal_indices,
        })
    }

    /// A plain triangle with no texture or normal attribution.
    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertex_indices: vec![a, b, c],
            texture_indices: Vec::new(),
            normal_indices: Vec::new(),
        }
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn texture_indices(&self) -> &[usize] {
        &self.texture_indices
    }

    pub fn normal_indices(&self) -> &[usize] {
        &self.normal_indices
    }

    pub fn len(&self) -> usize {
        self.vertex_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    pub fn has_textures(&self) -> bool {
        !self.texture_indices.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normal_indices.is_empty()
    }

    // Remapping rewrites values in place, so list lengths (and the
    // attribution invariant) are preserved.
    pub(crate) fn indices_mut(&mut self, kind: Attribute) -> &mut [usize] {
        match kind {
            Attribute::Vertex => &mut self.vertex_indices,
            Attribute::Texture => &mut self.texture_indices,
            Attribute::Normal => &mut self.normal_indices,
        }
    }

    pub(crate) fn indices(&self, kind: Attribute) -> &[usize] {
        match kind {
            Attribute::Vertex => &self.vertex_indices,
            Attribute::Texture => &self.texture_indices,
            Attribute::Normal => &self.normal_indices,
        }
    }
}

/// The three per-vertex attribute arrays a polygon can index into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Vertex,
    Texture,
    Normal,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Vertex, Attribute::Texture, Attribute::Normal];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Vertex => "vertex",
            Attribute::Texture => "texture",
            Attribute::Normal => "normal",
        }
    }
}

/// Translation, Euler rotation (radians, X then Y then Z) and scale of a model.
///
/// Updates go through the setters and the per-axis helpers below; the
/// vectors themselves are handed out by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    translation: Vector3,
    rotation: Vector3,
    scale: Vector3,
}

impl ModelTransform {
    pub fn new(translation: Vector3, rotation: Vector3, scale: Vector3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zero(), Vector3::zero(), Vector3::splat(1.0))
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vector3) {
        self.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
    }

    pub fn translate_by(&mut self, axis: Axis, delta: f64) {
        let value = self.translation.component(axis) + delta;
        self.translation = self.translation.with_component(axis, value);
    }

    pub fn rotate_by(&mut self, axis: Axis, delta: f64) {
        let value = self.rotation.component(axis) + delta;
        self.rotation = self.rotation.with_component(axis, value);
    }

    /// Adjust one scale component, never letting it drop below `min`.
    pub fn scale_by(&mut self, axis: Axis, delta: f64, min: f64) {
        let value = (self.scale.component(axis) + delta).max(min);
        self.scale = self.scale.with_component(axis, value);
    }

    pub fn reset(&mut self) {
        *self = Self::identity();
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A polygonal mesh with indexed vertex, texture and normal arrays
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub vertices: Vec<Vector3>,
    pub texture_vertices: Vec<Vector2>,
    pub normals: Vec<Vector3>,
    pub polygons: Vec<Polygon>,
    pub transform: ModelTransform,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: Vector3) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.polygons.is_empty()
    }

    pub fn attribute_len(&self, kind: Attribute) -> usize {
        match kind {
            Attribute::Vertex => self.vertices.len(),
            Attribute::Texture => self.texture_vertices.len(),
            Attribute::Normal => self.normals.len(),
        }
    }

    /// Check that every polygon index is in range and that attribute lists
    /// match their polygon's vertex count.
    pub fn validate(&self) -> ModelResult<()> {
        for (position, polygon) in self.polygons.iter().enumerate() {
            if polygon.len() < 3 {
                return Err(ModelError::TooFewVertices(polygon.len()));
            }
            for kind in Attribute::ALL {
                let indices = polygon.indices(kind);
                if kind != Attribute::Vertex && !indices.is_empty() && indices.len() != polygon.len()
                {
                    return Err(ModelError::PartialAttributes {
                        attribute: kind.name(),
                        expected: polygon.len(),
                        actual: indices.len(),
                    });
                }
                let len = self.attribute_len(kind);
                if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                    return Err(ModelError::IndexOutOfBounds {
                        polygon: position,
                        attribute: kind.name(),
                        index,
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    /// Create a cube centred on the origin with one normal per face
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut model = Self::new();

        for &(x, y, z) in &[
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
        ] {
            model.add_vertex(Vector3::new(x, y, z));
        }

        // (face normal, two counter-clockwise triangles)
        let faces: [([f64; 3], [[usize; 3]; 2]); 6] = [
            ([0.0, 0.0, 1.0], [[0, 1, 2], [0, 2, 3]]),   // front
            ([0.0, 0.0, -1.0], [[4, 7, 6], [4, 6, 5]]),  // back
            ([0.0, 1.0, 0.0], [[7, 3, 2], [7, 2, 6]]),   // top
            ([0.0, -1.0, 0.0], [[4, 5, 1], [4, 1, 0]]),  // bottom
            ([1.0, 0.0, 0.0], [[5, 6, 2], [5, 2, 1]]),   // right
            ([-1.0, 0.0, 0.0], [[4, 0, 3], [4, 3, 7]]),  // left
        ];

        for (normal, triangles) in faces {
            model.normals.push(Vector3::from(normal));
            let n = model.normals.len() - 1;
            for triangle in triangles {
                model.polygons.push(Polygon {
                    vertex_indices: triangle.to_vec(),
                    texture_indices: Vec::new(),
                    normal_indices: vec![n; 3],
                });
            }
        }

        model
    }
}
