/// objview Core Library - mesh model, topology editing and the projection pipeline
///
/// This library provides the stateless core of the viewer: vector and matrix
/// types, the indexed mesh model, polygon/vertex deletion, model/view/projection
/// matrices, the wireframe render driver and OBJ reading/writing.

pub mod error;
pub mod vector;
pub mod matrix;
pub mod geometry;
pub mod topology;
pub mod transform;
pub mod projection;
pub mod render;
pub mod obj;

// Re-export commonly used types
pub use error::{MathError, ModelError, ObjError};
pub use geometry::{Attribute, Model, ModelTransform, Polygon};
pub use matrix::{Matrix3, Matrix4};
pub use projection::{Camera, CameraBuilder};
pub use render::Surface;
pub use topology::{delete_polygons, delete_vertices, DeletionReport};
pub use vector::{Axis, Vector2, Vector3, Vector4};
