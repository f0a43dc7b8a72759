/// Polygon and vertex deletion with orphan-attribute compaction
///
/// Positions outside the valid range are ignored rather than reported:
/// deletion sets typically come from typed user input that may be stale.
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::geometry::{Attribute, Model, Polygon};

/// Old position -> new position produced by a compaction
pub type IndexMap = HashMap<usize, usize>;

/// What a deletion removed, per array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub polygons: usize,
    pub vertices: usize,
    pub texture_vertices: usize,
    pub normals: usize,
}

impl DeletionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn record(&mut self, kind: Attribute, removed: usize) {
        match kind {
            Attribute::Vertex => self.vertices += removed,
            Attribute::Texture => self.texture_vertices += removed,
            Attribute::Normal => self.normals += removed,
        }
    }
}

impl fmt::Display for DeletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} polygons, {} vertices, {} texture vertices, {} normals",
            self.polygons, self.vertices, self.texture_vertices, self.normals
        )
    }
}

/// Every position of `kind` referenced by at least one polygon.
pub fn used_indices(polygons: &[Polygon], kind: Attribute) -> HashSet<usize> {
    polygons
        .iter()
        .flat_map(|p| p.indices(kind).iter().copied())
        .collect()
}

/// Positions of the polygons that reference any of `vertices`.
pub fn polygons_using_vertices(polygons: &[Polygon], vertices: &HashSet<usize>) -> HashSet<usize> {
    polygons
        .iter()
        .enumerate()
        .filter(|(_, p)| p.vertex_indices().iter().any(|v| vertices.contains(v)))
        .map(|(position, _)| position)
        .collect()
}

/// Keep rule after polygon removal: position `i` survives if a remaining
/// polygon uses it, or if nothing used it before the removal.
pub fn orphan_keep_set(
    len: usize,
    used_before: &HashSet<usize>,
    used_after: &HashSet<usize>,
) -> HashSet<usize> {
    (0..len)
        .filter(|i| used_after.contains(i) || !used_before.contains(i))
        .collect()
}

/// Keep rule for the explicit free-vertex purge, over pre-edit positions:
/// `i` survives unless it was requested and no polygon ever used it.
pub fn free_vertex_keep_set(
    len: usize,
    requested: &HashSet<usize>,
    initially_used: &HashSet<usize>,
) -> HashSet<usize> {
    (0..len)
        .filter(|i| !requested.contains(i) || initially_used.contains(i))
        .collect()
}

/// Drop every element whose position is not in `keep`, returning the dense
/// renumbering of the survivors.
fn compact<T>(items: &mut Vec<T>, keep: &HashSet<usize>) -> IndexMap {
    let mut map = IndexMap::with_capacity(keep.len());
    for old in (0..items.len()).filter(|i| keep.contains(i)) {
        let new = map.len();
        map.insert(old, new);
    }

    let mut position = 0;
    items.retain(|_| {
        let kept = keep.contains(&position);
        position += 1;
        kept
    });

    map
}

/// Rewrite `kind` indices through `map`. Indices without a mapping are
/// left as they are.
fn remap(polygons: &mut [Polygon], kind: Attribute, map: &IndexMap) {
    for polygon in polygons {
        for index in polygon.indices_mut(kind) {
            if let Some(&new) = map.get(&*index) {
                *index = new;
            }
        }
    }
}

/// Compact one attribute array of `model` and remap the polygons onto it.
fn compact_attribute(model: &mut Model, kind: Attribute, keep: &HashSet<usize>) -> (usize, IndexMap) {
    let before = model.attribute_len(kind);
    let map = match kind {
        Attribute::Vertex => compact(&mut model.vertices, keep),
        Attribute::Texture => compact(&mut model.texture_vertices, keep),
        Attribute::Normal => compact(&mut model.normals, keep),
    };
    remap(&mut model.polygons, kind, &map);
    (before - model.attribute_len(kind), map)
}

/// Remove polygons, optionally pruning attributes that only the removed
/// polygons used. Returns the report and the vertex renumbering (identity
/// when nothing was pruned).
fn remove_polygons(
    model: &mut Model,
    polygon_positions: &HashSet<usize>,
    prune_orphaned_attributes: bool,
) -> (DeletionReport, IndexMap) {
    let used_before = prune_orphaned_attributes
        .then(|| Attribute::ALL.map(|kind| used_indices(&model.polygons, kind)));

    let before = model.polygons.len();
    let mut position = 0;
    model.polygons.retain(|_| {
        let kept = !polygon_positions.contains(&position);
        position += 1;
        kept
    });

    let mut report = DeletionReport {
        polygons: before - model.polygons.len(),
        ..DeletionReport::default()
    };
    let mut vertex_map: IndexMap = (0..model.vertices.len()).map(|i| (i, i)).collect();

    if let Some(used_before) = used_before {
        for (kind, used_before) in Attribute::ALL.into_iter().zip(used_before.iter()) {
            let used_after = used_indices(&model.polygons, kind);
            let keep = orphan_keep_set(model.attribute_len(kind), used_before, &used_after);
            let (removed, map) = compact_attribute(model, kind, &keep);
            report.record(kind, removed);
            if kind == Attribute::Vertex {
                vertex_map = map;
            }
        }
    }

    (report, vertex_map)
}

/// Delete the polygons at `polygon_positions`.
///
/// With `prune_orphaned_attributes`, each attribute array is compacted so
/// that entries used only by the deleted polygons disappear, while entries
/// that no polygon used before the call are kept.
pub fn delete_polygons(
    model: &mut Model,
    polygon_positions: &HashSet<usize>,
    prune_orphaned_attributes: bool,
) -> DeletionReport {
    let (report, _) = remove_polygons(model, polygon_positions, prune_orphaned_attributes);
    log::debug!("delete_polygons: {}", report);
    report
}

/// Delete the vertices at `vertex_positions` together with every polygon
/// that uses one of them.
///
/// Cascaded polygon removal prunes attributes the way [`delete_polygons`]
/// does. With `remove_already_free_vertices`, requested vertices that no
/// polygon used to begin with are purged as well.
pub fn delete_vertices(
    model: &mut Model,
    vertex_positions: &HashSet<usize>,
    remove_already_free_vertices: bool,
) -> DeletionReport {
    let original_len = model.vertices.len();
    let initially_used = used_indices(&model.polygons, Attribute::Vertex);

    let cascade = polygons_using_vertices(&model.polygons, vertex_positions);
    let (mut report, vertex_map) = remove_polygons(model, &cascade, true);

    if remove_already_free_vertices {
        // The rule is stated over pre-edit positions; carry it through the
        // first pass's renumbering.
        let keep: HashSet<usize> =
            free_vertex_keep_set(original_len, vertex_positions, &initially_used)
                .iter()
                .filter_map(|old| vertex_map.get(old).copied())
                .collect();
        let (removed, _) = compact_attribute(model, Attribute::Vertex, &keep);
        report.vertices += removed;
    }

    log::debug!("delete_vertices: {}", report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vector2, Vector3};

    fn set(items: &[usize]) -> HashSet<usize> {
        items.iter().copied().collect()
    }

    fn vertex(id: f64) -> Vector3 {
        Vector3::new(id, 0.0, 0.0)
    }

    /// Vertices A..D = 0..3, triangles (0,1,2) and (1,2,3)
    fn two_triangles() -> Model {
        let mut model = Model::new();
        for id in 0..4 {
            model.add_vertex(vertex(id as f64));
        }
        model.add_polygon(Polygon::triangle(0, 1, 2));
        model.add_polygon(Polygon::triangle(1, 2, 3));
        model
    }

    fn assert_in_bounds(model: &Model) {
        assert!(model.validate().is_ok(), "{:?}", model.validate());
    }

    #[test]
    fn test_delete_polygon_prunes_exclusive_vertex() {
        let mut model = two_triangles();
        let report = delete_polygons(&mut model, &set(&[0]), true);

        assert_eq!(report.polygons, 1);
        assert_eq!(report.vertices, 1);
        assert_eq!(model.vertices, vec![vertex(1.0), vertex(2.0), vertex(3.0)]);
        assert_eq!(model.polygons, vec![Polygon::triangle(0, 1, 2)]);
    }

    #[test]
    fn test_delete_polygon_without_pruning() {
        let mut model = two_triangles();
        let report = delete_polygons(&mut model, &set(&[0]), false);

        assert_eq!(report.polygons, 1);
        assert_eq!(report.vertices, 0);
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.polygons, vec![Polygon::triangle(1, 2, 3)]);
    }

    #[test]
    fn test_empty_deletion_is_noop() {
        let mut model = Model::cube(1.0);
        model.texture_vertices.push(Vector2::new(0.5, 0.5));
        let before = model.clone();

        let report = delete_polygons(&mut model, &HashSet::new(), true);
        assert!(report.is_empty());
        assert_eq!(model, before);
    }

    #[test]
    fn test_out_of_range_positions_ignored() {
        let mut model = two_triangles();
        let before = model.clone();
        let report = delete_polygons(&mut model, &set(&[2, 17]), true);
        assert!(report.is_empty());
        assert_eq!(model, before);
    }

    #[test]
    fn test_delete_all_polygons() {
        let mut model = two_triangles();
        model.add_vertex(vertex(9.0));
        let report = delete_polygons(&mut model, &set(&[0, 1]), true);

        assert_eq!(report.polygons, 2);
        assert!(model.polygons.is_empty());
        // the free vertex was never used, so it stays
        assert_eq!(model.vertices, vec![vertex(9.0)]);
    }

    #[test]
    fn test_preexisting_orphans_survive_pruning() {
        let mut model = Model::new();
        for id in 0..4 {
            model.add_vertex(vertex(id as f64));
        }
        for i in 0..5 {
            model.texture_vertices.push(Vector2::new(i as f64, 0.0));
        }
        model.normals.push(Vector3::new(0.0, 0.0, 1.0));
        model.normals.push(Vector3::new(0.0, 1.0, 0.0));
        model.add_polygon(Polygon::with_attributes(vec![0, 1, 2], vec![0, 1, 2], vec![0, 0, 0]).unwrap());
        model.add_polygon(Polygon::with_attributes(vec![1, 2, 3], vec![1, 2, 4], vec![1, 1, 1]).unwrap());
        // texture 3 is unused from the start

        let report = delete_polygons(&mut model, &set(&[0]), true);

        assert_eq!(report.vertices, 1);
        assert_eq!(report.texture_vertices, 1);
        assert_eq!(report.normals, 1);
        assert_eq!(
            model.texture_vertices,
            vec![
                Vector2::new(1.0, 0.0),
                Vector2::new(2.0, 0.0),
                Vector2::new(3.0, 0.0),
                Vector2::new(4.0, 0.0)
            ]
        );
        assert_eq!(model.normals, vec![Vector3::new(0.0, 1.0, 0.0)]);

        let polygon = &model.polygons[0];
        assert_eq!(polygon.vertex_indices(), &[0, 1, 2]);
        assert_eq!(polygon.texture_indices(), &[0, 1, 3]);
        assert_eq!(polygon.normal_indices(), &[0, 0, 0]);
        assert_in_bounds(&model);
    }

    #[test]
    fn test_unmapped_indices_left_unchanged() {
        let mut model = Model::new();
        for id in 0..3 {
            model.add_vertex(vertex(id as f64));
        }
        model.add_polygon(Polygon::triangle(0, 1, 2));
        model.add_polygon(Polygon::triangle(0, 1, 9));

        delete_polygons(&mut model, &set(&[0]), true);

        assert_eq!(model.vertices, vec![vertex(0.0), vertex(1.0)]);
        assert_eq!(model.polygons, vec![Polygon::triangle(0, 1, 9)]);
    }

    #[test]
    fn test_indices_stay_in_bounds_for_every_single_deletion() {
        let cube = Model::cube(2.0);
        for position in 0..cube.polygon_count() {
            let mut model = cube.clone();
            delete_polygons(&mut model, &set(&[position]), true);
            assert_eq!(model.polygon_count(), 11);
            assert_in_bounds(&model);
        }
    }

    #[test]
    fn test_indices_stay_in_bounds_for_face_pairs() {
        let cube = Model::cube(2.0);
        for face in 0..6 {
            let mut model = cube.clone();
            let report = delete_polygons(&mut model, &set(&[2 * face, 2 * face + 1]), true);
            // every cube corner is shared by three faces
            assert_eq!(report.vertices, 0);
            assert_eq!(report.normals, 1);
            assert_eq!(model.normals.len(), 5);
            assert_in_bounds(&model);
        }
    }

    #[test]
    fn test_delete_vertex_cascades() {
        let mut model = two_triangles();
        let report = delete_vertices(&mut model, &set(&[0]), true);

        assert_eq!(report.polygons, 1);
        assert_eq!(report.vertices, 1);
        assert_eq!(model.vertices, vec![vertex(1.0), vertex(2.0), vertex(3.0)]);
        assert_eq!(model.polygons, vec![Polygon::triangle(0, 1, 2)]);
    }

    #[test]
    fn test_delete_vertices_purges_requested_free_vertex() {
        let mut model = two_triangles();
        model.add_vertex(vertex(4.0)); // E, unused

        let report = delete_vertices(&mut model, &set(&[0, 4]), true);

        assert_eq!(report.polygons, 1);
        assert_eq!(report.vertices, 2);
        assert_eq!(model.vertices, vec![vertex(1.0), vertex(2.0), vertex(3.0)]);
        assert_eq!(model.polygons, vec![Polygon::triangle(0, 1, 2)]);
    }

    #[test]
    fn test_delete_vertices_keeps_free_vertex_without_flag() {
        let mut model = two_triangles();
        model.add_vertex(vertex(4.0));

        let report = delete_vertices(&mut model, &set(&[0, 4]), false);

        assert_eq!(report.polygons, 1);
        assert_eq!(report.vertices, 1);
        assert_eq!(
            model.vertices,
            vec![vertex(1.0), vertex(2.0), vertex(3.0), vertex(4.0)]
        );
        assert_eq!(model.polygons, vec![Polygon::triangle(0, 1, 2)]);
    }

    #[test]
    fn test_unrequested_free_vertex_survives_purge() {
        let mut model = two_triangles();
        model.add_vertex(vertex(4.0));
        model.add_vertex(vertex(5.0));

        delete_vertices(&mut model, &set(&[5]), true);

        assert_eq!(model.vertex_count(), 5);
        assert_eq!(model.vertices[4], vertex(4.0));
        assert_eq!(model.polygon_count(), 2);
    }

    #[test]
    fn test_purge_only_touches_vertices() {
        let mut model = two_triangles();
        model.add_vertex(vertex(4.0));
        model.texture_vertices.push(Vector2::new(0.0, 0.0));

        delete_vertices(&mut model, &set(&[4]), true);

        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.texture_vertices.len(), 1);
        assert_eq!(model.polygon_count(), 2);
    }

    #[test]
    fn test_no_survivor_uses_deleted_vertex() {
        let cube = Model::cube(1.0);
        let requested = set(&[0, 6]);
        let doomed: Vec<Vector3> = requested.iter().map(|&i| cube.vertices[i]).collect();

        let mut model = cube.clone();
        delete_vertices(&mut model, &requested, true);

        assert_in_bounds(&model);
        for polygon in &model.polygons {
            for &v in polygon.vertex_indices() {
                assert!(!doomed.contains(&model.vertices[v]));
            }
        }
    }

    #[test]
    fn test_keep_rules() {
        let before = set(&[0, 1, 2, 3]);
        let after = set(&[1, 2, 3]);
        assert_eq!(orphan_keep_set(5, &before, &after), set(&[1, 2, 3, 4]));

        let requested = set(&[0, 4]);
        assert_eq!(free_vertex_keep_set(5, &requested, &before), set(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_polygons_using_vertices() {
        let model = two_triangles();
        assert_eq!(polygons_using_vertices(&model.polygons, &set(&[3])), set(&[1]));
        assert_eq!(polygons_using_vertices(&model.polygons, &set(&[1])), set(&[0, 1]));
        assert!(polygons_using_vertices(&model.polygons, &set(&[8])).is_empty());
    }

    #[test]
    fn test_compact_renumbers_in_order() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        let map = compact(&mut items, &set(&[1, 3]));
        assert_eq!(items, vec!['b', 'd']);
        assert_eq!(map.get(&1), Some(&0));
        assert_eq!(map.get(&3), Some(&1));
        assert_eq!(map.get(&0), None);
    }
}
