//! Final normals for a rebuilt mesh.

use crate::algo::normals::compute_vertex_normals;
use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL};

use super::partition::ExtraGroup;

/// Recompute normals on `mesh` and optionally restore authored ones.
///
/// `original` is the normal attribute of the mesh before splitting. Without
/// it the rebuilt mesh gets no normals. Otherwise smooth normals are
/// recomputed everywhere. When `preserve_unaffected` is set, every source
/// vertex that no extra group came from gets its original normal back;
/// vertices that were split, and the vertices split off them, keep the
/// recomputed ones. Returns the number of restored normals.
pub fn reconcile_normals(
    mesh: &mut TriangleMesh,
    original: Option<&VertexAttribute>,
    extra: &[ExtraGroup],
    preserve_unaffected: bool,
) -> usize {
    let Some(original) = original else {
        mesh.remove_attribute(NORMAL);
        return 0;
    };

    compute_vertex_normals(mesh);
    if !preserve_unaffected {
        return 0;
    }

    let mut affected = vec![false; original.count()];
    for group in extra {
        affected[group.source as usize] = true;
    }

    let Some(normals) = mesh.attribute_mut(NORMAL) else {
        return 0;
    };

    let mut restored = 0;
    for (v, _) in affected.iter().enumerate().filter(|&(_, &hit)| !hit) {
        normals.get_mut(v).copy_from_slice(original.get(v));
        restored += 1;
    }
    restored
}
