//! Materializing corner groups as new vertices.

use std::collections::BTreeMap;

use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexAttribute};

use super::partition::ExtraGroup;

/// Build a new mesh in which every extra group references its own vertex.
///
/// The first `V` vertices of every attribute are the source vertices,
/// unchanged. Extra group `i` gets vertex `V + i`, whose values in every
/// attribute are copied from the group's source vertex, and its corners are
/// rewritten to point at it. All other corners keep their index, so triangle
/// count and winding are preserved.
///
/// `indices` must be the index buffer of `mesh`. Fails with
/// [`MeshError::InvalidMeshTopology`] if the grown vertex count no longer
/// fits a `u32` index.
pub fn rebuild(
    mesh: &TriangleMesh,
    indices: &[u32],
    extra: &[ExtraGroup],
) -> Result<TriangleMesh> {
    let vertex_count = mesh.vertex_count();
    let total = vertex_count + extra.len();

    let attributes: BTreeMap<String, VertexAttribute> = mesh
        .attributes()
        .map(|(name, attr)| {
            let mut values = Vec::with_capacity(total * attr.item_size());
            values.extend_from_slice(attr.values());
            let mut grown = VertexAttribute::new(attr.item_size(), values);
            for group in extra {
                grown.push_copy_of(group.source as usize);
            }
            (name.to_string(), grown)
        })
        .collect();

    let mut new_indices = indices.to_vec();
    for (i, group) in extra.iter().enumerate() {
        let slot = vertex_slot(vertex_count + i)?;
        for &corner in &group.corners {
            new_indices[corner] = slot;
        }
    }

    Ok(TriangleMesh::from_parts(Some(new_indices), attributes))
}

/// Convert a vertex position into an index buffer entry.
pub(super) fn vertex_slot(vertex: usize) -> Result<u32> {
    u32::try_from(vertex).map_err(|_| {
        MeshError::topology(format!(
            "vertex {} does not fit a 32-bit index buffer",
            vertex
        ))
    })
}
