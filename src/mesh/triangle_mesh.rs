//! Indexed triangle mesh with named attribute buffers.

use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use super::attribute::{VertexAttribute, NORMAL, POSITION, UV};
use crate::error::{MeshError, Result};

/// A triangle list with parallel per-vertex attribute buffers.
///
/// The mesh is either *indexed*, where every three consecutive index buffer
/// entries form a triangle, or *non-indexed*, where every three consecutive
/// vertices form a triangle. A slot in the index buffer is called a corner.
///
/// Attributes are kept in a sorted map so every operation that walks them
/// visits them in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    indices: Option<Vec<u32>>,
    attributes: BTreeMap<String, VertexAttribute>,
}

impl TriangleMesh {
    /// Create an empty indexed mesh.
    pub fn new() -> Self {
        Self::indexed(Vec::new())
    }

    /// Create an indexed mesh with the given index buffer and no attributes.
    pub fn indexed(indices: Vec<u32>) -> Self {
        Self {
            indices: Some(indices),
            attributes: BTreeMap::new(),
        }
    }

    /// Create a non-indexed mesh with no attributes.
    pub fn non_indexed() -> Self {
        Self {
            indices: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a mesh from raw parts.
    pub fn from_parts(
        indices: Option<Vec<u32>>,
        attributes: BTreeMap<String, VertexAttribute>,
    ) -> Self {
        Self {
            indices,
            attributes,
        }
    }

    /// Decompose the mesh into its index buffer and attribute map.
    pub fn into_parts(self) -> (Option<Vec<u32>>, BTreeMap<String, VertexAttribute>) {
        (self.indices, self.attributes)
    }

    /// Builder-style attribute insertion.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: VertexAttribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    // ==================== Attributes ====================

    /// Insert or replace an attribute, returning the previous one.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: VertexAttribute,
    ) -> Option<VertexAttribute> {
        self.attributes.insert(name.into(), attribute)
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, name: &str) -> Option<VertexAttribute> {
        self.attributes.remove(name)
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.get(name)
    }

    /// Mutable lookup of an attribute by name.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut VertexAttribute> {
        self.attributes.get_mut(name)
    }

    /// Iterate over `(name, attribute)` pairs in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &VertexAttribute)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the mesh carries a normal attribute.
    pub fn has_normals(&self) -> bool {
        self.attributes.contains_key(NORMAL)
    }

    /// Whether the mesh carries texture coordinates.
    pub fn has_uvs(&self) -> bool {
        self.attributes.contains_key(UV)
    }

    // ==================== Topology ====================

    /// The index buffer, or `None` for a non-indexed mesh.
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Replace the index buffer.
    pub fn set_indices(&mut self, indices: Option<Vec<u32>>) {
        self.indices = indices;
    }

    /// Whether the mesh has an index buffer.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices, taken from the position attribute.
    pub fn vertex_count(&self) -> usize {
        self.attributes.get(POSITION).map_or(0, VertexAttribute::count)
    }

    /// Number of corners (index buffer slots, or vertices when non-indexed).
    pub fn corner_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertex_count(),
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.corner_count() / 3
    }

    /// Vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let i = 3 * t;
        match &self.indices {
            Some(indices) => [indices[i], indices[i + 1], indices[i + 2]],
            None => [i as u32, i as u32 + 1, i as u32 + 2],
        }
    }

    /// Iterate over the vertex indices of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle(t))
    }

    // ==================== Geometry ====================

    /// Position of vertex `v`. Panics if the mesh has no position attribute.
    pub fn position(&self, v: usize) -> Point3<f64> {
        let [x, y, z] = self.attributes[POSITION].vec3(v);
        Point3::new(x, y, z)
    }

    /// Normal of vertex `v`, if the mesh has normals.
    pub fn normal(&self, v: usize) -> Option<Vector3<f64>> {
        self.attributes.get(NORMAL).map(|n| {
            let [x, y, z] = n.vec3(v);
            Vector3::new(x, y, z)
        })
    }

    /// Positions of the three corners of triangle `t`.
    pub fn triangle_positions(&self, t: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.triangle(t);
        [
            self.position(a as usize),
            self.position(b as usize),
            self.position(c as usize),
        ]
    }

    /// Compute the axis-aligned bounding box of the vertex positions.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let positions = self.attributes.get(POSITION)?;
        let mut items = positions.iter();
        let first = items.next()?;
        let mut min = Point3::new(first[0], first[1], first[2]);
        let mut max = min;

        for p in items {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Validation ====================

    /// Check that the index buffer and attribute buffers are consistent.
    ///
    /// A valid mesh has a three-component position attribute, normals with
    /// three components and texture coordinates with two, every attribute
    /// holds a whole number of items and the same vertex count as the
    /// positions, the corner count is a multiple of three, and every index is
    /// below the vertex count.
    pub fn validate(&self) -> Result<()> {
        let positions = self
            .attributes
            .get(POSITION)
            .ok_or_else(|| MeshError::topology("mesh has no position attribute"))?;
        if positions.item_size() != 3 {
            return Err(MeshError::topology(format!(
                "position attribute has item size {}, expected 3",
                positions.item_size()
            )));
        }

        for (name, expected) in [(NORMAL, 3), (UV, 2)] {
            if let Some(attr) = self.attributes.get(name) {
                if attr.item_size() != expected {
                    return Err(MeshError::topology(format!(
                        "{} attribute has item size {}, expected {}",
                        name,
                        attr.item_size(),
                        expected
                    )));
                }
            }
        }

        let vertex_count = positions.count();
        for (name, attr) in &self.attributes {
            if !attr.is_well_formed() || attr.count() != vertex_count {
                return Err(MeshError::attribute_mismatch(
                    name,
                    attr.values().len(),
                    attr.item_size(),
                    vertex_count,
                ));
            }
        }

        if self.corner_count() % 3 != 0 {
            return Err(MeshError::topology(format!(
                "{} corners do not form whole triangles",
                self.corner_count()
            )));
        }

        if let Some(indices) = &self.indices {
            if let Some((corner, &vertex)) = indices
                .iter()
                .enumerate()
                .find(|&(_, &v)| v as usize >= vertex_count)
            {
                return Err(MeshError::index_out_of_range(corner, vertex, vertex_count));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> TriangleMesh {
        TriangleMesh::indexed(vec![0, 1, 2]).with_attribute(
            POSITION,
            VertexAttribute::from_vec3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        )
    }

    #[test]
    fn test_counts() {
        let mesh = single_triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert!(mesh.is_indexed());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_non_indexed_triangles() {
        let mut mesh = single_triangle();
        mesh.set_indices(None);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut mesh = single_triangle();
        mesh.set_indices(Some(vec![0, 1, 3]));
        let err = mesh.validate().unwrap_err();
        assert!(matches!(err, MeshError::InvalidMeshTopology { .. }));
        assert!(err.to_string().contains("corner 2"));
    }

    #[test]
    fn test_attribute_count_mismatch_rejected() {
        let mesh = single_triangle()
            .with_attribute(UV, VertexAttribute::from_vec2(&[[0.0, 0.0], [1.0, 0.0]]));
        let err = mesh.validate().unwrap_err();
        assert!(err.to_string().contains("'uv'"));
    }

    #[test]
    fn test_missing_positions_rejected() {
        let mesh = TriangleMesh::indexed(vec![0, 1, 2]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::InvalidMeshTopology { .. })
        ));
    }

    #[test]
    fn test_wrong_item_sizes_rejected() {
        let flat_normals =
            single_triangle().with_attribute(NORMAL, VertexAttribute::new(2, vec![0.0; 6]));
        let err = flat_normals.validate().unwrap_err();
        assert!(matches!(err, MeshError::InvalidMeshTopology { .. }));
        assert!(err.to_string().contains("normal"));

        let wide_normals =
            single_triangle().with_attribute(NORMAL, VertexAttribute::new(4, vec![0.0; 12]));
        assert!(matches!(
            wide_normals.validate(),
            Err(MeshError::InvalidMeshTopology { .. })
        ));

        let deep_uvs =
            single_triangle().with_attribute(UV, VertexAttribute::new(3, vec![0.0; 9]));
        assert!(matches!(
            deep_uvs.validate(),
            Err(MeshError::InvalidMeshTopology { .. })
        ));
    }

    #[test]
    fn test_partial_triangle_rejected() {
        let mut mesh = single_triangle();
        mesh.set_indices(Some(vec![0, 1, 2, 0]));
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_bounding_box() {
        let mesh = single_triangle();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }
}
