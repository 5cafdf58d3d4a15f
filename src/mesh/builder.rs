//! Mesh construction utilities.
//!
//! This module provides [`MeshBuilder`] for assembling meshes vertex by vertex
//! and [`from_triangles`] for the common case of a position list plus
//! triangle faces.

use std::collections::BTreeMap;

use nalgebra::{Point3, Vector2, Vector3};

use super::attribute::{VertexAttribute, NORMAL, POSITION, UV};
use super::triangle_mesh::TriangleMesh;
use crate::error::Result;

/// Build an indexed mesh from vertex positions and triangle faces.
///
/// # Example
/// ```
/// use edgesplit::mesh::from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
pub fn from_triangles(vertices: &[Point3<f64>], faces: &[[u32; 3]]) -> Result<TriangleMesh> {
    let mut builder = MeshBuilder::with_capacity(vertices.len(), faces.len());
    for &p in vertices {
        builder.vertex(p);
    }
    for &[a, b, c] in faces {
        builder.triangle(a, b, c);
    }
    builder.build()
}

/// Builder for constructing meshes vertex by vertex.
///
/// Normals and texture coordinates are optional, but if any vertex has one,
/// every vertex must; [`MeshBuilder::build`] rejects a mix.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<f64>,
    normals: Vec<f64>,
    uvs: Vec<f64>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with pre-allocated capacity.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Number of vertices added so far.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Add a vertex with a position only.
    pub fn vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(position.coords.as_slice());
        index
    }

    /// Add a vertex with position and normal.
    pub fn vertex_with_normal(&mut self, position: Point3<f64>, normal: Vector3<f64>) -> u32 {
        self.normals.extend_from_slice(normal.as_slice());
        self.vertex(position)
    }

    /// Add a vertex with position, normal and texture coordinate.
    pub fn vertex_with_normal_uv(
        &mut self,
        position: Point3<f64>,
        normal: Vector3<f64>,
        uv: Vector2<f64>,
    ) -> u32 {
        self.uvs.extend_from_slice(uv.as_slice());
        self.vertex_with_normal(position, normal)
    }

    /// Add a triangle from three vertex indices.
    pub fn triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Add a quad as two triangles `(i0, i1, i2)` and `(i0, i2, i3)`.
    pub fn quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.triangle(i0, i1, i2);
        self.triangle(i0, i2, i3);
    }

    fn attributes(self) -> (Vec<u32>, BTreeMap<String, VertexAttribute>) {
        let mut attributes = BTreeMap::new();
        attributes.insert(POSITION.to_string(), VertexAttribute::new(3, self.positions));
        if !self.normals.is_empty() {
            attributes.insert(NORMAL.to_string(), VertexAttribute::new(3, self.normals));
        }
        if !self.uvs.is_empty() {
            attributes.insert(UV.to_string(), VertexAttribute::new(2, self.uvs));
        }
        (self.indices, attributes)
    }

    /// Build an indexed mesh, validating indices and attribute lengths.
    pub fn build(self) -> Result<TriangleMesh> {
        let (indices, attributes) = self.attributes();
        let mesh = TriangleMesh::from_parts(Some(indices), attributes);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a non-indexed triangle soup, ignoring any triangles added.
    ///
    /// Every three consecutive vertices form one triangle.
    pub fn build_non_indexed(self) -> Result<TriangleMesh> {
        let (_, attributes) = self.attributes();
        let mesh = TriangleMesh::from_parts(None, attributes);
        mesh.validate()?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn test_build_quad() {
        let mut builder = MeshBuilder::new();
        let a = builder.vertex(Point3::new(0.0, 0.0, 0.0));
        let b = builder.vertex(Point3::new(1.0, 0.0, 0.0));
        let c = builder.vertex(Point3::new(1.0, 1.0, 0.0));
        let d = builder.vertex(Point3::new(0.0, 1.0, 0.0));
        builder.quad(a, b, c, d);

        let mesh = builder.build().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices().unwrap(), &[0, 1, 2, 0, 2, 3]);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_build_with_normals_and_uvs() {
        let mut builder = MeshBuilder::new();
        for i in 0..3 {
            builder.vertex_with_normal_uv(
                Point3::new(i as f64, (i % 2) as f64, 0.0),
                Vector3::z(),
                Vector2::new(0.5, 0.5),
            );
        }
        builder.triangle(0, 1, 2);

        let mesh = builder.build().unwrap();
        assert!(mesh.has_normals());
        assert!(mesh.has_uvs());
        assert_eq!(mesh.normal(2), Some(Vector3::z()));
    }

    #[test]
    fn test_mixed_normals_rejected() {
        let mut builder = MeshBuilder::new();
        builder.vertex_with_normal(Point3::origin(), Vector3::z());
        builder.vertex(Point3::new(1.0, 0.0, 0.0));
        builder.vertex(Point3::new(0.0, 1.0, 0.0));
        builder.triangle(0, 1, 2);

        assert!(matches!(
            builder.build(),
            Err(MeshError::InvalidMeshTopology { .. })
        ));
    }

    #[test]
    fn test_invalid_face_index() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(from_triangles(&vertices, &[[0, 1, 2]]).is_err());
    }

    #[test]
    fn test_build_non_indexed() {
        let mut builder = MeshBuilder::new();
        builder.vertex(Point3::origin());
        builder.vertex(Point3::new(1.0, 0.0, 0.0));
        builder.vertex(Point3::new(0.0, 1.0, 0.0));

        let mesh = builder.build_non_indexed().unwrap();
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 1);
    }
}
