//! Merging coincident vertices into an indexed mesh.
//!
//! Operations that work on corners need an index buffer. Triangle soups, as
//! produced by STL files or flat-shaded exporters, carry a private copy of
//! every vertex per triangle. A [`VertexMerger`] turns such a mesh into an
//! equivalent indexed one.

use std::collections::HashMap;

use log::debug;

use super::attribute::{VertexAttribute, NORMAL};
use super::triangle_mesh::TriangleMesh;
use crate::error::{MeshError, Result};

/// Converts a mesh into an equivalent indexed mesh.
pub trait VertexMerger {
    /// Produce an indexed mesh with the same triangles, in the same order and
    /// winding, as `mesh`.
    fn merge(&self, mesh: &TriangleMesh) -> Result<TriangleMesh>;
}

/// Welds vertices whose attribute values agree within a tolerance.
///
/// Each attribute value is quantized to `round(value / tolerance)`. Values
/// that are not finite, or too large for the grid, fail with
/// [`MeshError::InvalidMeshTopology`] instead of sharing a key. Vertices
/// with identical quantized keys collapse onto the first one encountered,
/// which keeps its exact values. Attributes listed in `ignored` do not take
/// part in the key; the surviving vertex keeps its own value for them.
///
/// Normals are ignored by default, so a faceted soup welds into a shared
/// topology whose hard edges can then be recovered from the geometry.
///
/// # Example
///
/// ```
/// use edgesplit::mesh::{MeshBuilder, VertexMerger, VertexWelder};
/// use nalgebra::Point3;
///
/// // Two triangles sharing an edge, stored as a soup of six vertices.
/// let mut builder = MeshBuilder::new();
/// for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]] {
///     builder.vertex(Point3::new(p[0], p[1], 0.0));
/// }
/// let soup = builder.build_non_indexed().unwrap();
///
/// let welded = VertexWelder::default().merge(&soup).unwrap();
/// assert_eq!(welded.vertex_count(), 4);
/// assert_eq!(welded.triangle_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VertexWelder {
    /// Quantization step for attribute values.
    pub tolerance: f64,

    /// Attribute names excluded from the weld key.
    pub ignored: Vec<String>,
}

impl Default for VertexWelder {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            ignored: vec![NORMAL.to_string()],
        }
    }
}

impl VertexWelder {
    /// Create a welder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantization tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Exclude another attribute from the weld key.
    pub fn ignoring(mut self, name: impl Into<String>) -> Self {
        self.ignored.push(name.into());
        self
    }

    /// Make every attribute, normals included, part of the weld key.
    pub fn matching_all_attributes(mut self) -> Self {
        self.ignored.clear();
        self
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|n| n == name)
    }
}

impl VertexMerger for VertexWelder {
    fn merge(&self, mesh: &TriangleMesh) -> Result<TriangleMesh> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MeshError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be positive and finite",
            ));
        }
        mesh.validate()?;

        let key_attributes: Vec<(&str, &VertexAttribute)> = mesh
            .attributes()
            .filter(|(name, _)| !self.is_ignored(name))
            .collect();

        let vertex_count = mesh.vertex_count();
        let mut lookup: HashMap<Vec<i64>, u32> = HashMap::with_capacity(vertex_count);
        let mut remap: Vec<u32> = Vec::with_capacity(vertex_count);
        let mut kept: Vec<usize> = Vec::new();

        for v in 0..vertex_count {
            let mut key: Vec<i64> = Vec::new();
            for (name, attr) in &key_attributes {
                for &x in attr.get(v) {
                    let step = quantize(x, self.tolerance).ok_or_else(|| {
                        MeshError::topology(format!(
                            "{} of vertex {} is {}, which cannot be welded at tolerance {}",
                            name, v, x, self.tolerance
                        ))
                    })?;
                    key.push(step);
                }
            }
            let next = kept.len() as u32;
            let id = *lookup.entry(key).or_insert_with(|| {
                kept.push(v);
                next
            });
            remap.push(id);
        }

        let attributes = mesh
            .attributes()
            .map(|(name, attr)| {
                let mut merged = VertexAttribute::with_capacity(attr.item_size(), kept.len());
                for &v in &kept {
                    merged.push(attr.get(v));
                }
                (name.to_string(), merged)
            })
            .collect();

        let indices: Vec<u32> = (0..mesh.triangle_count())
            .flat_map(|t| mesh.triangle(t))
            .map(|v| remap[v as usize])
            .collect();

        debug!(
            "welded {} vertices into {} (tolerance {})",
            vertex_count,
            kept.len(),
            self.tolerance
        );

        Ok(TriangleMesh::from_parts(Some(indices), attributes))
    }
}

/// Grid step of `value`, or `None` when it is not finite or the step
/// overflows an `i64` key.
#[inline]
fn quantize(value: f64, tolerance: f64) -> Option<i64> {
    let step = (value / tolerance).round();
    (step.is_finite() && step.abs() < i64::MAX as f64).then_some(step as i64)
}
