//! Partitioning a vertex's corners into normal-compatible groups.
//!
//! Two corners are compatible when the dot product of their face normals is
//! at least the threshold. For each vertex the corners are split greedily:
//!
//! 1. Every remaining corner is tried as a seed. Its trial group is the seed
//!    plus every other remaining corner compatible with the seed.
//! 2. The largest trial group wins; on ties the seed scanned first wins.
//! 3. The winning group is emitted and the rest are partitioned again.
//!
//! This is not a minimum partition. Corner order decides ties, so the
//! result depends on index buffer order and must be computed with corners
//! in ascending slot order to be reproducible.

use nalgebra::Vector3;
use rayon::prelude::*;

use super::corners::CornerIndex;
use super::rebuild::vertex_slot;
use crate::error::Result;

/// A group of corners that must move to a freshly allocated vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraGroup {
    /// The vertex the corners referenced before splitting.
    pub source: u32,
    /// Corner slots in the group, seed first.
    pub corners: Vec<usize>,
}

#[inline]
fn compatible(a: &Vector3<f64>, b: &Vector3<f64>, threshold: f64) -> bool {
    a.dot(b) >= threshold
}

/// Partition the corners of one vertex.
///
/// `face_normals[t]` is the normal of triangle `t`; corner `c` belongs to
/// triangle `c / 3`. Returns the groups in emission order. The first group
/// keeps the vertex; each later one needs a new vertex. Each group lists its
/// seed first, followed by the other members in their original order.
pub fn partition_corners(
    corners: &[usize],
    face_normals: &[Vector3<f64>],
    threshold: f64,
) -> Vec<Vec<usize>> {
    let normal = |c: usize| &face_normals[c / 3];

    let mut groups = Vec::new();
    let mut remaining = corners.to_vec();

    while !remaining.is_empty() {
        let mut seed_at = 0;
        let mut best_size = 0;

        for (i, &seed) in remaining.iter().enumerate() {
            let seed_normal = normal(seed);
            let size = 1 + remaining
                .iter()
                .filter(|&&c| c != seed && compatible(normal(c), seed_normal, threshold))
                .count();
            if size > best_size {
                best_size = size;
                seed_at = i;
            }
        }

        let seed = remaining[seed_at];
        let seed_normal = normal(seed);
        let mut group = Vec::with_capacity(best_size);
        group.push(seed);
        let mut rest = Vec::with_capacity(remaining.len() - best_size);
        for &c in &remaining {
            if c == seed {
                continue;
            }
            if compatible(normal(c), seed_normal, threshold) {
                group.push(c);
            } else {
                rest.push(c);
            }
        }

        groups.push(group);
        remaining = rest;
    }

    groups
}

/// Partition every vertex and collect the groups that need new vertices.
///
/// The result is ordered by source vertex, then by emission order within a
/// vertex, so a new vertex's slot is the original vertex count plus its
/// position in the returned list. With `parallel` set, vertices are
/// partitioned on the rayon pool; the output is identical either way.
pub fn extra_groups(
    index: &CornerIndex,
    face_normals: &[Vector3<f64>],
    threshold: f64,
    parallel: bool,
) -> Result<Vec<ExtraGroup>> {
    let split_vertex = |v: usize| -> Result<Vec<ExtraGroup>> {
        let groups = partition_corners(index.corners(v), face_normals, threshold);
        if groups.len() < 2 {
            return Ok(Vec::new());
        }
        let source = vertex_slot(v)?;
        Ok(groups
            .into_iter()
            .skip(1)
            .map(|corners| ExtraGroup { source, corners })
            .collect())
    };

    let per_vertex: Vec<Vec<ExtraGroup>> = if parallel {
        (0..index.vertex_count())
            .into_par_iter()
            .map(split_vertex)
            .collect::<Result<_>>()?
    } else {
        (0..index.vertex_count())
            .map(split_vertex)
            .collect::<Result<_>>()?
    };

    Ok(per_vertex.into_iter().flatten().collect())
}
