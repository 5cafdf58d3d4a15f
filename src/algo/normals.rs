//! Face and vertex normals.
//!
//! - [`face_normal`]: unit normal of one triangle
//! - [`face_normals`]: one normal per triangle of a mesh
//! - [`compute_vertex_normals`]: smooth per-vertex normals, area-weighted
//!
//! All functions use the winding `cross(p2 - p1, p0 - p1)`, which points
//! out of a counter-clockwise triangle `(p0, p1, p2)`.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL};

/// Unnormalized normal of a triangle; its length is twice the triangle's area.
#[inline]
pub fn face_cross(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p2 - p1).cross(&(p0 - p1))
}

/// Unit normal of a triangle.
///
/// Zero-area triangles have no defined orientation and yield the zero
/// vector, so dot products against them stay finite (always `0.0`).
#[inline]
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    face_cross(p0, p1, p2)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

/// Compute one unit normal per triangle.
///
/// Entry `t` belongs to triangle `t` and is shared by its three corners.
/// Positions are read as stored; the mesh must be valid.
pub fn face_normals(mesh: &TriangleMesh, parallel: bool) -> Vec<Vector3<f64>> {
    let normal_of = |t: usize| {
        let [p0, p1, p2] = mesh.triangle_positions(t);
        face_normal(&p0, &p1, &p2)
    };

    if parallel {
        (0..mesh.triangle_count())
            .into_par_iter()
            .map(normal_of)
            .collect()
    } else {
        (0..mesh.triangle_count()).map(normal_of).collect()
    }
}

/// Number of triangles whose face normal is undefined.
pub fn count_degenerate(normals: &[Vector3<f64>]) -> usize {
    normals.iter().filter(|n| n.norm_squared() == 0.0).count()
}

/// Recompute smooth vertex normals and store them in the normal attribute.
///
/// Each triangle adds its unnormalized normal to each of its three vertices,
/// so larger faces weigh more; the sums are then normalized. Vertices that no
/// triangle references, or whose contributions cancel, get the zero vector.
/// Any existing normal attribute is replaced.
///
/// # Example
///
/// ```
/// use edgesplit::algo::normals::compute_vertex_normals;
/// use edgesplit::mesh::from_triangles;
/// use nalgebra::{Point3, Vector3};
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mut mesh = from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// compute_vertex_normals(&mut mesh);
/// assert_eq!(mesh.normal(0), Some(Vector3::z()));
/// ```
pub fn compute_vertex_normals(mesh: &mut TriangleMesh) {
    let mut sums = vec![Vector3::<f64>::zeros(); mesh.vertex_count()];

    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        let [p0, p1, p2] = mesh.triangle_positions(t);
        let n = face_cross(&p0, &p1, &p2);
        sums[a as usize] += n;
        sums[b as usize] += n;
        sums[c as usize] += n;
    }

    let mut values = Vec::with_capacity(sums.len() * 3);
    for sum in sums {
        let n = sum.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        values.extend_from_slice(n.as_slice());
    }

    mesh.set_attribute(NORMAL, VertexAttribute::new(3, values));
}
