//! STL (stereolithography) format support.
//!
//! This module provides loading and saving of meshes in the STL format,
//! commonly used for 3D printing. Both binary and ASCII files are read.
//!
//! STL stores three positions per triangle and never shares vertices, so a
//! loaded STL is a non-indexed triangle soup. Its per-facet normal is copied
//! to the three corners of the facet.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Vector3;

use crate::algo::normals::face_normal;
use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL, POSITION};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::stl;
///
/// let soup = stl::load("model.stl").unwrap();
/// assert!(!soup.is_indexed());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut positions = Vec::with_capacity(stl.faces.len() * 9);
    let mut normals = Vec::with_capacity(stl.faces.len() * 9);

    for tri in &stl.faces {
        let n = Vector3::new(
            tri.normal[0] as f64,
            tri.normal[1] as f64,
            tri.normal[2] as f64,
        );
        // Some exporters write zero facet normals; fall back to the winding.
        let corners = tri.vertices.map(|i| {
            let p = &stl.vertices[i];
            nalgebra::Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
        });
        let n = n
            .try_normalize(0.0)
            .unwrap_or_else(|| face_normal(&corners[0], &corners[1], &corners[2]));

        for p in &corners {
            positions.extend_from_slice(p.coords.as_slice());
            normals.extend_from_slice(n.as_slice());
        }
    }

    if positions.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no triangles".to_string(),
        });
    }

    Ok(TriangleMesh::non_indexed()
        .with_attribute(POSITION, VertexAttribute::new(3, positions))
        .with_attribute(NORMAL, VertexAttribute::new(3, normals)))
}

/// Save a mesh to a binary STL file.
///
/// Facet normals are recomputed from the geometry; vertex normals and every
/// other attribute are not stored.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::stl;
/// use edgesplit::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = (0..mesh.triangle_count())
        .map(|t| {
            let [p0, p1, p2] = mesh.triangle_positions(t);
            let n = face_normal(&p0, &p1, &p2);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::from_triangles;
    use nalgebra::Point3;

    #[test]
    fn test_save_then_load_is_a_soup() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();

        let path = std::env::temp_dir().join(format!("edgesplit-stl-{}.stl", std::process::id()));
        save(&mesh, &path).unwrap();
        let soup = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!soup.is_indexed());
        assert_eq!(soup.vertex_count(), 6);
        assert_eq!(soup.triangle_count(), 2);
        assert_eq!(soup.position(5), Point3::new(0.0, 1.0, 0.0));
        for v in 0..6 {
            assert!((soup.normal(v).unwrap() - Vector3::z()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load("/nonexistent/edgesplit/missing.stl"),
            Err(MeshError::Io(_))
        ));
    }
}
