//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes in various formats.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Positions, normals, UVs |
//! | STL | `.stl` | ✓ | ✓ | Loads as a triangle soup; saves binary |
//! | PLY | `.ply` | ✓ | ✓ | Stanford polygon format; saves ASCII |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | All triangle primitives, merged |
//!
//! Every loader returns a [`TriangleMesh`]. OBJ, PLY and glTF produce indexed
//! meshes; STL has no shared vertices and produces a non-indexed soup, which
//! must be welded (see [`crate::mesh::VertexWelder`]) before splitting.
//!
//! # Usage
//!
//! ```no_run
//! use edgesplit::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("model.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.ply").unwrap();
//! ```
//!
//! You can also use format-specific functions:
//!
//! ```no_run
//! use edgesplit::io::obj;
//!
//! let mesh = obj::load("model.obj").unwrap();
//! obj::save(&mesh, "output.obj").unwrap();
//! ```

pub mod gltf;
pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriangleMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::load;
///
/// let mesh = load("model.obj").unwrap();
/// println!("{} triangles", mesh.triangle_count());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }?;
    log::debug!(
        "loaded {}: {} vertices, {} triangles, indexed: {}",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.is_indexed()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::save;
/// use edgesplit::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::new();
/// save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Gltf | Format::Glb => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not yet supported".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/model.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("part.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("scan.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("scene.glb"), Some(Format::Glb));
        assert_eq!(Format::from_path("scene.gltf"), Some(Format::Gltf));
        assert_eq!(Format::from_path("notes.txt"), None);
        assert_eq!(Format::from_path("no_extension"), None);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let mesh = TriangleMesh::new();
        assert!(matches!(
            save(&mesh, "out.xyz"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "xyz"
        ));
        assert!(matches!(
            load("in"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "(none)"
        ));
    }

    #[test]
    fn test_gltf_save_is_unsupported() {
        let mesh = TriangleMesh::new();
        assert!(matches!(
            save(&mesh, "out.glb"),
            Err(MeshError::SaveError { .. })
        ));
    }
}
