//! glTF format support.
//!
//! This module provides loading of meshes from glTF and GLB files.
//! glTF is a modern 3D format designed for efficient transmission and loading.
//!
//! Note: Saving to glTF is not yet supported.

use std::path::Path;

use ::gltf::mesh::Mode;
use log::warn;

use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL, POSITION, UV};

/// Load a mesh from a glTF or GLB file.
///
/// This function loads all triangle primitives from the file and combines
/// them into a single indexed mesh. Primitives without an index buffer get
/// sequential indices. Normals and texture coordinates (set 0) are kept only
/// if every primitive provides them.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::gltf;
///
/// let mesh = gltf::load("model.gltf").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut positions: Vec<f64> = Vec::new();
    let mut normals: Option<Vec<f64>> = Some(Vec::new());
    let mut uvs: Option<Vec<f64>> = Some(Vec::new());
    let mut all_indices: Vec<u32> = Vec::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(read_positions) = reader.read_positions() else {
                continue;
            };
            let vertex_offset = (positions.len() / 3) as u32;
            let mut count = 0u32;
            for pos in read_positions {
                positions.extend(pos.iter().map(|&x| x as f64));
                count += 1;
            }

            normals = match (normals, reader.read_normals()) {
                (Some(mut acc), Some(read)) => {
                    acc.extend(read.flat_map(|n| n.map(|x| x as f64)));
                    Some(acc)
                }
                _ => None,
            };
            uvs = match (uvs, reader.read_tex_coords(0)) {
                (Some(mut acc), Some(read)) => {
                    acc.extend(read.into_f32().flat_map(|t| t.map(|x| x as f64)));
                    Some(acc)
                }
                _ => None,
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(read) => read.into_u32().collect(),
                None => (0..count).collect(),
            };

            // Convert to triangles based on primitive mode
            let mut push = |a: u32, b: u32, c: u32| {
                all_indices.extend_from_slice(&[
                    a + vertex_offset,
                    b + vertex_offset,
                    c + vertex_offset,
                ]);
            };
            match primitive.mode() {
                Mode::Triangles => {
                    for chunk in indices.chunks_exact(3) {
                        push(chunk[0], chunk[1], chunk[2]);
                    }
                }
                Mode::TriangleStrip => {
                    for i in 0..indices.len().saturating_sub(2) {
                        if i % 2 == 0 {
                            push(indices[i], indices[i + 1], indices[i + 2]);
                        } else {
                            // Reverse winding for odd triangles
                            push(indices[i], indices[i + 2], indices[i + 1]);
                        }
                    }
                }
                Mode::TriangleFan => {
                    for i in 1..indices.len().saturating_sub(1) {
                        push(indices[0], indices[i], indices[i + 1]);
                    }
                }
                mode => {
                    warn!("skipping non-triangle primitive ({:?})", mode);
                }
            }
        }
    }

    if all_indices.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "glTF file contains no triangle meshes".to_string(),
        });
    }

    let mut mesh = TriangleMesh::indexed(all_indices)
        .with_attribute(POSITION, VertexAttribute::new(3, positions));
    if let Some(normals) = normals {
        mesh.set_attribute(NORMAL, VertexAttribute::new(3, normals));
    }
    if let Some(uvs) = uvs {
        mesh.set_attribute(UV, VertexAttribute::new(2, uvs));
    }
    mesh.validate()?;
    Ok(mesh)
}
