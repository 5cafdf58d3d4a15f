//! PLY (Stanford polygon) format support.
//!
//! This module provides loading and saving of meshes in the PLY format,
//! also known as the Polygon File Format or Stanford Triangle Format.
//!
//! Vertex properties `x y z` are required. Normals (`nx ny nz`) and texture
//! coordinates (`s t`, `u v` or `texture_u texture_v`) are read when every
//! vertex has them.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL, POSITION, UV};

const UV_NAMES: [(&str, &str); 3] = [("s", "t"), ("u", "v"), ("texture_u", "texture_v")];

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut positions = Vec::with_capacity(vertex_element.len() * 3);
    for vertex in vertex_element {
        for axis in ["x", "y", "z"] {
            let value = get_float_property(vertex, axis)
                .ok_or_else(|| load_error(&format!("vertex missing {axis} coordinate")))?;
            positions.push(value);
        }
    }

    let normals = read_all(vertex_element, &["nx", "ny", "nz"]);
    let uvs = UV_NAMES
        .iter()
        .find_map(|&(u, v)| read_all(vertex_element, &[u, v]));

    // Extract faces
    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut indices: Vec<u32> = Vec::with_capacity(face_element.len() * 3);
    for face in face_element {
        let corners = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;

        // Fan-triangulate polygons
        for i in 1..corners.len().saturating_sub(1) {
            indices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
        }
    }

    if indices.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    let mut mesh = TriangleMesh::indexed(indices)
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

/// Read the named float properties of every element, or `None` if any is missing.
fn read_all(elements: &[DefaultElement], names: &[&str]) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(elements.len() * names.len());
    for element in elements {
        for name in names {
            values.push(get_float_property(element, name)?);
        }
    }
    Some(values)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<u32>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as u32).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Normals and texture coordinates are written when present.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::ply;
/// use edgesplit::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let normals = mesh.attribute(NORMAL);
    let uvs = mesh.attribute(UV);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by edgesplit")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    if normals.is_some() {
        writeln!(writer, "property double nx")?;
        writeln!(writer, "property double ny")?;
        writeln!(writer, "property double nz")?;
    }
    if uvs.is_some() {
        writeln!(writer, "property double s")?;
        writeln!(writer, "property double t")?;
    }
    writeln!(writer, "element face {}", mesh.triangle_count())?;
    writeln!(writer, "property list uchar uint vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for v in 0..mesh.vertex_count() {
        let p = mesh.position(v);
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let Some(normals) = normals {
            let [x, y, z] = normals.vec3(v);
            write!(writer, " {} {} {}", x, y, z)?;
        }
        if let Some(uvs) = uvs {
            let uv = uvs.get(v);
            write!(writer, " {} {}", uv[0], uv.get(1).copied().unwrap_or(0.0))?;
        }
        writeln!(writer)?;
    }

    // Write faces
    for [a, b, c] in mesh.triangles() {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    writer.flush()?;
    Ok(())
}
