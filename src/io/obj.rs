//! Wavefront OBJ format support.
//!
//! Reads `v`, `vt`, `vn` and `f` statements; everything else (groups,
//! materials, smoothing groups) is ignored. Face corners may be written as
//! `v`, `v/vt`, `v//vn` or `v/vt/vn`, with 1-based or negative (relative)
//! indices. Polygons are fan-triangulated.
//!
//! OBJ indexes positions, texture coordinates and normals separately. Each
//! distinct `(v, vt, vn)` triple becomes one mesh vertex, so a cube written
//! with per-face normals loads with 24 vertices and one written with
//! positions only loads with 8.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexAttribute, NORMAL, POSITION, UV};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// assert!(mesh.is_indexed());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file)).map_err(|message| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse OBJ data from any reader.
///
/// # Example
///
/// ```
/// use edgesplit::io::obj;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
/// let mesh = obj::read(text.as_bytes()).unwrap();
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
pub fn read<R: Read>(reader: R) -> Result<TriangleMesh> {
    parse(BufReader::new(reader)).map_err(|message| MeshError::LoadError {
        path: PathBuf::from("<reader>"),
        message,
    })
}

type Corner = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct ObjBuilder {
    positions: Vec<f64>,
    normals: Vec<f64>,
    uvs: Vec<f64>,
    with_normal: usize,
    with_uv: usize,
    indices: Vec<u32>,
    vertices: HashMap<Corner, u32>,
}

impl ObjBuilder {
    fn vertex(&mut self, corner: Corner, source: &ObjData) -> u32 {
        if let Some(&v) = self.vertices.get(&corner) {
            return v;
        }
        let (p, t, n) = corner;
        let v = (self.positions.len() / 3) as u32;
        self.positions.extend_from_slice(&source.positions[p]);
        match t {
            Some(t) => {
                self.uvs.extend_from_slice(&source.uvs[t]);
                self.with_uv += 1;
            }
            None => self.uvs.extend_from_slice(&[0.0, 0.0]),
        }
        match n {
            Some(n) => {
                self.normals.extend_from_slice(&source.normals[n]);
                self.with_normal += 1;
            }
            None => self.normals.extend_from_slice(&[0.0, 0.0, 0.0]),
        }
        self.vertices.insert(corner, v);
        v
    }

    fn finish(self) -> TriangleMesh {
        let count = self.positions.len() / 3;
        let mut mesh = TriangleMesh::indexed(self.indices)
            .with_attribute(POSITION, VertexAttribute::new(3, self.positions));

        if self.with_normal == count && count > 0 {
            mesh.set_attribute(NORMAL, VertexAttribute::new(3, self.normals));
        } else if self.with_normal > 0 {
            warn!(
                "dropping OBJ normals: only {} of {} vertices have one",
                self.with_normal, count
            );
        }
        if self.with_uv == count && count > 0 {
            mesh.set_attribute(UV, VertexAttribute::new(2, self.uvs));
        } else if self.with_uv > 0 {
            warn!(
                "dropping OBJ texture coordinates: only {} of {} vertices have one",
                self.with_uv, count
            );
        }
        mesh
    }
}

#[derive(Default)]
struct ObjData {
    positions: Vec<[f64; 3]>,
    normals: Vec<[f64; 3]>,
    uvs: Vec<[f64; 2]>,
}

fn parse<R: BufRead>(reader: R) -> std::result::Result<TriangleMesh, String> {
    let mut data = ObjData::default();
    let mut builder = ObjBuilder::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let at = |msg: String| format!("line {}: {}", number + 1, msg);
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => data.positions.push(floats::<3>(&args).map_err(at)?),
            "vn" => data.normals.push(floats::<3>(&args).map_err(at)?),
            "vt" => data.uvs.push(floats::<2>(&args).map_err(at)?),
            "f" => {
                if args.len() < 3 {
                    return Err(at(format!("face has {} corners, need at least 3", args.len())));
                }
                let mut face = Vec::with_capacity(args.len());
                for arg in &args {
                    let corner = parse_corner(arg, &data).map_err(at)?;
                    face.push(builder.vertex(corner, &data));
                }
                for i in 1..face.len() - 1 {
                    builder.indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(builder.finish())
}

fn floats<const N: usize>(args: &[&str]) -> std::result::Result<[f64; N], String> {
    if args.len() < N {
        return Err(format!("expected {} numbers, found {}", N, args.len()));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", arg, e))?;
    }
    Ok(out)
}

/// Resolve a 1-based or negative OBJ index against a list of `len` items.
fn resolve(raw: &str, len: usize, what: &str) -> std::result::Result<usize, String> {
    let index: i64 = raw
        .parse()
        .map_err(|e| format!("invalid {} index '{}': {}", what, raw, e))?;
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= len as i64 {
        return Err(format!(
            "{} index {} out of range ({} defined)",
            what, index, len
        ));
    }
    Ok(resolved as usize)
}

fn parse_corner(spec: &str, data: &ObjData) -> std::result::Result<Corner, String> {
    let mut fields = spec.split('/');
    let position = match fields.next() {
        Some(raw) if !raw.is_empty() => resolve(raw, data.positions.len(), "position")?,
        _ => return Err(format!("face corner '{}' has no position", spec)),
    };
    let uv = match fields.next() {
        Some(raw) if !raw.is_empty() => Some(resolve(raw, data.uvs.len(), "texture")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(raw) if !raw.is_empty() => Some(resolve(raw, data.normals.len(), "normal")?),
        _ => None,
    };
    Ok((position, uv, normal))
}

/// Save a mesh to an OBJ file.
///
/// Normals and texture coordinates are written when present, sharing the
/// vertex numbering.
///
/// # Example
///
/// ```no_run
/// use edgesplit::io::obj;
/// use edgesplit::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ text.
pub fn write<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by edgesplit")?;

    let count = mesh.vertex_count();
    for v in 0..count {
        let p = mesh.position(v);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let uvs = mesh.attribute(UV);
    if let Some(uvs) = uvs {
        for uv in uvs.iter() {
            writeln!(writer, "vt {} {}", uv[0], uv.get(1).copied().unwrap_or(0.0))?;
        }
    }

    let normals = mesh.attribute(NORMAL);
    if let Some(normals) = normals {
        for v in 0..count {
            let [x, y, z] = normals.vec3(v);
            writeln!(writer, "vn {} {} {}", x, y, z)?;
        }
    }

    for tri in mesh.triangles() {
        write!(writer, "f")?;
        for v in tri {
            let i = v + 1;
            match (uvs.is_some(), normals.is_some()) {
                (true, true) => write!(writer, " {i}/{i}/{i}")?,
                (true, false) => write!(writer, " {i}/{i}")?,
                (false, true) => write!(writer, " {i}//{i}")?,
                (false, false) => write!(writer, " {i}")?,
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_read_triangle() {
        let obj = r#"
            # Simple triangle
            v 0 0 0
            v 1 0 0
            v 0.5 1 0
            f 1 2 3
        "#;
        let mesh = read(obj.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices().unwrap(), &[0, 1, 2]);
        assert_eq!(mesh.position(2), Point3::new(0.5, 1.0, 0.0));
        assert!(!mesh.has_normals());
        assert!(!mesh.has_uvs());
    }

    #[test]
    fn test_read_quad_is_fan_triangulated() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = read(obj.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices().unwrap(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_read_negative_indices() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = read(obj.as_bytes()).unwrap();
        assert_eq!(mesh.indices().unwrap(), &[0, 1, 2]);
    }

    #[test]
    fn test_distinct_normals_make_distinct_vertices() {
        // Two triangles share positions 1 and 2 but use different normals.
        let obj = r#"
            v 0 0 0
            v 1 0 0
            v 0 1 0
            v 0 0 -1
            vn 0 0 1
            vn 0 -1 0
            f 1//1 2//1 3//1
            f 2//2 1//2 4//2
        "#;
        let mesh = read(obj.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.normal(0), Some(Vector3::z()));
        assert_eq!(mesh.normal(3), Some(-Vector3::y()));
    }

    #[test]
    fn test_read_uvs() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
        let mesh = read(obj.as_bytes()).unwrap();
        assert!(mesh.has_uvs());
        assert_eq!(mesh.attribute(UV).unwrap().get(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_partial_normals_are_dropped() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2 3\n";
        let mesh = read(obj.as_bytes()).unwrap();
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_read_errors() {
        for obj in [
            "v 0 0 0\nf 1 2 3\n",
            "v 0 0\n",
            "v 0 0 zero\n",
            "v 0 0 0\nv 1 0 0\nf 1 2\n",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n",
        ] {
            let err = read(obj.as_bytes()).unwrap_err();
            assert!(matches!(err, MeshError::LoadError { .. }), "{obj:?}");
        }
    }

    #[test]
    fn test_write_then_read() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvt 0.25 0.75\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = read(obj.as_bytes()).unwrap();

        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3"));

        let again = read(text.as_bytes()).unwrap();
        assert_eq!(again, mesh);
    }

    #[test]
    fn test_write_soup() {
        let mesh = TriangleMesh::non_indexed().with_attribute(
            POSITION,
            VertexAttribute::from_vec3(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        );
        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("f 1 2 3"));
    }
}
