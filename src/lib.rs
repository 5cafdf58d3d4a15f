//! # Edgesplit
//!
//! Hard-edge vertex splitting for indexed triangle meshes.
//!
//! Renderers shade a vertex with one normal. When a vertex is shared by
//! faces that meet at a sharp angle, averaging their normals rounds off the
//! crease. Edgesplit duplicates such vertices so that faces across a hard
//! edge stop sharing them, then rebuilds normals: smooth within each group,
//! and authored normals kept wherever nothing was split.
//!
//! ## Features
//!
//! - **Attribute-agnostic mesh model**: any number of named per-vertex buffers
//! - **Deterministic splitting**: identical output sequential or parallel
//! - **Soup support**: non-indexed meshes are welded before splitting
//! - **Multiple file formats**: OBJ, STL, PLY, glTF
//!
//! ## Quick Start
//!
//! ```no_run
//! use edgesplit::prelude::*;
//!
//! // Load a mesh
//! let mesh = edgesplit::io::load("model.obj").unwrap();
//!
//! // Split edges sharper than 30 degrees, welding the mesh first if needed
//! let options = SplitOptions::with_cutoff_degrees(30.0);
//! let result = split_hard_edges_with_merger(&mesh, &options, &VertexWelder::default()).unwrap();
//! println!("{}", result);
//!
//! // Save the mesh
//! edgesplit::io::save(&result.mesh, "output.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use edgesplit::prelude::*;
//! use nalgebra::Point3;
//!
//! // A tetrahedron: every edge is sharper than 30 degrees.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh = from_triangles(&vertices, &faces).unwrap();
//! let result = split_hard_edges(&mesh, &SplitOptions::default()).unwrap();
//!
//! // Each face gets its own three vertices.
//! assert_eq!(result.mesh.vertex_count(), 12);
//! assert_eq!(result.mesh.triangle_count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use edgesplit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::split::{
        split_hard_edges, split_hard_edges_with_merger, split_hard_edges_with_progress,
        SplitOptions, SplitResult,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        from_triangles, MeshBuilder, TriangleMesh, VertexAttribute, VertexMerger, VertexWelder,
        NORMAL, POSITION, UV,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
