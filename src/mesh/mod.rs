//! Core mesh data structures.
//!
//! This module provides the indexed triangle mesh representation used by
//! every algorithm in the crate.
//!
//! # Overview
//!
//! The primary type is [`TriangleMesh`]: an optional index buffer plus a set
//! of named per-vertex attribute buffers ([`VertexAttribute`]). Every three
//! consecutive index buffer slots form a triangle; each slot is a *corner*.
//! Without an index buffer the mesh is a triangle soup where every three
//! consecutive vertices form a triangle.
//!
//! Well-known attribute names are [`POSITION`], [`NORMAL`] and [`UV`]. Any
//! other attribute is carried along unchanged by mesh operations.
//!
//! # Construction
//!
//! ```
//! use edgesplit::mesh::{from_triangles, TriangleMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriangleMesh = from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.validate().is_ok());
//! ```
//!
//! Soups are converted to indexed form with a [`VertexMerger`] such as
//! [`VertexWelder`].

mod attribute;
mod builder;
mod triangle_mesh;
mod weld;

pub use attribute::{VertexAttribute, NORMAL, POSITION, UV};
pub use builder::{from_triangles, MeshBuilder};
pub use triangle_mesh::TriangleMesh;
pub use weld::{VertexMerger, VertexWelder};
