//! Mesh processing algorithms.
//!
//! - **Normals**: face normals, area-weighted vertex normals
//! - **Split**: hard-edge vertex splitting
//!
//! Long-running operations accept a [`Progress`] callback.

pub mod normals;
pub mod progress;
pub mod split;

pub use progress::Progress;
