//! Error types for edgesplit.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh uses a vertex layout the operation cannot index.
    ///
    /// Returned when a non-indexed triangle soup is passed to an operation
    /// that needs an index buffer and no vertex merger was supplied.
    #[error("unsupported mesh format: {reason}")]
    UnsupportedMeshFormat {
        /// Why the mesh cannot be processed.
        reason: String,
    },

    /// The index buffer or attribute buffers are inconsistent.
    #[error("invalid mesh topology: {details}")]
    InvalidMeshTopology {
        /// Description of the inconsistency.
        details: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invalid topology error from a description.
    pub fn topology(details: impl Into<String>) -> Self {
        MeshError::InvalidMeshTopology {
            details: details.into(),
        }
    }

    /// An index buffer slot references a vertex past the end of the attribute buffers.
    pub fn index_out_of_range(corner: usize, vertex: u32, vertex_count: usize) -> Self {
        Self::topology(format!(
            "corner {corner} references vertex {vertex}, but the mesh has {vertex_count} vertices"
        ))
    }

    /// An attribute buffer's length disagrees with its item size or the mesh's vertex count.
    pub fn attribute_mismatch(name: &str, len: usize, item_size: usize, expected: usize) -> Self {
        Self::topology(format!(
            "attribute '{name}' has {len} values with item size {item_size}, expected {expected} vertices"
        ))
    }
}
