//! Splitting vertices along hard edges.
//!
//! A vertex shared by triangles that face in very different directions gets
//! one smooth normal, which shades sharp features as if they were rounded.
//! [`split_hard_edges`] duplicates such vertices so that triangles whose face
//! normals diverge by more than a cutoff angle no longer share them, while
//! triangles with similar normals keep sharing. Triangle count, winding and
//! positions are unchanged; only the vertex count grows.
//!
//! # Pipeline
//!
//! 1. **Corner index**: for every vertex, the index buffer slots that use it
//! 2. **Face normals**: one unit normal per triangle
//! 3. **Partition**: each vertex's corners are grouped greedily by normal
//!    compatibility (see [`partition_corners`])
//! 4. **Rebuild**: every group after the first gets a copy of the vertex and
//!    its corners are redirected to the copy
//! 5. **Normals**: smooth normals are recomputed, and authored normals are
//!    restored at vertices that were never split
//!
//! # Example
//!
//! ```
//! use edgesplit::prelude::*;
//! use nalgebra::Point3;
//!
//! // Two triangles folded 90 degrees along their shared edge.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, -1.0),
//! ];
//! let mesh = from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap();
//!
//! let result = split_hard_edges(&mesh, &SplitOptions::with_cutoff_degrees(30.0)).unwrap();
//! assert_eq!(result.extra_vertices, 2);
//! assert_eq!(result.mesh.vertex_count(), 6);
//! assert_eq!(result.mesh.triangle_count(), 2);
//! ```

mod corners;
mod partition;
mod rebuild;
mod reconcile;

pub use corners::CornerIndex;
pub use partition::{extra_groups, partition_corners, ExtraGroup};
pub use rebuild::rebuild;
pub use reconcile::reconcile_normals;

use std::borrow::Cow;
use std::f64::consts::{FRAC_PI_6, PI};

use log::{debug, info, warn};

use crate::algo::normals::{count_degenerate, face_normals};
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{TriangleMesh, VertexMerger, NORMAL};

/// Margin subtracted from `cos(cutoff_angle)` so faces meeting at exactly the
/// cutoff angle stay smooth despite rounding.
pub const CUTOFF_EPSILON: f64 = 1e-3;

const PHASES: usize = 5;

/// Options for hard-edge splitting.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Angle in radians between face normals above which an edge is hard.
    pub cutoff_angle: f64,

    /// Keep the input normals of vertices that were not split.
    ///
    /// When false, every normal in the output is recomputed.
    pub preserve_unaffected_normals: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            cutoff_angle: FRAC_PI_6,
            preserve_unaffected_normals: true,
            parallel: true,
        }
    }
}

impl SplitOptions {
    /// Create options with a cutoff angle in radians.
    pub fn with_cutoff_angle(radians: f64) -> Self {
        Self {
            cutoff_angle: radians,
            ..Default::default()
        }
    }

    /// Create options with a cutoff angle in degrees.
    pub fn with_cutoff_degrees(degrees: f64) -> Self {
        Self::with_cutoff_angle(degrees.to_radians())
    }

    /// Set whether authored normals survive at unsplit vertices.
    pub fn with_preserve_unaffected_normals(mut self, preserve: bool) -> Self {
        self.preserve_unaffected_normals = preserve;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The dot-product bound two unit face normals must reach to stay smooth.
    ///
    /// Angles above pi are clamped to pi, which keeps every edge smooth.
    pub fn threshold(&self) -> f64 {
        self.cutoff_angle.min(PI).cos() - CUTOFF_EPSILON
    }

    fn validate(&self) -> Result<()> {
        if !self.cutoff_angle.is_finite() || self.cutoff_angle < 0.0 {
            return Err(MeshError::invalid_param(
                "cutoff_angle",
                self.cutoff_angle,
                "must be a finite, non-negative angle in radians",
            ));
        }
        Ok(())
    }
}

/// Result of splitting a mesh along its hard edges.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// The rebuilt mesh.
    pub mesh: TriangleMesh,

    /// Vertex count of the indexed input (after merging, for soups).
    pub original_vertices: usize,

    /// Vertex count of the rebuilt mesh.
    pub final_vertices: usize,

    /// Triangle count, identical in input and output.
    pub triangles: usize,

    /// Number of input vertices whose corners were split into several groups.
    pub split_vertices: usize,

    /// Number of vertices appended by the split.
    pub extra_vertices: usize,

    /// Number of triangles with an undefined face normal.
    pub degenerate_triangles: usize,

    /// Whether the input had to be merged into indexed form first.
    pub merged: bool,
}

impl SplitResult {
    /// Check if any vertex was split.
    pub fn was_split(&self) -> bool {
        self.extra_vertices > 0
    }

    /// Growth of the vertex count as a ratio (final / original).
    pub fn growth_ratio(&self) -> f64 {
        if self.original_vertices == 0 {
            1.0
        } else {
            self.final_vertices as f64 / self.original_vertices as f64
        }
    }
}

impl std::fmt::Display for SplitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Split: {} → {} vertices (+{} from {} split vertices), {} triangles",
            self.original_vertices,
            self.final_vertices,
            self.extra_vertices,
            self.split_vertices,
            self.triangles
        )
    }
}

/// Split vertices shared across hard edges.
///
/// The mesh must be indexed; a triangle soup fails with
/// [`MeshError::UnsupportedMeshFormat`]. Use
/// [`split_hard_edges_with_merger`] to index soups on the fly.
///
/// The input is never modified. On error nothing is returned and no partial
/// result exists.
pub fn split_hard_edges(mesh: &TriangleMesh, options: &SplitOptions) -> Result<SplitResult> {
    split_hard_edges_with_progress(mesh, options, None, &Progress::none())
}

/// Split hard edges, merging a non-indexed mesh with `merger` first.
///
/// # Example
///
/// ```
/// use edgesplit::prelude::*;
/// use nalgebra::Point3;
///
/// // A flat quad stored as a soup of six vertices.
/// let mut builder = MeshBuilder::new();
/// for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]] {
///     builder.vertex(Point3::new(p[0], p[1], 0.0));
/// }
/// let soup = builder.build_non_indexed().unwrap();
///
/// assert!(split_hard_edges(&soup, &SplitOptions::default()).is_err());
///
/// let result =
///     split_hard_edges_with_merger(&soup, &SplitOptions::default(), &VertexWelder::default())
///         .unwrap();
/// assert!(result.merged);
/// assert_eq!(result.mesh.vertex_count(), 4);
/// assert!(!result.was_split());
/// ```
pub fn split_hard_edges_with_merger(
    mesh: &TriangleMesh,
    options: &SplitOptions,
    merger: &dyn VertexMerger,
) -> Result<SplitResult> {
    split_hard_edges_with_progress(mesh, options, Some(merger), &Progress::none())
}

/// Split hard edges with progress reporting.
///
/// `merger` is only consulted for non-indexed input.
pub fn split_hard_edges_with_progress(
    mesh: &TriangleMesh,
    options: &SplitOptions,
    merger: Option<&dyn VertexMerger>,
    progress: &Progress,
) -> Result<SplitResult> {
    options.validate()?;

    let merged = !mesh.is_indexed();
    let source: Cow<'_, TriangleMesh> = if mesh.is_indexed() {
        Cow::Borrowed(mesh)
    } else {
        let merger = merger.ok_or_else(|| MeshError::UnsupportedMeshFormat {
            reason: "mesh has no index buffer and no vertex merger was provided".to_string(),
        })?;
        Cow::Owned(merger.merge(mesh)?)
    };
    source.validate()?;

    let indices = source
        .indices()
        .ok_or_else(|| MeshError::UnsupportedMeshFormat {
            reason: "vertex merger returned a mesh without an index buffer".to_string(),
        })?;
    let vertex_count = source.vertex_count();

    progress.report(0, PHASES, "Indexing corners");
    let corner_index = CornerIndex::build(indices, vertex_count);

    progress.report(1, PHASES, "Computing face normals");
    let normals = face_normals(&source, options.parallel);
    let degenerate_triangles = count_degenerate(&normals);
    if degenerate_triangles > 0 {
        warn!(
            "{} degenerate triangles have no face normal and only join smooth groups above 90 degrees",
            degenerate_triangles
        );
    }

    progress.report(2, PHASES, "Partitioning corners");
    let threshold = options.threshold();
    let extra = extra_groups(&corner_index, &normals, threshold, options.parallel)?;
    let split_vertices = count_sources(&extra);
    debug!(
        "partitioned {} corners of {} vertices at threshold {:.6}: {} extra groups from {} vertices",
        corner_index.corner_count(),
        vertex_count,
        threshold,
        extra.len(),
        split_vertices
    );

    progress.report(3, PHASES, "Rebuilding topology");
    let mut rebuilt = rebuild(&source, indices, &extra)?;

    progress.report(4, PHASES, "Reconciling normals");
    let restored = reconcile_normals(
        &mut rebuilt,
        source.attribute(NORMAL),
        &extra,
        options.preserve_unaffected_normals,
    );
    if source.has_normals() {
        debug!("restored {} authored normals", restored);
    }
    progress.report(PHASES, PHASES, "Done");

    let result = SplitResult {
        original_vertices: vertex_count,
        final_vertices: rebuilt.vertex_count(),
        triangles: rebuilt.triangle_count(),
        split_vertices,
        extra_vertices: extra.len(),
        degenerate_triangles,
        merged,
        mesh: rebuilt,
    };
    info!("{}", result);
    Ok(result)
}

/// Number of distinct source vertices; `extra` is sorted by source.
fn count_sources(extra: &[ExtraGroup]) -> usize {
    let mut count = 0;
    let mut last = None;
    for group in extra {
        if last != Some(group.source) {
            count += 1;
            last = Some(group.source);
        }
    }
    count
}
