//! Vertex-to-corner back references.

/// For every vertex, the index buffer slots that reference it.
///
/// Stored as one flat arena of corner slots plus per-vertex offsets, so the
/// corners of vertex `v` are `corners[offsets[v]..offsets[v + 1]]`. Within a
/// vertex, corners appear in ascending slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerIndex {
    offsets: Vec<usize>,
    corners: Vec<usize>,
}

impl CornerIndex {
    /// Build the index from an index buffer whose values are all below `vertex_count`.
    pub fn build(indices: &[u32], vertex_count: usize) -> Self {
        let mut offsets = vec![0usize; vertex_count + 1];
        for &v in indices {
            offsets[v as usize + 1] += 1;
        }
        for v in 0..vertex_count {
            offsets[v + 1] += offsets[v];
        }

        let mut cursor = offsets.clone();
        let mut corners = vec![0usize; indices.len()];
        for (slot, &v) in indices.iter().enumerate() {
            let at = &mut cursor[v as usize];
            corners[*at] = slot;
            *at += 1;
        }

        Self { offsets, corners }
    }

    /// Number of vertices covered by the index.
    pub fn vertex_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of corners.
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Corner slots referencing vertex `v`, in ascending order.
    #[inline]
    pub fn corners(&self, v: usize) -> &[usize] {
        &self.corners[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Iterate over `(vertex, corners)` pairs in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        (0..self.vertex_count()).map(move |v| (v, self.corners(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_corners() {
        // Two triangles sharing the edge (0, 2).
        let index = CornerIndex::build(&[0, 1, 2, 0, 2, 3], 4);
        assert_eq!(index.vertex_count(), 4);
        assert_eq!(index.corner_count(), 6);
        assert_eq!(index.corners(0), &[0, 3]);
        assert_eq!(index.corners(1), &[1]);
        assert_eq!(index.corners(2), &[2, 4]);
        assert_eq!(index.corners(3), &[5]);
    }

    #[test]
    fn test_unreferenced_vertex_is_empty() {
        let index = CornerIndex::build(&[0, 1, 3], 5);
        assert!(index.corners(2).is_empty());
        assert!(index.corners(4).is_empty());
        assert_eq!(index.iter().filter(|(_, c)| c.is_empty()).count(), 2);
    }

    #[test]
    fn test_empty_buffer() {
        let index = CornerIndex::build(&[], 0);
        assert_eq!(index.vertex_count(), 0);
        assert_eq!(index.iter().count(), 0);
    }
}
