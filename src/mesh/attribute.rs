//! Per-vertex attribute buffers.
//!
//! An attribute is a flat buffer of `f64` values grouped into fixed-size
//! items, one item per vertex. Positions and normals use three components,
//! texture coordinates two. Any other attribute name and item size is
//! carried through mesh operations unchanged.

/// Attribute name for vertex positions (item size 3).
pub const POSITION: &str = "position";

/// Attribute name for vertex normals (item size 3).
pub const NORMAL: &str = "normal";

/// Attribute name for texture coordinates (item size 2).
pub const UV: &str = "uv";

/// A flat per-vertex attribute buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    item_size: usize,
    values: Vec<f64>,
}

impl VertexAttribute {
    /// Create an attribute from a flat buffer.
    ///
    /// `item_size` must be non-zero. The buffer length is checked against the
    /// item size when the owning mesh is validated, not here.
    pub fn new(item_size: usize, values: Vec<f64>) -> Self {
        debug_assert!(item_size > 0, "attribute item size must be non-zero");
        Self { item_size, values }
    }

    /// Create an empty attribute with room for `count` items.
    pub fn with_capacity(item_size: usize, count: usize) -> Self {
        Self::new(item_size, Vec::with_capacity(item_size * count))
    }

    /// Create a three-component attribute from vectors or points.
    pub fn from_vec3(items: &[[f64; 3]]) -> Self {
        Self::new(3, items.iter().flatten().copied().collect())
    }

    /// Create a two-component attribute.
    pub fn from_vec2(items: &[[f64; 2]]) -> Self {
        Self::new(2, items.iter().flatten().copied().collect())
    }

    /// Number of components per vertex.
    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of complete items in the buffer.
    #[inline]
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.values.len() / self.item_size
        }
    }

    /// Whether the buffer length is a whole number of items.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.item_size > 0 && self.values.len() % self.item_size == 0
    }

    /// The raw flat buffer.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to the raw flat buffer.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consume the attribute and return its flat buffer.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// The components of item `i`.
    #[inline]
    pub fn get(&self, i: usize) -> &[f64] {
        &self.values[i * self.item_size..(i + 1) * self.item_size]
    }

    /// Mutable components of item `i`.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.values[i * self.item_size..(i + 1) * self.item_size]
    }

    /// Append one item. Panics in debug builds if `item` has the wrong length.
    pub fn push(&mut self, item: &[f64]) {
        debug_assert_eq!(item.len(), self.item_size);
        self.values.extend_from_slice(item);
    }

    /// Append a copy of item `i` to the end of the buffer and return the new item's index.
    pub fn push_copy_of(&mut self, i: usize) -> usize {
        let start = i * self.item_size;
        self.values
            .extend_from_within(start..start + self.item_size);
        self.count() - 1
    }

    /// Read item `i` as a 3-vector. Missing components read as zero.
    pub fn vec3(&self, i: usize) -> [f64; 3] {
        let item = self.get(i);
        let mut out = [0.0; 3];
        for (dst, src) in out.iter_mut().zip(item) {
            *dst = *src;
        }
        out
    }

    /// Iterate over items as slices.
    pub fn iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.item_size.max(1))
    }
}
