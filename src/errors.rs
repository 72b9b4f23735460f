//! Split and validation errors.

/// Everything that can go wrong while splitting a mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// Fewer than three distinct cut points survived deduplication; the cut
    /// cross-section cannot be filled.
    #[error("(DegenerateCut) only {distinct_points} distinct cut points; a cap needs at least 3")]
    DegenerateCut { distinct_points: usize },

    /// An attribute sequence does not run parallel to the vertex positions.
    #[error("(AttributeMismatch) `{attribute}` holds {len} entries for {vertex_count} vertices")]
    AttributeMismatch {
        attribute: &'static str,
        len: usize,
        vertex_count: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("(IndexOutOfRange) triangle index {index} exceeds vertex count {vertex_count}")]
    IndexOutOfRange { index: usize, vertex_count: usize },

    /// The triangle list length is not a multiple of three.
    #[error("(IncompleteTriangle) triangle list length {len} is not a multiple of 3")]
    IncompleteTriangle { len: usize },
}
