//! Scalar precision selection and the fixed tolerances used across the crate.

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// General degeneracy guard for near-zero lengths and divisions.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-5;
/// General degeneracy guard for near-zero lengths and divisions.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-8;

// The constants below are implementation constants, not configuration: they
// match the seam/loop behavior the rest of the crate is written against and
// the tests pin down. Varying them silently changes which vertices merge.

/// Distance below which two half-mesh vertices merge during the post-split
/// weld pass. Coarse on purpose: it has to swallow the duplicate seam
/// vertices that every straddling triangle appends independently.
pub const WELD_TOLERANCE: Real = 1e-3;

/// Squared distance below which two cut-loop points are considered the same
/// point by the angular assembler.
pub const LOOP_MERGE_SQUARED: Real = 1e-5;

/// Squared distance below which two segment endpoints are considered a shared
/// junction by the fast stitcher.
pub const CHAIN_MERGE_SQUARED: Real = 1e-6;

/// Dot-product slack within which two cut-loop points count as angularly tied.
pub const ANGLE_TIE: Real = 1e-3;

/// Alignment above which a tied point lies along the reference edge itself,
/// flipping the distance tie-break so the fan stays convex.
pub const COLLINEAR_DOT: Real = 0.9999;
