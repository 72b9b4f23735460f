//! Slice a closed triangle mesh with an arbitrary plane.
//!
//! [`split_solid`] partitions a [`MeshBuffer`] into the two half-spaces of a
//! [`Plane`]: whole triangles are copied into the half they belong to,
//! straddling triangles are cut with every vertex attribute (position, UV,
//! normal, tangent) interpolated at the crossings, seam duplicates are
//! welded, and the exposed cross-section is optionally closed with a
//! fan-triangulated cap so both halves remain closed solids.
//!
//! The crate is pure geometry: it takes attribute arrays in and hands
//! attribute arrays back. Attaching the results to scene objects, colliders,
//! or renderers is the caller's business.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as [`float_types::Real`]
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for parallel vertex classification

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod vertex;
pub mod mesh;
pub mod plane;
pub mod split;
pub mod cap;
pub mod shapes;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use cap::{CutSegment, LoopStrategy, assemble_loop, build_cap};
pub use errors::SplitError;
pub use mesh::{MeshBuffer, UvRect};
pub use plane::Plane;
pub use split::{CapStatus, SplitHalves, SplitOptions, SurfaceSplit, split_solid, split_surface};
pub use vertex::Vertex;
