//! Struct and functions for working with the vertices a split carries through.

use crate::float_types::Real;
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A mesh vertex: position plus the full attribute set interpolated at cut
/// points.
///
/// `tangent` stores the tangent direction in `xyz` and the bitangent
/// handedness sign in `w`. Handedness is discrete and is never blended; the
/// splitter picks it from the down-side endpoint of a cut edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub uv: Vector2<Real>,
    pub normal: Vector3<Real>,
    pub tangent: Vector4<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`]. Attributes are copied verbatim; nothing is
    /// normalized here.
    #[inline]
    pub const fn new(
        pos: Point3<Real>,
        uv: Vector2<Real>,
        normal: Vector3<Real>,
        tangent: Vector4<Real>,
    ) -> Self {
        Vertex {
            pos,
            uv,
            normal,
            tangent,
        }
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position, UV, normal, and the tangent direction are lerped
    /// component-wise; the tangent `w` is carried from `self` unchanged.
    /// Callers that need unit-length normals or tangents re-normalize
    /// afterwards.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        Vertex {
            pos: self.pos + (other.pos - self.pos) * t,
            uv: self.uv + (other.uv - self.uv) * t,
            normal: self.normal + (other.normal - self.normal) * t,
            tangent: Vector4::new(
                self.tangent.x + (other.tangent.x - self.tangent.x) * t,
                self.tangent.y + (other.tangent.y - self.tangent.y) * t,
                self.tangent.z + (other.tangent.z - self.tangent.z) * t,
                self.tangent.w,
            ),
        }
    }

    /// Flip orientation in place: negate the normal and the tangent
    /// handedness. Used when a cap is handed to the half that views the cut
    /// surface from the other side.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.tangent.w = -self.tangent.w;
    }
}

impl approx::AbsDiffEq for Vertex {
    type Epsilon = Real;

    fn default_epsilon() -> Self::Epsilon {
        Real::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        approx::AbsDiffEq::abs_diff_eq(&self.pos, &other.pos, epsilon)
            && approx::AbsDiffEq::abs_diff_eq(&self.uv, &other.uv, epsilon)
            && approx::AbsDiffEq::abs_diff_eq(&self.normal, &other.normal, epsilon)
            && approx::AbsDiffEq::abs_diff_eq(&self.tangent, &other.tangent, epsilon)
    }
}

impl approx::RelativeEq for Vertex {
    fn default_max_relative() -> Self::Epsilon {
        Real::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        approx::RelativeEq::relative_eq(&self.pos, &other.pos, epsilon, max_relative)
            && approx::RelativeEq::relative_eq(&self.uv, &other.uv, epsilon, max_relative)
            && approx::RelativeEq::relative_eq(&self.normal, &other.normal, epsilon, max_relative)
            && approx::RelativeEq::relative_eq(&self.tangent, &other.tangent, epsilon, max_relative)
    }
}
