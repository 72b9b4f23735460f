//! The splitting plane, expressed in the coordinate space of the mesh being
//! split, and the per-vertex half-space classification it induces.

use crate::float_types::{EPSILON, Real};
use crate::mesh::MeshBuffer;
use nalgebra::{Point3, Vector3, Vector4};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A plane given by a point lying on it and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Point3<Real>,
    normal: Vector3<Real>,
}

impl Plane {
    /// Build a plane from a point and a (not necessarily unit) normal.
    pub fn new(point: Point3<Real>, normal: Vector3<Real>) -> Self {
        Plane {
            point,
            normal: normal.normalize(),
        }
    }

    /// Build a mesh-local plane for a non-uniformly scaled mesh: the normal
    /// is scaled component-wise by the mesh's scale factors and re-normalized
    /// so the half-space test stays correct in local space. The point is
    /// assumed to be in local space already.
    pub fn with_scale(point: Point3<Real>, normal: Vector3<Real>, scale: &Vector3<Real>) -> Self {
        Plane::new(point, normal.component_mul(scale))
    }

    pub const fn point(&self) -> Point3<Real> {
        self.point
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Plane {
            point: self.point,
            normal: -self.normal,
        }
    }

    /// Signed distance from `point` to the plane, positive on the normal
    /// side.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        (point - self.point).dot(&self.normal)
    }

    /// `true` when `point` lies on the positive side. Zero distance counts as
    /// above — the tie-break is deliberate and fixed, so boundary-coincident
    /// geometry always lands in the above half.
    pub fn is_above(&self, point: &Point3<Real>) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// One half-space flag per vertex, in vertex order.
    #[cfg(not(feature = "parallel"))]
    pub fn classify(&self, mesh: &MeshBuffer) -> Vec<bool> {
        mesh.positions.iter().map(|p| self.is_above(p)).collect()
    }

    /// One half-space flag per vertex, in vertex order.
    ///
    /// Classification is per-vertex and order-preserving, so the parallel
    /// path produces exactly the sequential output.
    #[cfg(feature = "parallel")]
    pub fn classify(&self, mesh: &MeshBuffer) -> Vec<bool> {
        mesh.positions
            .par_iter()
            .map(|p| self.is_above(p))
            .collect()
    }

    /// The fixed tangent assigned to every cap vertex: orthogonal to the
    /// normal, derived from the coordinate axis least aligned with it, with
    /// `w = 1` handedness. Planar caps need no per-vertex variation.
    pub fn tangent(&self) -> Vector4<Real> {
        let n = self.normal;
        let (nx, ny, nz) = (n.x.abs(), n.y.abs(), n.z.abs());
        let helper = if nx <= ny && nx <= nz {
            Vector3::x()
        } else if ny <= nz {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let dir = n.cross(&helper);
        let dir = if dir.norm_squared() > EPSILON {
            dir.normalize()
        } else {
            Vector3::x()
        };
        Vector4::new(dir.x, dir.y, dir.z, 1.0)
    }
}
