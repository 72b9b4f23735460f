//! Primitive mesh constructors, mainly as split fixtures and demo inputs.

use crate::float_types::{EPSILON, Real};
use crate::mesh::MeshBuffer;
use crate::plane::Plane;
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Axis-aligned cube centered at the origin: 24 vertices (4 per face, so
/// normals and UVs stay per-face) and 12 triangles wound counter-clockwise
/// viewed from outside.
pub fn cube(half_extent: Real) -> MeshBuffer {
    // face normal plus the two in-plane axes, chosen so u × v = normal
    let faces: [(Vector3<Real>, Vector3<Real>, Vector3<Real>); 6] = [
        (Vector3::x(), Vector3::y(), Vector3::z()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::z(), Vector3::x()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), Vector3::y(), Vector3::x()),
    ];
    let corners: [(Real, Real); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut mesh = MeshBuffer::with_bounds(
        Point3::origin(),
        Vector3::repeat(half_extent * 2.0),
    );
    for (normal, u, v) in faces {
        let base = mesh.vertex_count();
        let tangent = Vector4::new(u.x, u.y, u.z, 1.0);
        for (cu, cv) in corners {
            let pos = Point3::from((normal + u * cu + v * cv) * half_extent);
            let uv = Vector2::new((cu + 1.0) * 0.5, (cv + 1.0) * 0.5);
            mesh.push(Vertex::new(pos, uv, normal, tangent));
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }
    mesh
}

/// Tetrahedron over four arbitrary corners: 12 vertices (3 per face, flat
/// face normals) and 4 outward-wound triangles. Bounds are the AABB of the
/// corners.
pub fn tetrahedron(points: [Point3<Real>; 4]) -> MeshBuffer {
    let mut mins = points[0];
    let mut maxs = points[0];
    for p in &points[1..] {
        for axis in 0..3 {
            mins[axis] = mins[axis].min(p[axis]);
            maxs[axis] = maxs[axis].max(p[axis]);
        }
    }
    let size = maxs - mins;
    let center = mins + size * 0.5;

    let mut mesh = MeshBuffer::with_bounds(center, size);
    for ids in [[0usize, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]] {
        let [a, mut b, mut c] = ids;
        let opposite = 6 - a - b - c;
        let outward = (points[b] - points[a]).cross(&(points[c] - points[a]));
        if outward.dot(&(points[opposite] - points[a])) > 0.0 {
            std::mem::swap(&mut b, &mut c);
        }

        let face_normal = (points[b] - points[a]).cross(&(points[c] - points[a]));
        let face_normal = if face_normal.norm_squared() > EPSILON {
            face_normal.normalize()
        } else {
            Vector3::z()
        };
        let tangent = Plane::new(points[a], face_normal).tangent();

        let base = mesh.vertex_count();
        let face_uvs = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ];
        for (&corner, uv) in [a, b, c].iter().zip(face_uvs) {
            mesh.push(Vertex::new(points[corner], uv, face_normal, tangent));
        }
        mesh.push_triangle(base, base + 1, base + 2);
    }
    mesh
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cube_is_valid_and_outward() {
        let mesh = cube(0.5);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        mesh.validate().unwrap();

        for tri in mesh.triangles.chunks_exact(3) {
            let (a, b, c) = (
                mesh.positions[tri[0]],
                mesh.positions[tri[1]],
                mesh.positions[tri[2]],
            );
            let face = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(
                face.dot(&centroid) > 0.0,
                "triangle must face away from the cube center"
            );
        }
    }

    #[test]
    fn tetrahedron_is_valid_and_outward() {
        let corners = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = tetrahedron(corners);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 4);
        mesh.validate().unwrap();

        let centroid = (corners[0].coords
            + corners[1].coords
            + corners[2].coords
            + corners[3].coords)
            / 4.0;
        for tri in mesh.triangles.chunks_exact(3) {
            let (a, b, c) = (
                mesh.positions[tri[0]],
                mesh.positions[tri[1]],
                mesh.positions[tri[2]],
            );
            let face = (b - a).cross(&(c - a));
            let outward = (a.coords + b.coords + c.coords) / 3.0 - centroid;
            assert!(face.dot(&outward) > 0.0, "face must point away from the centroid");
        }
    }
}
