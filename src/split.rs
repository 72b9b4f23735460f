//! Partitioning a mesh across a plane: vertex distribution, per-triangle
//! copy-or-cut with attribute interpolation at the crossings, and the
//! orchestration that welds the halves and closes them with a cap.

use crate::cap::{CutSegment, LoopStrategy, build_cap};
use crate::errors::SplitError;
use crate::float_types::{EPSILON, Real, WELD_TOLERANCE};
use crate::mesh::{MeshBuffer, UvRect};
use crate::plane::Plane;
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector3, Vector4};

/// Knobs for [`split_solid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    /// Close the exposed cross-section of each half with a triangulated cap.
    pub fill: bool,
    /// Sub-rectangle of UV space the cap projection lands in.
    pub uv_rect: UvRect,
    /// How cut segments are stitched into a boundary loop.
    pub strategy: LoopStrategy,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            fill: true,
            uv_rect: UvRect::default(),
            strategy: LoopStrategy::default(),
        }
    }
}

/// The two open halves produced by [`split_surface`], plus the raw plane
/// crossing recorded for each straddling triangle.
#[derive(Debug, Clone)]
pub struct SurfaceSplit {
    pub above: MeshBuffer,
    pub below: MeshBuffer,
    pub segments: Vec<CutSegment>,
}

/// Outcome of the cap stage of [`split_solid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapStatus {
    /// Capping was not requested; both halves are left open.
    Omitted,
    /// Both halves were closed with the cut-loop cap.
    Applied,
    /// Fewer than three distinct cut points — no cap is possible. The halves
    /// are returned open; the caller decides whether that is acceptable.
    Degenerate { distinct_points: usize },
}

/// Final product of [`split_solid`].
#[derive(Debug, Clone)]
pub struct SplitHalves {
    pub above: MeshBuffer,
    pub below: MeshBuffer,
    pub cap: CapStatus,
}

/// Cut `mesh` by `plane` without capping.
///
/// Every vertex is distributed into the half its classification names; whole
/// triangles are copied across with remapped indices, straddling triangles
/// are cut into one triangle on the lone-vertex side and two on the other,
/// with all attributes interpolated at the two crossings. Both halves are
/// welded at [`WELD_TOLERANCE`] to merge the duplicate seam vertices adjacent
/// cuts append, and both carry the input's bounding metadata unchanged.
pub fn split_surface(mesh: &MeshBuffer, plane: &Plane) -> Result<SurfaceSplit, SplitError> {
    mesh.validate()?;

    let above_mask = plane.classify(mesh);
    let mut above = MeshBuffer::with_bounds(mesh.center, mesh.size);
    let mut below = MeshBuffer::with_bounds(mesh.center, mesh.size);

    // Distribute the original vertices, remembering where each one landed.
    let mut remap = Vec::with_capacity(mesh.vertex_count());
    for (i, &is_above) in above_mask.iter().enumerate() {
        let half = if is_above { &mut above } else { &mut below };
        remap.push(half.push(mesh.vertex(i)));
    }

    let mut segments = Vec::new();
    for tri in mesh.triangles.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        let (a0, a1, a2) = (above_mask[i0], above_mask[i1], above_mask[i2]);

        if a0 && a1 && a2 {
            above.push_triangle(remap[i0], remap[i1], remap[i2]);
        } else if !a0 && !a1 && !a2 {
            below.push_triangle(remap[i0], remap[i1], remap[i2]);
        } else {
            // Rotate so `up` is the lone vertex and the down pair keeps the
            // original edge order; both output pieces then preserve the
            // input winding.
            let (up, down0, down1) = if a1 == a2 {
                (i0, i1, i2)
            } else if a2 == a0 {
                (i1, i2, i0)
            } else {
                (i2, i0, i1)
            };

            let (cut_a, cut_b) = if above_mask[up] {
                split_triangle(mesh, plane, &remap, up, down0, down1, &mut above, &mut below)
            } else {
                split_triangle(mesh, plane, &remap, up, down0, down1, &mut below, &mut above)
            };
            // Orient each segment by the above side so the assembled loop
            // traverses the cap consistently.
            if above_mask[up] {
                segments.push([cut_a, cut_b]);
            } else {
                segments.push([cut_b, cut_a]);
            }
        }
    }

    above.weld(WELD_TOLERANCE);
    below.weld(WELD_TOLERANCE);

    Ok(SurfaceSplit {
        above,
        below,
        segments,
    })
}

/// Cut `mesh` by `plane` and, when `options.fill` is set, close both halves
/// with the cut-loop cap: the above half receives the cap facing the plane
/// normal, the below half a reverse-wound copy. Cap vertices are duplicated
/// into each half, never shared.
///
/// A degenerate cut does not fail the whole split — the halves come back
/// open with [`CapStatus::Degenerate`]. Errors are reserved for malformed
/// input meshes.
pub fn split_solid(
    mesh: &MeshBuffer,
    plane: &Plane,
    options: &SplitOptions,
) -> Result<SplitHalves, SplitError> {
    let SurfaceSplit {
        mut above,
        mut below,
        segments,
    } = split_surface(mesh, plane)?;

    if !options.fill {
        return Ok(SplitHalves {
            above,
            below,
            cap: CapStatus::Omitted,
        });
    }

    match build_cap(
        &segments,
        plane,
        mesh.center,
        mesh.size,
        &options.uv_rect,
        options.strategy,
    ) {
        Ok(cap) => {
            above.append(&cap);
            let mut reversed = cap;
            reversed.reverse_winding();
            below.append(&reversed);
            Ok(SplitHalves {
                above,
                below,
                cap: CapStatus::Applied,
            })
        }
        Err(SplitError::DegenerateCut { distinct_points }) => Ok(SplitHalves {
            above,
            below,
            cap: CapStatus::Degenerate { distinct_points },
        }),
        Err(other) => Err(other),
    }
}

/// Cut one straddling triangle. `top` is the half holding the lone vertex
/// `up`; `bottom` holds `down0` and `down1`. Returns the two crossing
/// positions, in `(up→down0, up→down1)` edge order.
#[allow(clippy::too_many_arguments)]
fn split_triangle(
    mesh: &MeshBuffer,
    plane: &Plane,
    remap: &[usize],
    up: usize,
    down0: usize,
    down1: usize,
    top: &mut MeshBuffer,
    bottom: &mut MeshBuffer,
) -> (Point3<Real>, Point3<Real>) {
    let v_up = mesh.vertex(up);
    let v_down0 = mesh.vertex(down0);
    let v_down1 = mesh.vertex(down1);

    // Standard plane-clip interpolation. The denominators are nonzero
    // because each edge's endpoints classify to opposite sides.
    let up_dot = (plane.point() - v_up.pos).dot(&plane.normal());
    let t0 = (up_dot / (v_down0.pos - v_up.pos).dot(&plane.normal())).clamp(0.0, 1.0);
    let t1 = (up_dot / (v_down1.pos - v_up.pos).dot(&plane.normal())).clamp(0.0, 1.0);

    let cut_a = cut_vertex(&v_up, &v_down0, t0);
    let cut_b = cut_vertex(&v_up, &v_down1, t1);

    let top_a = top.push(cut_a);
    let top_b = top.push(cut_b);
    top.push_triangle(remap[up], top_a, top_b);

    let bottom_a = bottom.push(cut_a);
    let bottom_b = bottom.push(cut_b);
    bottom.push_triangle(remap[down0], remap[down1], bottom_b);
    bottom.push_triangle(remap[down0], bottom_b, bottom_a);

    (cut_a.pos, cut_b.pos)
}

/// The interpolated vertex at parameter `t` on the `up → down` edge: position,
/// UV and normal lerp exactly, the tangent direction lerps then re-normalizes,
/// and the tangent handedness comes from the down-side endpoint.
fn cut_vertex(up: &Vertex, down: &Vertex, t: Real) -> Vertex {
    let mut v = up.interpolate(down, t);
    let dir = Vector3::new(v.tangent.x, v.tangent.y, v.tangent.z);
    let dir = if dir.norm_squared() > EPSILON {
        dir.normalize()
    } else {
        dir
    };
    v.tangent = Vector4::new(dir.x, dir.y, dir.z, down.tangent.w);
    v
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    fn triangle_mesh(points: [Point3<Real>; 3]) -> MeshBuffer {
        let mut mesh = MeshBuffer::with_bounds(Point3::origin(), Vector3::repeat(2.0));
        let normal = (points[1] - points[0])
            .cross(&(points[2] - points[0]))
            .normalize();
        for (i, p) in points.iter().enumerate() {
            let uv = Vector2::new((i % 2) as Real, (i / 2) as Real);
            mesh.push(Vertex::new(*p, uv, normal, Vector4::new(1.0, 0.0, 0.0, 1.0)));
        }
        mesh.push_triangle(0, 1, 2);
        mesh
    }

    fn winding_normal(mesh: &MeshBuffer, tri: usize) -> Vector3<Real> {
        let (a, b, c) = (
            mesh.positions[mesh.triangles[tri * 3]],
            mesh.positions[mesh.triangles[tri * 3 + 1]],
            mesh.positions[mesh.triangles[tri * 3 + 2]],
        );
        (b - a).cross(&(c - a))
    }

    #[test]
    fn mixed_triangle_preserves_winding() {
        // apex above the XZ plane, base below; face normal points at +Z
        let mesh = triangle_mesh([
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let plane = Plane::new(Point3::origin(), Vector3::y());
        let split = split_surface(&mesh, &plane).unwrap();

        assert_eq!(split.above.triangle_count(), 1);
        assert_eq!(split.below.triangle_count(), 2);
        assert_eq!(split.segments.len(), 1);

        let original = Vector3::z();
        for tri in 0..split.above.triangle_count() {
            assert!(winding_normal(&split.above, tri).dot(&original) > 0.0);
        }
        for tri in 0..split.below.triangle_count() {
            assert!(winding_normal(&split.below, tri).dot(&original) > 0.0);
        }
    }

    #[test]
    fn segment_oriented_by_above_side() {
        let mesh = triangle_mesh([
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let plane = Plane::new(Point3::origin(), Vector3::y());
        let up_is_above = split_surface(&mesh, &plane).unwrap();
        let up_is_below = split_surface(&mesh, &plane.flipped()).unwrap();

        // Same geometric segment either way, opposite traversal direction.
        approx::assert_relative_eq!(up_is_above.segments[0][0], up_is_below.segments[0][1]);
        approx::assert_relative_eq!(up_is_above.segments[0][1], up_is_below.segments[0][0]);
    }

    #[test]
    fn cut_vertex_handedness_from_down_side() {
        let up = Vertex::new(
            Point3::new(0.0, 1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector3::z(),
            Vector4::new(2.0, 0.0, 0.0, 1.0),
        );
        let down = Vertex::new(
            Point3::new(0.0, -1.0, 0.0),
            Vector2::new(0.0, 0.0),
            Vector3::z(),
            Vector4::new(2.0, 0.0, 0.0, -1.0),
        );
        let cut = cut_vertex(&up, &down, 0.5);
        approx::assert_relative_eq!(cut.pos, Point3::new(0.0, 0.0, 0.0));
        approx::assert_relative_eq!(cut.uv, Vector2::new(0.0, 0.5));
        approx::assert_relative_eq!(
            cut.tangent,
            Vector4::new(1.0, 0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
    }
}
