//! Assembling unordered cut segments into an ordered boundary loop and
//! filling that loop with a triangle fan — the cap that keeps a split half
//! closed.

use crate::errors::SplitError;
use crate::float_types::{
    ANGLE_TIE, CHAIN_MERGE_SQUARED, COLLINEAR_DOT, LOOP_MERGE_SQUARED, Real,
};
use crate::mesh::{MeshBuffer, UvRect};
use crate::plane::Plane;
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector2, Vector3};

/// The line segment where one straddling triangle crosses the plane, oriented
/// by the splitter so above-side traversal is consistent. Ephemeral: lives
/// only between the splitter and the assembler.
pub type CutSegment = [Point3<Real>; 2];

/// Strategy for ordering cut segments into a single boundary loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopStrategy {
    /// Pairwise endpoint stitching. Near-linear when the producer emitted the
    /// segments in near-boundary order, but assumes one simple loop; disjoint
    /// loops or non-manifold cuts yield a malformed cap, not an error.
    #[default]
    Fast,
    /// Selection sort by angular position around a pivot point. O(n²) in the
    /// loop size, which is bounded by the cross-section complexity rather
    /// than the mesh size. Authoritative when the two strategies disagree.
    Angular,
}

/// Order the segment endpoints into a single boundary loop. Returns fewer
/// than three points when the cut is degenerate.
pub fn assemble_loop(segments: &[CutSegment], strategy: LoopStrategy) -> Vec<Point3<Real>> {
    match strategy {
        LoopStrategy::Fast => stitch_loop(segments),
        LoopStrategy::Angular => angular_loop(segments),
    }
}

/// Build the cap mesh for the given cut: assemble the loop, orient it so the
/// fan's face normal matches the plane normal, fan-triangulate, and finish
/// every vertex with the plane normal, the fixed plane tangent, and
/// box-projected UVs inside `uv_rect`.
///
/// The caller hands this cap to the above half as-is and a
/// [`MeshBuffer::reverse_winding`] copy to the below half.
pub fn build_cap(
    segments: &[CutSegment],
    plane: &Plane,
    center: Point3<Real>,
    size: Vector3<Real>,
    uv_rect: &UvRect,
    strategy: LoopStrategy,
) -> Result<MeshBuffer, SplitError> {
    let mut loop_points = assemble_loop(segments, strategy);
    if loop_points.len() < 3 {
        return Err(SplitError::DegenerateCut {
            distinct_points: loop_points.len(),
        });
    }

    if newell_normal(&loop_points).dot(&plane.normal()) < 0.0 {
        loop_points.reverse();
    }

    let normal = plane.normal();
    let tangent = plane.tangent();
    let mut cap = MeshBuffer::with_bounds(center, size);
    for point in &loop_points {
        cap.push(Vertex::new(*point, Vector2::zeros(), normal, tangent));
    }
    for i in 1..loop_points.len() - 1 {
        cap.push_triangle(0, i, i + 1);
    }
    cap.map_uvs_cube(uv_rect);
    Ok(cap)
}

/// Drop points lying within `tolerance_sq` of an earlier point, keeping
/// first-seen order.
fn dedup_points(points: Vec<Point3<Real>>, tolerance_sq: Real) -> Vec<Point3<Real>> {
    let mut kept: Vec<Point3<Real>> = Vec::with_capacity(points.len());
    for p in points {
        if !kept.iter().any(|q| (p - q).norm_squared() < tolerance_sq) {
            kept.push(p);
        }
    }
    kept
}

/// Robust strategy: order the deduplicated points by angle around the first
/// point.
///
/// The reference direction points at the second deduplicated point, which is
/// loop-adjacent to the pivot (both endpoints came from the same segment), so
/// for a convex cross-section every other point sits within the half-turn
/// that plain dot-product ordering can resolve.
fn angular_loop(segments: &[CutSegment]) -> Vec<Point3<Real>> {
    let flat: Vec<Point3<Real>> = segments.iter().flat_map(|s| [s[0], s[1]]).collect();
    let points = dedup_points(flat, LOOP_MERGE_SQUARED);
    if points.len() < 3 {
        return points;
    }

    let pivot = points[0];
    let reference = (points[1] - pivot).normalize();
    let key = |index: usize| -> (Real, Real) {
        let offset = points[index] - pivot;
        (offset.normalize().dot(&reference), offset.norm_squared())
    };

    // Selection sort over owned indices by decreasing alignment with the
    // reference. Angular ties go to the farther point, except along the
    // reference edge itself where the nearer point must come first to keep
    // the fan star-shaped around the pivot.
    let mut order: Vec<usize> = (2..points.len()).collect();
    for i in 0..order.len() {
        let mut best = i;
        let (mut best_dot, mut best_dist) = key(order[i]);
        for j in (i + 1)..order.len() {
            let (dot, dist) = key(order[j]);
            let wins = if dot - best_dot > ANGLE_TIE {
                true
            } else if best_dot - dot < ANGLE_TIE {
                if dot > COLLINEAR_DOT {
                    dist < best_dist
                } else {
                    dist >= best_dist
                }
            } else {
                false
            };
            if wins {
                best = j;
                best_dot = dot;
                best_dist = dist;
            }
        }
        order.swap(i, best);
    }

    let mut ordered = vec![points[0], points[1]];
    ordered.extend(order.into_iter().map(|index| points[index]));
    ordered
}

/// Fast strategy: walk a chain from the first segment, splicing on whichever
/// unused segment shares an endpoint with the chain tail.
fn stitch_loop(segments: &[CutSegment]) -> Vec<Point3<Real>> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let mut used = vec![false; segments.len()];
    used[0] = true;
    let mut chain = vec![first[0], first[1]];

    for _ in 1..segments.len() {
        let tail = chain[chain.len() - 1];
        let mut next = None;
        'scan: for (i, segment) in segments.iter().enumerate() {
            if used[i] {
                continue;
            }
            for end in 0..2 {
                if (segment[end] - tail).norm_squared() < CHAIN_MERGE_SQUARED {
                    next = Some((i, segment[1 - end]));
                    break 'scan;
                }
            }
        }
        match next {
            Some((i, point)) => {
                used[i] = true;
                chain.push(point);
            }
            // Chain breaks: disjoint loop or non-manifold cut. Emit what we
            // have; the cap will be visibly malformed rather than a crash.
            None => break,
        }
    }

    // The walk ends back at the start; drop the closing duplicate.
    if chain.len() > 1 && (chain[chain.len() - 1] - chain[0]).norm_squared() < CHAIN_MERGE_SQUARED {
        chain.pop();
    }
    dedup_points(chain, CHAIN_MERGE_SQUARED)
}

/// Polygon normal by Newell's method; tolerant of collinear runs in the loop.
fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal += current.coords.cross(&next.coords);
    }
    normal
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(x: Real, y: Real) -> Point3<Real> {
        Point3::new(x, y, 0.0)
    }

    /// Unit-square boundary, segments deliberately disordered and flipped.
    fn square_segments() -> Vec<CutSegment> {
        vec![
            [p(0.0, 0.0), p(1.0, 0.0)],
            [p(1.0, 1.0), p(0.0, 1.0)],
            [p(1.0, 0.0), p(1.0, 1.0)],
            [p(0.0, 0.0), p(0.0, 1.0)],
        ]
    }

    fn cyclic_equal(a: &[Point3<Real>], b: &[Point3<Real>]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let n = a.len();
        let matches = |offset: usize, reversed: bool| {
            (0..n).all(|i| {
                let j = if reversed {
                    (offset + n - i) % n
                } else {
                    (offset + i) % n
                };
                (a[i] - b[j]).norm_squared() < 1e-12
            })
        };
        (0..n).any(|offset| matches(offset, false) || matches(offset, true))
    }

    #[test]
    fn strategies_agree_on_square() {
        let segments = square_segments();
        let fast = assemble_loop(&segments, LoopStrategy::Fast);
        let angular = assemble_loop(&segments, LoopStrategy::Angular);
        assert_eq!(fast.len(), 4);
        assert_eq!(angular.len(), 4);
        assert!(
            cyclic_equal(&fast, &angular),
            "fast loop {fast:?} must match the authoritative angular loop {angular:?}"
        );
    }

    #[test]
    fn angular_handles_collinear_runs() {
        // square with a midpoint on the bottom edge
        let segments = vec![
            [p(0.0, 0.0), p(0.5, 0.0)],
            [p(0.5, 0.0), p(1.0, 0.0)],
            [p(1.0, 0.0), p(1.0, 1.0)],
            [p(1.0, 1.0), p(0.0, 1.0)],
            [p(0.0, 1.0), p(0.0, 0.0)],
        ];
        let angular = assemble_loop(&segments, LoopStrategy::Angular);
        assert_eq!(angular.len(), 5);
        let expected = [p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(cyclic_equal(&angular, &expected), "got {angular:?}");
    }

    #[test]
    fn cap_faces_the_plane_normal() {
        let plane = Plane::new(Point3::origin(), Vector3::z());
        let cap = build_cap(
            &square_segments(),
            &plane,
            Point3::new(0.5, 0.5, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            &UvRect::default(),
            LoopStrategy::Angular,
        )
        .unwrap();

        assert_eq!(cap.vertex_count(), 4);
        assert_eq!(cap.triangle_count(), 2);
        for tri in cap.triangles.chunks_exact(3) {
            let (a, b, c) = (
                cap.positions[tri[0]],
                cap.positions[tri[1]],
                cap.positions[tri[2]],
            );
            let face = (b - a).cross(&(c - a));
            assert!(
                face.dot(&plane.normal()) > 0.0,
                "fan triangle must face the plane normal"
            );
        }
        for normal in &cap.normals {
            assert_eq!(*normal, plane.normal());
        }
    }

    #[test]
    fn cap_uvs_land_in_rect() {
        let plane = Plane::new(Point3::origin(), Vector3::z());
        let rect = UvRect::new(0.25, 0.0, 0.5, 0.5);
        let cap = build_cap(
            &square_segments(),
            &plane,
            Point3::new(0.5, 0.5, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            &rect,
            LoopStrategy::Fast,
        )
        .unwrap();
        for uv in &cap.uvs {
            assert!(uv.x >= rect.min.x - 1e-12 && uv.x <= rect.max.x + 1e-12);
            assert!(uv.y >= rect.min.y - 1e-12 && uv.y <= rect.max.y + 1e-12);
        }
    }

    #[test]
    fn degenerate_cut_is_an_error() {
        let plane = Plane::new(Point3::origin(), Vector3::z());
        let segments = vec![[p(0.0, 0.0), p(1.0, 0.0)], [p(1.0, 0.0), p(0.0, 0.0)]];
        let result = build_cap(
            &segments,
            &plane,
            Point3::origin(),
            Vector3::zeros(),
            &UvRect::default(),
            LoopStrategy::Angular,
        );
        assert_eq!(
            result,
            Err(SplitError::DegenerateCut { distinct_points: 2 })
        );
    }
}
