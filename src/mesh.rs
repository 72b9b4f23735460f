//! Growable buffer of parallel vertex attribute sequences plus a flat
//! triangle index list — the unit of currency every split stage produces and
//! consumes.

use crate::errors::SplitError;
use crate::float_types::{EPSILON, Real};
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::collections::HashMap;

/// Sub-rectangle of the unit UV square that cube-projected UVs are remapped
/// into. Lets a cap land in a designated region of a texture atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vector2<Real>,
    pub max: Vector2<Real>,
}

impl UvRect {
    pub const fn new(min_u: Real, min_v: Real, max_u: Real, max_v: Real) -> Self {
        UvRect {
            min: Vector2::new(min_u, min_v),
            max: Vector2::new(max_u, max_v),
        }
    }

    /// Map normalized planar coordinates `(u, v) ∈ [0,1]²` into the rect.
    pub fn remap(&self, u: Real, v: Real) -> Vector2<Real> {
        Vector2::new(
            self.min.x + (self.max.x - self.min.x) * u,
            self.min.y + (self.max.y - self.min.y) * v,
        )
    }
}

impl Default for UvRect {
    /// The full unit square.
    fn default() -> Self {
        UvRect::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// A triangle mesh as parallel attribute arrays.
///
/// Invariants: `positions`, `uvs`, `normals` and `tangents` always have the
/// same length; `triangles.len()` is a multiple of three and every index is
/// `< positions.len()`. Each consecutive index triple is one triangle, winding
/// order significant. [`MeshBuffer::validate`] checks both invariants for
/// externally supplied meshes.
///
/// `center` and `size` describe the bounding box of the mesh this buffer was
/// derived from. They are carried through splits for downstream use (UV
/// projection, re-centering) and never recomputed here.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<Point3<Real>>,
    pub uvs: Vec<Vector2<Real>>,
    pub normals: Vec<Vector3<Real>>,
    pub tangents: Vec<Vector4<Real>>,
    pub triangles: Vec<usize>,
    pub center: Point3<Real>,
    pub size: Vector3<Real>,
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuffer {
    /// An empty buffer with zero bounds.
    pub fn new() -> Self {
        Self::with_bounds(Point3::origin(), Vector3::zeros())
    }

    /// An empty buffer carrying the given bounding metadata.
    pub fn with_bounds(center: Point3<Real>, size: Vector3<Real>) -> Self {
        MeshBuffer {
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            tangents: Vec::new(),
            triangles: Vec::new(),
            center,
            size,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.triangles.is_empty()
    }

    /// Append a vertex, returning its index.
    pub fn push(&mut self, vertex: Vertex) -> usize {
        self.positions.push(vertex.pos);
        self.uvs.push(vertex.uv);
        self.normals.push(vertex.normal);
        self.tangents.push(vertex.tangent);
        self.positions.len() - 1
    }

    /// Read vertex `index` back as a value.
    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex::new(
            self.positions[index],
            self.uvs[index],
            self.normals[index],
            self.tangents[index],
        )
    }

    pub fn push_triangle(&mut self, a: usize, b: usize, c: usize) {
        self.triangles.push(a);
        self.triangles.push(b);
        self.triangles.push(c);
    }

    /// Check the parallel-length and index-range invariants.
    pub fn validate(&self) -> Result<(), SplitError> {
        let vertex_count = self.positions.len();
        for (attribute, len) in [
            ("uvs", self.uvs.len()),
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
        ] {
            if len != vertex_count {
                return Err(SplitError::AttributeMismatch {
                    attribute,
                    len,
                    vertex_count,
                });
            }
        }
        if self.triangles.len() % 3 != 0 {
            return Err(SplitError::IncompleteTriangle {
                len: self.triangles.len(),
            });
        }
        for &index in &self.triangles {
            if index >= vertex_count {
                return Err(SplitError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Merge vertices whose positions lie within `tolerance` of each other,
    /// remapping the triangle list accordingly. The first vertex seen at a
    /// position wins; its attributes stand for the whole cluster.
    ///
    /// Triangles collapsed by the merge (two indices now equal — seam
    /// duplicates, or exactly-degenerate slivers from a plane passing through
    /// a vertex) are dropped.
    pub fn weld(&mut self, tolerance: Real) {
        let inv = 1.0 / tolerance;
        let tolerance_sq = tolerance * tolerance;
        let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut remap = Vec::with_capacity(self.positions.len());
        let mut kept = MeshBuffer::with_bounds(self.center, self.size);

        for i in 0..self.positions.len() {
            let p = self.positions[i];
            let cell = (
                (p.x * inv).floor() as i64,
                (p.y * inv).floor() as i64,
                (p.z * inv).floor() as i64,
            );
            let mut merged = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                        if let Some(bucket) = grid.get(&neighbor) {
                            for &j in bucket {
                                if (kept.positions[j] - p).norm_squared() <= tolerance_sq {
                                    merged = Some(j);
                                    break 'search;
                                }
                            }
                        }
                    }
                }
            }
            match merged {
                Some(j) => remap.push(j),
                None => {
                    let j = kept.push(self.vertex(i));
                    grid.entry(cell).or_default().push(j);
                    remap.push(j);
                }
            }
        }

        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (remap[tri[0]], remap[tri[1]], remap[tri[2]]);
            if a != b && b != c && c != a {
                kept.push_triangle(a, b, c);
            }
        }

        *self = kept;
    }

    /// Reverse every triangle's winding and flip every vertex, turning the
    /// mesh inside out. Used for the cap copy the below half receives.
    pub fn reverse_winding(&mut self) {
        for tri in self.triangles.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for normal in &mut self.normals {
            *normal = -*normal;
        }
        for tangent in &mut self.tangents {
            tangent.w = -tangent.w;
        }
    }

    /// Concatenate `other` onto `self`, offsetting its triangle indices.
    /// Vertices are duplicated, never shared, so the two buffers stay
    /// independent afterwards.
    pub fn append(&mut self, other: &MeshBuffer) {
        let offset = self.positions.len();
        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        self.normals.extend_from_slice(&other.normals);
        self.tangents.extend_from_slice(&other.tangents);
        self.triangles
            .extend(other.triangles.iter().map(|&i| i + offset));
    }

    /// Box-project UVs: each vertex picks the face of the carried bounding
    /// box its normal points at most directly, and its position along the two
    /// remaining axes — normalized by `center`/`size` — lands in `rect`.
    pub fn map_uvs_cube(&mut self, rect: &UvRect) {
        let mins = self.center - self.size * 0.5;
        for i in 0..self.positions.len() {
            let n = self.normals[i];
            let (nx, ny, nz) = (n.x.abs(), n.y.abs(), n.z.abs());
            let (u_axis, v_axis) = if nx >= ny && nx >= nz {
                (2, 1)
            } else if ny >= nx && ny >= nz {
                (0, 2)
            } else {
                (0, 1)
            };
            let u = self.normalized_coord(i, u_axis, &mins);
            let v = self.normalized_coord(i, v_axis, &mins);
            self.uvs[i] = rect.remap(u, v);
        }
    }

    fn normalized_coord(&self, vertex: usize, axis: usize, mins: &Point3<Real>) -> Real {
        if self.size[axis] > EPSILON {
            (self.positions[vertex][axis] - mins[axis]) / self.size[axis]
        } else {
            0.5
        }
    }
}
