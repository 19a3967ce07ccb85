//! Triangle-soup mesh implementing the [`Geometry`] contract.

use crate::error::Result;
use crate::geometry::{Geometry, MergeWarning};
use crate::grid::Grid3;
use crate::transform::AABB3D;
use crate::variant_set::VariantSet;
use crate::voxelize::voxelize_triangles;
use nalgebra::{Point3, Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Triangles with an area below this are degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// A single facet with its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Outward unit normal (zero for degenerate triangles).
    pub normal: Vector3<f64>,
    /// First vertex.
    pub v1: Point3<f64>,
    /// Second vertex.
    pub v2: Point3<f64>,
    /// Third vertex.
    pub v3: Point3<f64>,
}

impl Triangle {
    /// Creates a triangle, deriving the normal from the winding order.
    pub fn new(v1: Point3<f64>, v2: Point3<f64>, v3: Point3<f64>) -> Self {
        let normal = (v2 - v1)
            .cross(&(v3 - v1))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        Self { normal, v1, v2, v3 }
    }

    /// Returns the three vertices.
    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Returns the triangle area.
    pub fn area(&self) -> f64 {
        (self.v2 - self.v1).cross(&(self.v3 - self.v1)).norm() * 0.5
    }

    /// Returns true if the triangle has non-finite vertices or no area.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.vertices().iter().all(|p| p.iter().all(|v| v.is_finite()));
        !finite || self.area() < DEGENERATE_AREA
    }
}

/// Signed volume and centroid of a closed mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeAndCentroid {
    /// Signed enclosed volume (positive for outward-facing windings).
    pub volume: f64,
    /// Volume centroid, or the origin for zero-volume meshes.
    pub centroid: Point3<f64>,
}

/// An unindexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Creates a mesh from triangles.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Creates an axis-aligned box spanning `[0, w] x [0, d] x [0, h]`.
    pub fn cuboid(width: f64, depth: f64, height: f64) -> Self {
        const FACES: [[usize; 3]; 12] = [
            [0, 2, 6],
            [0, 6, 4],
            [1, 5, 7],
            [1, 7, 3],
            [0, 4, 5],
            [0, 5, 1],
            [2, 3, 7],
            [2, 7, 6],
            [0, 1, 3],
            [0, 3, 2],
            [4, 6, 7],
            [4, 7, 5],
        ];
        // Corner i has x = bit 2, y = bit 1, z = bit 0.
        let corner = |i: usize| {
            Point3::new(
                if i & 4 != 0 { width } else { 0.0 },
                if i & 2 != 0 { depth } else { 0.0 },
                if i & 1 != 0 { height } else { 0.0 },
            )
        };
        let triangles = FACES
            .iter()
            .map(|&[a, b, c]| Triangle::new(corner(a), corner(b), corner(c)))
            .collect();
        Self { triangles }
    }

    /// Returns the triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends `other` translated by `translation`.
    pub fn add(&mut self, other: &Mesh, translation: &Vector3<f64>) {
        self.triangles.extend(other.triangles.iter().map(|t| Triangle {
            normal: t.normal,
            v1: t.v1 + translation,
            v2: t.v2 + translation,
            v3: t.v3 + translation,
        }));
    }

    /// Mirrors across the YZ plane, keeping triangles outward-facing.
    pub fn mirror_x(&mut self) {
        for t in &mut self.triangles {
            t.normal.x = -t.normal.x;
            t.v1.x = -t.v1.x;
            t.v2.x = -t.v2.x;
            t.v3.x = -t.v3.x;
            std::mem::swap(&mut t.v2, &mut t.v3);
        }
    }

    /// Computes the signed volume and centroid by summing origin tetrahedra.
    pub fn volume_and_centroid(&self) -> VolumeAndCentroid {
        let mut six_volume = 0.0;
        let mut weighted = Vector3::zeros();
        for t in &self.triangles {
            let piece = t.v1.coords.dot(&t.v2.coords.cross(&t.v3.coords));
            six_volume += piece;
            weighted += (t.v1.coords + t.v2.coords + t.v3.coords) * piece;
        }

        let centroid = if six_volume.abs() > f64::EPSILON {
            Point3::from(weighted / (4.0 * six_volume))
        } else {
            Point3::origin()
        };
        VolumeAndCentroid {
            volume: six_volume / 6.0,
            centroid,
        }
    }

    fn translate(&mut self, offset: &Vector3<f64>) {
        for t in &mut self.triangles {
            t.v1 += offset;
            t.v2 += offset;
            t.v3 += offset;
        }
    }
}

impl Geometry for Mesh {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn volume(&self) -> f64 {
        self.volume_and_centroid().volume
    }

    fn scale(&mut self, factor: f64) {
        for t in &mut self.triangles {
            t.v1.coords *= factor;
            t.v2.coords *= factor;
            t.v3.coords *= factor;
        }
    }

    fn rotate(&mut self, rotation: &Rotation3<f64>) {
        for t in &mut self.triangles {
            t.normal = rotation * t.normal;
            t.v1 = rotation * t.v1;
            t.v2 = rotation * t.v2;
            t.v3 = rotation * t.v3;
        }
    }

    fn bounds(&self) -> Option<AABB3D<f64>> {
        AABB3D::from_points(self.triangles.iter().flat_map(|t| [&t.v1, &t.v2, &t.v3]))
    }

    fn set_baseline(&mut self, baseline: Point3<f64>) {
        if let Some(bounds) = self.bounds() {
            self.translate(&(baseline - bounds.min()));
        }
    }

    fn voxelize(
        &self,
        grid: &mut Grid3<VariantSet>,
        variant: VariantSet,
        min_hole: usize,
    ) -> Result<usize> {
        voxelize_triangles(&self.triangles, grid, variant, min_hole)
    }

    fn merge_into(&self, dest: &mut Self, offset: &Vector3<f64>) -> Option<MergeWarning> {
        let bad = self.triangles.iter().filter(|t| t.is_degenerate()).count();
        dest.add(self, offset);
        (bad > 0).then_some(MergeWarning::BadTriangles(bad))
    }

    fn decimate(&self, keep_every: usize) -> Self {
        let step = keep_every.max(1);
        Self {
            triangles: self.triangles.iter().step_by(step).copied().collect(),
        }
    }
}
