//! Voxel boxes and the geometry kernel contract.

use crate::error::Result;
use crate::grid::Grid3;
use crate::transform::AABB3D;
use crate::variant_set::VariantSet;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer extents of a box in voxel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxSize {
    /// Cells along X.
    pub x: usize,
    /// Cells along Y.
    pub y: usize,
    /// Cells along Z.
    pub z: usize,
}

impl BoxSize {
    /// Creates a new box size.
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Creates a cube with edge `n`.
    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Returns the number of cells, saturating at `u64::MAX`.
    pub fn volume(&self) -> u64 {
        (self.x as u64)
            .saturating_mul(self.y as u64)
            .saturating_mul(self.z as u64)
    }

    /// Returns true if any extent is zero.
    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Componentwise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Componentwise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Returns the far corner of this box when its origin sits at `at`.
    pub fn placed_at(self, at: (usize, usize, usize)) -> Self {
        Self::new(at.0 + self.x, at.1 + self.y, at.2 + self.z)
    }

    /// Adds `margin` cells to every extent.
    pub fn grown_by(self, margin: usize) -> Self {
        Self::new(self.x + margin, self.y + margin, self.z + margin)
    }

    /// Returns true if this box, placed at `at`, ends strictly before
    /// `limit` on every axis.
    pub fn fits_strictly(self, at: (usize, usize, usize), limit: Self) -> bool {
        at.0 + self.x < limit.x && at.1 + self.y < limit.y && at.2 + self.z < limit.z
    }

    /// Returns true if every extent is at least the corresponding extent of `other`.
    pub fn covers(self, other: Self) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Non-fatal problem reported while merging geometry into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergeWarning {
    /// Triangles that are degenerate or have non-finite vertices were merged.
    BadTriangles(usize),
    /// The merged pieces intersect each other.
    IntersectingTriangles,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadTriangles(n) => write!(f, "{n} degenerate or non-finite triangles merged"),
            Self::IntersectingTriangles => f.write_str("merged geometry has intersecting triangles"),
        }
    }
}

/// Geometry kernel consumed by the nesting engine.
///
/// Coordinates handed to the engine are voxel units: the engine scales each
/// part by `1 / resolution` before measuring or voxelizing it.
pub trait Geometry: Clone + Default + Send + Sync {
    /// Number of triangles; used as the preprocessing progress weight.
    fn triangle_count(&self) -> usize;

    /// Enclosed volume in the geometry's current units.
    fn volume(&self) -> f64;

    /// Scales uniformly about the origin.
    fn scale(&mut self, factor: f64);

    /// Rotates about the origin.
    fn rotate(&mut self, rotation: &Rotation3<f64>);

    /// Rotates about `axis` by `degrees`. A zero axis leaves the geometry unchanged.
    fn rotate_axis(&mut self, axis: &Vector3<f64>, degrees: f64) {
        if let Some(axis) = Unit::try_new(*axis, f64::EPSILON) {
            self.rotate(&Rotation3::from_axis_angle(&axis, degrees.to_radians()));
        }
    }

    /// Axis-aligned bounds, or `None` for empty geometry.
    fn bounds(&self) -> Option<AABB3D<f64>>;

    /// Translates so the minimum corner of the bounds sits at `baseline`.
    fn set_baseline(&mut self, baseline: Point3<f64>);

    /// Integer voxel box: the extents rounded up plus one clearance voxel on
    /// each side. Empty geometry measures one voxel.
    fn voxel_box(&self) -> BoxSize {
        match self.bounds() {
            Some(b) => BoxSize::new(
                clearance_extent(b.width()),
                clearance_extent(b.depth()),
                clearance_extent(b.height()),
            ),
            None => BoxSize::cube(1),
        }
    }

    /// ORs `variant` into every grid cell the geometry occupies. Cavities
    /// narrower than `min_hole` voxels count as solid. Returns the number of
    /// solid voxels; fails only if scratch space cannot be allocated.
    fn voxelize(
        &self,
        grid: &mut Grid3<VariantSet>,
        variant: VariantSet,
        min_hole: usize,
    ) -> Result<usize>;

    /// Appends a copy of this geometry translated by `offset` to `dest`.
    fn merge_into(&self, dest: &mut Self, offset: &Vector3<f64>) -> Option<MergeWarning>;

    /// Cheap approximation keeping every `keep_every`-th triangle.
    fn decimate(&self, keep_every: usize) -> Self;
}

/// Rotation round-off below this is not allowed to add a voxel.
const EXTENT_TOLERANCE: f64 = 1e-6;

fn clearance_extent(extent: f64) -> usize {
    let cells = (extent + 2.0 - EXTENT_TOLERANCE).ceil();
    if cells.is_finite() && cells > 1.0 {
        cells as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_volume_and_ops() {
        let a = BoxSize::new(2, 3, 4);
        let b = BoxSize::new(5, 1, 4);
        assert_eq!(a.volume(), 24);
        assert_eq!(a.max(b), BoxSize::new(5, 3, 4));
        assert_eq!(a.min(b), BoxSize::new(2, 1, 4));
        assert_eq!(a.placed_at((1, 1, 1)), BoxSize::new(3, 4, 5));
        assert_eq!(a.grown_by(2), BoxSize::new(4, 5, 6));
        assert!(BoxSize::new(0, 3, 3).is_empty());
        assert_eq!(a.to_string(), "2x3x4");
    }

    #[test]
    fn test_fits_strictly() {
        let part = BoxSize::cube(2);
        let limit = BoxSize::cube(3);
        assert!(part.fits_strictly((0, 0, 0), limit));
        // An exact fit is rejected: the bound is strict.
        assert!(!part.fits_strictly((1, 0, 0), limit));
        assert!(!BoxSize::cube(3).fits_strictly((0, 0, 0), limit));
    }

    #[test]
    fn test_volume_saturates() {
        let huge = BoxSize::cube(usize::MAX);
        assert_eq!(huge.volume(), u64::MAX);
    }

    #[test]
    fn test_clearance_extent() {
        assert_eq!(clearance_extent(0.0), 2);
        assert_eq!(clearance_extent(1.5), 4);
        assert_eq!(clearance_extent(3.0 + 1e-12), 5);
        assert_eq!(clearance_extent(f64::NAN), 1);
    }
}
