//! Test geometry whose voxel footprint is exactly its bounding box.

#![allow(dead_code)]

use nalgebra::{Point3, Rotation3, Vector3};
use pstack_core::{BoxSize, Geometry, Grid3, MergeWarning, Result, VariantSet, AABB3D};

/// A set of axis-aligned boxes.
///
/// Unlike a mesh, the voxel box carries no clearance and voxelization fills
/// the whole box from the grid origin, so placements can be replayed exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blocks {
    pub boxes: Vec<AABB3D<f64>>,
    pub warn_on_merge: bool,
}

impl Blocks {
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        Self {
            boxes: vec![AABB3D::new(0.0, 0.0, 0.0, x, y, z)],
            warn_on_merge: false,
        }
    }

    pub fn cube(n: f64) -> Self {
        Self::cuboid(n, n, n)
    }

    pub fn with_merge_warning(mut self) -> Self {
        self.warn_on_merge = true;
        self
    }

    fn map_boxes(&mut self, f: impl Fn(Point3<f64>) -> Point3<f64>) {
        for b in &mut self.boxes {
            let (lo, hi) = (b.min(), b.max());
            let corners: Vec<Point3<f64>> = (0..8)
                .map(|i| {
                    f(Point3::new(
                        if i & 4 != 0 { hi.x } else { lo.x },
                        if i & 2 != 0 { hi.y } else { lo.y },
                        if i & 1 != 0 { hi.z } else { lo.z },
                    ))
                })
                .collect();
            if let Some(mapped) = AABB3D::from_points(&corners) {
                *b = mapped;
            }
        }
    }
}

fn snap(extent: f64) -> usize {
    ((extent - 1e-6).ceil().max(1.0)) as usize
}

impl Geometry for Blocks {
    fn triangle_count(&self) -> usize {
        self.boxes.len() * 12
    }

    fn volume(&self) -> f64 {
        self.boxes.iter().map(|b| b.volume()).sum()
    }

    fn scale(&mut self, factor: f64) {
        self.map_boxes(|p| Point3::from(p.coords * factor));
    }

    fn rotate(&mut self, rotation: &Rotation3<f64>) {
        self.map_boxes(|p| rotation * p);
    }

    fn bounds(&self) -> Option<AABB3D<f64>> {
        let corners: Vec<_> = self.boxes.iter().flat_map(|b| [b.min(), b.max()]).collect();
        AABB3D::from_points(&corners)
    }

    fn set_baseline(&mut self, baseline: Point3<f64>) {
        if let Some(bounds) = self.bounds() {
            let shift = baseline - bounds.min();
            self.map_boxes(|p| p + shift);
        }
    }

    fn voxel_box(&self) -> BoxSize {
        match self.bounds() {
            Some(b) => BoxSize::new(snap(b.width()), snap(b.depth()), snap(b.height())),
            None => BoxSize::cube(1),
        }
    }

    fn voxelize(
        &self,
        grid: &mut Grid3<VariantSet>,
        variant: VariantSet,
        _min_hole: usize,
    ) -> Result<usize> {
        let footprint = self.voxel_box().min(grid.size());
        for x in 0..footprint.x {
            for y in 0..footprint.y {
                for z in 0..footprint.z {
                    grid[(x, y, z)] |= variant;
                }
            }
        }
        Ok(footprint.x * footprint.y * footprint.z)
    }

    fn merge_into(&self, dest: &mut Self, offset: &Vector3<f64>) -> Option<MergeWarning> {
        let mut moved = self.clone();
        moved.map_boxes(|p| p + offset);
        dest.boxes.extend(moved.boxes);
        self.warn_on_merge
            .then_some(MergeWarning::IntersectingTriangles)
    }

    fn decimate(&self, _keep_every: usize) -> Self {
        self.clone()
    }
}

/// Marks every placement's footprint in a fresh grid. Returns false if any
/// voxel is claimed twice.
pub fn replay_without_collision(placements: &[pstack_core::Placement], extent: BoxSize) -> bool {
    let Ok(mut grid) = Grid3::<bool>::try_new(extent) else {
        return false;
    };
    for p in placements {
        let reach = p.reach();
        for x in p.offset.0..reach.x {
            for y in p.offset.1..reach.y {
                for z in p.offset.2..reach.z {
                    match grid.get_mut(x, y, z) {
                        Some(cell) if !*cell => *cell = true,
                        _ => return false,
                    }
                }
            }
        }
    }
    true
}
