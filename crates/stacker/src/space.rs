//! Global occupied-space grid and the collision tests against it.

use crate::part::Part;
use pstack_core::{BoxSize, Grid3, Result, VariantSet};

/// Voxels already taken by placed parts, regardless of which part.
///
/// Allocated once per run at the largest box the run may grow to.
#[derive(Debug, Clone)]
pub struct OccupiedSpace {
    cells: Grid3<bool>,
}

impl OccupiedSpace {
    /// Allocates an empty space of `extent` voxels.
    pub fn try_new(extent: BoxSize) -> Result<Self> {
        Ok(Self {
            cells: Grid3::try_new(extent)?,
        })
    }

    /// Allocated extent.
    pub fn extent(&self) -> BoxSize {
        self.cells.size()
    }

    /// Returns true if the voxel is occupied. Cells outside the extent are free.
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.cells.get(x, y, z).copied().unwrap_or(false)
    }

    /// Number of occupied voxels.
    pub fn occupied_count(&self) -> usize {
        self.cells.count(|&c| c)
    }

    /// Variants of `part` whose box, placed at `at`, ends strictly inside `limit`.
    pub fn fit_mask<G>(part: &Part<G>, at: (usize, usize, usize), limit: BoxSize) -> VariantSet {
        part.variants
            .iter()
            .filter(|v| v.voxel_box.fits_strictly(at, limit))
            .map(|v| v.index)
            .collect()
    }

    /// Narrows `mask` to the variants that do not overlap any occupied voxel
    /// when placed at `at`.
    pub fn feasible_mask<G>(
        &self,
        part: &Part<G>,
        at: (usize, usize, usize),
        mut mask: VariantSet,
    ) -> VariantSet {
        if mask.is_empty() {
            return mask;
        }

        let reach = mask
            .iter()
            .filter_map(|i| part.variants.get(i))
            .fold(BoxSize::default(), |acc, v| acc.max(v.voxel_box))
            .min(part.grid.size());
        let extent = self.extent();

        for dx in 0..reach.x.min(extent.x.saturating_sub(at.0)) {
            for dy in 0..reach.y.min(extent.y.saturating_sub(at.1)) {
                for dz in 0..reach.z.min(extent.z.saturating_sub(at.2)) {
                    if !self.cells[(at.0 + dx, at.1 + dy, at.2 + dz)] {
                        continue;
                    }
                    mask.remove_all(part.grid[(dx, dy, dz)]);
                    if mask.is_empty() {
                        return mask;
                    }
                }
            }
        }
        mask
    }

    /// Marks every voxel of `variant` placed at `at` as occupied.
    ///
    /// The caller must have checked the placement with [`Self::feasible_mask`].
    pub fn occupy<G>(&mut self, part: &Part<G>, variant: usize, at: (usize, usize, usize)) {
        for ((dx, dy, dz), cell) in part.grid.iter() {
            if !cell.contains(variant) {
                continue;
            }
            if let Some(target) = self.cells.get_mut(at.0 + dx, at.1 + dy, at.2 + dz) {
                debug_assert!(!*target, "voxel ({}, {}, {}) placed twice", at.0 + dx, at.1 + dy, at.2 + dz);
                *target = true;
            }
        }
    }
}
