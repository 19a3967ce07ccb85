//! Placement records for stacked part instances.

use crate::geometry::BoxSize;
use crate::transform::Transform3D;
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a part within a stacking job.
pub type PartId = String;

/// One committed instance of a part inside the result volume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed part.
    pub part_id: PartId,

    /// Index of the part in the job's input order.
    pub part_index: usize,

    /// Instance index (0-based) among the part's requested quantity.
    pub instance: usize,

    /// Rotation variant used (bit position in the part's variant set).
    pub variant: usize,

    /// Voxel coordinate of the variant's box origin.
    pub offset: (usize, usize, usize),

    /// Voxel box of the variant; the instance occupies cells inside
    /// `offset .. offset + voxel_box`.
    pub voxel_box: BoxSize,

    /// Maps the part's source coordinates to result coordinates.
    pub transform: Transform3D<f64>,
}

impl Placement {
    /// Creates a placement with an identity transform.
    pub fn new(
        part_id: impl Into<PartId>,
        part_index: usize,
        instance: usize,
        variant: usize,
        offset: (usize, usize, usize),
    ) -> Self {
        Self {
            part_id: part_id.into(),
            part_index,
            instance,
            variant,
            offset,
            voxel_box: BoxSize::default(),
            transform: Transform3D::identity(),
        }
    }

    /// Sets the variant's voxel box.
    pub fn with_voxel_box(mut self, voxel_box: BoxSize) -> Self {
        self.voxel_box = voxel_box;
        self
    }

    /// Far corner of the occupied voxel range.
    pub fn reach(&self) -> BoxSize {
        self.voxel_box.placed_at(self.offset)
    }

    /// Sets the source-to-result transform.
    pub fn with_transform(mut self, transform: Transform3D<f64>) -> Self {
        self.transform = transform;
        self
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Placed instances per part ID.
    pub per_part: BTreeMap<PartId, usize>,
    /// Distribution of rotation variants used.
    pub variant_distribution: HashMap<usize, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            *stats.per_part.entry(p.part_id.clone()).or_insert(0) += 1;
            *stats.variant_distribution.entry(p.variant).or_insert(0) += 1;
        }

        stats
    }

    /// Returns the number of placed instances of `part_id`.
    pub fn placed(&self, part_id: &str) -> usize {
        self.per_part.get(part_id).copied().unwrap_or(0)
    }
}
