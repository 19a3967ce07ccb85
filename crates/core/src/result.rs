//! Stacking outcomes and results.

use crate::geometry::BoxSize;
use crate::placement::{PartId, Placement, PlacementStats};
use nalgebra::Vector3;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a successful stacking run.
#[derive(Debug, Clone)]
pub struct StackResult<G> {
    /// All placed instances merged into one geometry, in physical units.
    pub geometry: G,

    /// Every committed placement, in placement order.
    pub placements: Vec<Placement>,

    /// Final working box in voxels.
    pub voxel_box: BoxSize,

    /// Final working box in physical units.
    pub bounding_box: Vector3<f64>,

    /// Measured extents of the merged geometry in physical units.
    pub size: Vector3<f64>,

    /// Placed part volume divided by the volume of `size` (0.0 - 1.0).
    pub density: f64,

    /// Number of merge warnings logged during the run.
    pub merge_warnings: usize,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl<G> StackResult<G> {
    /// Returns the number of placed instances.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placements)
    }

    /// Returns density as a percentage string.
    pub fn density_percent(&self) -> String {
        format!("{:.1}%", self.density * 100.0)
    }
}

/// Terminal state of a stacking run.
#[derive(Debug, Clone)]
pub enum StackOutcome<G> {
    /// Every requested instance was placed.
    Succeeded(StackResult<G>),
    /// A part could not be placed anywhere inside the maximum box.
    Failed {
        /// The part that could not be placed.
        part_id: PartId,
        /// Working box when the run gave up.
        voxel_box: BoxSize,
    },
    /// The run was cancelled; partial state was discarded.
    Cancelled,
}

impl<G> StackOutcome<G> {
    /// Returns true for [`StackOutcome::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns true for [`StackOutcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the result of a successful run.
    pub fn result(&self) -> Option<&StackResult<G>> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the result of a successful run.
    pub fn into_result(self) -> Option<StackResult<G>> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Summary statistics for a stacking result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackSummary {
    /// Total instances placed.
    pub total_placed: usize,
    /// Measured size in physical units.
    pub size: [f64; 3],
    /// Density percentage.
    pub density_percent: f64,
    /// Merge warnings logged.
    pub merge_warnings: usize,
    /// Computation time in milliseconds.
    pub time_ms: u64,
}

impl<G> From<&StackResult<G>> for StackSummary {
    fn from(result: &StackResult<G>) -> Self {
        Self {
            total_placed: result.placements.len(),
            size: [result.size.x, result.size.y, result.size.z],
            density_percent: result.density * 100.0,
            merge_warnings: result.merge_warnings,
            time_ms: result.elapsed.as_millis() as u64,
        }
    }
}
