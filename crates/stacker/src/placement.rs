//! Greedy diagonal-sweep placement.

use crate::cancel::CancellationToken;
use crate::part::Part;
use crate::space::OccupiedSpace;
use crate::sweep::DiagonalSweep;
use nalgebra::Vector3;
use pstack_core::{BoxSize, Geometry, Placement};

/// Callback invoked after every committed placement with the merged geometry
/// so far (voxel units) and the current working box.
pub type PreviewCallback<G> = Box<dyn Fn(&G, BoxSize) + Send + Sync>;

/// How a placement pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every part is fully placed.
    Done,
    /// The part at this index has instances left but no free coordinate
    /// admits it; the box must grow.
    Stalled(usize),
    /// Cancellation was observed.
    Cancelled,
}

/// Mutable state of one stacking run.
pub struct Workspace<G> {
    /// Voxels taken so far.
    pub space: OccupiedSpace,
    /// Current working box in voxels.
    pub working: BoxSize,
    /// Placed instances merged together, in voxel units.
    pub merged: G,
    /// Committed placements in order.
    pub placements: Vec<Placement>,
    /// Merge warnings seen so far.
    pub merge_warnings: usize,
    /// Instances in the whole job.
    pub total_instances: usize,
    /// Physical size of one voxel.
    pub resolution: f64,
}

impl<G: Geometry> Workspace<G> {
    /// Creates an empty workspace. `initial` is clamped to the space extent.
    pub fn new(space: OccupiedSpace, initial: BoxSize, total_instances: usize, resolution: f64) -> Self {
        let working = initial.min(space.extent());
        Self {
            space,
            working,
            merged: G::default(),
            placements: Vec::with_capacity(total_instances),
            merge_warnings: 0,
            total_instances,
            resolution,
        }
    }

    /// Instances placed so far.
    pub fn placed(&self) -> usize {
        self.placements.len()
    }

    /// Places parts from `start` down to index 0 inside the working box.
    ///
    /// Parts are expected in ascending volume order, so the largest is
    /// handled first. A part's scan resumes after each placed instance and
    /// starts over for the next part.
    pub fn place_pass(
        &mut self,
        parts: &mut [Part<G>],
        start: usize,
        cancel: &CancellationToken,
        mut on_placed: impl FnMut(&Self),
    ) -> PassOutcome {
        for index in (0..parts.len().min(start + 1)).rev() {
            if cancel.is_cancelled() {
                return PassOutcome::Cancelled;
            }

            let part = &mut parts[index];
            if part.is_complete() {
                continue;
            }

            for at in DiagonalSweep::new(self.working) {
                if cancel.is_cancelled() {
                    return PassOutcome::Cancelled;
                }

                let fit = OccupiedSpace::fit_mask(part, at, self.working);
                let Some(variant) = self.space.feasible_mask(part, at, fit).lowest() else {
                    continue;
                };

                self.commit(part, variant, at);
                on_placed(self);
                if part.is_complete() {
                    break;
                }
            }

            if !part.is_complete() {
                return PassOutcome::Stalled(index);
            }
        }

        PassOutcome::Done
    }

    fn commit(&mut self, part: &mut Part<G>, variant: usize, at: (usize, usize, usize)) {
        self.space.occupy(part, variant, at);

        let chosen = &part.variants[variant];
        let offset = Vector3::new(at.0 as f64, at.1 as f64, at.2 as f64);
        if let Some(warning) = chosen.geometry.merge_into(&mut self.merged, &offset) {
            log::warn!("Merging part {} at {:?}: {}", part.id, at, warning);
            self.merge_warnings += 1;
        }

        self.placements.push(
            Placement::new(part.id.clone(), part.input_index, part.placed(), variant, at)
                .with_voxel_box(chosen.voxel_box)
                .with_transform(chosen.placement_transform(at, self.resolution)),
        );
        part.remaining -= 1;
    }

    /// Enlarges the working box, clamped to the space extent.
    pub fn grow_to(&mut self, working: BoxSize) {
        self.working = working.max(self.working).min(self.space.extent());
    }
}
