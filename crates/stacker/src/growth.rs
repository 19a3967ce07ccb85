//! Working box growth when a placement pass stalls.

use crate::cancel::CancellationToken;
use crate::part::Part;
use crate::space::OccupiedSpace;
use crate::sweep::DiagonalSweep;
use pstack_core::BoxSize;

/// Extra voxels added beyond the cheapest admissible reach.
pub const GROWTH_MARGIN: usize = 2;

/// Result of a growth search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// The working box to use for the next placement pass.
    Grown(BoxSize),
    /// No offset inside the space extent admits the part.
    Exhausted,
    /// Cancellation was observed.
    Cancelled,
}

/// Finds the smallest enlargement of `working` that admits one instance of
/// `part`.
///
/// Every coordinate of the space extent is a candidate, visited in sweep
/// order. A candidate's cost is the volume of `max(working, offset + box)`
/// for its cheapest feasible variant; the first candidate reaching the lowest
/// cost wins. The grown box is that reach plus [`GROWTH_MARGIN`], clamped to
/// the extent. The placement itself is left to the next pass.
pub fn grow_box<G>(
    part: &Part<G>,
    space: &OccupiedSpace,
    working: BoxSize,
    cancel: &CancellationToken,
) -> GrowthOutcome {
    let extent = space.extent();
    let bound = LayerBound::new(working, part.min_box);
    let mut best: Option<(u64, BoxSize)> = None;
    let mut layer = usize::MAX;

    for at in DiagonalSweep::new(extent) {
        if cancel.is_cancelled() {
            return GrowthOutcome::Cancelled;
        }

        let best_volume = best.map(|(v, _)| v);
        let s = at.0 + at.1 + at.2;
        if s != layer {
            layer = s;
            if best_volume.is_some_and(|v| bound.at_layer(s) > v) {
                break;
            }
        }
        if best_volume.is_some_and(|v| working.max(part.min_box.placed_at(at)).volume() > v) {
            continue;
        }

        let fit = OccupiedSpace::fit_mask(part, at, extent);
        let feasible = space.feasible_mask(part, at, fit);
        for index in feasible {
            let reach = part.variants[index].voxel_box.placed_at(at);
            let volume = working.max(reach).volume();
            if best.map_or(true, |(v, _)| volume < v) {
                best = Some((volume, reach));
            }
        }
    }

    match best {
        Some((volume, reach)) => {
            let grown = working.max(reach.grown_by(GROWTH_MARGIN)).min(extent);
            log::debug!(
                "Growing box for part {} from {} to {} (candidate volume {})",
                part.id,
                working,
                grown,
                volume
            );
            GrowthOutcome::Grown(grown)
        }
        None => GrowthOutcome::Exhausted,
    }
}

/// Lower bound on candidate volume over every offset with `x + y + z = s`.
///
/// Each axis contributes `max(c + min_c, working_c)`, which stays at
/// `base_c = max(min_c, working_c)` until `c` passes `slack_c`. Any excess
/// beyond the combined slack must land on some axis, and adding it to the
/// largest base is cheapest.
struct LayerBound {
    base_volume: u64,
    cheapest_face: u64,
    slack: usize,
}

impl LayerBound {
    fn new(working: BoxSize, min_box: BoxSize) -> Self {
        let base = working.max(min_box);
        let largest = base.x.max(base.y).max(base.z) as u64;
        let base_volume = base.volume();
        Self {
            base_volume,
            cheapest_face: if largest == 0 { 0 } else { base_volume / largest },
            slack: working.x.saturating_sub(min_box.x)
                + working.y.saturating_sub(min_box.y)
                + working.z.saturating_sub(min_box.z),
        }
    }

    fn at_layer(&self, s: usize) -> u64 {
        let excess = s.saturating_sub(self.slack) as u64;
        self.base_volume
            .saturating_add(excess.saturating_mul(self.cheapest_face))
    }
}
