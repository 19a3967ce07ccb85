//! Stacking controller.

use crate::cancel::CancellationToken;
use crate::growth::{grow_box, GrowthOutcome};
use crate::part::{order_by_volume, Part, PartSpec};
use crate::placement::{PassOutcome, PreviewCallback, Workspace};
use crate::preprocess::preprocess_part;
use crate::space::OccupiedSpace;
use nalgebra::Vector3;
use pstack_core::{
    Error, Geometry, Phase, ProgressCallback, ProgressInfo, Result, StackOutcome, StackResult,
    StackSettings,
};
use std::time::Instant;

/// Merged output above this many triangles gets a warning.
pub const LARGE_OUTPUT_TRIANGLES: usize = 1_000_000;

/// Lifecycle of a [`Stacker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackerState {
    /// No run has started, or the last start was refused.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The last run placed every instance.
    Succeeded,
    /// The last run ran out of room or hit an error mid-run.
    Failed,
    /// The last run was cancelled.
    Cancelled,
}

/// Runs the nesting engine: preprocessing, ordering, then alternating
/// placement passes and box growth until every instance is placed.
pub struct Stacker<G> {
    settings: StackSettings,
    cancel: CancellationToken,
    progress: Option<ProgressCallback>,
    preview: Option<PreviewCallback<G>>,
    state: StackerState,
}

impl<G: Geometry> Stacker<G> {
    /// Creates a stacker with the given settings.
    pub fn new(settings: StackSettings) -> Self {
        Self {
            settings,
            cancel: CancellationToken::new(),
            progress: None,
            preview: None,
            state: StackerState::Idle,
        }
    }

    /// Creates a stacker with default settings.
    pub fn default_config() -> Self {
        Self::new(StackSettings::default())
    }

    /// Sets the progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Sets the preview callback.
    pub fn with_preview(mut self, callback: PreviewCallback<G>) -> Self {
        self.preview = Some(callback);
        self
    }

    /// Shares an existing cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns the settings.
    pub fn settings(&self) -> &StackSettings {
        &self.settings
    }

    /// Returns the current state.
    pub fn state(&self) -> StackerState {
        self.state
    }

    /// Returns a handle that cancels this stacker's runs.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Requests cancellation of the current run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Checks that a job can start.
    pub fn validate(&self, parts: &[PartSpec<G>]) -> Result<()> {
        self.settings.validate()?;
        if parts.is_empty() {
            return Err(Error::EmptyPartList);
        }
        for part in parts {
            part.validate()?;
        }
        let triangles: usize = parts
            .iter()
            .filter(|p| p.quantity > 0)
            .map(|p| p.geometry.triangle_count())
            .sum();
        if triangles == 0 {
            return Err(Error::NoTriangles);
        }
        Ok(())
    }

    /// Runs a stacking job to completion.
    ///
    /// Invalid jobs and allocation failures are refused with `Err` before the
    /// stacker enters [`StackerState::Running`]. Running out of room and
    /// cancellation are reported as outcomes.
    pub fn run(&mut self, parts: Vec<PartSpec<G>>) -> Result<StackOutcome<G>> {
        let space = self.prepare(&parts)?;
        self.run_prepared(parts, space)
    }

    /// Validates the job and allocates the space it may grow into.
    pub(crate) fn prepare(&self, parts: &[PartSpec<G>]) -> Result<OccupiedSpace> {
        self.validate(parts)?;
        OccupiedSpace::try_new(self.settings.space_voxel_box())
    }

    /// Runs a job already checked by [`Stacker::prepare`].
    pub(crate) fn run_prepared(
        &mut self,
        parts: Vec<PartSpec<G>>,
        space: OccupiedSpace,
    ) -> Result<StackOutcome<G>> {
        self.state = StackerState::Running;
        let outcome = self.execute(&parts, space);
        self.state = match &outcome {
            Ok(StackOutcome::Succeeded(_)) => StackerState::Succeeded,
            Ok(StackOutcome::Cancelled) => StackerState::Cancelled,
            Ok(StackOutcome::Failed { .. }) | Err(_) => StackerState::Failed,
        };
        outcome
    }

    fn execute(&self, specs: &[PartSpec<G>], space: OccupiedSpace) -> Result<StackOutcome<G>> {
        let start = Instant::now();
        let scale = self.settings.scale();

        let Some(mut parts) = self.preprocess(specs, scale, start)? else {
            return Ok(self.cancelled(start));
        };
        order_by_volume(&mut parts);

        let total_instances: usize = parts.iter().map(|p| p.quantity).sum();
        let output_triangles: usize = parts.iter().map(|p| p.triangle_count * p.quantity).sum();
        if output_triangles > LARGE_OUTPUT_TRIANGLES {
            log::warn!(
                "Stacked output will have {} triangles; export and display may be slow",
                output_triangles
            );
        }

        let mut ws = Workspace::new(
            space,
            self.settings.initial_voxel_box(),
            total_instances,
            self.settings.resolution,
        );
        let mut current = parts.len().saturating_sub(1);

        loop {
            let outcome = ws.place_pass(&mut parts, current, &self.cancel, |ws| {
                self.report(
                    ProgressInfo::new(Phase::Placing)
                        .with_work(ws.placed() as f64, total_instances as f64)
                        .with_items(ws.placed(), total_instances)
                        .with_elapsed(start.elapsed().as_millis() as u64),
                );
                if let Some(preview) = &self.preview {
                    preview(&ws.merged, ws.working);
                }
            });

            match outcome {
                PassOutcome::Done => break,
                PassOutcome::Cancelled => return Ok(self.cancelled(start)),
                PassOutcome::Stalled(index) => {
                    current = index;
                    let part = &parts[index];
                    match grow_box(part, &ws.space, ws.working, &self.cancel) {
                        GrowthOutcome::Grown(grown) => ws.grow_to(grown),
                        GrowthOutcome::Cancelled => return Ok(self.cancelled(start)),
                        GrowthOutcome::Exhausted => {
                            log::info!(
                                "Stacking failed: part {} does not fit in the maximum box (working box {})",
                                part.id,
                                ws.working
                            );
                            self.report(
                                ProgressInfo::new(Phase::Finished)
                                    .with_items(ws.placed(), total_instances)
                                    .with_elapsed(start.elapsed().as_millis() as u64)
                                    .finished(),
                            );
                            return Ok(StackOutcome::Failed {
                                part_id: part.id.clone(),
                                voxel_box: ws.working,
                            });
                        }
                    }
                }
            }
        }

        let result = self.finish(&parts, ws, start);
        log::info!(
            "Stacked {} parts into {} voxels, density {} in {:?}",
            result.placed_count(),
            result.voxel_box,
            result.density_percent(),
            result.elapsed
        );
        self.report(
            ProgressInfo::new(Phase::Finished)
                .with_work(total_instances as f64, total_instances as f64)
                .with_items(result.placed_count(), total_instances)
                .with_elapsed(result.elapsed.as_millis() as u64)
                .finished(),
        );
        Ok(StackOutcome::Succeeded(result))
    }

    /// Preprocesses every part with a non-zero quantity. Returns `None` if
    /// cancelled.
    fn preprocess(
        &self,
        specs: &[PartSpec<G>],
        scale: f64,
        start: Instant,
    ) -> Result<Option<Vec<Part<G>>>> {
        let total_work: f64 = specs
            .iter()
            .filter(|s| s.quantity > 0)
            .map(|s| (s.geometry.triangle_count() * s.rotations.len()) as f64)
            .sum();
        let mut done = 0.0;

        let mut parts = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }
            if spec.quantity == 0 {
                log::warn!("Skipping part {}: quantity is zero", spec.id);
                continue;
            }

            log::debug!(
                "Preprocessing part {} ({} triangles, {} rotations)",
                spec.id,
                spec.geometry.triangle_count(),
                spec.rotations.len()
            );
            let part = preprocess_part(spec, index, scale, &self.cancel, |work| {
                done += work;
                self.report(
                    ProgressInfo::new(Phase::Preprocessing)
                        .with_work(done, total_work)
                        .with_elapsed(start.elapsed().as_millis() as u64),
                );
            })?;
            match part {
                Some(part) => parts.push(part),
                None => return Ok(None),
            }
        }
        Ok(Some(parts))
    }

    fn finish(&self, parts: &[Part<G>], ws: Workspace<G>, start: Instant) -> StackResult<G> {
        let resolution = self.settings.resolution;
        let mut geometry = ws.merged;
        geometry.scale(resolution);

        let size = geometry.bounds().map_or_else(Vector3::zeros, |b| b.size());
        let placed_volume: f64 = parts.iter().map(|p| p.volume * p.quantity as f64).sum();
        let size_volume = size.x * size.y * size.z;
        let density = if size_volume > 0.0 {
            placed_volume / size_volume
        } else {
            0.0
        };

        StackResult {
            geometry,
            placements: ws.placements,
            voxel_box: ws.working,
            bounding_box: self.settings.to_physical(ws.working),
            size,
            density,
            merge_warnings: ws.merge_warnings,
            elapsed: start.elapsed(),
        }
    }

    fn cancelled(&self, start: Instant) -> StackOutcome<G> {
        log::info!("Stacking cancelled after {:?}", start.elapsed());
        StackOutcome::Cancelled
    }

    fn report(&self, info: ProgressInfo) {
        if let Some(callback) = &self.progress {
            callback(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotations::RotationMode;
    use pstack_core::{BoxSize, Mesh};

    fn settings() -> StackSettings {
        StackSettings::new()
            .with_initial_box(10.0, 10.0, 10.0)
            .with_maximum_box(20.0, 20.0, 20.0)
    }

    #[test]
    fn test_refuses_empty_job() {
        let mut stacker: Stacker<Mesh> = Stacker::new(settings());
        assert!(matches!(stacker.run(Vec::new()), Err(Error::EmptyPartList)));
        assert_eq!(stacker.state(), StackerState::Idle);
    }

    #[test]
    fn test_refuses_job_without_triangles() {
        let mut stacker = Stacker::new(settings());
        let parts = vec![PartSpec::new("empty", Mesh::default())];
        assert!(matches!(stacker.run(parts), Err(Error::NoTriangles)));
        assert_eq!(stacker.state(), StackerState::Idle);
    }

    #[test]
    fn test_refuses_bad_settings() {
        let mut stacker = Stacker::new(settings().with_resolution(-1.0));
        let parts = vec![PartSpec::new("cube", Mesh::cuboid(1.0, 1.0, 1.0))];
        assert!(matches!(stacker.run(parts), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_run_mesh_cubes() {
        let mut stacker = Stacker::new(settings());
        let parts = vec![
            PartSpec::new("small", Mesh::cuboid(1.0, 1.0, 1.0))
                .with_quantity(2)
                .with_rotation_mode(RotationMode::None),
            PartSpec::new("large", Mesh::cuboid(2.0, 2.0, 2.0))
                .with_rotation_mode(RotationMode::Cubic),
            PartSpec::new("skipped", Mesh::cuboid(1.0, 1.0, 1.0)).with_quantity(0),
        ];

        let result = stacker.run(parts).unwrap().into_result().unwrap();
        assert_eq!(stacker.state(), StackerState::Succeeded);
        assert_eq!(result.placed_count(), 3);
        assert_eq!(result.placements[0].part_id, "large");
        assert_eq!(result.placements[0].offset, (0, 0, 0));
        assert_eq!(result.voxel_box, BoxSize::cube(10));
        assert_eq!(result.geometry.len(), 36);
        assert_eq!(result.merge_warnings, 0);
        assert!(result.density > 0.0 && result.density <= 1.0);
    }
}
