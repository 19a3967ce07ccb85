//! Rotation variant generation and voxelization.

use crate::cancel::CancellationToken;
use crate::part::{Part, PartSpec, RotationVariant};
use nalgebra::{Point3, Rotation3, Vector3};
use pstack_core::{axis_rotation, Error, Geometry, Grid3, Result, VariantSet};
use rayon::prelude::*;

/// The pre-rotation search keeps every n-th triangle.
pub const SEARCH_DECIMATION: usize = 15;

/// Angular step of the pre-rotation search, in degrees.
pub const SEARCH_STEP_DEGREES: usize = 9;

/// Finds the rotation, sampled on a grid of X then Y angles, that minimizes
/// the bounding box volume of a decimated copy of `geometry`.
///
/// Equal volumes resolve to the earliest sample, so the search is
/// deterministic regardless of thread scheduling.
pub fn find_pre_rotation<G: Geometry>(geometry: &G) -> Rotation3<f64> {
    let sample = geometry.decimate(SEARCH_DECIMATION);
    let steps = 360 / SEARCH_STEP_DEGREES;

    let rotation_for = |k: usize| {
        let x = (k / steps * SEARCH_STEP_DEGREES) as f64;
        let y = (k % steps * SEARCH_STEP_DEGREES) as f64;
        axis_rotation(Vector3::y(), y) * axis_rotation(Vector3::x(), x)
    };

    let best = (0..steps * steps)
        .into_par_iter()
        .map(|k| {
            let mut rotated = sample.clone();
            rotated.rotate(&rotation_for(k));
            let volume = rotated.bounds().map_or(f64::INFINITY, |b| b.volume());
            (volume, k)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    match best {
        Some((volume, k)) => {
            log::debug!("Pre-rotation sample {} bounds volume {:.3}", k, volume);
            rotation_for(k)
        }
        None => Rotation3::identity(),
    }
}

/// Builds the preprocessed form of `spec`.
///
/// `scale` converts physical units to voxels. `on_work` receives units of
/// progress; each variant contributes half the triangle count after its
/// transform and half after voxelization. Returns `Ok(None)` when
/// cancellation is observed between variants.
pub fn preprocess_part<G: Geometry>(
    spec: &PartSpec<G>,
    input_index: usize,
    scale: f64,
    cancel: &CancellationToken,
    mut on_work: impl FnMut(f64),
) -> Result<Option<Part<G>>> {
    spec.validate()?;

    let triangle_count = spec.geometry.triangle_count();
    let half_weight = triangle_count as f64 / 2.0;

    let pre_rotation = if spec.rotate_min_box {
        find_pre_rotation(&spec.geometry)
    } else {
        Rotation3::identity()
    };

    let mut variants = Vec::with_capacity(spec.rotations.len());
    for (index, catalog_rotation) in spec.rotations.rotations().iter().enumerate() {
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let rotation = catalog_rotation * pre_rotation;
        let mut geometry = spec.geometry.clone();
        geometry.scale(scale);
        geometry.rotate(&rotation);

        let baseline = Point3::new(1.0, 1.0, 1.0);
        let baseline_shift = geometry
            .bounds()
            .map_or_else(Vector3::zeros, |b| baseline - b.min());
        geometry.set_baseline(baseline);
        let voxel_box = geometry.voxel_box();

        variants.push(RotationVariant {
            index,
            rotation,
            geometry,
            voxel_box,
            baseline_shift,
        });
        on_work(half_weight);
    }

    let Some(first) = variants.first().map(|v| v.voxel_box) else {
        return Err(Error::InvalidPart(format!("part {} has no rotations", spec.id)));
    };
    let (min_box, max_box) = variants.iter().fold((first, first), |(lo, hi), v| {
        (lo.min(v.voxel_box), hi.max(v.voxel_box))
    });

    let mut grid = Grid3::try_new(max_box)?;
    for variant in &variants {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let solid = variant
            .geometry
            .voxelize(&mut grid, VariantSet::single(variant.index), spec.min_hole)?;
        log::trace!(
            "Part {} variant {} box {} solid voxels {}",
            spec.id,
            variant.index,
            variant.voxel_box,
            solid
        );
        on_work(half_weight);
    }

    log::debug!(
        "Preprocessed part {}: {} variants, boxes {} to {}",
        spec.id,
        variants.len(),
        min_box,
        max_box
    );

    Ok(Some(Part {
        id: spec.id.clone(),
        input_index,
        quantity: spec.quantity,
        remaining: spec.quantity,
        volume: spec.geometry.volume(),
        triangle_count,
        pre_rotation,
        variants,
        grid,
        min_box,
        max_box,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotations::RotationMode;
    use approx::assert_relative_eq;
    use pstack_core::{BoxSize, Mesh};

    #[test]
    fn test_preprocess_cubic_cuboid() {
        let spec = PartSpec::new("slab", Mesh::cuboid(4.0, 2.0, 1.0));
        let mut work = 0.0;
        let part = preprocess_part(&spec, 0, 1.0, &CancellationToken::new(), |w| work += w)
            .unwrap()
            .unwrap();

        assert_eq!(part.variants.len(), 24);
        assert_eq!(part.variants[0].voxel_box, BoxSize::new(6, 4, 3));
        assert_eq!(part.min_box, BoxSize::new(3, 3, 3));
        assert_eq!(part.max_box, BoxSize::new(6, 6, 6));
        assert_eq!(part.grid.size(), part.max_box);
        assert_relative_eq!(part.volume, 8.0, epsilon = 1e-9);
        assert_relative_eq!(work, 24.0 * 12.0, epsilon = 1e-9);

        // Identity variant occupies the cells behind its baseline.
        assert!(part.grid[(1, 1, 1)].contains(0));
        assert!(part.grid[(4, 2, 1)].contains(0));
        assert!(!part.grid[(0, 0, 0)].contains(0));
        assert!(part.grid[(5, 3, 2)].contains(0));
        assert!(!part.grid[(1, 4, 1)].contains(0));
    }

    #[test]
    fn test_preprocess_scales_to_voxels() {
        let spec = PartSpec::new("cube", Mesh::cuboid(2.0, 2.0, 2.0))
            .with_rotation_mode(RotationMode::None);
        let part = preprocess_part(&spec, 3, 2.0, &CancellationToken::new(), |_| {})
            .unwrap()
            .unwrap();
        assert_eq!(part.input_index, 3);
        assert_eq!(part.variants[0].voxel_box, BoxSize::cube(6));
        // Faces on integer planes mark the cell they start, so 4 units span 5 cells.
        assert_eq!(part.grid.count(|c| c.contains(0)), 125);
    }

    #[test]
    fn test_preprocess_observes_cancellation() {
        let spec = PartSpec::new("cube", Mesh::cuboid(1.0, 1.0, 1.0));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let part = preprocess_part(&spec, 0, 1.0, &cancel, |_| {}).unwrap();
        assert!(part.is_none());
    }

    /// Repeats every triangle so decimation keeps the whole shape.
    fn undecimatable(mesh: &Mesh) -> Mesh {
        Mesh::new(
            mesh.triangles()
                .iter()
                .flat_map(|t| std::iter::repeat(*t).take(SEARCH_DECIMATION))
                .collect(),
        )
    }

    #[test]
    fn test_pre_rotation_reduces_box() {
        let mut tilted = Mesh::cuboid(10.0, 1.0, 1.0);
        tilted.rotate(&axis_rotation(Vector3::z(), 45.0));
        let tilted = undecimatable(&tilted);
        let spec = PartSpec::new("rod", tilted.clone())
            .with_rotation_mode(RotationMode::None)
            .with_rotate_min_box(true);

        let plain = tilted.bounds().unwrap().volume();
        let part = preprocess_part(&spec, 0, 1.0, &CancellationToken::new(), |_| {})
            .unwrap()
            .unwrap();
        let mut rotated = tilted;
        rotated.rotate(&part.pre_rotation);

        // X 90 then Y 45 lines the rod up with an axis.
        assert!(plain > 50.0);
        assert_relative_eq!(rotated.bounds().unwrap().volume(), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pre_rotation_is_deterministic() {
        let mut mesh = Mesh::cuboid(6.0, 2.0, 1.0);
        mesh.rotate(&axis_rotation(Vector3::new(1.0, 2.0, 3.0), 33.0));
        let a = find_pre_rotation(&mesh);
        let b = find_pre_rotation(&mesh);
        assert_eq!(a, b);
    }
}
