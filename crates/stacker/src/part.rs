//! Part definitions and their preprocessed form.

use crate::rotations::{RotationCatalog, RotationMode};
use nalgebra::{Rotation3, Vector3};
use pstack_core::{BoxSize, Error, Geometry, Grid3, PartId, Result, Transform3D, VariantSet};

/// A part as supplied by the caller.
#[derive(Debug, Clone)]
pub struct PartSpec<G> {
    /// Identifier reported in placements.
    pub id: PartId,

    /// Source geometry in physical units.
    pub geometry: G,

    /// Number of instances to place.
    pub quantity: usize,

    /// Rotations the part may be placed in.
    pub rotations: RotationCatalog,

    /// Cavities narrower than this many voxels are treated as solid.
    pub min_hole: usize,

    /// Search for a pre-rotation that minimizes the bounding box.
    pub rotate_min_box: bool,
}

impl<G: Geometry> PartSpec<G> {
    /// Creates a part with quantity 1, cubic rotations and a minimum hole of
    /// one voxel.
    pub fn new(id: impl Into<PartId>, geometry: G) -> Self {
        Self {
            id: id.into(),
            geometry,
            quantity: 1,
            rotations: RotationCatalog::new(RotationMode::default()),
            min_hole: 1,
            rotate_min_box: false,
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Selects one of the built-in rotation sets.
    pub fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotations = RotationCatalog::new(mode);
        self
    }

    /// Uses a custom rotation set.
    pub fn with_rotations(mut self, rotations: RotationCatalog) -> Self {
        self.rotations = rotations;
        self
    }

    /// Sets the minimum hole size in voxels.
    pub fn with_min_hole(mut self, min_hole: usize) -> Self {
        self.min_hole = min_hole;
        self
    }

    /// Enables or disables the bounding-box pre-rotation search.
    pub fn with_rotate_min_box(mut self, enabled: bool) -> Self {
        self.rotate_min_box = enabled;
        self
    }

    /// Checks the definition for values the engine cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidPart("part ID must not be empty".into()));
        }
        if self.rotations.is_empty() {
            return Err(Error::InvalidPart(format!(
                "part {} has no rotations",
                self.id
            )));
        }
        if self.rotations.len() > VariantSet::CAPACITY {
            return Err(Error::RotationCapacity {
                count: self.rotations.len(),
            });
        }
        Ok(())
    }
}

/// One orientation of a preprocessed part.
#[derive(Debug, Clone)]
pub struct RotationVariant<G> {
    /// Bit position in the part's occupancy grid.
    pub index: usize,

    /// Catalog rotation composed with the part's pre-rotation.
    pub rotation: Rotation3<f64>,

    /// Scaled and rotated geometry in voxel units, with its minimum corner
    /// at (1, 1, 1).
    pub geometry: G,

    /// Integer bounding box including clearance.
    pub voxel_box: BoxSize,

    /// Translation that moved the rotated geometry onto the baseline.
    pub baseline_shift: Vector3<f64>,
}

impl<G> RotationVariant<G> {
    /// Source-to-result transform for an instance placed at `offset`.
    pub fn placement_transform(
        &self,
        offset: (usize, usize, usize),
        resolution: f64,
    ) -> Transform3D<f64> {
        let at = Vector3::new(offset.0 as f64, offset.1 as f64, offset.2 as f64);
        Transform3D::new(self.rotation, (self.baseline_shift + at) * resolution)
    }
}

/// A part after preprocessing: variants generated and voxelized.
#[derive(Debug, Clone)]
pub struct Part<G> {
    /// Identifier reported in placements.
    pub id: PartId,

    /// Position in the caller's part list.
    pub input_index: usize,

    /// Requested instances.
    pub quantity: usize,

    /// Instances still to place.
    pub remaining: usize,

    /// Volume of one instance in physical units.
    pub volume: f64,

    /// Triangle count of the source geometry.
    pub triangle_count: usize,

    /// Rotation applied before every catalog rotation.
    pub pre_rotation: Rotation3<f64>,

    /// Variants in catalog order.
    pub variants: Vec<RotationVariant<G>>,

    /// Occupancy grid shared by all variants, sized to `max_box`.
    pub grid: Grid3<VariantSet>,

    /// Componentwise minimum of the variant boxes.
    pub min_box: BoxSize,

    /// Componentwise maximum of the variant boxes.
    pub max_box: BoxSize,
}

impl<G> Part<G> {
    /// Set of all variant indices.
    pub fn all_variants(&self) -> VariantSet {
        VariantSet::first_n(self.variants.len())
    }

    /// Number of instances placed so far.
    pub fn placed(&self) -> usize {
        self.quantity - self.remaining
    }

    /// Returns true once every instance is placed.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Orders parts by ascending volume. Equal volumes keep their input order, so
/// consuming from the back places the largest part first.
pub fn order_by_volume<G>(parts: &mut [Part<G>]) {
    parts.sort_by(|a, b| a.volume.total_cmp(&b.volume));
}
