//! Discrete rotation sets.

use nalgebra::{Rotation3, Vector3};
use pstack_core::{axis_rotation, Error, Result, VariantSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seed for the random part of the arbitrary rotation set.
const ARBITRARY_SEED: u64 = 0x5041_5254_5354_4b52;

/// Which rotation set a part may be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationMode {
    /// Identity only.
    None,
    /// The 24 axis-aligned orientations.
    #[default]
    Cubic,
    /// A fixed set of 32 orientations, mostly off-axis.
    Arbitrary,
}

/// An ordered rotation set. The position of a rotation is its variant index.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationCatalog {
    rotations: Vec<Rotation3<f64>>,
}

impl RotationCatalog {
    /// Builds the catalog for `mode`.
    pub fn new(mode: RotationMode) -> Self {
        let rotations = match mode {
            RotationMode::None => vec![Rotation3::identity()],
            RotationMode::Cubic => cubic_rotations(),
            RotationMode::Arbitrary => arbitrary_rotations(),
        };
        Self { rotations }
    }

    /// Builds a catalog from a custom rotation list.
    ///
    /// Fails if the list is empty or has more entries than a [`VariantSet`]
    /// can index.
    pub fn from_rotations(rotations: Vec<Rotation3<f64>>) -> Result<Self> {
        if rotations.is_empty() {
            return Err(Error::InvalidPart(
                "rotation set must contain at least one rotation".into(),
            ));
        }
        if rotations.len() > VariantSet::CAPACITY {
            return Err(Error::RotationCapacity {
                count: rotations.len(),
            });
        }
        Ok(Self { rotations })
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    /// Always false; a catalog holds at least one rotation.
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    /// Rotation for variant `index`.
    pub fn get(&self, index: usize) -> Option<&Rotation3<f64>> {
        self.rotations.get(index)
    }

    /// Rotations in variant order.
    pub fn rotations(&self) -> &[Rotation3<f64>] {
        &self.rotations
    }

    /// Set containing every variant index of this catalog.
    pub fn all_variants(&self) -> VariantSet {
        VariantSet::first_n(self.rotations.len())
    }
}

fn cubic_rotations() -> Vec<Rotation3<f64>> {
    let axes: [([f64; 3], f64); 24] = [
        ([1.0, 0.0, 0.0], 0.0),
        ([1.0, 0.0, 0.0], 90.0),
        ([1.0, 0.0, 0.0], 180.0),
        ([1.0, 0.0, 0.0], 270.0),
        ([0.0, 1.0, 0.0], 90.0),
        ([0.0, 1.0, 0.0], 180.0),
        ([0.0, 1.0, 0.0], 270.0),
        ([0.0, 0.0, 1.0], 90.0),
        ([0.0, 0.0, 1.0], 180.0),
        ([0.0, 0.0, 1.0], 270.0),
        ([1.0, 1.0, 0.0], 180.0),
        ([1.0, -1.0, 0.0], 180.0),
        ([0.0, 1.0, 1.0], 180.0),
        ([0.0, -1.0, 1.0], 180.0),
        ([1.0, 0.0, 1.0], 180.0),
        ([1.0, 0.0, -1.0], 180.0),
        ([1.0, 1.0, 1.0], 120.0),
        ([1.0, 1.0, 1.0], 240.0),
        ([-1.0, 1.0, 1.0], 120.0),
        ([-1.0, 1.0, 1.0], 240.0),
        ([1.0, -1.0, 1.0], 120.0),
        ([1.0, -1.0, 1.0], 240.0),
        ([1.0, 1.0, -1.0], 120.0),
        ([1.0, 1.0, -1.0], 240.0),
    ];
    axes.iter()
        .map(|&(axis, degrees)| axis_rotation(Vector3::from(axis), degrees))
        .collect()
}

fn arbitrary_rotations() -> Vec<Rotation3<f64>> {
    let mut rotations = vec![
        Rotation3::identity(),
        axis_rotation(Vector3::new(1.0, 1.0, 1.0), 120.0),
        axis_rotation(Vector3::new(1.0, 1.0, 1.0), 240.0),
        axis_rotation(Vector3::x(), 180.0),
        axis_rotation(Vector3::y(), 180.0),
        axis_rotation(Vector3::z(), 180.0),
    ];

    let mut rng = StdRng::seed_from_u64(ARBITRARY_SEED);
    while rotations.len() < VariantSet::CAPACITY {
        let z = rng.gen_range(0.0..TAU);
        let y = rng.gen_range(0.0..TAU);
        let x = rng.gen_range(0.0..TAU);
        rotations.push(
            Rotation3::from_axis_angle(&Vector3::z_axis(), z)
                * Rotation3::from_axis_angle(&Vector3::y_axis(), y)
                * Rotation3::from_axis_angle(&Vector3::x_axis(), x),
        );
    }
    rotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(RotationCatalog::new(RotationMode::None).len(), 1);
        assert_eq!(RotationCatalog::new(RotationMode::Cubic).len(), 24);
        assert_eq!(RotationCatalog::new(RotationMode::Arbitrary).len(), 32);
        assert_eq!(
            RotationCatalog::new(RotationMode::Cubic).all_variants().len(),
            24
        );
    }

    #[test]
    fn test_cubic_rotations_are_distinct_and_axis_aligned() {
        let catalog = RotationCatalog::new(RotationMode::Cubic);
        let rotations = catalog.rotations();

        for r in rotations {
            for v in r.matrix().iter() {
                let rounded = v.round();
                assert_relative_eq!(*v, rounded, epsilon = 1e-9);
            }
        }

        for (i, a) in rotations.iter().enumerate() {
            for b in &rotations[i + 1..] {
                // `angle_to` is NaN for half turns, so compare matrices.
                assert!((a.matrix() - b.matrix()).norm() > 1e-6);
            }
        }
    }

    #[test]
    fn test_arbitrary_is_deterministic() {
        let a = RotationCatalog::new(RotationMode::Arbitrary);
        let b = RotationCatalog::new(RotationMode::Arbitrary);
        assert_eq!(a, b);
        let half_turn = a.get(3).map(|r| *r.matrix()).unwrap_or_default();
        assert_relative_eq!(
            half_turn,
            nalgebra::Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0)),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_from_rotations_capacity() {
        let ok = RotationCatalog::from_rotations(vec![Rotation3::identity(); 32]);
        assert!(ok.is_ok());

        let too_many = RotationCatalog::from_rotations(vec![Rotation3::identity(); 33]);
        assert!(matches!(too_many, Err(Error::RotationCapacity { count: 33 })));

        assert!(RotationCatalog::from_rotations(Vec::new()).is_err());
    }
}
