//! Stacking configuration.

use crate::error::{Error, Result};
use crate::geometry::BoxSize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resolution and box limits for a stacking run.
///
/// Lengths are physical units (millimetres in practice). The resolution is the
/// edge length of one voxel and doubles as the minimum clearance between parts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackSettings {
    /// Physical distance per voxel.
    pub resolution: f64,
    /// Initial box extent along X.
    pub x_min: f64,
    /// Maximum box extent along X.
    pub x_max: f64,
    /// Initial box extent along Y.
    pub y_min: f64,
    /// Maximum box extent along Y.
    pub y_max: f64,
    /// Initial box extent along Z.
    pub z_min: f64,
    /// Maximum box extent along Z.
    pub z_max: f64,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            x_min: 150.0,
            x_max: 156.0,
            y_min: 150.0,
            y_max: 156.0,
            z_min: 30.0,
            z_max: 90.0,
        }
    }
}

impl StackSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the voxel resolution (minimum clearance).
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the initial box extents.
    pub fn with_initial_box(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_min = x;
        self.y_min = y;
        self.z_min = z;
        self
    }

    /// Sets the maximum box extents.
    pub fn with_maximum_box(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x_max = x;
        self.y_max = y;
        self.z_max = z;
        self
    }

    /// Voxels per physical unit.
    pub fn scale(&self) -> f64 {
        1.0 / self.resolution
    }

    /// The starting working box in voxels.
    pub fn initial_voxel_box(&self) -> BoxSize {
        let s = self.scale();
        BoxSize::new(
            to_voxels(s * self.x_min),
            to_voxels(s * self.y_min),
            to_voxels(s * self.z_min),
        )
    }

    /// Extent of the occupied-space grid in voxels: the larger of the initial
    /// and maximum box on each axis.
    pub fn space_voxel_box(&self) -> BoxSize {
        let s = self.scale();
        BoxSize::new(
            to_voxels(s * self.x_min.max(self.x_max)),
            to_voxels(s * self.y_min.max(self.y_max)),
            to_voxels(s * self.z_min.max(self.z_max)),
        )
    }

    /// Converts a voxel box to physical extents.
    pub fn to_physical(&self, size: BoxSize) -> nalgebra::Vector3<f64> {
        nalgebra::Vector3::new(size.x as f64, size.y as f64, size.z as f64) * self.resolution
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::ConfigError(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }

        let extents = [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("z_min", self.z_min),
            ("z_max", self.z_max),
        ];
        for (name, value) in extents {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::ConfigError(format!(
                    "{name} must be a non-negative length, got {value}"
                )));
            }
        }

        if self.space_voxel_box().is_empty() {
            return Err(Error::ConfigError(format!(
                "maximum box is smaller than one {} voxel",
                self.resolution
            )));
        }

        Ok(())
    }
}

fn to_voxels(length: f64) -> usize {
    // Float-to-int `as` saturates, so oversized boxes surface as allocation errors.
    length.floor() as usize
}
