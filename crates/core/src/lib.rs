//! # PartStacker Core
//!
//! Shared types for the PartStacker nesting engine.
//!
//! ## Core Components
//!
//! - **Geometry contract**: [`Geometry`], implemented by the triangle [`Mesh`]
//! - **Voxel storage**: [`Grid3`] dense grids and the [`VariantSet`] bit-set
//! - **Configuration**: [`StackSettings`]
//! - **Results**: [`Placement`], [`StackResult`], [`StackOutcome`]
//! - **Transform types**: [`Transform3D`], [`AABB3D`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod grid;
pub mod mesh;
pub mod placement;
pub mod progress;
pub mod result;
pub mod settings;
pub mod transform;
pub mod variant_set;
pub mod voxelize;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{BoxSize, Geometry, MergeWarning};
pub use grid::Grid3;
pub use mesh::{Mesh, Triangle, VolumeAndCentroid};
pub use placement::{PartId, Placement, PlacementStats};
pub use progress::{Phase, ProgressCallback, ProgressInfo};
pub use result::{StackOutcome, StackResult, StackSummary};
pub use settings::StackSettings;
pub use transform::{axis_rotation, Transform3D, AABB3D};
pub use variant_set::VariantSet;
