//! Error types for PartStacker.

use thiserror::Error;

/// Result type alias for PartStacker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a stacking run from starting or continuing.
///
/// Running out of room inside the maximum box and user cancellation are not
/// errors; they are reported as stacking outcomes.
#[derive(Debug, Error)]
pub enum Error {
    /// The job contains no parts.
    #[error("Nothing to stack: the part list is empty")]
    EmptyPartList,

    /// Every part in the job has zero triangles.
    #[error("Nothing to stack: the parts contain no triangles")]
    NoTriangles,

    /// A part definition is unusable.
    #[error("Invalid part: {0}")]
    InvalidPart(String),

    /// Stacking settings are unusable.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A rotation set does not fit in a variant bit-set.
    #[error("Rotation set has {count} entries, at most {max} are supported", max = crate::VariantSet::CAPACITY)]
    RotationCapacity {
        /// Number of rotations requested.
        count: usize,
    },

    /// A voxel grid could not be allocated.
    #[error("Cannot allocate a {x}x{y}x{z} voxel grid")]
    GridAllocation {
        /// Cells along X.
        x: usize,
        /// Cells along Y.
        y: usize,
        /// Cells along Z.
        z: usize,
    },

    /// A stacking run is already in progress.
    #[error("A stacking run is already in progress")]
    AlreadyRunning,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
