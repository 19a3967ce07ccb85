//! # PartStacker
//!
//! Nests 3D parts, each in a requested quantity and a set of allowed
//! rotations, into the smallest rectangular build volume between a minimum
//! and a maximum box.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pstack::{Mesh, PartSpec, RotationMode, StackSettings, Stacker};
//!
//! let mut stacker = Stacker::new(StackSettings::default());
//! let parts = vec![PartSpec::new("clip", mesh).with_quantity(20)];
//! let outcome = stacker.run(parts)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support

/// Shared types: geometry contract, mesh, grids, settings and results.
pub use pstack_core as core;

/// The nesting engine.
pub use pstack_stacker as stacker;

// Re-export commonly used types at root level
pub use pstack_core::{
    Error, Geometry, Mesh, Placement, Result, StackOutcome, StackResult, StackSettings,
};
pub use pstack_stacker::{
    CancellationToken, PartSpec, RotationMode, Stacker, StackerState, StackerThread,
};
