//! # PartStacker Engine
//!
//! Voxel-based nesting of 3D parts into the smallest box that holds every
//! requested instance.
//!
//! ## Pipeline
//!
//! 1. [`preprocess`]: each part is scaled to voxels, rotated into every
//!    orientation of its [`RotationCatalog`], and voxelized into one occupancy
//!    grid shared by its variants.
//! 2. [`part::order_by_volume`]: parts are sorted so the largest is placed
//!    first.
//! 3. [`placement`]: a diagonal sweep of the working box places each
//!    instance at the first free coordinate, lowest variant index first.
//! 4. [`growth`]: when a pass stalls, the working box grows by the cheapest
//!    enlargement that admits the stalled part.
//!
//! [`Stacker`] drives the loop; [`StackerThread`] runs it in the background.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pstack_core::{Mesh, StackSettings};
//! use pstack_stacker::{PartSpec, RotationMode, Stacker};
//!
//! let settings = StackSettings::new().with_initial_box(50.0, 50.0, 20.0);
//! let mut stacker = Stacker::new(settings);
//! let parts = vec![
//!     PartSpec::new("bracket", Mesh::cuboid(10.0, 4.0, 2.0))
//!         .with_quantity(8)
//!         .with_rotation_mode(RotationMode::Cubic),
//! ];
//! let outcome = stacker.run(parts)?;
//! if let Some(result) = outcome.result() {
//!     println!("{} parts, density {}", result.placed_count(), result.density_percent());
//! }
//! # Ok::<(), pstack_core::Error>(())
//! ```

pub mod cancel;
pub mod growth;
pub mod part;
pub mod placement;
pub mod preprocess;
pub mod rotations;
pub mod space;
pub mod stacker;
pub mod sweep;
pub mod thread;

pub use cancel::CancellationToken;
pub use growth::{grow_box, GrowthOutcome};
pub use part::{order_by_volume, Part, PartSpec, RotationVariant};
pub use placement::{PassOutcome, PreviewCallback, Workspace};
pub use preprocess::{find_pre_rotation, preprocess_part};
pub use rotations::{RotationCatalog, RotationMode};
pub use space::OccupiedSpace;
pub use stacker::{Stacker, StackerState};
pub use sweep::DiagonalSweep;
pub use thread::StackerThread;
