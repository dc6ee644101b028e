//! Pieces: chip values and the registry that salts them.
//!
//! ## Key Types
//!
//! - `ChipId`: Index of a registered chip
//! - `ChipKind`: Opaque piece kind (games define kinds)
//! - `Chip`: Immutable chip data with its digest salt
//! - `ChipRegistry`: Lookup by id and name, shared as `Arc`

pub mod chip;
pub mod registry;

pub use chip::{Chip, ChipId, ChipKind};
pub use registry::ChipRegistry;
