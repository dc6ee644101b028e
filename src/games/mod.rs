//! Bundled games.
//!
//! Two small rule sets that exercise the engine end to end:
//! - `Breakthrough`: square-8 pawns that step and capture, with a forced pass
//! - `Hex`: stones placed from reserves, flood-fill connection win, pie rule
//!
//! Both accept several game type names. `game` is served by breakthrough's
//! single home row variant.

mod breakthrough;
mod hex;

pub use breakthrough::Breakthrough;
pub use hex::{Hex, SWAP_REVISION};
