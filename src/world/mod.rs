//! World module - grid-based room maps
//!
//! - Room records with per-side connectivity flags
//! - Line-oriented map file loading

mod loader;
mod room;

pub use loader::*;
pub use room::*;
