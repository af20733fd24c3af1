//! Tile images and per-room texture atlases

mod atlas;
mod tileset;

pub use atlas::*;
pub use tileset::*;
