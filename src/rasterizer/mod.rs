//! Software rasterizer
//!
//! Features:
//! - Perspective-correct or affine (PS1 warping) texture mapping
//! - Optional vertex snapping (integer coords = PS1 jitter)
//! - Flat and Gouraud shading with a camera headlight
//! - Z-buffer or painter's algorithm

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;
