//! The assembled map: one textured cube per room

mod cube;

pub use cube::*;

use crate::rasterizer::{render_mesh, Camera, Framebuffer, RasterSettings, Texture};
use crate::tiles::{AtlasCache, TileSet};
use crate::world::RoomMap;

/// All room meshes and the atlases they sample from.
/// There is exactly one mesh per room, in map order.
pub struct MapScene {
    meshes: Vec<RoomMesh>,
    textures: Vec<Texture>,
}

impl MapScene {
    /// Build a cube per room, placed at `grid * room_size`
    pub fn build(map: &RoomMap, room_size: f32, face_size: u32, tileset: &mut TileSet) -> Self {
        let mut atlases = AtlasCache::new(face_size);

        let meshes: Vec<RoomMesh> = map
            .rooms()
            .iter()
            .map(|room| {
                let texture_id = atlases.texture_for(room, tileset);
                build_room_cube(room.world_center(room_size), room_size, texture_id, face_size)
            })
            .collect();

        log::info!(
            "Built {} room meshes sharing {} atlases ({} generated tiles)",
            meshes.len(),
            atlases.len(),
            tileset.generated_count()
        );

        Self {
            meshes,
            textures: atlases.into_textures(),
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.faces.len()).sum()
    }

    /// Draw every room into the framebuffer
    pub fn render(&self, fb: &mut Framebuffer, camera: &Camera, settings: &RasterSettings) {
        for mesh in &self.meshes {
            render_mesh(fb, &mesh.vertices, &mesh.faces, &self.textures, camera, settings);
        }
    }
}
