//! Six-face cube atlases
//!
//! Layout (cells of `face_size` pixels, 3 wide by 4 tall):
//!
//! ```text
//!         [top   ]
//! [left ] [front ] [right]
//!         [bottom]
//!         [back  ]
//! ```

use std::collections::HashMap;
use image::{imageops, RgbaImage};
use crate::rasterizer::Texture;
use crate::world::{Room, Side};
use super::{TileCode, TileSet};

pub const ATLAS_COLUMNS: u32 = 3;
pub const ATLAS_ROWS: u32 = 4;

/// One face of a room cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Top,
    Left,
    Front,
    Right,
    Bottom,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Top,
        CubeFace::Left,
        CubeFace::Front,
        CubeFace::Right,
        CubeFace::Bottom,
        CubeFace::Back,
    ];

    /// Column and row of this face's cell in the atlas
    pub fn atlas_cell(self) -> (u32, u32) {
        match self {
            CubeFace::Top => (1, 0),
            CubeFace::Left => (0, 1),
            CubeFace::Front => (1, 1),
            CubeFace::Right => (2, 1),
            CubeFace::Bottom => (1, 2),
            CubeFace::Back => (1, 3),
        }
    }
}

/// The tile drawn on each face of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasTiles {
    pub top: TileCode,
    pub left: TileCode,
    pub front: TileCode,
    pub right: TileCode,
    pub bottom: TileCode,
    pub back: TileCode,
}

impl AtlasTiles {
    /// Pick the six tiles for a room from its side flags
    pub fn for_room(room: &Room) -> Self {
        use Side::{Door, Open, Wall};

        let top = match (room.up, room.right, room.left) {
            (Open, Open, Open) => TileCode::OPEN,
            (Open, Open, _) => TileCode::new(Open, Open, Wall, Open),
            (Open, _, Open) => TileCode::new(Wall, Open, Open, Open),
            (Open, _, _) => TileCode::new(Wall, Open, Wall, Open),
            _ => TileCode::CLOSED,
        };

        let bottom = match room.down {
            Open => TileCode::OPEN,
            _ => TileCode::CLOSED,
        };

        let left = match room.left {
            Open => TileCode::OPEN,
            Door => TileCode::new(Door, Open, Open, Open),
            _ => TileCode::new(Wall, Open, Open, Open),
        };

        let right = match room.right {
            Open => TileCode::OPEN,
            Door => TileCode::new(Open, Open, Door, Open),
            _ => TileCode::new(Open, Open, Wall, Open),
        };

        Self {
            top,
            left,
            front: TileCode::front_of(room),
            right,
            bottom,
            back: TileCode::back_of(room),
        }
    }

    pub fn tile(&self, face: CubeFace) -> TileCode {
        match face {
            CubeFace::Top => self.top,
            CubeFace::Left => self.left,
            CubeFace::Front => self.front,
            CubeFace::Right => self.right,
            CubeFace::Bottom => self.bottom,
            CubeFace::Back => self.back,
        }
    }
}

/// Composite the six tiles into one atlas image.
/// Tiles of any size are scaled (nearest neighbour) to `face_size`.
pub fn compose_atlas(tiles: &AtlasTiles, face_size: u32, tileset: &mut TileSet) -> RgbaImage {
    let mut atlas = RgbaImage::new(face_size * ATLAS_COLUMNS, face_size * ATLAS_ROWS);

    for face in CubeFace::ALL {
        let (col, row) = face.atlas_cell();
        let x = (col * face_size) as i64;
        let y = (row * face_size) as i64;

        let tile = tileset.get(tiles.tile(face));
        if tile.dimensions() == (face_size, face_size) {
            imageops::replace(&mut atlas, tile, x, y);
        } else {
            let scaled = imageops::resize(tile, face_size, face_size, imageops::FilterType::Nearest);
            imageops::replace(&mut atlas, &scaled, x, y);
        }
    }

    atlas
}

/// Atlases shared between rooms with identical tiles
pub struct AtlasCache {
    face_size: u32,
    textures: Vec<Texture>,
    index: HashMap<AtlasTiles, usize>,
}

impl AtlasCache {
    pub fn new(face_size: u32) -> Self {
        Self {
            face_size,
            textures: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Texture id of the room's atlas, composing it on first use
    pub fn texture_for(&mut self, room: &Room, tileset: &mut TileSet) -> usize {
        let tiles = AtlasTiles::for_room(room);
        if let Some(&id) = self.index.get(&tiles) {
            return id;
        }

        let image = compose_atlas(&tiles, self.face_size, tileset);
        let name = format!(
            "{}-{}-{}-{}-{}-{}",
            tiles.top, tiles.left, tiles.front, tiles.right, tiles.bottom, tiles.back
        );
        let id = self.textures.len();
        let texture = Texture::from_rgba_image(&image, name);
        log::debug!("Composed atlas {} for room at {:?}", texture.name, room.pos);
        self.textures.push(texture);
        self.index.insert(tiles, id);
        id
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn into_textures(self) -> Vec<Texture> {
        self.textures
    }
}
