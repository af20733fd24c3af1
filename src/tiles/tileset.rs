//! Tile images keyed by tile code
//!
//! Tiles are loaded lazily from `<dir>/<code>.png`. Codes without a usable
//! file get a procedurally drawn tile, so any map displays even with no
//! tile art at all.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use image::{Rgba, RgbaImage};
use thiserror::Error;
use crate::world::{Room, Side};

/// Four side flags in the order right, up, left, down (e.g. `2202`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCode(pub [Side; 4]);

impl TileCode {
    /// Every side open
    pub const OPEN: TileCode = TileCode([Side::Open; 4]);
    /// Every side walled
    pub const CLOSED: TileCode = TileCode([Side::Wall; 4]);

    pub fn new(right: Side, up: Side, left: Side, down: Side) -> Self {
        Self([right, up, left, down])
    }

    /// Parse a four digit code such as `"0222"`
    pub fn parse(s: &str) -> Option<Self> {
        let mut sides = [Side::Wall; 4];
        let mut chars = s.chars();
        for side in &mut sides {
            *side = Side::from_digit(chars.next()?)?;
        }
        if chars.next().is_some() {
            return None;
        }
        Some(Self(sides))
    }

    /// The room as seen from the front
    pub fn front_of(room: &Room) -> Self {
        Self::new(room.right, room.up, room.left, room.down)
    }

    /// The room as seen from behind (left and right swap)
    pub fn back_of(room: &Room) -> Self {
        Self::new(room.left, room.up, room.right, room.down)
    }

    pub fn right(self) -> Side {
        self.0[0]
    }

    pub fn up(self) -> Side {
        self.0[1]
    }

    pub fn left(self) -> Side {
        self.0[2]
    }

    pub fn down(self) -> Side {
        self.0[3]
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for side in self.0 {
            write!(f, "{}", side.digit())?;
        }
        Ok(())
    }
}

/// Error type for tile loading
#[derive(Debug, Error)]
pub enum TileError {
    #[error("failed to load tile {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Room interior in procedural tiles
const ROOM_FILL: Rgba<u8> = Rgba([40, 72, 200, 255]);
/// Wall strips in procedural tiles
const WALL: Rgba<u8> = Rgba([236, 236, 244, 255]);

/// Lazily loaded, cached tile images
pub struct TileSet {
    dir: Option<PathBuf>,
    tile_size: u32,
    tiles: HashMap<TileCode, RgbaImage>,
    generated: usize,
}

impl TileSet {
    /// Tiles come from PNG files in `dir`, falling back to procedural ones
    pub fn from_directory<P: AsRef<Path>>(dir: P, tile_size: u32) -> Self {
        let dir = dir.as_ref();
        log::info!("Found {} tile images in {}", tile_codes_in(dir).len(), dir.display());
        Self {
            dir: Some(dir.to_path_buf()),
            tile_size,
            tiles: HashMap::new(),
            generated: 0,
        }
    }

    /// Tiles are always generated, the disk is never read
    pub fn procedural(tile_size: u32) -> Self {
        Self {
            dir: None,
            tile_size,
            tiles: HashMap::new(),
            generated: 0,
        }
    }

    /// Register a tile image, replacing whatever was cached for `code`
    #[cfg(test)]
    pub fn insert(&mut self, code: TileCode, tile: RgbaImage) {
        self.tiles.insert(code, tile);
    }

    /// Get the image for a tile code, loading or generating it on first use
    pub fn get(&mut self, code: TileCode) -> &RgbaImage {
        if !self.tiles.contains_key(&code) {
            let tile = self.resolve(code);
            self.tiles.insert(code, tile);
        }
        &self.tiles[&code]
    }

    /// How many codes had to be drawn procedurally
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    fn resolve(&mut self, code: TileCode) -> RgbaImage {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{}.png", code));
            if path.is_file() {
                match load_tile(&path) {
                    Ok(tile) => {
                        log::debug!("Loaded tile {} ({}x{})", code, tile.width(), tile.height());
                        return tile;
                    }
                    Err(e) => log::warn!("{}, using a generated tile", e),
                }
            } else {
                log::warn!("Tile {} not found, using a generated tile", path.display());
            }
        }

        self.generated += 1;
        procedural_tile(code, self.tile_size)
    }
}

/// Codes that have a `<code>.png` file in `dir`; unreadable directories
/// and other file names are skipped
pub fn tile_codes_in(dir: &Path) -> Vec<TileCode> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                return None;
            }
            TileCode::parse(path.file_stem()?.to_str()?)
        })
        .collect()
}

/// Load one PNG tile
pub fn load_tile(path: &Path) -> Result<RgbaImage, TileError> {
    let img = image::open(path).map_err(|source| TileError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Draw a tile: room fill, solid wall strips on walled sides, a wall with a
/// centred gap on door sides and nothing on open sides.
pub fn procedural_tile(code: TileCode, size: u32) -> RgbaImage {
    let size = size.max(1);
    let thickness = (size / 8).max(1);
    let gap_start = size / 3;
    let gap_end = size - size / 3;

    // Decide for a single edge whether the pixel at `along` is wall
    let edge = |side: Side, along: u32| match side {
        Side::Wall => true,
        Side::Door => along < gap_start || along >= gap_end,
        Side::Open => false,
    };

    RgbaImage::from_fn(size, size, |x, y| {
        let on_right = x >= size - thickness && edge(code.right(), y);
        let on_up = y < thickness && edge(code.up(), x);
        let on_left = x < thickness && edge(code.left(), y);
        let on_down = y >= size - thickness && edge(code.down(), x);

        if on_right || on_up || on_left || on_down {
            WALL
        } else {
            ROOM_FILL
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display_and_parse() {
        let code = TileCode::new(Side::Open, Side::Open, Side::Wall, Side::Open);
        assert_eq!(code.to_string(), "2202");
        assert_eq!(TileCode::parse("2202"), Some(code));
        assert_eq!(TileCode::parse("220"), None);
        assert_eq!(TileCode::parse("22022"), None);
        assert_eq!(TileCode::parse("2232"), None);
        assert_eq!(TileCode::OPEN.to_string(), "2222");
        assert_eq!(TileCode::CLOSED.to_string(), "0000");
    }

    #[test]
    fn test_front_and_back_codes_mirror() {
        let room = Room {
            pos: crate::world::GridPos::new(0, 0, 0),
            right: Side::Door,
            up: Side::Open,
            left: Side::Wall,
            down: Side::Open,
            front: Side::Wall,
            back: Side::Wall,
        };
        assert_eq!(TileCode::front_of(&room).to_string(), "1202");
        assert_eq!(TileCode::back_of(&room).to_string(), "0212");
    }

    #[test]
    fn test_procedural_tile_walls() {
        let code = TileCode::new(Side::Wall, Side::Open, Side::Door, Side::Open);
        let tile = procedural_tile(code, 16);
        assert_eq!(tile.dimensions(), (16, 16));

        // Right side is walled all the way down
        assert_eq!(*tile.get_pixel(15, 8), WALL);
        // Up side is open
        assert_eq!(*tile.get_pixel(8, 0), ROOM_FILL);
        // Left side has a door in the middle but wall at the ends
        assert_eq!(*tile.get_pixel(0, 8), ROOM_FILL);
        assert_eq!(*tile.get_pixel(0, 1), WALL);
        // Interior is room fill
        assert_eq!(*tile.get_pixel(8, 8), ROOM_FILL);
    }

    #[test]
    fn test_procedural_set_caches() {
        let mut tiles = TileSet::procedural(8);
        let a = tiles.get(TileCode::CLOSED).clone();
        let _ = tiles.get(TileCode::CLOSED);
        let _ = tiles.get(TileCode::OPEN);
        assert_eq!(tiles.generated_count(), 2);
        assert_eq!(a.dimensions(), (8, 8));
    }

    #[test]
    fn test_inserted_tile_wins() {
        let mut tiles = TileSet::procedural(4);
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        tiles.insert(TileCode::OPEN, red);
        assert_eq!(*tiles.get(TileCode::OPEN).get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(tiles.generated_count(), 0);
    }

    #[test]
    fn test_tiles_load_from_disk_and_bad_files_fall_back() {
        let dir = std::env::temp_dir().join(format!("castle-map-tiles-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let art = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8, y as u8, 99, 255]));
        art.save(dir.join("2202.png")).unwrap();
        fs::write(dir.join("0000.png"), b"not a png").unwrap();
        fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let mut found = tile_codes_in(&dir);
        found.sort_by_key(|code| code.to_string());
        assert_eq!(found, vec![TileCode::CLOSED, TileCode::parse("2202").unwrap()]);

        let mut tiles = TileSet::from_directory(&dir, 16);
        let code = TileCode::new(Side::Open, Side::Open, Side::Wall, Side::Open);
        assert_eq!(*tiles.get(code), art);
        assert_eq!(tiles.generated_count(), 0);

        let fallback = tiles.get(TileCode::CLOSED).clone();
        assert_eq!(fallback, procedural_tile(TileCode::CLOSED, 16));
        assert_eq!(tiles.generated_count(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let mut tiles = TileSet::from_directory("no/such/tiles", 16);
        let tile = tiles.get(TileCode::CLOSED);
        assert_eq!(tile.dimensions(), (16, 16));
        assert_eq!(tiles.generated_count(), 1);
    }
}
