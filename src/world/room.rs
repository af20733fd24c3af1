//! Room records and the occupied-cell set
//!
//! Pure data structures; meshing lives in `scene`, texturing in `tiles`.

use std::collections::HashSet;
use crate::rasterizer::Vec3;

/// Integer cell in the map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// What a room has on one of its sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Solid wall
    Wall = 0,
    /// Wall with a doorway into the neighbouring room
    Door = 1,
    /// No wall, the room continues into the neighbouring cell
    Open = 2,
}

impl Side {
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            0 => Some(Side::Wall),
            1 => Some(Side::Door),
            2 => Some(Side::Open),
            _ => None,
        }
    }

    /// Digit used in tile codes
    pub fn digit(self) -> char {
        match self {
            Side::Wall => '0',
            Side::Door => '1',
            Side::Open => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::from_flag(d as i32))
    }
}

/// One cell of the map with its six side flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub pos: GridPos,
    pub right: Side,
    pub up: Side,
    pub left: Side,
    pub down: Side,
    pub front: Side,
    pub back: Side,
}

impl Room {
    /// Center of the room's cube in world units
    pub fn world_center(&self, room_size: f32) -> Vec3 {
        Vec3::new(
            self.pos.x as f32 * room_size,
            self.pos.y as f32 * room_size,
            self.pos.z as f32 * room_size,
        )
    }
}

/// All rooms of a map, in file order, plus the set of occupied cells
#[derive(Debug, Clone, Default)]
pub struct RoomMap {
    rooms: Vec<Room>,
    positions: HashSet<GridPos>,
}

impl RoomMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room. Returns false if its cell was already occupied;
    /// the room is kept either way.
    pub fn push(&mut self, room: Room) -> bool {
        self.rooms.push(room);
        self.positions.insert(room.pos)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.positions.contains(&pos)
    }

    /// Number of distinct cells
    pub fn occupied_count(&self) -> usize {
        self.positions.len()
    }

    /// Door sides that open onto an unoccupied cell.
    /// Front faces -Z and back faces +Z, matching the room cubes.
    pub fn doors_to_nowhere(&self) -> usize {
        self.rooms
            .iter()
            .flat_map(|room| {
                let p = room.pos;
                [
                    (room.right, GridPos::new(p.x + 1, p.y, p.z)),
                    (room.up, GridPos::new(p.x, p.y - 1, p.z)),
                    (room.left, GridPos::new(p.x - 1, p.y, p.z)),
                    (room.down, GridPos::new(p.x, p.y + 1, p.z)),
                    (room.front, GridPos::new(p.x, p.y, p.z - 1)),
                    (room.back, GridPos::new(p.x, p.y, p.z + 1)),
                ]
            })
            .filter(|&(side, next)| side == Side::Door && !self.is_occupied(next))
            .count()
    }

    /// Rooms that share a cell with an earlier room
    pub fn duplicate_count(&self) -> usize {
        self.rooms.len() - self.positions.len()
    }

    /// Inclusive min/max cell over all rooms
    pub fn bounds(&self) -> Option<(GridPos, GridPos)> {
        let first = self.rooms.first()?.pos;
        let bounds = self.rooms.iter().fold((first, first), |(mut lo, mut hi), room| {
            let p = room.pos;
            lo.x = lo.x.min(p.x);
            lo.y = lo.y.min(p.y);
            lo.z = lo.z.min(p.z);
            hi.x = hi.x.max(p.x);
            hi.y = hi.y.max(p.y);
            hi.z = hi.z.max(p.z);
            (lo, hi)
        });
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_at(x: i32, y: i32, z: i32) -> Room {
        Room {
            pos: GridPos::new(x, y, z),
            right: Side::Wall,
            up: Side::Wall,
            left: Side::Wall,
            down: Side::Wall,
            front: Side::Wall,
            back: Side::Wall,
        }
    }

    #[test]
    fn test_side_flags() {
        assert_eq!(Side::from_flag(0), Some(Side::Wall));
        assert_eq!(Side::from_flag(1), Some(Side::Door));
        assert_eq!(Side::from_flag(2), Some(Side::Open));
        assert_eq!(Side::from_flag(3), None);
        assert_eq!(Side::from_flag(-1), None);
        assert_eq!(Side::Door.digit(), '1');
        assert_eq!(Side::from_digit('2'), Some(Side::Open));
        assert_eq!(Side::from_digit('x'), None);
    }

    #[test]
    fn test_positions_deduplicate() {
        let mut map = RoomMap::new();
        assert!(map.push(room_at(1, 2, 0)));
        assert!(map.push(room_at(2, 2, 0)));
        assert!(!map.push(room_at(1, 2, 0)));

        assert_eq!(map.len(), 3);
        assert_eq!(map.occupied_count(), 2);
        assert_eq!(map.duplicate_count(), 1);
        assert!(map.is_occupied(GridPos::new(2, 2, 0)));
        assert!(!map.is_occupied(GridPos::new(3, 2, 0)));
    }

    #[test]
    fn test_doors_to_nowhere() {
        let mut map = RoomMap::new();
        let mut west = room_at(0, 0, 0);
        west.right = Side::Door;
        west.up = Side::Door;
        let mut east = room_at(1, 0, 0);
        east.left = Side::Door;
        east.back = Side::Door;
        map.push(west);
        map.push(east);

        // west.up and east.back lead to empty cells
        assert_eq!(map.doors_to_nowhere(), 2);
    }

    #[test]
    fn test_bounds() {
        let mut map = RoomMap::new();
        assert!(map.bounds().is_none());
        map.push(room_at(4, -1, 0));
        map.push(room_at(-2, 7, 1));
        let (lo, hi) = map.bounds().unwrap();
        assert_eq!(lo, GridPos::new(-2, -1, 0));
        assert_eq!(hi, GridPos::new(4, 7, 1));
    }

    #[test]
    fn test_world_center_scales_by_room_size() {
        let c = room_at(2, 3, -1).world_center(5.5);
        assert_eq!(c, Vec3::new(11.0, 16.5, -5.5));
    }
}
