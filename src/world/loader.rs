//! Room list loading
//!
//! The map file is line oriented. Every line of the form
//! `(x, y, z, right, up, left, down, front, back)` is one room; any other
//! line is ignored. Whitespace around the line and around each field is
//! tolerated, so `( 1 ,2, ...)` reads the same as `(1, 2, ...)`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use super::{GridPos, Room, RoomMap, Side};

/// Number of integers in a room record
pub const FIELD_COUNT: usize = 9;

/// Error type for map loading
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: `{field}` is not an integer")]
    BadInteger { line: usize, field: String },
    #[error("line {line}: expected {expected} fields, found {found}", expected = FIELD_COUNT)]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: side flag {value} is not 0, 1 or 2")]
    BadFlag { line: usize, value: i32 },
}

/// Load a room list from a file
pub fn load_rooms<P: AsRef<Path>>(path: P) -> Result<RoomMap, MapError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rooms(&contents)
}

/// Parse a room list from a string
pub fn parse_rooms(s: &str) -> Result<RoomMap, MapError> {
    let mut map = RoomMap::new();

    for (idx, line) in s.lines().enumerate() {
        let line = line.trim();
        let Some(inner) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) else {
            continue;
        };
        map.push(parse_record(inner, idx + 1)?);
    }

    Ok(map)
}

/// Parse the inside of one `( ... )` record
fn parse_record(inner: &str, line: usize) -> Result<Room, MapError> {
    let values = inner
        .split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<i32>().map_err(|_| MapError::BadInteger {
                line,
                field: field.to_string(),
            })
        })
        .collect::<Result<Vec<i32>, MapError>>()?;

    if values.len() != FIELD_COUNT {
        return Err(MapError::FieldCount { line, found: values.len() });
    }

    let side = |value: i32| Side::from_flag(value).ok_or(MapError::BadFlag { line, value });

    Ok(Room {
        pos: GridPos::new(values[0], values[1], values[2]),
        right: side(values[3])?,
        up: side(values[4])?,
        left: side(values[5])?,
        down: side(values[6])?,
        front: side(values[7])?,
        back: side(values[8])?,
    })
}
