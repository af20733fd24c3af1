//! Room cube meshes
//!
//! World axes: +X right, +Y down, +Z away from the starting camera.
//! Every face is a quad split into two triangles, wound so that
//! `(v1 - v0) x (v2 - v0)` points out of the cube.

use crate::rasterizer::{Face, Vec2, Vec3, Vertex};
use crate::tiles::{CubeFace, ATLAS_COLUMNS, ATLAS_ROWS};

/// Geometry of one placed room
#[derive(Debug, Clone)]
pub struct RoomMesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

/// Outward normal plus the directions that read as "right" and "down" on the
/// face when looking at it from outside the cube
fn face_frame(face: CubeFace) -> (Vec3, Vec3, Vec3) {
    match face {
        CubeFace::Top => (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        CubeFace::Left => (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
        CubeFace::Front => (Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        CubeFace::Right => (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
        CubeFace::Bottom => (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        CubeFace::Back => (Vec3::new(0.0, 0.0, 1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    }
}

/// UV rectangle of a face's atlas cell, inset by half a texel so nearest
/// sampling never bleeds into the neighbouring cell
fn cell_uv_rect(face: CubeFace, face_size: u32) -> (Vec2, Vec2) {
    let (col, row) = face.atlas_cell();
    let fs = face_size as f32;
    let w = fs * ATLAS_COLUMNS as f32;
    let h = fs * ATLAS_ROWS as f32;

    let min = Vec2::new((col as f32 * fs + 0.5) / w, (row as f32 * fs + 0.5) / h);
    let max = Vec2::new(((col + 1) as f32 * fs - 0.5) / w, ((row + 1) as f32 * fs - 0.5) / h);
    (min, max)
}

/// Build an axis-aligned cube of edge `size` centred on `center`, textured
/// with atlas `texture_id`
pub fn build_room_cube(center: Vec3, size: f32, texture_id: usize, face_size: u32) -> RoomMesh {
    let half = size / 2.0;
    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);

    for face in CubeFace::ALL {
        let (normal, right, down) = face_frame(face);
        let (uv_min, uv_max) = cell_uv_rect(face, face_size);
        let face_center = center + normal * half;
        let base = vertices.len();

        // Corners in reading order: top-left, top-right, bottom-right, bottom-left
        for (s, t) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let pos = face_center + right * ((s - 0.5) * size) + down * ((t - 0.5) * size);
            let uv = Vec2::new(
                uv_min.x + (uv_max.x - uv_min.x) * s,
                uv_min.y + (uv_max.y - uv_min.y) * t,
            );
            vertices.push(Vertex::new(pos, uv, normal));
        }

        faces.push(Face::with_texture(base, base + 2, base + 1, texture_id));
        faces.push(Face::with_texture(base, base + 3, base + 2, texture_id));
    }

    RoomMesh { vertices, faces }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = build_room_cube(Vec3::ZERO, 2.0, 7, 16);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.faces.len(), 12);
        assert!(mesh.faces.iter().all(|f| f.texture_id == Some(7)));
    }

    #[test]
    fn test_cube_is_placed_and_sized() {
        let center = Vec3::new(11.0, 5.5, 0.0);
        let mesh = build_room_cube(center, 5.5, 0, 16);
        for v in &mesh.vertices {
            let d = v.pos - center;
            assert!(d.x.abs() <= 2.7501 && d.y.abs() <= 2.7501 && d.z.abs() <= 2.7501);
        }
        // Extremes reach the full half-size on every axis
        let max_x = mesh.vertices.iter().map(|v| v.pos.x).fold(f32::MIN, f32::max);
        let min_y = mesh.vertices.iter().map(|v| v.pos.y).fold(f32::MAX, f32::min);
        assert!((max_x - 13.75).abs() < 1e-4);
        assert!((min_y - 2.75).abs() < 1e-4);
    }

    #[test]
    fn test_winding_points_outwards() {
        let mesh = build_room_cube(Vec3::ZERO, 2.0, 0, 16);
        for f in &mesh.faces {
            let v0 = mesh.vertices[f.v0].pos;
            let v1 = mesh.vertices[f.v1].pos;
            let v2 = mesh.vertices[f.v2].pos;
            let n = (v1 - v0).cross(v2 - v0).normalize();
            let declared = mesh.vertices[f.v0].normal;
            assert!(n.dot(declared) > 0.99, "face normal {:?} vs {:?}", n, declared);
            // Outward: the face centroid lies along the normal
            let centroid = (v0 + v1 + v2) * (1.0 / 3.0);
            assert!(centroid.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_uvs_stay_in_their_cell() {
        let mesh = build_room_cube(Vec3::ZERO, 1.0, 0, 16);
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            let (col, row) = face.atlas_cell();
            for v in &mesh.vertices[i * 4..i * 4 + 4] {
                let px = v.uv.x * 48.0;
                let py = v.uv.y * 64.0;
                assert!(px > (col * 16) as f32 && px < ((col + 1) * 16) as f32);
                assert!(py > (row * 16) as f32 && py < ((row + 1) * 16) as f32);
            }
        }
    }

    #[test]
    fn test_front_face_reads_left_to_right_along_x() {
        let mesh = build_room_cube(Vec3::ZERO, 2.0, 0, 16);
        let front = CubeFace::ALL.iter().position(|f| *f == CubeFace::Front).unwrap();
        let quad = &mesh.vertices[front * 4..front * 4 + 4];
        // Top-left corner sits at -X, -Y (up), -Z
        assert_eq!(quad[0].pos, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(quad[2].pos, Vec3::new(1.0, 1.0, -1.0));
        assert!(quad[0].uv.x < quad[1].uv.x);
        assert!(quad[0].uv.y < quad[3].uv.y);
    }
}
