//! Core rendering functions
//! Triangle rasterization with optional PS1-style effects

use super::math::{barycentric, perspective_transform, project, Vec2, Vec3};
use super::types::{Color, Face, RasterSettings, ShadingMode, Texture, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer (camera-space z)
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.set_pixel(x, y, color);
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Color::with_alpha(
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            )
        } else {
            Color::BLACK
        }
    }
}

/// Perspective camera rotating about the world Y axis.
///
/// World Y grows downwards (like screen rows), so camera space is
/// x = right, y = down, z = forward.
pub struct Camera {
    pub position: Vec3,
    pub rotation_y: f32, // Yaw, 0 looks down +Z
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            fov_y,
            near,
            far,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        // Forward vector based on yaw
        self.basis_z = Vec3::new(self.rotation_y.sin(), 0.0, self.rotation_y.cos());

        // Right vector
        self.basis_x = Vec3::DOWN.cross(self.basis_z).normalize();

        // Down vector
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation_y = yaw;
        self.update_basis();
    }

    /// Transform a world-space point into camera space
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        perspective_transform(p - self.position, self.basis_x, self.basis_y, self.basis_z)
    }
}

/// Projected surface (triangle ready for rasterization)
struct Surface {
    pub v1: Vec3, // Screen-space vertex 1 (z = camera depth)
    pub v2: Vec3, // Screen-space vertex 2
    pub v3: Vec3, // Screen-space vertex 3
    pub vn1: Vec3, // Vertex normal 1 (camera space)
    pub vn2: Vec3, // Vertex normal 2
    pub vn3: Vec3, // Vertex normal 3
    pub uv1: Vec2,
    pub uv2: Vec2,
    pub uv3: Vec2,
    pub normal: Vec3, // Face normal (camera space)
    pub face_idx: usize,
}

/// Calculate shading intensity for a normal
fn shade_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.dot(light_dir).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

/// Rasterize a single triangle
fn rasterize_triangle(
    fb: &mut Framebuffer,
    surface: &Surface,
    texture: Option<&Texture>,
    settings: &RasterSettings,
) {
    // Bounding box
    let min_x = surface.v1.x.min(surface.v2.x).min(surface.v3.x).max(0.0) as usize;
    let max_x = (surface.v1.x.max(surface.v2.x).max(surface.v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = surface.v1.y.min(surface.v2.y).min(surface.v3.y).max(0.0) as usize;
    let max_y = (surface.v1.y.max(surface.v2.y).max(surface.v3.y) + 1.0).min(fb.height as f32) as usize;

    let light_dir = settings.light_dir.normalize();

    let flat_shade = shade_intensity(surface.normal, light_dir, settings.ambient);
    let vertex_shade = if settings.shading == ShadingMode::Gouraud {
        [
            shade_intensity(surface.vn1, light_dir, settings.ambient),
            shade_intensity(surface.vn2, light_dir, settings.ambient),
            shade_intensity(surface.vn3, light_dir, settings.ambient),
        ]
    } else {
        [1.0; 3]
    };

    let inv_z = [1.0 / surface.v1.z, 1.0 / surface.v2.z, 1.0 / surface.v3.z];

    for y in min_y..max_y {
        for x in min_x..max_x {
            // Sample at pixel centers
            let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
            let bc = barycentric(p, surface.v1, surface.v2, surface.v3);

            // Check if inside triangle
            const ERR: f32 = -0.0001;
            if bc.x < ERR || bc.y < ERR || bc.z < ERR {
                continue;
            }

            // Depth is linear in 1/z across the screen
            let pinv = bc.x * inv_z[0] + bc.y * inv_z[1] + bc.z * inv_z[2];
            if pinv <= 0.0 {
                continue;
            }
            let z = 1.0 / pinv;

            if settings.use_zbuffer && z >= fb.zbuffer[y * fb.width + x] {
                continue;
            }

            let (u, v) = if settings.affine_textures {
                // Affine (PS1 style) - linear interpolation
                let u = bc.x * surface.uv1.x + bc.y * surface.uv2.x + bc.z * surface.uv3.x;
                let v = bc.x * surface.uv1.y + bc.y * surface.uv2.y + bc.z * surface.uv3.y;
                (u, v)
            } else {
                // Perspective-correct interpolation
                let w1 = bc.x * inv_z[0] * z;
                let w2 = bc.y * inv_z[1] * z;
                let w3 = bc.z * inv_z[2] * z;
                let u = w1 * surface.uv1.x + w2 * surface.uv2.x + w3 * surface.uv3.x;
                let v = w1 * surface.uv1.y + w2 * surface.uv2.y + w3 * surface.uv3.y;
                (u, v)
            };

            let color = match texture {
                Some(tex) => tex.sample(u, v),
                None => Color::WHITE,
            };
            if color.a < settings.alpha_cutoff {
                continue;
            }

            let shade = match settings.shading {
                ShadingMode::None => 1.0,
                ShadingMode::Flat => flat_shade,
                ShadingMode::Gouraud => {
                    bc.x * vertex_shade[0] + bc.y * vertex_shade[1] + bc.z * vertex_shade[2]
                }
            };

            let color = color.shade(shade);

            if settings.use_zbuffer {
                fb.set_pixel_with_depth(x, y, z, color);
            } else {
                fb.set_pixel(x, y, color);
            }
        }
    }
}

/// Render a mesh to the framebuffer
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Face],
    textures: &[Texture],
    camera: &Camera,
    settings: &RasterSettings,
) {
    // Transform and project all vertices
    let mut projected: Vec<Vec3> = Vec::with_capacity(vertices.len());
    let mut cam_space_positions: Vec<Vec3> = Vec::with_capacity(vertices.len());
    let mut cam_space_normals: Vec<Vec3> = Vec::with_capacity(vertices.len());

    for v in vertices {
        let cam_pos = camera.to_camera_space(v.pos);
        cam_space_positions.push(cam_pos);

        projected.push(project(cam_pos, camera.fov_y, settings.vertex_snap, fb.width, fb.height));

        let cam_normal = perspective_transform(v.normal, camera.basis_x, camera.basis_y, camera.basis_z);
        cam_space_normals.push(cam_normal.normalize());
    }

    let mut surfaces: Vec<Surface> = Vec::with_capacity(faces.len());

    for (face_idx, face) in faces.iter().enumerate() {
        let cv1 = cam_space_positions[face.v0];
        let cv2 = cam_space_positions[face.v1];
        let cv3 = cam_space_positions[face.v2];

        // Near/far clipping at triangle granularity
        if cv1.z < camera.near || cv2.z < camera.near || cv3.z < camera.near {
            continue;
        }
        if cv1.z > camera.far && cv2.z > camera.far && cv3.z > camera.far {
            continue;
        }

        let normal = (cv2 - cv1).cross(cv3 - cv1).normalize();

        // Faces whose outward normal points away from the eye are hidden
        if settings.backface_cull && normal.dot(cv1) >= 0.0 {
            continue;
        }

        surfaces.push(Surface {
            v1: projected[face.v0],
            v2: projected[face.v1],
            v3: projected[face.v2],
            vn1: cam_space_normals[face.v0],
            vn2: cam_space_normals[face.v1],
            vn3: cam_space_normals[face.v2],
            uv1: vertices[face.v0].uv,
            uv2: vertices[face.v1].uv,
            uv3: vertices[face.v2].uv,
            normal,
            face_idx,
        });
    }

    // Painter's algorithm: far to near
    if !settings.use_zbuffer {
        surfaces.sort_by(|a, b| {
            let a_max_z = a.v1.z.max(a.v2.z).max(a.v3.z);
            let b_max_z = b.v1.z.max(b.v2.z).max(b.v3.z);
            b_max_z.total_cmp(&a_max_z)
        });
    }

    for surface in &surfaces {
        let texture = faces[surface.face_idx]
            .texture_id
            .and_then(|id| textures.get(id));
        rasterize_triangle(fb, surface, texture, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_facing_camera(z: f32, half: f32) -> (Vec<Vertex>, Vec<Face>) {
        // Outward normal -Z (towards a camera at the origin looking +Z)
        let n = Vec3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Vec3::new(-half, -half, z), Vec2::new(0.0, 0.0), n),
            Vertex::new(Vec3::new(half, -half, z), Vec2::new(1.0, 0.0), n),
            Vertex::new(Vec3::new(half, half, z), Vec2::new(1.0, 1.0), n),
            Vertex::new(Vec3::new(-half, half, z), Vec2::new(0.0, 1.0), n),
        ];
        // Wound so that (v1 - v0) x (v2 - v0) points along -Z
        let faces = vec![Face::new(0, 2, 1), Face::new(0, 3, 2)];
        (vertices, faces)
    }

    fn flat_settings() -> RasterSettings {
        RasterSettings {
            shading: ShadingMode::None,
            ..RasterSettings::default()
        }
    }

    #[test]
    fn test_camera_basis_is_right_down_forward() {
        let cam = Camera::new(1.0, 0.1, 100.0);
        assert!((cam.basis_x.x - 1.0).abs() < 1e-5);
        assert!((cam.basis_y.y - 1.0).abs() < 1e-5);
        assert!((cam.basis_z.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_yaw_half_turn_looks_back() {
        let mut cam = Camera::new(1.0, 0.1, 100.0);
        cam.set_yaw(std::f32::consts::PI);
        assert!((cam.basis_z.z + 1.0).abs() < 1e-5);
        assert!((cam.basis_x.x + 1.0).abs() < 1e-5);
        // Down stays down
        assert!((cam.basis_y.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_render_quad_covers_center() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let cam = Camera::new(60f32.to_radians(), 0.1, 100.0);
        let (vertices, faces) = quad_facing_camera(5.0, 1.0);

        render_mesh(&mut fb, &vertices, &faces, &[], &cam, &flat_settings());

        assert_eq!(fb.get_pixel(32, 24), Color::WHITE);
        assert_eq!(fb.get_pixel(0, 0), Color::BLACK);
        assert!((fb.zbuffer[24 * 64 + 32] - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_backface_is_culled() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        let cam = Camera::new(60f32.to_radians(), 0.1, 100.0);
        let (vertices, mut faces) = quad_facing_camera(5.0, 1.0);
        for f in &mut faces {
            std::mem::swap(&mut f.v1, &mut f.v2);
        }

        render_mesh(&mut fb, &vertices, &faces, &[], &cam, &flat_settings());
        assert_eq!(fb.get_pixel(16, 16), Color::BLACK);
    }

    #[test]
    fn test_near_and_far_clip() {
        let cam = Camera::new(60f32.to_radians(), 1.0, 10.0);
        for z in [0.5, 20.0] {
            let mut fb = Framebuffer::new(32, 32);
            fb.clear(Color::BLACK);
            let (vertices, faces) = quad_facing_camera(z, 0.2);
            render_mesh(&mut fb, &vertices, &faces, &[], &cam, &flat_settings());
            assert_eq!(fb.get_pixel(16, 16), Color::BLACK, "quad at z={} should be clipped", z);
        }
    }

    #[test]
    fn test_zbuffer_keeps_nearest() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        let cam = Camera::new(60f32.to_radians(), 0.1, 100.0);

        let mut red = Texture::new(1, 1);
        red.pixels[0] = Color::new(255, 0, 0);
        let mut green = Texture::new(1, 1);
        green.pixels[0] = Color::new(0, 255, 0);
        let textures = vec![red, green];

        let (near_v, mut near_f) = quad_facing_camera(4.0, 1.0);
        let (far_v, mut far_f) = quad_facing_camera(8.0, 4.0);
        for f in &mut near_f {
            f.texture_id = Some(0);
        }
        for f in &mut far_f {
            f.texture_id = Some(1);
        }

        // Near first, then far: the far quad must not overwrite
        render_mesh(&mut fb, &near_v, &near_f, &textures, &cam, &flat_settings());
        render_mesh(&mut fb, &far_v, &far_f, &textures, &cam, &flat_settings());

        assert_eq!(fb.get_pixel(16, 16), Color::new(255, 0, 0));
    }

    #[test]
    fn test_flat_shading_headlight_is_full_bright() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        let cam = Camera::new(60f32.to_radians(), 0.1, 100.0);
        let (vertices, faces) = quad_facing_camera(5.0, 1.0);
        let settings = RasterSettings::default();

        render_mesh(&mut fb, &vertices, &faces, &[], &cam, &settings);

        // Surface faces the headlight head-on
        assert_eq!(fb.get_pixel(16, 16), Color::WHITE);
    }
}
