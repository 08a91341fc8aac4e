//! CPU renderer
//!
//! Casts one ray per character cell into the scene, shades the hit, and
//! maps the resulting luminance onto the character gradient.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::camera::Animator;
use crate::scene::{Scene, Sphere};
use crate::{AMBIENT_FLOOR, ASCII_GRADIENT, SPECULAR_EXPONENT, SPECULAR_STRENGTH};

/// A ray in 3D space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Color seen by rays that miss every sphere.
pub fn background_color() -> Vector3<f32> {
    Vector3::new(0.2, 0.7, 0.8)
}

/// Reflect a vector around a normal
fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    *v - 2.0 * v.dot(n) * *n
}

/// Shade a hit point: Lambertian diffuse with a flat ambient floor plus a
/// white specular highlight.
///
/// The reflected light vector is left unnormalized; renormalizing it would
/// change the specular falloff and with it the rendered image.
fn shade(ray: &Ray, sphere: &Sphere, t: f32, light: Point3<f32>) -> Vector3<f32> {
    let hit_point = ray.at(t);
    let normal = (hit_point - sphere.center).normalize();
    let light_dir = (light - hit_point).normalize();

    let diffuse = normal.dot(&light_dir).max(0.0);

    let view_dir = (ray.origin - hit_point).normalize();
    let reflect_dir = reflect(&light_dir, &normal);
    let specular = view_dir.dot(&reflect_dir).max(0.0).powi(SPECULAR_EXPONENT);

    // Channels may exceed 1.0 here; clamping happens on luminance, not here.
    sphere.color * (diffuse + AMBIENT_FLOOR)
        + Vector3::new(1.0, 1.0, 1.0) * specular * SPECULAR_STRENGTH
}

/// Trace one ray: nearest sphere shaded, or the background color on a miss.
pub fn trace(ray: &Ray, scene: &Scene) -> Vector3<f32> {
    match scene.find_nearest(ray) {
        Some((sphere, t)) => shade(ray, sphere, t, scene.light_position),
        None => background_color(),
    }
}

/// Perceptual luminance of a color, clamped to [0, 1].
pub fn luminance(color: &Vector3<f32>) -> f32 {
    (0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z).clamp(0.0, 1.0)
}

/// The per-cell renderer
pub struct Renderer {
    width: usize,
    height: usize,
    us: Vec<f32>,
    vs: Vec<f32>,
    framebuffer: Vec<Vector3<f32>>,
    gradient: Vec<char>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_gradient(width, height, ASCII_GRADIENT)
    }

    /// Renderer with a custom intensity gradient (empty to most intense).
    pub fn with_gradient(width: usize, height: usize, gradient: &str) -> Self {
        let mut renderer = Self {
            width,
            height,
            us: Vec::new(),
            vs: Vec::new(),
            framebuffer: Vec::new(),
            gradient: gradient.chars().collect(),
        };
        renderer.resize(width, height);
        renderer
    }

    /// Resize the grid, recomputing the per-column and per-row screen
    /// coordinates. These depend only on the grid size, not on the frame.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.us = (0..width)
            .map(|x| (x as f32 - width as f32 / 2.0) / width as f32 * 2.0)
            .collect();
        self.vs = (0..height)
            .map(|y| (height as f32 / 2.0 - y as f32) / height as f32)
            .collect();
        self.framebuffer = vec![Vector3::zeros(); width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shaded color of the cell at (x, y) from the last render.
    pub fn pixel(&self, x: usize, y: usize) -> Vector3<f32> {
        self.framebuffer[y * self.width + x]
    }

    /// Shade every cell of the grid into the framebuffer.
    ///
    /// Rows are shaded in parallel; each cell is a pure function of the
    /// scene and animator state, so the result is deterministic.
    pub fn render(&mut self, scene: &Scene, rig: &Animator) {
        let width = self.width;
        let us = &self.us;
        let vs = &self.vs;
        let rig = *rig;
        let origin = rig.camera_position();

        let colors: Vec<Vector3<f32>> = (0..self.height)
            .into_par_iter()
            .flat_map_iter(|y| {
                let v = vs[y];
                (0..width).map(move |x| {
                    let direction = rig.ray_direction(us[x], v).normalize();
                    let ray = Ray::new(origin, direction);
                    trace(&ray, scene)
                })
            })
            .collect();

        self.framebuffer = colors;
    }

    /// Gradient index for a luminance value.
    ///
    /// Maps `floor(lum * N) - 1`; the saturating clamp keeps the boundary
    /// cases (lum near 0, lum exactly 1) in range.
    pub fn glyph_index(&self, luminance: f32) -> usize {
        let n = self.gradient.len() as i32;
        ((luminance * n as f32).floor() as i32 - 1).clamp(0, n - 1) as usize
    }

    /// Map one luminance value to a gradient character.
    pub fn glyph_for(&self, luminance: f32) -> char {
        self.gradient[self.glyph_index(luminance)]
    }

    /// Convert the framebuffer to rows of glyphs, one row per line.
    pub fn to_ascii(&self) -> String {
        let mut result = String::with_capacity(self.width * self.height + self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.framebuffer[y * self.width + x];
                result.push(self.glyph_for(luminance(&color)));
            }
            result.push('\n');
        }
        result
    }

    /// Render one frame end to end: shade the grid, then map it to glyphs.
    pub fn render_frame(&mut self, scene: &Scene, rig: &Animator) -> String {
        self.render(scene, rig);
        self.to_ascii()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        assert!((ray.at(5.0).x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_unit_magnitude() {
        for v in [
            Vector3::<f32>::new(0.3, -2.0, 11.5),
            Vector3::new(1e-3, 0.0, 0.0),
            Vector3::new(-7.0, 4.0, 2.0),
        ] {
            assert!((v.normalize().magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_miss_is_exact_background() {
        let scene = Scene::three_spheres();
        // points away from every sphere
        let ray = Ray::new(Point3::new(0.0, 0.0, 4.0), Vector3::new(0.0, 0.0, 1.0));
        let color = trace(&ray, &scene);
        assert_eq!(color, background_color());
    }

    #[test]
    fn test_luminance_clamped_for_bright_colors() {
        // specular blowout far above 1.0 per channel
        let hot = Vector3::new(4.0, 4.0, 4.0);
        let lum = luminance(&hot);
        assert!((lum - 1.0).abs() < 1e-6);
        assert!(luminance(&Vector3::zeros()) >= 0.0);
    }

    #[test]
    fn test_glyph_monotonic_in_luminance() {
        let renderer = Renderer::new(4, 4);
        let mut last = 0;
        for step in 0..=100 {
            let lum = step as f32 / 100.0;
            let index = renderer.glyph_index(lum);
            assert!(index >= last);
            last = index;
        }
    }

    #[test]
    fn test_glyph_index_saturates() {
        let renderer = Renderer::new(4, 4);
        assert_eq!(renderer.glyph_index(0.0), 0);
        assert_eq!(renderer.glyph_index(0.05), 0);
        assert_eq!(renderer.glyph_index(1.0), ASCII_GRADIENT.chars().count() - 1);
    }

    #[test]
    fn test_background_glyph_from_literal_color() {
        let renderer = Renderer::new(4, 4);
        // 0.2126*0.2 + 0.7152*0.7 + 0.0722*0.8 ~= 0.601, index floor(6.01)-1
        let lum = luminance(&background_color());
        assert_eq!(renderer.glyph_index(lum), 5);
        assert_eq!(renderer.glyph_for(lum), '+');
    }

    #[test]
    fn test_center_cell_hits_origin_sphere() {
        let scene = Scene {
            spheres: vec![Sphere::new(
                Point3::new(0.0, 0.0, 0.0),
                1.0,
                Vector3::new(1.0, 0.2, 0.2),
            )],
            light_position: Point3::new(-5.0, 5.0, 5.0),
        };
        let rig = Animator {
            orbit_camera: false,
            ..Animator::default()
        };

        // center cell of an 80x40 grid has u = 0, v = 0 exactly
        let ray = Ray::new(rig.camera_position(), rig.ray_direction(0.0, 0.0).normalize());
        let (_, t) = scene.find_nearest(&ray).unwrap();
        assert!((t - 3.0).abs() < 1e-4);

        let mut renderer = Renderer::new(80, 40);
        renderer.render(&scene, &rig);
        let center = renderer.pixel(40, 20);
        let lum = luminance(&center);
        assert!((0.0..=1.0).contains(&lum));
        // the lit sphere reads differently from the background
        assert!((lum - luminance(&background_color())).abs() > 0.05);
        assert_ne!(
            renderer.glyph_for(lum),
            renderer.glyph_for(luminance(&background_color()))
        );
    }

    #[test]
    fn test_empty_scene_renders_uniform_background() {
        let scene = Scene::empty();
        let rig = Animator::default();
        let mut renderer = Renderer::new(20, 10);
        let frame = renderer.render_frame(&scene, &rig);

        let expected = renderer.glyph_for(luminance(&background_color()));
        assert_eq!(frame.lines().count(), 10);
        for line in frame.lines() {
            assert_eq!(line.chars().count(), 20);
            assert!(line.chars().all(|c| c == expected));
        }
    }

    #[test]
    fn test_render_frame_shape() {
        let mut renderer = Renderer::new(33, 17);
        let frame = renderer.render_frame(&Scene::three_spheres(), &Animator::default());
        assert_eq!(frame.lines().count(), 17);
        assert!(frame.lines().all(|l| l.chars().count() == 33));
    }

    #[test]
    fn test_resize_recomputes_grid() {
        let mut renderer = Renderer::new(80, 24);
        renderer.resize(100, 30);
        assert_eq!(renderer.width(), 100);
        assert_eq!(renderer.height(), 30);
        let frame = renderer.render_frame(&Scene::empty(), &Animator::default());
        assert_eq!(frame.lines().count(), 30);
    }

    #[test]
    fn test_reflect() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        let n = Vector3::new(0.0, 1.0, 0.0);
        let r = reflect(&v, &n);
        assert!((r.x - 1.0).abs() < 1e-5);
        assert!((r.y - 1.0).abs() < 1e-5);
    }
}
