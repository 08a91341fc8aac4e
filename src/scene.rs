//! Scene definitions: spheres plus a single white point light

use nalgebra::{Point3, Vector3};

use crate::renderer::Ray;

/// Sphere primitive with a base color (0..1 per channel)
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
    pub color: Vector3<f32>,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32, color: Vector3<f32>) -> Self {
        Self { center, radius, color }
    }

    /// Nearest forward intersection of `ray` with this sphere.
    ///
    /// Solves `a*t^2 + b*t + c = 0`. The smaller root wins when it lies in
    /// front of the origin; the larger root covers a ray starting inside
    /// the sphere. Both roots behind the origin is a miss.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let offset = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * offset.dot(&ray.direction);
        let c = offset.dot(&offset) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);

        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }
}

/// The complete scene: an ordered list of spheres and one light.
///
/// The light is implicit white at unit intensity; its position is refreshed
/// each frame from the [`Animator`](crate::camera::Animator) when light
/// orbit is enabled.
#[derive(Debug, Clone)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub light_position: Point3<f32>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::three_spheres()
    }
}

impl Scene {
    /// The stock scene: three red spheres around the origin.
    pub fn three_spheres() -> Self {
        let red = Vector3::new(1.0, 0.2, 0.2);
        Self {
            spheres: vec![
                Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0, red),
                Sphere::new(Point3::new(2.0, 0.5, -1.0), 0.5, red),
                Sphere::new(Point3::new(-2.0, 0.0, 0.0), 0.8, red),
            ],
            light_position: Point3::new(-5.0, 5.0, 5.0),
        }
    }

    /// A scene with no spheres at all; every ray sees the background.
    pub fn empty() -> Self {
        Self {
            spheres: Vec::new(),
            light_position: Point3::new(-5.0, 5.0, 5.0),
        }
    }

    /// Linear scan over all spheres for the nearest hit.
    ///
    /// Strict less-than on `t` keeps the first-encountered sphere on exact
    /// ties. No spatial structure: the scene is a handful of spheres.
    pub fn find_nearest(&self, ray: &Ray) -> Option<(&Sphere, f32)> {
        let mut nearest: Option<(&Sphere, f32)> = None;
        for sphere in &self.spheres {
            if let Some(t) = sphere.intersect(ray) {
                if nearest.map_or(true, |(_, min_t)| t < min_t) {
                    nearest = Some((sphere, t));
                }
            }
        }
        nearest
    }
}
