// Copyright @yucwang 2026

use crate::core::interaction::{SurfaceInteraction, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f, PI, TWO_PI};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_uniform_sphere;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    fn solve_t(&self, ray: &Ray3f) -> Option<Float> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.dot(&oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let t_near = -b - sqrt_disc;
        if ray.test_segment(t_near) {
            return Some(t_near);
        }
        let t_far = -b + sqrt_disc;
        if ray.test_segment(t_far) {
            return Some(t_far);
        }
        None
    }

    fn uv_of(&self, n: &Vector3f) -> Vector2f {
        let mut phi = n.y.atan2(n.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = n.z.clamp(-1.0, 1.0).acos();
        Vector2f::new(phi / TWO_PI, theta / PI)
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceInteraction> {
        let t = self.solve_t(ray)?;
        let p = ray.at(t);
        let n = (p - self.center) / self.radius;
        let uv = self.uv_of(&n);
        Some(SurfaceInteraction::new(p, n, n, uv, t, RGBSpectrum::default()))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.solve_t(ray).is_some()
    }

    fn sample(&self, u: &Vector2f) -> SurfaceSampleRecord {
        let n = sample_uniform_sphere(u);
        let p = self.center + n * self.radius;
        let uv = self.uv_of(&n);
        let interaction = SurfaceInteraction::new(p, n, n, uv, 0.0, RGBSpectrum::default());
        SurfaceSampleRecord::new(interaction, 1.0 / self.surface_area())
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_direct_hit_distance() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, 6.0), 1.0);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = sphere.ray_intersection(&ray).expect("expected hit");

        assert!((hit.t() - 5.0).abs() < 1e-4);
        assert!((hit.geo_normal() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, 6.0), 1.0);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(sphere.ray_intersection(&ray).is_none());
        assert!(!sphere.ray_intersection_t(&ray));
    }

    #[test]
    fn test_sphere_inside_hit() {
        let sphere = Sphere::new(Vector3f::zeros(), 2.0);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&ray).expect("expected hit from inside");
        assert!((hit.t() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_area_and_sample() {
        let sphere = Sphere::new(Vector3f::new(1.0, 2.0, 3.0), 0.5);
        assert!((sphere.surface_area() - 4.0 * PI * 0.25).abs() < 1e-4);

        let record = sphere.sample(&Vector2f::new(0.4, 0.7));
        let p = record.interaction().p();
        assert!(((p - Vector3f::new(1.0, 2.0, 3.0)).norm() - 0.5).abs() < 1e-4);
        assert!((record.pdf() - 1.0 / sphere.surface_area()).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_uv_range() {
        let sphere = Sphere::new(Vector3f::zeros(), 1.0);
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, -3.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = sphere.ray_intersection(&ray).expect("expected hit");
        let uv = hit.uv();
        assert!(uv.x >= 0.0 && uv.x <= 1.0);
        assert!(uv.y >= 0.0 && uv.y <= 1.0);
    }
}
