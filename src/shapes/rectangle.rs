// Copyright @yucwang 2026

use crate::core::interaction::{SurfaceInteraction, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f, EPSILON};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Planar parallelogram spanned by two edge vectors from a corner.
pub struct Rectangle {
    origin: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Rectangle {
    pub fn new(origin: Vector3f, edge_u: Vector3f, edge_v: Vector3f) -> Self {
        let cross = edge_u.cross(&edge_v);
        let area = cross.norm();
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        let normal = if area > 0.0 {
            cross / area
        } else {
            Vector3f::new(0.0, 0.0, 1.0)
        };

        Self { origin, edge_u, edge_v, normal, area, inv_area }
    }

    fn intersect_plane(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.origin - ray.origin()).dot(&self.normal) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let local = ray.at(t) - self.origin;
        let uu = self.edge_u.dot(&self.edge_u);
        let vv = self.edge_v.dot(&self.edge_v);
        let u = local.dot(&self.edge_u) / uu;
        let v = local.dot(&self.edge_v) / vv;
        if u < 0.0 || u > 1.0 || v < 0.0 || v > 1.0 {
            return None;
        }

        Some((t, Vector2f::new(u, v)))
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::default();
        bbox.expand_by_point(&self.origin);
        bbox.expand_by_point(&(self.origin + self.edge_u));
        bbox.expand_by_point(&(self.origin + self.edge_v));
        bbox.expand_by_point(&(self.origin + self.edge_u + self.edge_v));
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceInteraction> {
        let (t, uv) = self.intersect_plane(ray)?;
        Some(SurfaceInteraction::new(
            ray.at(t),
            self.normal,
            self.normal,
            uv,
            t,
            RGBSpectrum::default(),
        ))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_plane(ray).is_some()
    }

    fn sample(&self, u: &Vector2f) -> SurfaceSampleRecord {
        let p = self.origin + self.edge_u * u.x + self.edge_v * u.y;
        let interaction = SurfaceInteraction::new(
            p,
            self.normal,
            self.normal,
            *u,
            0.0,
            RGBSpectrum::default(),
        );
        SurfaceSampleRecord::new(interaction, self.inv_area)
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}
