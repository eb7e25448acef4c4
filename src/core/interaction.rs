// Copyright @yucwang 2023

use crate::core::bsdf::BSDF;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

/// One scene-query result. Produced fresh by every trace; the integrators
/// snapshot the fields they need before overwriting it with the next hit.
#[derive(Clone)]
pub struct SurfaceInteraction {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal: Vector3f,
    uv: Vector2f,
    t: Float,
    le: RGBSpectrum,
    wi: Vector3f,
    velocity: Vector3f,
    material: Option<Arc<dyn BSDF>>,
    object_index: Option<usize>,
}

pub struct SurfaceSampleRecord {
    interaction: SurfaceInteraction,
    pdf: Float,
}

impl SurfaceInteraction {
    pub fn new(new_p: Vector3f,
               new_geo_normal: Vector3f,
               new_sh_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float,
               new_le: RGBSpectrum) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, sh_normal: new_sh_normal,
               uv: new_uv, t: new_t, le: new_le,
               wi: Vector3f::zeros(), velocity: Vector3f::zeros(),
               material: None, object_index: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn le(&self) -> RGBSpectrum {
        self.le
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    /// World-space direction toward the previous path vertex.
    pub fn wi(&self) -> Vector3f {
        self.wi
    }

    pub fn velocity(&self) -> Vector3f {
        self.velocity
    }

    pub fn object_index(&self) -> Option<usize> {
        self.object_index
    }

    pub fn material(&self) -> Option<&dyn BSDF> {
        self.material.as_deref()
    }

    pub fn with_le(mut self, new_le: RGBSpectrum) -> Self {
        self.le = new_le;
        self
    }

    pub fn with_wi(mut self, new_wi: Vector3f) -> Self {
        self.wi = new_wi;
        self
    }

    pub fn with_velocity(mut self, new_velocity: Vector3f) -> Self {
        self.velocity = new_velocity;
        self
    }

    pub fn with_material(mut self, new_material: Arc<dyn BSDF>) -> Self {
        self.material = Some(new_material);
        self
    }

    pub fn with_object_index(mut self, new_object_index: Option<usize>) -> Self {
        self.object_index = new_object_index;
        self
    }

    pub fn offset_p(mut self, delta: Vector3f) -> Self {
        self.p += delta;
        self
    }
}

impl SurfaceSampleRecord {
    pub fn new(new_interaction: SurfaceInteraction, new_pdf: Float) -> Self {
        Self { interaction: new_interaction, pdf: new_pdf }
    }

    pub fn interaction(&self) -> &SurfaceInteraction {
        &self.interaction
    }

    pub fn pdf(&self) -> Float {
        self.pdf
    }

    pub fn set_pdf(&mut self, pdf: Float) {
        self.pdf = pdf;
    }
}
