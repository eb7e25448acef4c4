// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterType {
    Area,
    Point,
    Directional,
    Spot,
}

impl EmitterType {
    /// Delta emitters sample from a zero-measure domain: no geometric
    /// cosine test at the receiver and no MIS against BSDF sampling.
    pub fn is_delta(self) -> bool {
        matches!(self, EmitterType::Point | EmitterType::Directional | EmitterType::Spot)
    }
}

/// One importance sample of an emitter, taken from a reference point.
pub struct LightSample {
    /// World-space direction from the reference point toward the light.
    pub wi: Vector3f,
    pub dist: Float,
    pub li: RGBSpectrum,
    /// Solid-angle pdf of the sample. Delta emitters report 1.
    pub pdf: Float,
    /// Sampled point on the emitter.
    pub p: Vector3f,
    /// Surface normal at the sampled point.
    pub n: Vector3f,
    pub emitter_type: EmitterType,
}

impl LightSample {
    pub fn empty(emitter_type: EmitterType) -> Self {
        Self {
            wi: Vector3f::zeros(),
            dist: 0.0,
            li: RGBSpectrum::default(),
            pdf: 0.0,
            p: Vector3f::zeros(),
            n: Vector3f::zeros(),
            emitter_type,
        }
    }
}

pub trait Emitter: Send + Sync {
    fn emitter_type(&self) -> EmitterType;
    fn set_scene_bounds(&mut self, _bounds: &AABB) {}
    fn sample_li(&self, ref_p: &Vector3f, u: &Vector2f) -> LightSample;
}
