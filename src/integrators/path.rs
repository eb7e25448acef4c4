// Copyright @yucwang 2026

use crate::core::integrator::{Integrator, PathResult};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::common::{
    emitter_hit_mis_weight, russian_roulette, sample_direct_light, PathTraceConfig,
};
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Steady-state unidirectional path tracer: next-event estimation at every
/// bounce, power-heuristic MIS against BSDF sampling, Russian roulette
/// termination. The time-resolved integrators share this skeleton.
pub struct PathIntegrator {
    config: PathTraceConfig,
    samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(config: PathTraceConfig, samples_per_pixel: u32) -> Self {
        Self { config, samples_per_pixel }
    }

    pub fn config(&self) -> &PathTraceConfig {
        &self.config
    }
}

impl Integrator for PathIntegrator {
    fn trace_path(&self, scene: &Scene, mut ray: Ray3f, rng: &mut LcgRng) -> PathResult {
        let cfg = &self.config;
        let mut emission_weight: Float = 1.0;
        let mut throughput = RGBSpectrum::splat(1.0);
        let mut result = RGBSpectrum::default();

        let mut current = scene.ray_intersection(&ray);

        let mut depth: u32 = 1;
        loop {
            // Emission of the current hit, MIS-weighted against the
            // next-event pass of the previous bounce.
            let hit = match &current {
                Some(hit) => {
                    result += hit.le() * throughput * emission_weight;
                    hit.clone()
                }
                None => break,
            };

            // An emitter hit always ends the path; so does the depth cap.
            if depth >= cfg.max_depth || hit.le().sum() > 0.0 {
                break;
            }

            if depth >= cfg.rr_begin_depth && !russian_roulette(&mut throughput, rng) {
                break;
            }

            if cfg.enable_nee {
                if let Some(direct) =
                    sample_direct_light(scene, &hit, cfg.scene_epsilon, ray.time, rng)
                {
                    result += direct.radiance * throughput;
                }
            }

            // BSDF sampling.
            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };
            let n = hit.sh_normal();
            let (tangent, bitangent) = build_tangent_frame(&n);
            let wi_local = world_to_local(&hit.wi(), &tangent, &bitangent, &n);
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let bs = material.sample(&wi_local, &u);
            if bs.pdf <= 0.0 {
                break;
            }
            throughput *= bs.weight;
            if throughput.is_black() {
                break;
            }

            let wo_world = local_to_world(&bs.wo, &tangent, &bitangent, &n);
            ray = Ray3f::new(hit.p(), wo_world, Some(cfg.scene_epsilon), None)
                .with_time(ray.time);

            current = scene.ray_intersection(&ray);
            if let Some(next) = &current {
                if cfg.enable_nee {
                    emission_weight =
                        emitter_hit_mis_weight(scene, next, &ray.origin(), bs.pdf);
                }
            }

            depth += 1;
        }

        PathResult {
            radiance: result,
            depth,
            is_valid: current.is_some(),
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
