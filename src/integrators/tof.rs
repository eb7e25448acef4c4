// Copyright @yucwang 2026

use crate::core::integrator::{Integrator, PathResult};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::common::{
    emitter_hit_mis_weight, russian_roulette, sample_direct_light, PathTraceConfig,
};
use crate::integrators::modulation::ModulationConfig;
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Amplitude-modulated time-of-flight path tracer. Each path samples one
/// acquisition instant uniformly in the exposure window, traces the whole
/// path at that instant, and scales every next-event contribution by the
/// correlation of the illumination and sensor reference waves at the
/// path's total optical length. Averaging over many paths Monte Carlo
/// integrates the exposure.
pub struct TofPathIntegrator {
    config: PathTraceConfig,
    modulation: ModulationConfig,
    samples_per_pixel: u32,
}

impl TofPathIntegrator {
    pub fn new(config: PathTraceConfig, modulation: ModulationConfig,
               samples_per_pixel: u32) -> Self {
        Self { config, modulation, samples_per_pixel }
    }

    pub fn modulation(&self) -> &ModulationConfig {
        &self.modulation
    }
}

impl Integrator for TofPathIntegrator {
    fn trace_path(&self, scene: &Scene, ray: Ray3f, rng: &mut LcgRng) -> PathResult {
        let cfg = &self.config;
        // One correlation instant per path; the scene is frozen at it.
        let t_c = rng.next_f32() * self.modulation.exposure_time;
        let mut ray = ray.with_time(t_c);

        let mut emission_weight: Float = 1.0;
        let mut throughput = RGBSpectrum::splat(1.0);
        let mut result = RGBSpectrum::default();
        let mut path_length: Float = 0.0;

        let mut current = scene.ray_intersection(&ray);
        if let Some(hit) = &current {
            path_length += hit.t();
        }

        let mut depth: u32 = 1;
        loop {
            let hit = match &current {
                Some(hit) => {
                    result += hit.le() * throughput * emission_weight;
                    hit.clone()
                }
                None => break,
            };

            if depth >= cfg.max_depth || hit.le().sum() > 0.0 {
                break;
            }

            if depth >= cfg.rr_begin_depth && !russian_roulette(&mut throughput, rng) {
                break;
            }

            if cfg.enable_nee {
                if let Some(direct) =
                    sample_direct_light(scene, &hit, cfg.scene_epsilon, t_c, rng)
                {
                    // The correlation weight depends on the full optical
                    // length through the sampled light vertex.
                    let weight = self.modulation
                        .eval_modulation_weight(t_c, path_length + direct.light_dist);
                    result += direct.radiance * throughput * weight;
                }
            }

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
                .with_time(t_c);

            current = scene.ray_intersection(&ray);
            if let Some(next) = &current {
                path_length += next.t();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneObject;
    use crate::integrators::path::PathIntegrator;
    use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
    use crate::math::constants::Vector3f;
    use crate::shapes::sphere::Sphere;
    use std::sync::Arc;

    fn sphere_light_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::with_emission(
            Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, 6.0), 1.0)),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
            RGBSpectrum::new(1.0, 1.0, 1.0),
        ));
        scene.build();
        scene
    }

    #[test]
    fn test_tof_direct_emitter_hit_unmodulated() {
        // Directly seen emitters are not correlation-weighted, so a direct
        // hit matches the steady-state path tracer.
        let scene = sphere_light_scene();
        let tof = TofPathIntegrator::new(
            PathTraceConfig::default(), ModulationConfig::default(), 1);
        let path = PathIntegrator::new(PathTraceConfig::default(), 1);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let mut rng_a = LcgRng::new(42);
        let mut rng_b = LcgRng::new(42);
        let a = tof.trace_path(&scene, ray.clone(), &mut rng_a);
        let b = path.trace_path(&scene, ray, &mut rng_b);

        assert!(a.is_valid);
        assert_eq!(a.depth, b.depth);
        assert!((a.radiance[0] - b.radiance[0]).abs() < 1e-5);
    }

    #[test]
    fn test_tof_nee_correlation_weight() {
        // Diffuse floor under a point light with zero frequency difference:
        // the path geometry is deterministic, so the modulated next-event
        // result is exactly the steady-state one scaled by
        // 0.25 * cos(phase(path length)).
        use crate::emitters::point::PointEmitter;
        use crate::shapes::rectangle::Rectangle;

        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(Rectangle::new(Vector3f::new(-5.0, -5.0, 0.0),
                                    Vector3f::new(10.0, 0.0, 0.0),
                                    Vector3f::new(0.0, 10.0, 0.0))),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.7))),
        ));
        scene.add_emitter(Box::new(PointEmitter::new(Vector3f::new(0.0, 0.0, 2.0),
                                                     RGBSpectrum::splat(4.0))));
        scene.build();

        let config = PathTraceConfig { max_depth: 2, ..Default::default() };
        let modulation = ModulationConfig::default();
        let tof = TofPathIntegrator::new(config, modulation, 1);
        let path = PathIntegrator::new(config, 1);

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let mut rng_a = LcgRng::new(17);
        let a = tof.trace_path(&scene, ray.clone(), &mut rng_a);
        let mut rng_b = LcgRng::new(23);
        let b = path.trace_path(&scene, ray, &mut rng_b);

        // Camera segment of 3 plus light segment of 2.
        let weight = modulation.eval_modulation_weight(0.0, 5.0);
        assert!(b.radiance[0] > 0.0);
        assert!((a.radiance[0] - b.radiance[0] * weight).abs() < 1e-5);
    }

    #[test]
    fn test_tof_miss() {
        let scene = sphere_light_scene();
        let tof = TofPathIntegrator::new(
            PathTraceConfig::default(), ModulationConfig::default(), 1);
        let mut rng = LcgRng::new(1);

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let result = tof.trace_path(&scene, ray, &mut rng);
        assert!(!result.is_valid);
        assert!(result.radiance.is_black());
    }
}
