// Copyright @yucwang 2026

use crate::core::interaction::SurfaceInteraction;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, world_to_local};
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Shared knobs of the path-tracing skeleton. Fixed before a render pass
/// and never re-read mid-pass.
#[derive(Debug, Clone, Copy)]
pub struct PathTraceConfig {
    pub max_depth: u32,
    pub rr_begin_depth: u32,
    pub scene_epsilon: Float,
    pub enable_nee: bool,
}

impl Default for PathTraceConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            rr_begin_depth: 4,
            scene_epsilon: 1e-3,
            enable_nee: true,
        }
    }
}

/// Power heuristic over two sampling strategies.
pub fn power_heuristic(f: Float, g: Float) -> Float {
    let f2 = f * f;
    f2 / (f2 + g * g)
}

/// Russian roulette with the continuation probability clamped to 0.05.
/// Returns false when the path should terminate; otherwise the throughput
/// has been divided by the continuation probability, which keeps the
/// estimator unbiased.
pub fn russian_roulette(throughput: &mut RGBSpectrum, rng: &mut LcgRng) -> bool {
    let pcont = throughput.max_channel().max(0.05);
    if rng.next_f32() >= pcont {
        return false;
    }
    *throughput /= pcont;
    true
}

/// One next-event-estimation sample, MIS-weighted but not yet multiplied by
/// the path throughput. The sampled-light geometry is carried along for the
/// variant-specific post-processing (histogram binning, modulation).
pub struct DirectLightSample {
    pub radiance: RGBSpectrum,
    pub light_dist: Float,
    pub light_p: Vector3f,
    pub light_n: Vector3f,
    pub wi: Vector3f,
    pub is_delta: bool,
}

/// Emitter-sampling half of the MIS pair: uniformly pick one emitter,
/// importance-sample it, test visibility with an epsilon-padded shadow
/// segment, and weight the unoccluded contribution with the power
/// heuristic against BSDF sampling (delta emitters skip the heuristic).
/// `None` covers every zero-contribution case: no emitters, back-facing
/// sample, black radiance, degenerate pdf, or occlusion.
pub fn sample_direct_light(scene: &Scene, interaction: &SurfaceInteraction,
                           scene_epsilon: Float, time: Float,
                           rng: &mut LcgRng) -> Option<DirectLightSample> {
    let light_sample = scene.sample_emitter(&interaction.p(), rng)?;
    let is_delta = light_sample.emitter_type.is_delta();

    let n = interaction.sh_normal();
    if !is_delta && light_sample.wi.dot(&n) <= 0.0 {
        return None;
    }
    if light_sample.li.is_black() || light_sample.pdf <= 0.0 {
        return None;
    }

    let shadow_ray = Ray3f::new(interaction.p(), light_sample.wi,
                                Some(scene_epsilon),
                                Some(light_sample.dist - scene_epsilon))
        .with_time(time);
    if scene.ray_intersection_t(&shadow_ray) {
        return None;
    }

    let material = interaction.material()?;
    let (tangent, bitangent) = build_tangent_frame(&n);
    let wi_local = world_to_local(&interaction.wi(), &tangent, &bitangent, &n);
    let wo_local = world_to_local(&light_sample.wi, &tangent, &bitangent, &n);

    let f = material.eval(&wi_local, &wo_local);
    if f.is_black() {
        return None;
    }

    let radiance = if is_delta {
        // No competing BSDF strategy for a zero-measure direction.
        light_sample.li * f / light_sample.pdf
    } else {
        let scatter_pdf = material.pdf(&wi_local, &wo_local);
        let weight = power_heuristic(light_sample.pdf, scatter_pdf);
        light_sample.li * f * (weight / light_sample.pdf)
    };

    Some(DirectLightSample {
        radiance,
        light_dist: light_sample.dist,
        light_p: light_sample.p,
        light_n: light_sample.n,
        wi: light_sample.wi,
        is_delta,
    })
}

/// MIS weight for an emitter reached by BSDF sampling, balancing against
/// the probability that next-event estimation would have produced the same
/// direction. Returns 1 when the hit is not an emitter or the light pdf is
/// degenerate.
pub fn emitter_hit_mis_weight(scene: &Scene, interaction: &SurfaceInteraction,
                              ray_origin: &Vector3f, bsdf_pdf: Float) -> Float {
    if interaction.le().is_black() {
        return 1.0;
    }
    match scene.pdf_light(interaction, ray_origin) {
        Some(light_pdf) => power_heuristic(bsdf_pdf, light_pdf),
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneObject;
    use crate::emitters::point::PointEmitter;
    use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
    use crate::math::constants::PI;
    use crate::shapes::rectangle::Rectangle;
    use std::sync::Arc;

    #[test]
    fn test_power_heuristic_partition_of_unity() {
        let pairs = [(1.0, 1.0), (0.3, 2.5), (10.0, 0.01), (7.0, 7.0)];
        for (x, y) in pairs {
            let sum = power_heuristic(x, y) + power_heuristic(y, x);
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_power_heuristic_degenerate_competitor() {
        assert_eq!(power_heuristic(0.8, 0.0), 1.0);
        assert_eq!(power_heuristic(123.0, 0.0), 1.0);
    }

    #[test]
    fn test_russian_roulette_unbiased() {
        let mut rng = LcgRng::new(9001);
        let trials = 200000;
        let base = RGBSpectrum::splat(0.6);
        let mut accum = 0.0f64;
        for _ in 0..trials {
            let mut throughput = base;
            if russian_roulette(&mut throughput, &mut rng) {
                accum += throughput[0] as f64;
            }
        }
        let mean = accum / trials as f64;
        // E[throughput after] must equal throughput before.
        assert!((mean - 0.6).abs() < 0.01);
    }

    #[test]
    fn test_russian_roulette_low_throughput_clamp() {
        let mut rng = LcgRng::new(3);
        let mut survived = 0u32;
        let trials = 100000;
        for _ in 0..trials {
            let mut throughput = RGBSpectrum::splat(1e-6);
            if russian_roulette(&mut throughput, &mut rng) {
                survived += 1;
            }
        }
        let rate = survived as Float / trials as Float;
        assert!((rate - 0.05).abs() < 0.01);
    }

    fn lit_plane_scene() -> (Scene, SurfaceInteraction) {
        let floor = Rectangle::new(Vector3f::new(-5.0, -5.0, 0.0),
                                   Vector3f::new(10.0, 0.0, 0.0),
                                   Vector3f::new(0.0, 10.0, 0.0));
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(floor),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
        ));
        scene.add_emitter(Box::new(PointEmitter::new(Vector3f::new(0.0, 0.0, 2.0),
                                                     RGBSpectrum::splat(4.0))));
        scene.build();

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 3.0), Vector3f::new(0.0, 0.0, -1.0),
                             None, None);
        let hit = scene.ray_intersection(&ray).expect("expected floor hit");
        (scene, hit)
    }

    #[test]
    fn test_sample_direct_light_point_emitter() {
        let (scene, hit) = lit_plane_scene();
        let mut rng = LcgRng::new(11);
        let direct = sample_direct_light(&scene, &hit, 1e-3, 0.0, &mut rng)
            .expect("light should be visible");

        assert!(direct.is_delta);
        assert!((direct.light_dist - 2.0).abs() < 1e-4);
        // Li = I / d^2 = 1, f = albedo/pi * cos = 0.5/pi, pdf = 1.
        let expected = 0.5 / PI;
        assert!((direct.radiance[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_sample_direct_light_occluded() {
        let (mut scene, hit) = lit_plane_scene();
        // Blocker between the floor and the point light.
        let blocker = Rectangle::new(Vector3f::new(-1.0, -1.0, 1.0),
                                     Vector3f::new(2.0, 0.0, 0.0),
                                     Vector3f::new(0.0, 2.0, 0.0));
        scene.add_object(SceneObject::new(
            Arc::new(blocker),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
        ));
        scene.build();

        let mut rng = LcgRng::new(11);
        assert!(sample_direct_light(&scene, &hit, 1e-3, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_sample_direct_light_no_emitters() {
        let floor = Rectangle::new(Vector3f::new(-5.0, -5.0, 0.0),
                                   Vector3f::new(10.0, 0.0, 0.0),
                                   Vector3f::new(0.0, 10.0, 0.0));
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(floor),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(0.5))),
        ));
        scene.build();

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 3.0), Vector3f::new(0.0, 0.0, -1.0),
                             None, None);
        let hit = scene.ray_intersection(&ray).expect("expected floor hit");
        let mut rng = LcgRng::new(5);
        assert!(sample_direct_light(&scene, &hit, 1e-3, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_default_config() {
        let cfg = PathTraceConfig::default();
        assert_eq!(cfg.max_depth, 8);
        assert_eq!(cfg.rr_begin_depth, 4);
        assert!(cfg.enable_nee);
    }
}
