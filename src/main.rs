// Copyright @yucwang 2026

use canele::core::histogram::{TransientConfig, TransientHistogram};
use canele::core::integrator::Integrator;
use canele::core::scene::{Scene, SceneObject};
use canele::integrators::common::PathTraceConfig;
use canele::integrators::modulation::ModulationConfig;
use canele::integrators::path::PathIntegrator;
use canele::integrators::tof::TofPathIntegrator;
use canele::integrators::tof_analytic::TofAnalyticPathIntegrator;
use canele::integrators::transient::TransientPathIntegrator;
use canele::io::exr_utils;
use canele::io::histogram_utils;
use canele::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use canele::math::constants::Vector3f;
use canele::math::spectrum::RGBSpectrum;
use canele::renderers::simple::{Renderer, SimpleRenderer};
use canele::sensors::perspective::PerspectiveCamera;
use canele::shapes::rectangle::Rectangle;
use canele::shapes::sphere::Sphere;

use std::env;
use std::sync::Arc;

fn diffuse(albedo: RGBSpectrum) -> Arc<LambertianDiffuseBSDF> {
    Arc::new(LambertianDiffuseBSDF::new(albedo))
}

/// Cornell-style demo box with a spherical area light and one sphere
/// translating toward the camera over the exposure.
fn build_demo_scene() -> Scene {
    let mut scene = Scene::new();

    let white = RGBSpectrum::splat(0.75);
    let red = RGBSpectrum::new(0.75, 0.2, 0.2);
    let green = RGBSpectrum::new(0.2, 0.75, 0.2);

    // Floor, ceiling, back wall, side walls; the box spans [-2, 2]^2 in
    // x/y with the back wall at z = 4.
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(Vector3f::new(-2.0, -2.0, 0.0),
                                Vector3f::new(4.0, 0.0, 0.0),
                                Vector3f::new(0.0, 0.0, 4.0))),
        diffuse(white),
    ).with_name(String::from("floor")));
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(Vector3f::new(-2.0, 2.0, 0.0),
                                Vector3f::new(0.0, 0.0, 4.0),
                                Vector3f::new(4.0, 0.0, 0.0))),
        diffuse(white),
    ).with_name(String::from("ceiling")));
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(Vector3f::new(-2.0, -2.0, 4.0),
                                Vector3f::new(0.0, 4.0, 0.0),
                                Vector3f::new(4.0, 0.0, 0.0))),
        diffuse(white),
    ).with_name(String::from("back")));
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(Vector3f::new(-2.0, -2.0, 0.0),
                                Vector3f::new(0.0, 0.0, 4.0),
                                Vector3f::new(0.0, 4.0, 0.0))),
        diffuse(red),
    ).with_name(String::from("left")));
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(Vector3f::new(2.0, -2.0, 0.0),
                                Vector3f::new(0.0, 4.0, 0.0),
                                Vector3f::new(0.0, 0.0, 4.0))),
        diffuse(green),
    ).with_name(String::from("right")));

    scene.add_object(SceneObject::with_emission(
        Arc::new(Sphere::new(Vector3f::new(0.0, 1.6, 2.0), 0.3)),
        diffuse(RGBSpectrum::splat(0.0)),
        RGBSpectrum::splat(12.0),
    ).with_name(String::from("light")));

    scene.add_object(SceneObject::new(
        Arc::new(Sphere::new(Vector3f::new(-0.7, -1.4, 2.6), 0.6)),
        diffuse(white),
    ).with_name(String::from("still_sphere")));
    scene.add_object(SceneObject::new(
        Arc::new(Sphere::new(Vector3f::new(0.9, -1.5, 2.0), 0.5)),
        diffuse(RGBSpectrum::new(0.6, 0.6, 0.8)),
    ).with_velocity(Vector3f::new(0.0, 0.0, -0.2))
        .with_name(String::from("moving_sphere")));

    scene.build();
    scene
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.exr> [--integrator path|transient|tof|tof-analytic] \
                   [--spp N] [--max-depth N] [--seed N] [--histogram out.csv]", args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut integrator_name = String::from("path");
    let mut spp: u32 = 64;
    let mut max_depth: u32 = 8;
    let mut seed: u64 = 0;
    let mut histogram_path = String::from("transient.csv");

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--integrator" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    integrator_name = v.clone();
                }
            }
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(spp);
            }
            "--max-depth" => {
                i += 1;
                max_depth = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(max_depth);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            "--histogram" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    histogram_path = v.clone();
                }
            }
            _ => {}
        }
        i += 1;
    }

    let scene = build_demo_scene();
    let mut camera = PerspectiveCamera::new(
        Vector3f::new(0.0, 0.0, -3.5),
        Vector3f::new(0.0, 0.0, 2.0),
        Vector3f::new(0.0, 1.0, 0.0),
        std::f32::consts::FRAC_PI_4,
        512, 512,
        0.0, std::f32::MAX,
    );

    let config = PathTraceConfig { max_depth, ..Default::default() };
    let modulation = ModulationConfig::default();

    let mut histogram: Option<Arc<TransientHistogram>> = None;
    let integrator: Box<dyn Integrator> = match integrator_name.as_str() {
        "transient" => {
            let hist = Arc::new(TransientHistogram::new(
                max_depth as usize, TransientConfig::default()));
            histogram = Some(hist.clone());
            Box::new(TransientPathIntegrator::new(config, hist, spp))
        }
        "tof" => Box::new(TofPathIntegrator::new(config, modulation, spp)),
        "tof-analytic" => Box::new(TofAnalyticPathIntegrator::new(config, modulation, spp)),
        _ => Box::new(PathIntegrator::new(config, spp)),
    };

    let renderer = SimpleRenderer::new(integrator, seed);
    let image = renderer.render(&scene, &mut camera);
    if let Err(e) = exr_utils::write_exr_to_file(
        &image.raw_copy(), image.width(), image.height(), output_path) {
        log::error!("failed to write {}: {}", output_path, e);
        std::process::exit(1);
    }

    // The integrator inside the renderer holds the other histogram
    // reference; release it before unwrapping.
    drop(renderer);
    if let Some(hist) = histogram {
        let total_samples = (image.width() * image.height()) as f32 * spp as f32;
        let mut hist = match Arc::try_unwrap(hist) {
            Ok(hist) => hist,
            Err(_) => {
                log::error!("histogram still shared after render");
                std::process::exit(1);
            }
        };
        hist.normalize(total_samples);
        if let Err(e) = histogram_utils::write_histogram_csv(&hist, &histogram_path) {
            log::error!("failed to write {}: {}", histogram_path, e);
            std::process::exit(1);
        }
    }
}
