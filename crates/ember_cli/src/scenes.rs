//! Built-in demo scenes.

use std::sync::Arc;

use ember_renderer::{
    load_image_texture, make_box, Background, BvhNode, Camera, Checker, Color, Dielectric, DiffuseLight,
    HittableList, Lambertian, Material, Metal, NoiseTexture, Quad, RotateY, Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::Rng;

/// A world ready to render, with the camera that frames it.
pub struct Scene {
    pub world: BvhNode,
    /// Camera settings; not yet initialized
    pub camera: Camera,
    pub background: Background,
    /// Width / height, kept when the output width is overridden
    pub aspect_ratio: f32,
}

impl Scene {
    fn new(world: HittableList, camera: Camera, background: Background, aspect_ratio: f32) -> Self {
        Self {
            world: BvhNode::from(world),
            camera,
            background,
            aspect_ratio,
        }
    }
}

pub type SceneBuilder = fn(&mut StdRng) -> Scene;

/// Scene table, selected on the command line by 1-based index.
pub static SCENES: [(&str, SceneBuilder); 7] = [
    ("random spheres", random_spheres),
    ("checkered spheres", checkered_spheres),
    ("earth", earth),
    ("perlin spheres", perlin_spheres),
    ("quads", quads),
    ("simple light", simple_light),
    ("cornell box", cornell_box),
];

/// Look up a scene by its 1-based index.
pub fn find(index: usize) -> Option<(&'static str, SceneBuilder)> {
    index.checked_sub(1).and_then(|i| SCENES.get(i)).copied()
}

fn lambertian(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Color::new(r, g, b)))
}

fn random_color(rng: &mut StdRng, min: f32, max: f32) -> Color {
    Color::new(rng.gen_range(min..max), rng.gen_range(min..max), rng.gen_range(min..max))
}

fn random_spheres(rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let checker = Arc::new(Checker::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::with_texture(checker),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5))));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);

    Scene::new(world, camera, Background::Sky, 16.0 / 9.0)
}

fn checkered_spheres(_rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let checker = Arc::new(Checker::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    for y in [-10.0, 10.0] {
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, y, 0.0),
            10.0,
            Lambertian::with_texture(checker.clone()),
        )));
    }

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Sky, 16.0 / 9.0)
}

fn earth(_rng: &mut StdRng) -> Scene {
    let earth_texture = load_image_texture("earthmap.jpg", Color::new(0.2, 0.4, 0.8));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Lambertian::with_texture(earth_texture),
    )));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Sky, 16.0 / 9.0)
}

fn perlin_world(rng: &mut StdRng) -> HittableList {
    let marble = Arc::new(NoiseTexture::with_seed(4.0, rng.gen()));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::with_texture(marble.clone()),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        Lambertian::with_texture(marble),
    )));
    world
}

fn perlin_spheres(rng: &mut StdRng) -> Scene {
    let world = perlin_world(rng);

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Sky, 16.0 / 9.0)
}

fn quads(_rng: &mut StdRng) -> Scene {
    let left_red = lambertian(1.0, 0.2, 0.2);
    let back_green = lambertian(0.2, 1.0, 0.2);
    let right_blue = lambertian(0.2, 0.2, 1.0);
    let upper_orange = lambertian(1.0, 0.5, 0.0);
    let lower_teal = lambertian(0.2, 0.8, 0.8);

    let mut world = HittableList::new();
    world.add(Box::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let camera = Camera::new()
        .with_aspect_ratio(1.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Sky, 1.0)
}

fn simple_light(rng: &mut StdRng) -> Scene {
    let mut world = perlin_world(rng);

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone())));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    let camera = Camera::new()
        .with_aspect_ratio(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Solid(Color::ZERO), 16.0 / 9.0)
}

fn cornell_box(_rng: &mut StdRng) -> Scene {
    let red = lambertian(0.65, 0.05, 0.05);
    let white = lambertian(0.73, 0.73, 0.73);
    let green = lambertian(0.12, 0.45, 0.15);
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    let tall = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    world.add(Box::new(Translate::new(RotateY::new(tall, 15.0), Vec3::new(265.0, 0.0, 295.0))));

    let short = make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white);
    world.add(Box::new(Translate::new(RotateY::new(short, -18.0), Vec3::new(130.0, 0.0, 65.0))));

    let camera = Camera::new()
        .with_aspect_ratio(1.0, 600)
        .with_quality(200, 50)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0);

    Scene::new(world, camera, Background::Solid(Color::ZERO), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::{Hittable, Interval, Ray};
    use rand::SeedableRng;

    #[test]
    fn test_find() {
        assert!(find(0).is_none());
        assert!(find(8).is_none());
        assert_eq!(find(1).map(|(name, _)| name), Some("random spheres"));
        assert_eq!(find(7).map(|(name, _)| name), Some("cornell box"));
    }

    #[test]
    fn test_every_scene_builds() {
        for (name, build) in SCENES {
            let mut rng = StdRng::seed_from_u64(1);
            let scene = build(&mut rng);
            assert!(!scene.world.is_empty(), "{name} is empty");
            assert!(scene.aspect_ratio > 0.0);
        }
    }

    #[test]
    fn test_cornell_box_is_closed_from_camera() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = cornell_box(&mut rng);
        scene.camera.initialize();

        // Every ray through the opening hits a wall or a box
        for (s, t) in [(0.1, 0.1), (0.5, 0.5), (0.9, 0.2), (0.3, 0.8)] {
            let ray: Ray = scene.camera.ray_at_viewport(s, t);
            assert!(scene.world.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some());
        }
    }
}
