//! Hero banner: shaded four-wing fighter with glowing engines, orbited by the camera.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::Rng;

use super::{scatter, spin, Effect};
use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{cuboid, cylinder, sphere, Geometry, SphereSpec};
use crate::material::Material;
use crate::scene::{Light, MaterialId, NodeId, Scene, Transform};

pub const STAR_COUNT: usize = 1000;
pub const STAR_HALF_EXTENT: f32 = 1000.0;
pub const ORBIT_RADIUS: f32 = 8.0;

const ENGINE_GLOW: u32 = 0xff6b35;
const ENGINES: [[f32; 3]; 4] = [
    [-1.8, 1.2, 0.5],
    [-1.8, -1.2, 0.5],
    [-1.8, 1.2, -0.5],
    [-1.8, -1.2, -0.5],
];

pub struct Flagship {
    scene: Scene,
    stars: NodeId,
    ship: NodeId,
    glows: Vec<MaterialId>,
}

impl Flagship {
    pub fn assemble<G: Rng>(rng: &mut G) -> Result<Self> {
        let mut scene = Scene::new();

        let cloud = scene.add_geometry(Geometry::points(scatter(rng, STAR_COUNT, [STAR_HALF_EXTENT; 3])));
        let star_mat = scene.add_material(Material::points(Color::hex(ENGINE_GLOW), 2.0).opacity(0.6));
        let stars = scene.add_visual(cloud, star_mat, Transform::default());

        let ship = scene.add_group(Transform::default());

        let body = scene.add_geometry(cylinder(0.3, 0.5, 4.0, 8));
        let body_mat = scene.add_material(Material::phong(Color::hex(0xcccccc), 100.0));
        scene.add_child_visual(ship, body, body_mat, Transform::default().rotated(0.0, 0.0, FRAC_PI_2))?;

        let wing = scene.add_geometry(cuboid(3.0, 0.2, 0.8));
        let wing_mat = scene.add_material(Material::phong(Color::hex(0xaaaaaa), 80.0));
        for (y, z) in [(1.2, 0.5), (-1.2, 0.5), (1.2, -0.5), (-1.2, -0.5)] {
            scene.add_child_visual(ship, wing, wing_mat, Transform::at(0.0, y, z))?;
        }

        let engine = scene.add_geometry(cylinder(0.15, 0.2, 0.6, 8));
        let engine_mat = scene.add_material(Material::phong(Color::hex(0x666666), 120.0));
        let glow = scene.add_geometry(sphere(SphereSpec::full(0.1, 8, 8)));
        let mut glows = Vec::with_capacity(ENGINES.len());
        for [x, y, z] in ENGINES {
            let t = Transform::at(x, y, z).rotated(0.0, 0.0, FRAC_PI_2);
            scene.add_child_visual(ship, engine, engine_mat, t)?;

            let glow_mat = scene.add_material(Material::basic(Color::hex(ENGINE_GLOW)).opacity(0.8));
            scene.add_child_visual(ship, glow, glow_mat, Transform::at(x - 0.4, y, z))?;
            glows.push(glow_mat);
        }

        let cockpit = scene.add_geometry(sphere(SphereSpec::dome(0.4, 8, 8)));
        let cockpit_mat = scene.add_material(Material::phong(Color::hex(0x4444ff), 150.0).opacity(0.7));
        scene.add_child_visual(ship, cockpit, cockpit_mat, Transform::at(1.5, 0.0, 0.3))?;

        scene.add_light(Light::ambient(Color::hex(0x404040), 0.4));
        scene.add_light(Light::directional(Color::hex(ENGINE_GLOW), 1.0, Vec3::new(10.0, 10.0, 5.0)));
        scene.add_light(Light::point(Color::WHITE, 0.8, 100.0, Vec3::new(-5.0, 5.0, 5.0)));

        Ok(Self {
            scene,
            stars,
            ship,
            glows,
        })
    }

    pub fn ship(&self) -> NodeId {
        self.ship
    }

    pub fn glow_materials(&self) -> &[MaterialId] {
        &self.glows
    }
}

impl Effect for Flagship {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn place_camera(&self, camera: &mut PerspectiveCamera) {
        camera.set_position(8.0, 3.0, 5.0);
        camera.look_at(0.0, 0.0, 0.0);
    }

    fn animate(&mut self, time: f64, camera: &mut PerspectiveCamera) {
        let stars = &mut self.scene[self.stars].transform;
        stars.rotation.x = spin(time, 0.0002);
        stars.rotation.y = spin(time, 0.0003);

        let ship = &mut self.scene[self.ship].transform;
        ship.rotation.y = spin(time, 0.003);
        ship.position.y = (time * 0.5).sin() as f32 * 0.3;
        ship.position.x = (time * 0.3).cos() as f32 * 0.2;

        let glow = 0.6 + (time * 8.0).sin() as f32 * 0.3;
        for &m in &self.glows {
            self.scene[m].opacity = glow;
        }

        camera.position.x = (time * 0.1).cos() as f32 * ORBIT_RADIUS;
        camera.position.z = (time * 0.1).sin() as f32 * ORBIT_RADIUS;
        camera.look_at(0.0, 0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn camera_orbits_at_fixed_radius() {
        let mut f = Flagship::assemble(&mut SmallRng::seed_from_u64(9)).unwrap();
        let mut cam = PerspectiveCamera::standard(1.0);
        f.place_camera(&mut cam);
        for i in 0..200 {
            f.animate(i as f64 * 0.37, &mut cam);
            let r = (cam.position.x.powi(2) + cam.position.z.powi(2)).sqrt();
            assert!((r - ORBIT_RADIUS).abs() < 1e-4);
            assert_eq!(cam.position.y, 3.0);
        }
    }

    #[test]
    fn all_engine_glows_pulse_together() {
        let mut f = Flagship::assemble(&mut SmallRng::seed_from_u64(9)).unwrap();
        f.animate(0.5, &mut PerspectiveCamera::standard(1.0));
        assert_eq!(f.glow_materials().len(), 4);
        let expected = 0.6 + 4.0f32.sin() * 0.3;
        for &m in f.glow_materials() {
            assert!((f.scene()[m].opacity - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn ship_is_lit() {
        let f = Flagship::assemble(&mut SmallRng::seed_from_u64(9)).unwrap();
        // body + 4 wings + 4 engines + 4 glows + cockpit
        assert_eq!(f.scene()[f.ship()].children().len(), 14);
        assert_eq!(f.scene().lights().len(), 3);
    }
}
