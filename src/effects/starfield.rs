//! Page background stars: a dense static cloud plus a smaller, faster drifting one.

use rand::Rng;

use super::{scatter, spin, Effect};
use crate::camera::PerspectiveCamera;
use crate::color::{Color, Theme};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::{NodeId, Scene, Transform};

pub const STAR_COUNT: usize = 2000;
pub const STAR_HALF_EXTENT: f32 = 1000.0;
pub const DRIFT_COUNT: usize = 500;
pub const DRIFT_HALF_EXTENT: f32 = 500.0;

pub struct Starfield {
    scene: Scene,
    stars: NodeId,
    drifting: NodeId,
}

impl Starfield {
    pub fn assemble<G: Rng>(theme: Theme, rng: &mut G) -> Self {
        let mut scene = Scene::new();

        let cloud = scene.add_geometry(Geometry::points(scatter(rng, STAR_COUNT, [STAR_HALF_EXTENT; 3])));
        let star_mat = scene.add_material(Material::points(Color::hex(theme.pick(0x64748b, 0xf8fafc)), 2.0).opacity(0.8));
        let stars = scene.add_visual(cloud, star_mat, Transform::default());

        let drift = scene.add_geometry(Geometry::points(scatter(rng, DRIFT_COUNT, [DRIFT_HALF_EXTENT; 3])));
        let drift_mat = scene.add_material(Material::points(Color::hex(theme.pick(0x0ea5e9, 0x38bdf8)), 1.0).opacity(0.6));
        let drifting = scene.add_visual(drift, drift_mat, Transform::default());

        Self { scene, stars, drifting }
    }

    pub fn stars(&self) -> NodeId {
        self.stars
    }

    pub fn drifting(&self) -> NodeId {
        self.drifting
    }
}

impl Effect for Starfield {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn place_camera(&self, camera: &mut PerspectiveCamera) {
        camera.set_position(0.0, 0.0, 5.0);
        camera.look_at(0.0, 0.0, 0.0);
    }

    fn animate(&mut self, time: f64, _camera: &mut PerspectiveCamera) {
        let stars = &mut self.scene[self.stars].transform;
        stars.rotation.x = spin(time, 0.0005);
        stars.rotation.y = spin(time, 0.0005);

        let drifting = &mut self.scene[self.drifting].transform;
        drifting.rotation.x = spin(time, 0.001);
        drifting.rotation.y = spin(time, 0.002);
    }
}
