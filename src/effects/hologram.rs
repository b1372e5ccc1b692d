//! Wireframe star cruiser hologram floating over a slowly turning grid.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{spin, Effect};
use crate::camera::PerspectiveCamera;
use crate::color::{Color, Theme};
use crate::error::Result;
use crate::geometry::{cuboid, cylinder, grid};
use crate::material::Material;
use crate::scene::{Light, MaterialId, NodeId, Scene, Transform};

pub struct Hologram {
    scene: Scene,
    cruiser: NodeId,
    grid: NodeId,
    hologram: MaterialId,
}

impl Hologram {
    pub fn assemble(theme: Theme) -> Result<Self> {
        let tint = Color::hex(theme.pick(0x0ea5e9, 0x38bdf8));
        let glow = Color::hex(theme.pick(0x10b981, 0x34d399));

        let mut scene = Scene::new();
        let hologram = scene.add_material(Material::basic(tint).opacity(0.7).wireframe());
        let cruiser = scene.add_group(Transform::default());

        let hull = scene.add_geometry(cylinder(0.3, 0.8, 4.0, 8));
        scene.add_child_visual(cruiser, hull, hologram, Transform::default().rotated(0.0, 0.0, FRAC_PI_2))?;

        let wing = scene.add_geometry(cuboid(3.0, 0.2, 1.0));
        for y in [1.0, -1.0] {
            scene.add_child_visual(cruiser, wing, hologram, Transform::at(0.0, y, 0.0))?;
        }

        let bridge = scene.add_geometry(cuboid(0.5, 0.5, 0.8));
        scene.add_child_visual(cruiser, bridge, hologram, Transform::at(1.5, 0.0, 0.5))?;

        let engine = scene.add_geometry(cylinder(0.2, 0.3, 0.8, 6));
        for y in [0.8, -0.8] {
            let t = Transform::at(-1.8, y, 0.0).rotated(0.0, 0.0, FRAC_PI_2);
            scene.add_child_visual(cruiser, engine, hologram, t)?;
        }

        let grid_geo = scene.add_geometry(grid(10.0, 20));
        let grid_mat = scene.add_material(Material::line(tint).opacity(0.2));
        let grid = scene.add_visual(grid_geo, grid_mat, Transform::at(0.0, -2.0, 0.0));

        scene.add_light(Light::ambient(tint, 0.5));
        scene.add_light(Light::point(glow, 1.0, 100.0, Vec3::new(5.0, 5.0, 5.0)));

        Ok(Self {
            scene,
            cruiser,
            grid,
            hologram,
        })
    }

    pub fn cruiser(&self) -> NodeId {
        self.cruiser
    }

    pub fn hologram_material(&self) -> MaterialId {
        self.hologram
    }
}

impl Effect for Hologram {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn place_camera(&self, camera: &mut PerspectiveCamera) {
        camera.set_position(5.0, 2.0, 5.0);
        camera.look_at(0.0, 0.0, 0.0);
    }

    fn animate(&mut self, time: f64, _camera: &mut PerspectiveCamera) {
        let cruiser = &mut self.scene[self.cruiser].transform;
        cruiser.rotation.y = spin(time, 0.005);
        cruiser.rotation.x = time.sin() as f32 * 0.1;
        cruiser.position.y = (time * 0.5).sin() as f32 * 0.3;

        self.scene[self.hologram].opacity = 0.5 + (time * 2.0).sin() as f32 * 0.2;
        self.scene[self.grid].transform.rotation.y = spin(time, 0.002);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cruiser_parts_share_one_material() {
        let h = Hologram::assemble(Theme::Dark).unwrap();
        let parts = h.scene()[h.cruiser()].children();
        assert_eq!(parts.len(), 6);
        assert_eq!(h.scene()[h.hologram_material()].color, Color::hex(0x38bdf8));
    }

    #[test]
    fn pulse_stays_in_range() {
        let mut h = Hologram::assemble(Theme::Light).unwrap();
        let mut cam = PerspectiveCamera::standard(1.0);
        for i in 0..700 {
            h.animate(i as f64 * 0.01, &mut cam);
            let o = h.scene()[h.hologram_material()].opacity;
            assert!((0.3 - 1e-6..=0.7 + 1e-6).contains(&o));
        }
    }
}
