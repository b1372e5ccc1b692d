//! Hooded figure hologram surrounded by a cloud of pulsing data points.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use super::{scatter, spin, Effect};
use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{cylinder, plane, sphere, Geometry, SphereSpec};
use crate::material::Material;
use crate::scene::{Light, MaterialId, NodeId, Scene, Transform};

pub const DATA_POINT_COUNT: usize = 50;
pub const DATA_HALF_EXTENT: [f32; 3] = [4.0, 3.0, 4.0];
pub const CONNECTION_COUNT: usize = 20;

const RED: u32 = 0xff6b6b;
const EMBER: u32 = 0xee5a24;

#[derive(Clone, Copy, Debug)]
pub struct DataPoint {
    pub node: NodeId,
    pub material: MaterialId,
    pub base: Vec3,
}

pub struct Analytics {
    scene: Scene,
    figure: NodeId,
    cape: NodeId,
    hologram: MaterialId,
    points: Vec<DataPoint>,
    connections: Vec<(usize, usize)>,
}

impl Analytics {
    pub fn assemble<G: Rng>(rng: &mut G) -> Result<Self> {
        let mut scene = Scene::new();
        let hologram = scene.add_material(Material::basic(Color::hex(RED)).opacity(0.8).wireframe());
        let figure = scene.add_group(Transform::default());

        let body = scene.add_geometry(cylinder(0.8, 1.2, 3.0, 8));
        scene.add_child_visual(figure, body, hologram, Transform::default())?;

        let hood = scene.add_geometry(sphere(SphereSpec::dome(1.0, 8, 8)));
        scene.add_child_visual(figure, hood, hologram, Transform::at(0.0, 2.0, 0.0))?;

        let arm = scene.add_geometry(cylinder(0.2, 0.3, 2.0, 6));
        for side in [-1.0f32, 1.0] {
            let t = Transform::at(side, 0.5, 0.0).rotated(0.0, 0.0, -side * PI / 6.0);
            scene.add_child_visual(figure, arm, hologram, t)?;
        }

        let cape_geo = scene.add_geometry(plane(3.0, 4.0));
        let cape_mat = scene.add_material(Material::basic(Color::hex(0x2d2d2d)).opacity(0.6).double_sided());
        let cape = scene.add_child_visual(figure, cape_geo, cape_mat, Transform::at(0.0, 0.0, -0.5))?;

        let dot = scene.add_geometry(sphere(SphereSpec::full(0.05, 4, 4)));
        let points: Vec<DataPoint> = scatter(rng, DATA_POINT_COUNT, DATA_HALF_EXTENT)
            .into_iter()
            .map(|p| {
                let tint = if rng.gen_bool(0.5) { RED } else { EMBER };
                let material = scene.add_material(Material::basic(Color::hex(tint)).opacity(0.8));
                let base = Vec3::from(p);
                let node = scene.add_visual(dot, material, Transform::at(base.x, base.y, base.z));
                DataPoint { node, material, base }
            })
            .collect();

        // Lines capture endpoint positions at assembly and do not follow the points.
        let line_mat = scene.add_material(Material::line(Color::hex(RED)).opacity(0.3));
        let connections: Vec<(usize, usize)> = (0..CONNECTION_COUNT)
            .map(|_| (rng.gen_range(0..points.len()), rng.gen_range(0..points.len())))
            .collect();
        for &(a, b) in &connections {
            let seg = Geometry::segments(&[(points[a].base.to_array(), points[b].base.to_array())]);
            let geo = scene.add_geometry(seg);
            scene.add_visual(geo, line_mat, Transform::default());
        }

        scene.add_light(Light::ambient(Color::hex(RED), 0.3));
        scene.add_light(Light::point(Color::hex(EMBER), 1.0, 100.0, Vec3::new(3.0, 3.0, 3.0)));

        Ok(Self {
            scene,
            figure,
            cape,
            hologram,
            points,
            connections,
        })
    }

    pub fn figure(&self) -> NodeId {
        self.figure
    }

    pub fn data_points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Index pairs into [`data_points`](Self::data_points).
    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }
}

impl Effect for Analytics {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn place_camera(&self, camera: &mut PerspectiveCamera) {
        camera.set_position(4.0, 2.0, 6.0);
        camera.look_at(0.0, 0.0, 0.0);
    }

    fn animate(&mut self, time: f64, _camera: &mut PerspectiveCamera) {
        let figure = &mut self.scene[self.figure].transform;
        figure.rotation.y = spin(time, 0.003);
        figure.position.y = (time * 0.8).sin() as f32 * 0.2;

        let cape = &mut self.scene[self.cape].transform;
        cape.rotation.x = (time * 2.0).sin() as f32 * 0.1;
        cape.rotation.z = (time * 1.5).sin() as f32 * 0.05;

        for (i, p) in self.points.iter().enumerate() {
            let phase = i as f64;
            let t = &mut self.scene[p.node].transform;
            // Closed form of bobbing by sin(time + i) * 0.01 every frame.
            t.position.y = p.base.y + (phase.cos() - (time + phase).cos()) as f32;
            t.rotation.x = spin(time, 0.02);
            t.rotation.y = spin(time, 0.01);
            self.scene[p.material].opacity = 0.5 + (time * 3.0 + phase).sin() as f32 * 0.3;
        }

        self.scene[self.hologram].opacity = 0.6 + (time * 2.0).sin() as f32 * 0.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn declared_counts_and_bounds() {
        let a = Analytics::assemble(&mut SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.data_points().len(), DATA_POINT_COUNT);
        assert_eq!(a.connections().len(), CONNECTION_COUNT);
        for p in a.data_points() {
            for (v, h) in p.base.to_array().iter().zip(DATA_HALF_EXTENT) {
                assert!(v.abs() <= h);
            }
        }
        assert!(a
            .connections()
            .iter()
            .all(|&(x, y)| x < DATA_POINT_COUNT && y < DATA_POINT_COUNT));
    }

    #[test]
    fn every_point_pulses_its_own_material() {
        let mut a = Analytics::assemble(&mut SmallRng::seed_from_u64(2)).unwrap();
        a.animate(1.0, &mut PerspectiveCamera::standard(1.0));
        let first = a.scene()[a.data_points()[0].material].opacity;
        let second = a.scene()[a.data_points()[1].material].opacity;
        assert_ne!(first, second);
        assert!((first - (0.5 + 3.0f32.sin() * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn bobbing_starts_at_base() {
        let mut a = Analytics::assemble(&mut SmallRng::seed_from_u64(3)).unwrap();
        a.animate(0.0, &mut PerspectiveCamera::standard(1.0));
        for p in a.data_points() {
            let y = a.scene()[p.node].transform.position.y;
            assert!((y - p.base.y).abs() < 1e-5);
        }
    }
}
