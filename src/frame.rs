//! Backend independent frame assembly.
//!
//! A [`Frame`] is the flattened, sorted list of what one render call draws.
//! The WebGL backend consumes it directly; [`HeadlessRenderer`] keeps the
//! last one around so native code can inspect what would have been drawn.

use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::geometry::Topology;
use crate::scene::{GeometryId, LightKind, MaterialId, NodeId, NodeKind, Scene};

/// Something that can turn a scene into pixels on a surface.
pub trait Renderer {
    /// Resizes the output buffer in pixels.
    fn set_size(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
    /// Alpha of the clear color; 0 lets the page show through.
    fn clear_alpha(&self) -> f32;
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Wireframe,
    Lines,
    Points,
}

#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub mode: DrawMode,
    pub world: Mat4,
    /// Distance from the camera, used to order blended items.
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameLight {
    /// Direction the light travels, normalised.
    Directional { direction: Vec3, color: Vec3 },
    Point { position: Vec3, color: Vec3, distance: f32 },
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub view_projection: Mat4,
    pub camera_position: Vec3,
    pub ambient: Vec3,
    pub lights: Vec<FrameLight>,
    pub opaque: Vec<DrawItem>,
    /// Back to front.
    pub blended: Vec<DrawItem>,
}

impl Frame {
    pub fn build(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let eye = camera.position;
        let mut opaque = Vec::new();
        let mut blended = Vec::new();

        scene.walk(|id, node, world| {
            let NodeKind::Visual { geometry, material } = node.kind else {
                return;
            };
            let mat = &scene[material];
            let mode = match scene.geometry(geometry).topology {
                Topology::Points => DrawMode::Points,
                Topology::Lines => DrawMode::Lines,
                Topology::Triangles if mat.wireframe => DrawMode::Wireframe,
                Topology::Triangles => DrawMode::Triangles,
            };
            let item = DrawItem {
                node: id,
                geometry,
                material,
                mode,
                world,
                depth: world.transform_point3(Vec3::ZERO).distance(eye),
            };
            if mat.is_blended() {
                blended.push(item);
            } else {
                opaque.push(item);
            }
        });
        blended.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let mut ambient = Vec3::ZERO;
        let mut lights = Vec::new();
        for l in scene.lights() {
            let color = Vec3::from(l.color.to_array()) * l.intensity;
            match l.kind {
                LightKind::Ambient => ambient += color,
                LightKind::Directional => lights.push(FrameLight::Directional {
                    direction: (-l.position).normalize_or_zero(),
                    color,
                }),
                LightKind::Point { distance } => lights.push(FrameLight::Point {
                    position: l.position,
                    color,
                    distance,
                }),
            }
        }

        Self {
            view_projection: camera.view_projection(),
            camera_position: eye,
            ambient,
            lights,
            opaque,
            blended,
        }
    }

    pub fn item_count(&self) -> usize {
        self.opaque.len() + self.blended.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &DrawItem> {
        self.opaque.iter().chain(self.blended.iter())
    }
}

/// Renderer with no output surface; records frames instead of drawing them.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    frames: u64,
    last: Option<Frame>,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_alpha(&self) -> f32 {
        0.0
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.frames += 1;
        self.last = Some(Frame::build(scene, camera));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::{cuboid, Geometry};
    use crate::material::Material;
    use crate::scene::{Light, Transform};

    #[test]
    fn splits_and_orders_by_blending() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(cuboid(1.0, 1.0, 1.0));
        let solid = scene.add_material(Material::phong(Color::WHITE, 30.0));
        let glass = scene.add_material(Material::basic(Color::WHITE).opacity(0.5).wireframe());
        scene.add_visual(cube, solid, Transform::default());
        let near = scene.add_visual(cube, glass, Transform::at(0.0, 0.0, 4.0));
        let far = scene.add_visual(cube, glass, Transform::at(0.0, 0.0, -4.0));
        scene.add_light(Light::ambient(Color::WHITE, 0.5));
        scene.add_light(Light::directional(Color::WHITE, 1.0, Vec3::new(0.0, 10.0, 0.0)));

        let mut cam = PerspectiveCamera::standard(1.0);
        cam.set_position(0.0, 0.0, 10.0);
        cam.look_at(0.0, 0.0, 0.0);
        let frame = Frame::build(&scene, &cam);

        assert_eq!(frame.opaque.len(), 1);
        assert_eq!(frame.opaque[0].mode, DrawMode::Triangles);
        let order: Vec<_> = frame.blended.iter().map(|d| d.node).collect();
        assert_eq!(order, vec![far, near]);
        assert_eq!(frame.blended[0].mode, DrawMode::Wireframe);
        assert_eq!(frame.ambient, Vec3::splat(0.5));
        assert_eq!(
            frame.lights,
            vec![FrameLight::Directional {
                direction: Vec3::NEG_Y,
                color: Vec3::ONE
            }]
        );
    }

    #[test]
    fn topology_selects_mode() {
        let mut scene = Scene::new();
        let pts = scene.add_geometry(Geometry::points(vec![[0.0; 3]; 4]));
        let m = scene.add_material(Material::points(Color::WHITE, 2.0));
        scene.add_visual(pts, m, Transform::default());
        let frame = Frame::build(&scene, &PerspectiveCamera::standard(1.0));
        assert_eq!(frame.opaque[0].mode, DrawMode::Points);
    }

    #[test]
    fn headless_counts_frames() {
        let scene = Scene::new();
        let cam = PerspectiveCamera::standard(1.0);
        let mut r = HeadlessRenderer::new(10, 10);
        r.render(&scene, &cam);
        r.render(&scene, &cam);
        assert_eq!(r.frames_rendered(), 2);
        assert_eq!(r.last_frame().map(Frame::item_count), Some(0));
    }
}
