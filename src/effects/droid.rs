//! Easter egg droid: a loaded model that spins and follows the pointer.
//!
//! The model arrives asynchronously. Until [`Droid::attach_model`] is called
//! the scene holds only its light and pointer input is ignored.

use super::{spin, Effect};
use crate::asset::Model;
use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::error::{FxError, Result};
use crate::material::Material;
use crate::scene::{Light, NodeId, Scene, Transform};

pub const MODEL_SCALE: f32 = 0.3;
/// World units reached at the surface edges for x and y.
pub const POINTER_REACH: (f32, f32) = (2.5, 1.5);

pub struct Droid {
    scene: Scene,
    model: Option<NodeId>,
}

impl Droid {
    pub fn assemble() -> Self {
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(Color::WHITE, 1.0));
        Self { scene, model: None }
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    /// Adds the loaded model at the origin. The droid holds one model for
    /// its lifetime; a second call is rejected and leaves the scene as is.
    pub fn attach_model(&mut self, model: Model) -> Result<NodeId> {
        if self.model.is_some() {
            return Err(FxError::Asset("droid model already attached".into()));
        }
        let root = self.scene.add_group(Transform::default().scaled(MODEL_SCALE));
        for part in model.parts {
            let geo = self.scene.add_geometry(part.geometry);
            let mut material = Material::phong(part.color, 30.0);
            if part.opacity < 1.0 {
                material = material.opacity(part.opacity);
            }
            let mat = self.scene.add_material(material);
            self.scene.add_child_visual(root, geo, mat, Transform::default())?;
        }
        self.model = Some(root);
        Ok(root)
    }

    /// Moves the model under the pointer, given in normalized device coordinates.
    pub fn pointer_moved(&mut self, ndc_x: f32, ndc_y: f32) {
        let Some(model) = self.model else {
            return;
        };
        let t = &mut self.scene[model].transform;
        t.position.x = ndc_x * POINTER_REACH.0;
        t.position.y = ndc_y * POINTER_REACH.1;
    }
}

impl Effect for Droid {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn place_camera(&self, camera: &mut PerspectiveCamera) {
        camera.set_position(0.0, 0.0, 5.0);
        camera.look_at(0.0, 0.0, 0.0);
    }

    fn animate(&mut self, time: f64, _camera: &mut PerspectiveCamera) {
        if let Some(model) = self.model {
            self.scene[model].transform.rotation.y = spin(time, 0.01);
        }
    }
}

/// Client pixel coordinates to `-1..1` with y pointing up.
pub fn pointer_ndc(client_x: f64, client_y: f64, width: f64, height: f64) -> (f32, f32) {
    let x = client_x / width * 2.0 - 1.0;
    let y = -(client_y / height) * 2.0 + 1.0;
    (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ModelPart;
    use crate::geometry::cuboid;

    fn model() -> Model {
        Model {
            parts: vec![ModelPart {
                geometry: cuboid(1.0, 1.0, 1.0),
                color: Color::WHITE,
                opacity: 1.0,
            }],
        }
    }

    #[test]
    fn pointer_ignored_until_loaded() {
        let mut d = Droid::assemble();
        d.pointer_moved(1.0, 1.0);
        assert!(d.model().is_none());
        assert_eq!(d.scene().node_count(), 0);
    }

    #[test]
    fn pointer_maps_onto_reach() {
        let mut d = Droid::assemble();
        let root = d.attach_model(model()).unwrap();
        let (x, y) = pointer_ndc(800.0, 0.0, 800.0, 600.0);
        d.pointer_moved(x, y);
        let t = d.scene()[root].transform;
        assert_eq!((t.position.x, t.position.y), (2.5, 1.5));
        assert_eq!(t.scale.x, MODEL_SCALE);
    }

    #[test]
    fn model_loads_once() {
        let mut d = Droid::assemble();
        let first = d.attach_model(model()).unwrap();
        let nodes = d.scene().node_count();
        let geometries = d.scene().geometries().len();

        assert!(matches!(d.attach_model(model()), Err(FxError::Asset(_))));
        assert_eq!(d.model(), Some(first));
        assert_eq!(d.scene().node_count(), nodes);
        assert_eq!(d.scene().geometries().len(), geometries);
        assert!(d.scene()[first].visible);
    }
}
