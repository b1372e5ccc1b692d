//! Scene graph: an arena of nodes, materials, geometries and lights owned by one unit.
//!
//! Nodes form a forest. A node starts detached at the top level and may be
//! attached under exactly one parent; the arena refuses second parents and
//! cycles, so the hierarchy is always a tree.

use std::ops::{Index, IndexMut};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::color::Color;
use crate::error::{FxError, Result};
use crate::geometry::Geometry;
use crate::material::Material;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(u32);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position, Euler XYZ rotation (radians) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    /// Leaf drawable; how it is drawn follows the geometry topology and material.
    Visual {
        geometry: GeometryId,
        material: MaterialId,
    },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Shines from `position` towards the origin.
    Directional,
    /// Falls off to zero at `distance` (0 means no falloff).
    Point { distance: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            position: Vec3::ZERO,
        }
    }

    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            position,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Point { distance },
            color,
            intensity,
            position,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    materials: Vec<Material>,
    geometries: Vec<Geometry>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// New top level node.
    pub fn spawn(&mut self, kind: NodeKind, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            transform,
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    pub fn add_group(&mut self, transform: Transform) -> NodeId {
        self.spawn(NodeKind::Group, transform)
    }

    pub fn add_visual(&mut self, geometry: GeometryId, material: MaterialId, transform: Transform) -> NodeId {
        self.spawn(NodeKind::Visual { geometry, material }, transform)
    }

    /// Spawns a visual directly under `parent`.
    pub fn add_child_visual(
        &mut self,
        parent: NodeId,
        geometry: GeometryId,
        material: MaterialId,
        transform: Transform,
    ) -> Result<NodeId> {
        let id = self.add_visual(geometry, material, transform);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Moves a top level `child` under `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent).ok_or(FxError::UnknownNode(parent))?;
        let node = self.get(child).ok_or(FxError::UnknownNode(child))?;
        if let Some(existing) = node.parent {
            return Err(FxError::AlreadyParented { child, parent: existing });
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(FxError::Cycle { child, parent });
            }
            cursor = self[id].parent;
        }
        self.roots.retain(|&r| r != child);
        self[child].parent = Some(parent);
        self[parent].children.push(child);
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.index()]
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    /// Composed transform from the top level down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self[id];
        let local = node.transform.matrix();
        match node.parent {
            Some(p) => self.world_matrix(p) * local,
            None => local,
        }
    }

    /// Depth first walk over visible nodes with their world matrices.
    /// Hidden nodes hide their whole subtree.
    pub fn walk(&self, mut f: impl FnMut(NodeId, &Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> = self.roots.iter().rev().map(|&r| (r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self[id];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            f(id, node, world);
            for &c in node.children.iter().rev() {
                stack.push((c, world));
            }
        }
    }
}

impl Index<NodeId> for Scene {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }
}

impl IndexMut<NodeId> for Scene {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }
}

impl Index<MaterialId> for Scene {
    type Output = Material;

    fn index(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }
}

impl IndexMut<MaterialId> for Scene {
    fn index_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.materials[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cuboid;

    fn leaf(scene: &mut Scene) -> NodeId {
        let g = scene.add_geometry(cuboid(1.0, 1.0, 1.0));
        let m = scene.add_material(Material::basic(Color::WHITE));
        scene.add_visual(g, m, Transform::default())
    }

    #[test]
    fn attach_moves_node_out_of_roots() {
        let mut scene = Scene::new();
        let group = scene.add_group(Transform::at(0.0, 1.0, 0.0));
        let child = leaf(&mut scene);
        scene.attach(group, child).unwrap();
        assert_eq!(scene.roots(), &[group]);
        assert_eq!(scene[child].parent(), Some(group));
    }

    #[test]
    fn second_parent_rejected() {
        let mut scene = Scene::new();
        let a = scene.add_group(Transform::default());
        let b = scene.add_group(Transform::default());
        let child = leaf(&mut scene);
        scene.attach(a, child).unwrap();
        assert!(matches!(scene.attach(b, child), Err(FxError::AlreadyParented { .. })));
    }

    #[test]
    fn cycles_rejected() {
        let mut scene = Scene::new();
        let a = scene.add_group(Transform::default());
        let b = scene.add_group(Transform::default());
        scene.attach(a, b).unwrap();
        // `a` is top level but `b` is already its child.
        assert!(matches!(scene.attach(b, a), Err(FxError::Cycle { .. })));
        assert!(matches!(scene.attach(a, a), Err(FxError::Cycle { .. })));
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let group = scene.add_group(Transform::at(0.0, 2.0, 0.0));
        let child = leaf(&mut scene);
        scene[child].transform = Transform::at(1.0, 0.0, 0.0);
        scene.attach(group, child).unwrap();
        let p = scene.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);

        let mut seen = Vec::new();
        scene.walk(|id, _, world| seen.push((id, world.transform_point3(Vec3::ZERO))));
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, group);
        assert!((seen[1].1 - p).length() < 1e-6);
    }

    #[test]
    fn hidden_subtree_skipped() {
        let mut scene = Scene::new();
        let group = scene.add_group(Transform::default());
        let child = leaf(&mut scene);
        scene.attach(group, child).unwrap();
        scene[group].visible = false;
        let mut count = 0;
        scene.walk(|_, _, _| count += 1);
        assert_eq!(count, 0);
    }
}
