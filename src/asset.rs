//! Binary glTF import.
//!
//! Only what the droid needs: triangle primitives with positions, optional
//! indices and a base color. Node transforms are baked into the vertices so
//! every part can hang directly under one model group.

use glam::{Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;

use crate::color::Color;
use crate::error::{FxError, Result};
use crate::geometry::Geometry;

#[derive(Clone, Debug)]
pub struct ModelPart {
    pub geometry: Geometry,
    pub color: Color,
    pub opacity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

/// Parses a `.glb` (or self contained `.gltf`) byte buffer.
pub fn load_glb(bytes: &[u8]) -> Result<Model> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref();
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| FxError::Asset("no scene".into()))?;

    let mut model = Model::default();
    for node in scene.nodes() {
        collect(&node, Mat4::IDENTITY, blob, &mut model.parts);
    }
    if model.parts.is_empty() {
        return Err(FxError::Asset("no triangle meshes".into()));
    }
    log::debug!("glb: {} parts", model.parts.len());
    Ok(model)
}

fn collect(node: &gltf::Node<'_>, parent: Mat4, blob: Option<&[u8]>, out: &mut Vec<ModelPart>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for prim in mesh.primitives() {
            if prim.mode() != Mode::Triangles {
                continue;
            }
            let reader = prim.reader(|buffer| match buffer.source() {
                Source::Bin => blob,
                Source::Uri(_) => None,
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions
                .map(|p| world.transform_point3(Vec3::from(p)).to_array())
                .collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(idx) => idx.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let [r, g, b, a] = prim.material().pbr_metallic_roughness().base_color_factor();
            out.push(ModelPart {
                geometry: Geometry::from_triangles(positions, indices),
                color: Color::from_rgb(r, g, b),
                opacity: a,
            });
        }
    }

    for child in node.children() {
        collect(&child, world, blob, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal GLB: one node translated by +2 on Y with a single triangle.
    fn triangle_glb() -> Vec<u8> {
        let mut bin = Vec::new();
        for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 0, "translation": [0, 2, 0]}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "material": 0}]}],
            "materials": [{"pbrMetallicRoughness": {"baseColorFactor": [1, 0.5, 0, 1]}}],
            "buffers": [{"byteLength": 36}],
            "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
            "accessors": [{
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0, 0, 0], "max": [1, 1, 0]
            }]
        }"#;
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn bakes_node_transform_into_vertices() {
        let model = load_glb(&triangle_glb()).unwrap();
        assert_eq!(model.parts.len(), 1);
        let part = &model.parts[0];
        assert_eq!(part.geometry.positions[2], [0.0, 3.0, 0.0]);
        assert_eq!(part.geometry.indices, vec![0, 1, 2]);
        assert_eq!(part.color, Color::from_rgb(1.0, 0.5, 0.0));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(load_glb(b"definitely not a model"), Err(FxError::Asset(_))));
    }
}
