//! Primitive geometry generators.
//!
//! Shapes use Y up, cylinders along Y and planes in XY facing +Z.
//! Triangles wind counter-clockwise seen from outside.

use std::collections::HashSet;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
    Points,
}

/// CPU side vertex data for one drawable.
///
/// `indices` holds triangles, `edges` holds line pairs: the unique triangle
/// edges for meshes (used for wireframe drawing) or the explicit segments of
/// line geometry.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub edges: Vec<u32>,
    pub topology: Topology,
}

impl Geometry {
    /// Triangle mesh from raw parts; wireframe edges are derived.
    pub fn from_triangles(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let edges = unique_edges(&indices);
        Self {
            positions,
            indices,
            edges,
            topology: Topology::Triangles,
        }
    }

    pub fn points(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            indices: Vec::new(),
            edges: Vec::new(),
            topology: Topology::Points,
        }
    }

    /// Independent line segments `a -> b`.
    pub fn segments(pairs: &[([f32; 3], [f32; 3])]) -> Self {
        let mut positions = Vec::with_capacity(pairs.len() * 2);
        for (a, b) in pairs {
            positions.push(*a);
            positions.push(*b);
        }
        let edges = (0..positions.len() as u32).collect();
        Self {
            positions,
            indices: Vec::new(),
            edges,
            topology: Topology::Lines,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Axis aligned bounds, `None` for empty geometry.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for i in 0..3 {
                lo[i] = lo[i].min(p[i]);
                hi[i] = hi[i].max(p[i]);
            }
            (lo, hi)
        }))
    }
}

fn unique_edges(indices: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if a == b {
                continue;
            }
            if seen.insert((a.min(b), a.max(b))) {
                edges.extend_from_slice(&[a, b]);
            }
        }
    }
    edges
}

/// Axis aligned box centred on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    // (normal axis, sign, u axis, v axis) with u x v along +normal axis
    let faces: [(usize, f32, usize, usize); 6] = [
        (0, 1.0, 1, 2),
        (0, -1.0, 1, 2),
        (1, 1.0, 2, 0),
        (1, -1.0, 2, 0),
        (2, 1.0, 0, 1),
        (2, -1.0, 0, 1),
    ];
    let half = [hw, hh, hd];
    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (axis, sign, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let mut p = [0.0f32; 3];
            p[axis] = sign * half[axis];
            p[u] = su * half[u];
            p[v] = sv * half[v];
            positions.push(p);
        }
        if sign > 0.0 {
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }
    Geometry::from_triangles(positions, indices)
}

/// Capped cylinder (or truncated cone) along Y, `radius_top` at `+height/2`.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Geometry {
    let segments = radial_segments.max(3);
    let half = height / 2.0;
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    // Two rings, seam duplicated so every column has its own vertex pair.
    for (y, r) in [(half, radius_top), (-half, radius_bottom)] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            positions.push([r * theta.sin(), y, r * theta.cos()]);
        }
    }
    let row = segments + 1;
    for i in 0..segments {
        let a = i;
        let b = i + row;
        let c = i + row + 1;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (y, r, top) in [(half, radius_top, true), (-half, radius_bottom, false)] {
        if r <= 0.0 {
            continue;
        }
        let center = positions.len() as u32;
        positions.push([0.0, y, 0.0]);
        let ring = positions.len() as u32;
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            positions.push([r * theta.sin(), y, r * theta.cos()]);
        }
        for i in 0..segments {
            if top {
                indices.extend_from_slice(&[ring + i, ring + i + 1, center]);
            } else {
                indices.extend_from_slice(&[ring + i + 1, ring + i, center]);
            }
        }
    }
    Geometry::from_triangles(positions, indices)
}

/// Sphere section; `phi` sweeps around Y, `theta` from the north pole down.
#[derive(Clone, Copy, Debug)]
pub struct SphereSpec {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl SphereSpec {
    pub fn full(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
            phi_start: 0.0,
            phi_length: 2.0 * PI,
            theta_start: 0.0,
            theta_length: PI,
        }
    }

    /// Upper half dome, open at the equator.
    pub fn dome(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            theta_length: PI / 2.0,
            ..Self::full(radius, width_segments, height_segments)
        }
    }
}

pub fn sphere(spec: SphereSpec) -> Geometry {
    let w = spec.width_segments.max(3);
    let h = spec.height_segments.max(2);
    let theta_end = (spec.theta_start + spec.theta_length).min(PI);
    let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    let mut indices = Vec::new();

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let theta = spec.theta_start + v * spec.theta_length;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let phi = spec.phi_start + u * spec.phi_length;
            positions.push([
                -spec.radius * phi.cos() * theta.sin(),
                spec.radius * theta.cos(),
                spec.radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let row = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 || spec.theta_start > 0.0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 || theta_end < PI {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    Geometry::from_triangles(positions, indices)
}

/// Single quad in the XY plane.
pub fn plane(width: f32, height: f32) -> Geometry {
    let (hw, hh) = (width / 2.0, height / 2.0);
    Geometry::from_triangles(
        vec![[-hw, hh, 0.0], [hw, hh, 0.0], [-hw, -hh, 0.0], [hw, -hh, 0.0]],
        vec![0, 2, 1, 2, 3, 1],
    )
}

/// Square line grid on the XZ plane.
pub fn grid(size: f32, divisions: u32) -> Geometry {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut pairs = Vec::with_capacity(2 * (divisions as usize + 1));
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        pairs.push(([-half, 0.0, k], [half, 0.0, k]));
        pairs.push(([k, 0.0, -half], [k, 0.0, half]));
    }
    Geometry::segments(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_spans_requested_extent() {
        let g = cuboid(3.0, 0.2, 1.0);
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.indices.len(), 36);
        let (lo, hi) = g.bounds().unwrap();
        assert_eq!(lo, [-1.5, -0.1, -0.5]);
        assert_eq!(hi, [1.5, 0.1, 0.5]);
    }

    #[test]
    fn cylinder_radii_follow_height() {
        let g = cylinder(0.3, 0.8, 4.0, 8);
        for p in &g.positions {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            if p[1] > 0.0 {
                assert!(r <= 0.3 + 1e-5);
            } else {
                assert!(r <= 0.8 + 1e-5);
            }
        }
        assert_eq!(g.topology, Topology::Triangles);
        assert!(!g.edges.is_empty());
    }

    #[test]
    fn dome_stays_above_equator() {
        let g = sphere(SphereSpec::dome(1.0, 8, 8));
        assert!(g.positions.iter().all(|p| p[1] >= -1e-5));
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
    }

    #[test]
    fn wireframe_edges_are_unique() {
        let g = plane(2.0, 2.0);
        // 4 outline edges plus the shared diagonal.
        assert_eq!(g.edges.len() / 2, 5);
    }

    #[test]
    fn grid_line_count() {
        let g = grid(10.0, 20);
        assert_eq!(g.topology, Topology::Lines);
        assert_eq!(g.edges.len() / 2, 2 * 21);
    }
}
