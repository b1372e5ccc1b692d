use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// Flat color, lights ignored.
    Basic,
    /// Diffuse + specular from the scene lights.
    Phong { shininess: f32 },
    /// Point sprites, `size` in world units at distance 1.
    Points { size: f32 },
    Line,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Appearance shared by every node holding the same [`MaterialId`](crate::scene::MaterialId).
///
/// `color` and `opacity` are the fields animated in place by effects.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
}

impl Material {
    fn with_shading(shading: Shading, color: Color) -> Self {
        Self {
            shading,
            color,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_shading(Shading::Basic, color)
    }

    pub fn phong(color: Color, shininess: f32) -> Self {
        Self::with_shading(Shading::Phong { shininess }, color)
    }

    pub fn points(color: Color, size: f32) -> Self {
        Self::with_shading(Shading::Points { size }, color)
    }

    pub fn line(color: Color) -> Self {
        Self::with_shading(Shading::Line, color)
    }

    /// Marks the material transparent at the given opacity.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }

    /// Drawn in the blended pass after opaque geometry.
    pub fn is_blended(&self) -> bool {
        self.transparent || self.opacity < 1.0
    }

    pub fn is_lit(&self) -> bool {
        matches!(self.shading, Shading::Phong { .. })
    }
}
