//! Colors and the light/dark site theme.

use std::str::FromStr;

/// Linear RGB color, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    /// Color from a `0xRRGGBB` literal.
    pub const fn hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::from_rgb(self.r * k, self.g * k, self.b * k)
    }
}

/// Site theme, read from the `data-theme` attribute of the root element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Theme from an optional attribute value. Absent or unknown values mean light.
    pub fn from_attr(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn pick<T>(self, light: T, dark: T) -> T {
        match self {
            Theme::Light => light,
            Theme::Dark => dark,
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_components() {
        let c = Color::hex(0x0ea5e9);
        assert_eq!(c.to_hex(), 0x0ea5e9);
        assert_eq!(Color::WHITE.to_array(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn theme_defaults_to_light() {
        assert_eq!(Theme::from_attr(None), Theme::Light);
        assert_eq!(Theme::from_attr(Some("neon")), Theme::Light);
        assert_eq!(Theme::from_attr(Some("dark")), Theme::Dark);
        assert_eq!(Theme::Dark.pick(1, 2), 2);
    }
}
