//! Site configuration.
//!
//! Pages can override defaults with a JSON blob in `#holo-fx-config`.
//! Every field is optional; anything missing keeps its default.

use serde::Deserialize;

use crate::error::Result;

/// Element id holding the JSON override.
pub const CONFIG_ELEMENT_ID: &str = "holo-fx-config";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanvasIds {
    pub hologram: String,
    pub starfield: String,
    pub analytics: String,
    pub flagship: String,
    pub droid: String,
}

impl Default for CanvasIds {
    fn default() -> Self {
        Self {
            hologram: "hero-canvas".into(),
            starfield: "starfield-canvas".into(),
            analytics: "analytics-canvas".into(),
            flagship: "hero-scene-canvas".into(),
            droid: "bb8-canvas".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub canvases: CanvasIds,
    pub model_path: String,
    /// CSS selector of the floating droid badge.
    pub badge_selector: String,
    pub card_selector: String,
    pub card_icon_selector: String,
    pub card_glow_selector: String,
    /// Fixed seed for random placement; random per page load when absent.
    pub seed: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            canvases: CanvasIds::default(),
            model_path: "/models/bb8.glb".into(),
            badge_selector: ".bb8".into(),
            card_selector: ".module-card".into(),
            card_icon_selector: ".module-icon".into(),
            card_glow_selector: ".module-glow".into(),
            seed: None,
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = SiteConfig::from_json(r#"{"seed": 42, "canvases": {"droid": "egg"}}"#).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.canvases.droid, "egg");
        assert_eq!(cfg.canvases.hologram, "hero-canvas");
        assert_eq!(cfg.model_path, "/models/bb8.glb");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{seed:").is_err());
    }
}
