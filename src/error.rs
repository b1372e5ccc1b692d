use thiserror::Error;

use crate::scene::NodeId;

/// Everything that can stop an effect from appearing.
///
/// None of these ever reach the host page: mount points log them and carry on.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },
    #[error("WebGL2 not supported")]
    NoWebGl2,
    #[error("shader: {0}")]
    Shader(String),
    #[error("gpu buffer allocation failed")]
    Buffer,
    #[error("asset: {0}")]
    Asset(String),
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
    #[error("js: {0}")]
    Js(String),
}

impl From<gltf::Error> for FxError {
    fn from(e: gltf::Error) -> Self {
        FxError::Asset(e.to_string())
    }
}

impl From<wasm_bindgen::JsValue> for FxError {
    fn from(v: wasm_bindgen::JsValue) -> Self {
        FxError::Js(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

pub type Result<T, E = FxError> = std::result::Result<T, E>;
