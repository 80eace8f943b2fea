//! Blockbench-shaped model documents: the JSON intermediates, the outliner
//! resolver, and the compiler that turns a document into a [`ModelPart`] tree.
//!
//! [`ModelPart`]: crate::core::model_part::ModelPart

pub mod compiler;
pub mod outliner;

use indexmap::IndexMap;
use serde::Deserialize;

pub use compiler::CompiledDocument;


#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Duplicate element uuid '{uuid}'")]
    DuplicateUuid { uuid: String },
    #[error("Texture '{name}' could not be read: {reason}")]
    InvalidTexture { name: String, reason: String },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed element '{element}': {reason}")]
    MalformedDocument { element: String, reason: String },
    #[error("Outliner references unknown uuid '{uuid}'")]
    UnresolvedReference { uuid: String },
}

impl Err {
    pub(crate) fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Err::MalformedDocument { element: element.into(), reason: reason.into() }
    }
}


/// A whole model document as authored. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub textures: Vec<TextureEntry>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub outliner: Vec<OutlinerEntry>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize)]
pub struct TextureEntry {
    pub name: String,
    /// Embedded image, usually a `data:image/png;base64,` URI.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub relative_path: Option<String>,
}

/// One flat element of the document. Cubes and meshes share the shape;
/// `kind` decides which fields are required.
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default = "cube_kind")]
    pub kind: String,
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: Option<[f32; 3]>,
    #[serde(default)]
    pub to: Option<[f32; 3]>,
    #[serde(default)]
    pub origin: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub inflate: f32,
    #[serde(default = "visible")]
    pub visibility: bool,
    #[serde(default)]
    pub faces: IndexMap<String, FaceEntry>,
    /// Mesh vertices keyed by the ids the mesh faces refer to.
    #[serde(default)]
    pub vertices: Option<IndexMap<String, [f32; 3]>>,
}

#[derive(Debug, Deserialize)]
pub struct FaceEntry {
    #[serde(default)]
    pub uv: Option<FaceUv>,
    /// Local index into the document's texture list; `null` for untextured faces.
    #[serde(default)]
    pub texture: Option<i64>,
    /// Mesh faces only: vertex ids in winding order.
    #[serde(default)]
    pub vertices: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FaceUv {
    /// Cube faces: `[u0, v0, u1, v1]`.
    Rect([f32; 4]),
    /// Mesh faces: one uv pair per vertex id.
    PerVertex(IndexMap<String, [f32; 2]>),
}

/// One entry of the outliner: a reference to an element, or a group.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OutlinerEntry {
    Uuid(String),
    Group(GroupEntry),
}

#[derive(Debug, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub origin: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "visible")]
    pub visibility: bool,
    #[serde(default)]
    pub children: Vec<OutlinerEntry>,
}

fn cube_kind() -> String {
    "cube".to_string()
}

fn visible() -> bool {
    true
}


impl Document {
    pub fn from_slice(json: &[u8]) -> Result<Self, Err> {
        Ok(serde_json::from_slice(json)?)
    }
}
