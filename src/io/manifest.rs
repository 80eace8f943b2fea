//! The bundle manifest (`aspect.json`).

use schemars::JsonSchema;
use serde::Deserialize;

use crate::core::metadata::Metadata;
use crate::core::shared::Vec3;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Invalid color '{0}': expected \"#rrggbb\"")]
    InvalidColor(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}


/// The manifest as authored. Every field is optional.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
    pub author: String,
    pub version: String,
    /// Tint color, as `[r, g, b]` in `0..=1` or a `"#rrggbb"` string.
    pub color: Option<ManifestColor>,
    /// Names of other aspects this one depends on.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ManifestColor {
    Rgb([f32; 3]),
    Hex(String),
}

impl ManifestColor {
    pub fn to_vec3(&self) -> Result<Vec3, Err> {
        match self {
            ManifestColor::Rgb(rgb) => Ok((*rgb).into()),
            ManifestColor::Hex(hex) => parse_hex_color(hex),
        }
    }
}

fn parse_hex_color(hex: &str) -> Result<Vec3, Err> {
    let invalid = || Err::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|_| invalid())
    };
    Ok(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

impl Manifest {
    /// Parses manifest text. Blank text yields the default manifest.
    pub fn parse(text: &str) -> Result<Self, Err> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_metadata(self) -> Result<Metadata, Err> {
        let color = match &self.color {
            Some(c) => c.to_vec3()?,
            None => Metadata::DEFAULT_COLOR,
        };
        Ok(Metadata {
            name: self.name,
            author: self.author,
            version: self.version,
            color,
            dependencies: self.dependencies,
        })
    }
}

/// The JSON schema of the manifest, pretty-printed.
pub fn schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(Manifest))
}

/// Parses manifest text straight into [`Metadata`].
pub fn parse_metadata(text: &str) -> Result<Metadata, Err> {
    Manifest::parse(text)?.into_metadata()
}

/// Same as [`parse_metadata`], for the raw bytes of a manifest file.
pub fn parse_metadata_bytes(bytes: &[u8]) -> Result<Metadata, Err> {
    parse_metadata(std::str::from_utf8(bytes)?)
}
