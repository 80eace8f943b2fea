use crate::core::shared::Vec3;

/// Descriptive data of an aspect, read from the bundle manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub author: String,
    pub version: String,
    pub color: Vec3,
    /// References to nested aspects this one depends on.
    pub dependencies: Vec<String>,
}

impl Metadata {
    pub const DEFAULT_COLOR: Vec3 = Vec3::ONE;
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            version: String::new(),
            color: Self::DEFAULT_COLOR,
            dependencies: Vec::new(),
        }
    }
}
