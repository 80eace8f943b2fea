pub mod header;
pub(crate) mod tag;
mod aspect;

pub use aspect::FromTag;
pub use tag::read_tag;

use crate::core::aspect::Aspect;
use crate::core::bit_coder::ByteReader;
use crate::core::model_part::ModelPart;
use crate::core::shared::ConfigType;
use crate::core::tag::{Tag, MAX_DEPTH};
use crate::encode::tag::join_path;


#[derive(Debug, Clone)]
pub struct Config {
    /// Deepest nesting of lists and compounds accepted before the container
    /// is rejected as corrupt. Values above [`MAX_DEPTH`] are capped to it.
    pub max_depth: usize,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}


#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Corrupt container at '{field}': expected {expected}")]
    CorruptContainer { field: String, expected: String },
    #[error("Header decoding error: {0}")]
    HeaderError(#[from] header::Err),
}

impl Err {
    pub(crate) fn corrupt(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Err::CorruptContainer { field: field.into(), expected: expected.into() }
    }

    /// Prefixes the field path of a corruption error with the enclosing field.
    pub(crate) fn within(self, segment: &str) -> Self {
        match self {
            Err::CorruptContainer { field, expected } => Err::CorruptContainer {
                field: join_path(segment, &field),
                expected,
            },
            other => other,
        }
    }
}


/// Decodes an aspect container produced by [`crate::encode::encode`].
pub fn decode<R>(reader: &mut R, cfg: Config) -> Result<Aspect, Err>
    where R: ByteReader
{
    let root = decode_tag(reader, &cfg)?;
    let aspect = Aspect::from_tag(&root).map_err(|e| e.within("root"))?;
    log::debug!("Decoded aspect '{}'", aspect.get_metadata().name);
    Ok(aspect)
}

/// Decodes a container produced by [`crate::encode::encode_part`].
pub fn decode_part<R>(reader: &mut R, cfg: Config) -> Result<ModelPart, Err>
    where R: ByteReader
{
    let root = decode_tag(reader, &cfg)?;
    ModelPart::from_tag(&root).map_err(|e| e.within("root"))
}

fn decode_tag<R>(reader: &mut R, cfg: &Config) -> Result<Tag, Err>
    where R: ByteReader
{
    // Decode header
    header::decode_header(reader).map_err(|err| match err {
        header::Err::NotEnoughData(_) => Err::corrupt("header", "magic and version"),
        other => Err::HeaderError(other),
    })?;

    // Decode the tree
    let root = read_tag(reader, cfg).map_err(|e| e.within("root"))?;
    if !reader.is_exhausted() {
        return Err(Err::corrupt("root", "end of container after the root tag"));
    }
    Ok(root)
}
