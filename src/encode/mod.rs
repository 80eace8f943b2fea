pub(crate) mod header;
pub mod tag;
mod aspect;

pub use aspect::ToTag;
pub use tag::write_tag;

use crate::core::aspect::Aspect;
use crate::core::bit_coder::ByteWriter;
use crate::core::model_part::ModelPart;
use crate::core::shared::ConfigType;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    /// Drops fields equal to their default value and empty lists.
    /// Disabling it produces a larger container that decodes to the same value.
    pub omit_defaults: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            omit_defaults: true,
        }
    }
}

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Tag encoding error: {0}")]
    TagError(#[from] tag::Err),
}


/// Encodes the aspect into a provided byte stream using the provided configuration.
pub fn encode<W>(aspect: &Aspect, writer: &mut W, cfg: Config) -> Result<(), Err>
    where W: ByteWriter
{
    log::debug!(
        "Encoding aspect '{}' ({} textures, {} scripts)",
        aspect.get_metadata().name,
        aspect.get_textures().len(),
        aspect.get_scripts().len()
    );
    encode_tag(&aspect.to_tag(&cfg), writer)
}

/// Encodes a single model part subtree as its own container.
pub fn encode_part<W>(part: &ModelPart, writer: &mut W, cfg: Config) -> Result<(), Err>
    where W: ByteWriter
{
    encode_tag(&part.to_tag(&cfg), writer)
}

fn encode_tag<W>(root: &crate::core::tag::Tag, writer: &mut W) -> Result<(), Err>
    where W: ByteWriter
{
    // Encode header
    header::encode_header(writer);

    // Encode the tree
    write_tag(root, writer)?;
    Ok(())
}
