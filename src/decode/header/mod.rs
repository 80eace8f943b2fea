use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::encode::header::{MAGIC, VERSION_MAJOR};


#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Not an aspect container")]
    NotAnAspectContainer,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Unsupported container version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
}

pub(crate) struct Header {
    #[allow(unused)]
    pub version_major: u8,
    #[allow(unused)]
    pub version_minor: u8,
}

pub(crate) fn decode_header<R>(reader: &mut R) -> Result<Header, Err>
where
    R: ByteReader,
{
    // Read the magic string
    let magic = reader.read_bytes(MAGIC.len())?;
    if magic.as_slice() != MAGIC.as_slice() {
        return Err(Err::NotAnAspectContainer)
    };

    // Read the version. Minor versions only add optional fields.
    let version_major = reader.read_u8()?;
    let version_minor = reader.read_u8()?;
    if version_major != VERSION_MAJOR {
        return Err(Err::UnsupportedVersion { major: version_major, minor: version_minor });
    }

    Ok (
        Header {
            version_major,
            version_minor,
        }
    )
}
