use crate::core::bit_coder::ByteWriter;

/// Magic bytes opening every aspect container.
pub const MAGIC: &[u8; 6] = b"ASPECT";
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

pub fn encode_header<W>(writer: &mut W)
where
    W: ByteWriter,
{
    // Write the magic string
    writer.write_bytes(MAGIC);

    // Write the version
    writer.write_u8(VERSION_MAJOR);
    writer.write_u8(VERSION_MINOR);
}
