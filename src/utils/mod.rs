use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};

pub(crate) fn leb128_read<W>(reader: &mut W) -> Result<u64, ReaderErr>
    where W: ByteReader,
{
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_u8()?;
        if shift < 64 {
            result |= ((byte & 0x7F) as u64) << shift;
        }
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(result)
}

pub(crate) fn leb128_write<W>(mut value: u64, writer: &mut W)
    where W: ByteWriter,
{
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            writer.write_u8(byte);
            break;
        } else {
            writer.write_u8(byte | 0x80);
        }
    }
}

/// Returns the file stem of `path` as an owned string, or an empty string
/// when the stem is missing or not valid UTF-8.
pub(crate) fn file_stem_of(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Strips the last extension of a texture name such as `skin.png`.
pub(crate) fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
