use crate::core::bit_coder::ByteReader;
use crate::core::tag::{Compound, Tag, TagKind, MAX_DEPTH};
use crate::utils::leb128_read;

use super::{Config, Err};

/// Reads one tag (kind byte and payload) from the stream.
pub fn read_tag<R>(reader: &mut R, cfg: &Config) -> Result<Tag, Err>
    where R: ByteReader
{
    let kind = read_kind(reader)?;
    if kind == TagKind::End {
        return Err(Err::corrupt("", "a tag other than end"));
    }
    read_payload(kind, reader, cfg, 0)
}

fn read_kind<R>(reader: &mut R) -> Result<TagKind, Err>
    where R: ByteReader
{
    let id = reader.read_u8().map_err(|_| Err::corrupt("", "tag kind"))?;
    TagKind::from_id(id).ok_or_else(|| Err::corrupt("", format!("tag kind (found id {})", id)))
}

fn read_len<R>(reader: &mut R, what: TagKind) -> Result<usize, Err>
    where R: ByteReader
{
    leb128_read(reader)
        .map(|len| len as usize)
        .map_err(|_| Err::corrupt("", format!("{} length", what)))
}

fn read_payload<R>(kind: TagKind, reader: &mut R, cfg: &Config, depth: usize) -> Result<Tag, Err>
    where R: ByteReader
{
    let limit = cfg.max_depth.min(MAX_DEPTH);
    if depth > limit {
        return Err(Err::corrupt("", format!("nesting depth of at most {}", limit)));
    }
    let truncated = |_| Err::corrupt("", format!("{} payload", kind));
    let tag = match kind {
        TagKind::End => return Err(Err::corrupt("", "a tag other than end")),
        TagKind::Bool => match reader.read_u8().map_err(truncated)? {
            0 => Tag::Bool(false),
            1 => Tag::Bool(true),
            _ => return Err(Err::corrupt("", "bool (0 or 1)")),
        },
        TagKind::Int => Tag::Int(reader.read_u32().map_err(truncated)? as i32),
        TagKind::Float => Tag::Float(f32::from_bits(reader.read_u32().map_err(truncated)?)),
        TagKind::String => {
            let len = read_len(reader, kind)?;
            let bytes = reader.read_bytes(len).map_err(truncated)?;
            Tag::String(String::from_utf8(bytes).map_err(|_| Err::corrupt("", "utf-8 string"))?)
        }
        TagKind::ByteArray => {
            let len = read_len(reader, kind)?;
            Tag::ByteArray(reader.read_bytes(len).map_err(truncated)?)
        }
        TagKind::List => {
            let elem_kind = read_kind(reader)?;
            let len = read_len(reader, kind)?;
            if elem_kind == TagKind::End && len > 0 {
                return Err(Err::corrupt("", "element kind of a non-empty list"));
            }
            let mut elems = Vec::new();
            for idx in 0..len {
                let elem = read_payload(elem_kind, reader, cfg, depth + 1)
                    .map_err(|e| e.within(&format!("[{}]", idx)))?;
                elems.push(elem);
            }
            Tag::List(elems)
        }
        TagKind::Compound => {
            let mut fields = Compound::new();
            loop {
                let field_kind = read_kind(reader)?;
                if field_kind == TagKind::End {
                    break;
                }
                let name_len = read_len(reader, TagKind::String)?;
                let name = reader.read_bytes(name_len)
                    .ok()
                    .and_then(|b| String::from_utf8(b).ok())
                    .ok_or_else(|| Err::corrupt("", "utf-8 field name"))?;
                let value = read_payload(field_kind, reader, cfg, depth + 1)
                    .map_err(|e| e.within(&name))?;
                if fields.insert(name.clone(), value).is_some() {
                    return Err(Err::corrupt(name, "a field name used once"));
                }
            }
            Tag::Compound(fields)
        }
    };
    Ok(tag)
}
