use crate::core::bit_coder::ByteWriter;
use crate::core::tag::{Compound, Tag, TagKind, MAX_DEPTH};
use crate::utils::leb128_write;

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("List '{field}' mixes {expected} and {found} elements")]
    MixedList { field: String, expected: TagKind, found: TagKind },
    #[error("Value at '{field}' is nested deeper than {limit} levels")]
    TooDeep { field: String, limit: usize },
}

impl Err {
    /// Prefixes the field path of the error with the enclosing field.
    fn within(self, segment: &str) -> Self {
        match self {
            Err::MixedList { field, expected, found } => Err::MixedList {
                field: join_path(segment, &field),
                expected,
                found,
            },
            Err::TooDeep { field, limit } => Err::TooDeep {
                field: join_path(segment, &field),
                limit,
            },
        }
    }
}

pub(crate) fn join_path(segment: &str, rest: &str) -> String {
    if rest.is_empty() {
        segment.to_string()
    } else if rest.starts_with('[') {
        format!("{}{}", segment, rest)
    } else {
        format!("{}.{}", segment, rest)
    }
}


/// Writes `tag` as a kind byte followed by its payload.
pub fn write_tag<W>(tag: &Tag, writer: &mut W) -> Result<(), Err>
    where W: ByteWriter
{
    writer.write_u8(tag.kind().get_id());
    write_payload(tag, writer, 0)
}

fn write_payload<W>(tag: &Tag, writer: &mut W, depth: usize) -> Result<(), Err>
    where W: ByteWriter
{
    if depth > MAX_DEPTH {
        return Err(Err::TooDeep { field: String::new(), limit: MAX_DEPTH });
    }
    match tag {
        Tag::Bool(b) => writer.write_u8(*b as u8),
        Tag::Int(i) => writer.write_u32(*i as u32),
        Tag::Float(f) => writer.write_u32(f.to_bits()),
        Tag::String(s) => write_len_prefixed(s.as_bytes(), writer),
        Tag::ByteArray(bytes) => write_len_prefixed(bytes, writer),
        Tag::List(elems) => write_list(elems, writer, depth)?,
        Tag::Compound(fields) => write_compound(fields, writer, depth)?,
    }
    Ok(())
}

fn write_len_prefixed<W>(bytes: &[u8], writer: &mut W)
    where W: ByteWriter
{
    leb128_write(bytes.len() as u64, writer);
    writer.write_bytes(bytes);
}

fn write_list<W>(elems: &[Tag], writer: &mut W, depth: usize) -> Result<(), Err>
    where W: ByteWriter
{
    let elem_kind = elems.first().map_or(TagKind::End, Tag::kind);
    if let Some((idx, odd)) = elems.iter().enumerate().find(|(_, e)| e.kind() != elem_kind) {
        return Err(Err::MixedList {
            field: format!("[{}]", idx),
            expected: elem_kind,
            found: odd.kind(),
        });
    }

    writer.write_u8(elem_kind.get_id());
    leb128_write(elems.len() as u64, writer);
    for (idx, elem) in elems.iter().enumerate() {
        write_payload(elem, writer, depth + 1).map_err(|e| e.within(&format!("[{}]", idx)))?;
    }
    Ok(())
}

fn write_compound<W>(fields: &Compound, writer: &mut W, depth: usize) -> Result<(), Err>
    where W: ByteWriter
{
    for (name, value) in fields {
        writer.write_u8(value.kind().get_id());
        write_len_prefixed(name.as_bytes(), writer);
        write_payload(value, writer, depth + 1).map_err(|e| e.within(name))?;
    }
    writer.write_u8(TagKind::End.get_id());
    Ok(())
}
