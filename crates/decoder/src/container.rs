use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::le_u32;
use nom::IResult;

use crate::error::DecodeError;

/// Parsed container shell: the JSON meta block plus whatever encrypted
/// bytes follow it. Mirrors `wowsreplay::replay_format` from the teacher,
/// minus the per-block extra-data payloads (unused by this core).
pub struct Container<'a> {
    pub raw_meta: &'a str,
    pub encrypted: &'a [u8],
}

fn block(i: &[u8]) -> IResult<&[u8], &[u8]> {
    let (i, block_size) = le_u32(i)?;
    take(block_size)(i)
}

fn parse_meta(i: &[u8]) -> IResult<&[u8], &[u8]> {
    let (i, meta_len) = le_u32(i)?;
    take(meta_len)(i)
}

/// `magic:u32 | blocks:u32 | jsonSize:u32 | json | (blocks-1 length-prefixed
/// extra blocks) | decompressedSize:u32 | compressedSize:u32 | encrypted...`
pub fn parse_container(i: &[u8]) -> Result<Container<'_>, DecodeError> {
    let (i, _magic) = le_u32::<_, nom::error::Error<&[u8]>>(i).map_err(|_| DecodeError::MalformedHeader)?;
    let (i, block_count) = le_u32::<_, nom::error::Error<&[u8]>>(i).map_err(|_| DecodeError::MalformedHeader)?;
    if block_count == 0 {
        return Err(DecodeError::MalformedHeader);
    }
    let (i, raw_meta_bytes) = parse_meta(i).map_err(|_| DecodeError::MalformedHeader)?;
    let raw_meta = std::str::from_utf8(raw_meta_bytes)?;

    let (i, _extra_blocks) =
        count(block, (block_count - 1) as usize)(i).map_err(|_: nom::Err<nom::error::Error<&[u8]>>| DecodeError::MalformedHeader)?;

    let (i, _decompressed_size) = le_u32::<_, nom::error::Error<&[u8]>>(i).map_err(|_| DecodeError::MalformedHeader)?;
    let (encrypted, _compressed_size) = le_u32::<_, nom::error::Error<&[u8]>>(i).map_err(|_| DecodeError::MalformedHeader)?;

    Ok(Container { raw_meta, encrypted })
}
