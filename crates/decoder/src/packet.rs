use crate::error::DecodeError;

pub struct RawPacket<'a> {
    pub packet_type: u32,
    pub clock: f32,
    pub payload: &'a [u8],
}

/// Walks `size:u32 | type:u32 | clock:f32 | payload:size bytes` frames over
/// the whole decompressed stream. `size` covers only the trailing
/// `payload` field -- `type`+`clock` are a fixed 8-byte header read
/// unconditionally ahead of it, matching the teacher's `parse_packet` in
/// `parser/src/packet.rs` (`le_u32` size, `le_u32` type, `le_f32` clock,
/// then `take(size)` for the payload).
pub fn walk_packets(stream: &[u8]) -> Result<Vec<RawPacket<'_>>, DecodeError> {
    let mut packets = vec![];
    let mut i = stream;
    while !i.is_empty() {
        if i.len() < 12 {
            return Err(DecodeError::TruncatedStream);
        }
        let size = u32::from_le_bytes(i[0..4].try_into().unwrap()) as usize;
        let packet_type = u32::from_le_bytes(i[4..8].try_into().unwrap());
        let clock = f32::from_le_bytes(i[8..12].try_into().unwrap());
        let frame_end = 12usize.checked_add(size).ok_or(DecodeError::TruncatedStream)?;
        if i.len() < frame_end {
            return Err(DecodeError::TruncatedStream);
        }
        let payload = &i[12..frame_end];
        packets.push(RawPacket { packet_type, clock, payload });
        i = &i[frame_end..];
    }
    Ok(packets)
}

/// The last packet of the given type, mirroring the spec's "terminal
/// packet" language: a completed battle emits its results packet once, at
/// the end of the stream.
pub fn find_last_of_type<'a>(packets: &'a [RawPacket<'a>], packet_type: u32) -> Option<&'a RawPacket<'a>> {
    packets.iter().rev().find(|p| p.packet_type == packet_type)
}
