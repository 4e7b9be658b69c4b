//! Frame codec: pure encode/decode over fixed little-endian layouts.

use crate::manifest::Manifest;
use crate::protocol::{
    Command, COMMAND_FRAME_LEN, COMMAND_MAGIC, LIST_HEADER_LEN, LIST_MAGIC, RANGE_HEADER_LEN,
    RESPONSE_TYPE,
};

/// A decoded 32-byte command frame.
#[derive(Debug, Clone, Copy)]
pub struct CommandFrame {
    pub frame_type: u8,
    pub command: Command,
    pub payload_size: u64,
}

/// Numeric head of a file-range request; the name follows on the wire.
#[derive(Debug, Clone, Copy)]
pub struct RangeHeader {
    pub size: u64,
    pub offset: u64,
    pub name_len: u64,
}

/// Encode the file-list announcement: magic, LE u32 payload length,
/// 8 bytes of padding, then every path newline-terminated in order.
pub fn encode_announcement(manifest: &Manifest) -> Vec<u8> {
    let mut out = Vec::with_capacity(LIST_HEADER_LEN + manifest.total_len() as usize);
    out.extend_from_slice(LIST_MAGIC);
    out.extend_from_slice(&manifest.total_len().to_le_bytes());
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&manifest.payload());
    out
}

/// Decode a command frame. Returns `None` on a magic mismatch so the
/// caller can apply its resync policy; never fails otherwise.
pub fn decode_command_frame(buf: &[u8; COMMAND_FRAME_LEN]) -> Option<CommandFrame> {
    if &buf[0..4] != COMMAND_MAGIC {
        return None;
    }
    let frame_type = buf[4];
    let id = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Some(CommandFrame {
        frame_type,
        command: Command::from_u32(id),
        payload_size: u64_le(&buf[12..20]),
    })
}

fn u64_le(buf: &[u8]) -> u64 {
    let mut v = [0u8; 8];
    v.copy_from_slice(&buf[..8]);
    u64::from_le_bytes(v)
}

/// Decode the fixed 24-byte numeric head of a range request. The name
/// length is unknown until this is read, hence the two-stage decode.
pub fn decode_range_header(buf: &[u8; RANGE_HEADER_LEN]) -> RangeHeader {
    RangeHeader {
        size: u64_le(&buf[0..8]),
        offset: u64_le(&buf[8..16]),
        name_len: u64_le(&buf[16..24]),
    }
}

/// Decode the trailing name bytes of a range request.
pub fn decode_range_name(buf: &[u8]) -> Result<String, RequestDecodeError> {
    String::from_utf8(buf.to_vec()).map_err(|_| RequestDecodeError::NameNotUtf8)
}

/// Encode the 32-byte response frame sent before the raw file bytes.
/// Echoes the command id; `size` is the byte count about to follow.
pub fn encode_response_header(command: Command, size: u64) -> [u8; COMMAND_FRAME_LEN] {
    let mut out = [0u8; COMMAND_FRAME_LEN];
    out[0..4].copy_from_slice(COMMAND_MAGIC);
    out[4] = RESPONSE_TYPE;
    out[8..12].copy_from_slice(&command.id().to_le_bytes());
    out[12..20].copy_from_slice(&size.to_le_bytes());
    out
}

/// Error decoding a range-request sub-message.
#[derive(Debug, thiserror::Error)]
pub enum RequestDecodeError {
    #[error("file name is not valid UTF-8")]
    NameNotUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_layout() {
        let m = Manifest::build(vec!["a.nsp".into(), "sub/b.nsp".into()]).unwrap();
        let bytes = encode_announcement(&m);
        assert_eq!(&bytes[0..4], b"TUL0");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 16);
        assert_eq!(&bytes[8..16], &[0u8; 8]);
        assert_eq!(&bytes[16..], b"a.nsp\nsub/b.nsp\n");
    }

    #[test]
    fn response_header_roundtrips_through_command_decode() {
        let frame = encode_response_header(Command::FileRange, 9_000_000);
        let decoded = decode_command_frame(&frame).unwrap();
        assert_eq!(decoded.frame_type, RESPONSE_TYPE);
        assert_eq!(decoded.command, Command::FileRange);
        assert_eq!(decoded.payload_size, 9_000_000);
    }

    #[test]
    fn bad_magic_yields_none() {
        let mut frame = encode_response_header(Command::Exit, 0);
        frame[0] = b'X';
        assert!(decode_command_frame(&frame).is_none());
    }

    #[test]
    fn unrecognized_id_still_decodes() {
        let mut frame = [0u8; COMMAND_FRAME_LEN];
        frame[0..4].copy_from_slice(COMMAND_MAGIC);
        frame[8..12].copy_from_slice(&42u32.to_le_bytes());
        let decoded = decode_command_frame(&frame).unwrap();
        assert_eq!(decoded.command, Command::Unrecognized(42));
    }

    #[test]
    fn range_header_fields() {
        let mut buf = [0u8; RANGE_HEADER_LEN];
        buf[0..8].copy_from_slice(&4096u64.to_le_bytes());
        buf[8..16].copy_from_slice(&8192u64.to_le_bytes());
        buf[16..24].copy_from_slice(&9u64.to_le_bytes());
        let h = decode_range_header(&buf);
        assert_eq!(h.size, 4096);
        assert_eq!(h.offset, 8192);
        assert_eq!(h.name_len, 9);
    }

    #[test]
    fn range_name_rejects_invalid_utf8() {
        assert_eq!(decode_range_name(b"game.nsp").unwrap(), "game.nsp");
        assert!(decode_range_name(&[0xFF, 0xFE]).is_err());
    }
}
