//! 6-byte wire message header.
//!
//! Every protocol message starts with a fixed header:
//!
//! ```text
//! byte 0: C A A A 0 0 S S   C = compressed flag
//!                           A = compression algorithm (LZ4 = 1)
//!                           S = top 2 bits of payload size
//! byte 1..3:                remaining 24 bits of payload size
//! byte 4..5:                message type (big-endian)
//! ```
//!
//! The payload size therefore occupies 26 bits, recovered by masking the
//! first four bytes with `0x03FF_FFFF`. An uncompressed header must have
//! bits 7..2 of byte 0 clear; a compressed header must carry a known
//! algorithm id and clear reserved bits 3..2.

use crate::compression::{Algorithm, Compressed};
use crate::{WireError, WireResult};

/// Number of bytes in a message header.
pub const HEADER_SIZE: usize = 6;

/// Largest payload size the 26-bit header field can carry.
pub const MAX_HEADER_PAYLOAD: u32 = 0x03FF_FFFF;

/// Parsed wire message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Header plus payload size on the wire.
    pub total_wire_size: u32,
    /// Size of the header itself. Always [`HEADER_SIZE`].
    pub header_size: u32,
    /// Payload size on the wire (compressed size when compressed).
    pub payload_wire_size: u32,
    /// Message type tag.
    pub message_type: u16,
    /// Whether the payload is compressed.
    pub compressed: bool,
    /// Compression algorithm id. Zero when uncompressed.
    pub algorithm: u8,
}

/// Write a header into the first [`HEADER_SIZE`] bytes of `buf`.
pub fn write_header(
    buf: &mut [u8],
    payload_size: u32,
    message_type: u16,
    compressed: Compressed,
    algorithm: Algorithm,
) {
    debug_assert!(payload_size <= MAX_HEADER_PAYLOAD);
    let flags = match compressed {
        Compressed::On => 0x80 | ((algorithm as u8) << 4),
        Compressed::Off => 0x00,
    };
    buf[0] = ((payload_size >> 24) as u8) | flags;
    buf[1] = (payload_size >> 16) as u8;
    buf[2] = (payload_size >> 8) as u8;
    buf[3] = payload_size as u8;
    buf[4] = (message_type >> 8) as u8;
    buf[5] = message_type as u8;
}

/// Parse a header from the front of `buf`.
///
/// Returns `Ok(None)` when fewer than [`HEADER_SIZE`] bytes are
/// available. Rejects uncompressed headers with any of bits 7..2 of
/// byte 0 set, compressed headers with reserved bits 3..2 set, and
/// compressed headers carrying an unknown algorithm id.
pub fn parse_header(buf: &[u8]) -> WireResult<Option<Header>> {
    if buf.len() < HEADER_SIZE {
        return Ok(None);
    }

    let compressed = buf[0] & 0x80 != 0;
    let algorithm = (buf[0] & 0x70) >> 4;

    if compressed {
        if buf[0] & 0x0c != 0 {
            return Err(WireError::ReservedBits);
        }
        if algorithm != Algorithm::Lz4 as u8 {
            return Err(WireError::UnknownAlgorithm(algorithm));
        }
    } else if buf[0] & 0xfc != 0 {
        return Err(WireError::ReservedBits);
    }

    let payload_wire_size =
        u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) & MAX_HEADER_PAYLOAD;
    let message_type = u16::from_be_bytes([buf[4], buf[5]]);

    Ok(Some(Header {
        total_wire_size: HEADER_SIZE as u32 + payload_wire_size,
        header_size: HEADER_SIZE as u32,
        payload_wire_size,
        message_type,
        compressed,
        algorithm: if compressed { algorithm } else { 0 },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_uncompressed() {
        let mut buf = [0u8; HEADER_SIZE];
        for size in [0u32, 1, 200, 70, 0x03FF_FFFF] {
            for ty in [2u16, 3, 54, 0xffff] {
                write_header(&mut buf, size, ty, Compressed::Off, Algorithm::None);
                let hdr = parse_header(&buf).unwrap().unwrap();
                assert_eq!(hdr.payload_wire_size, size);
                assert_eq!(hdr.message_type, ty);
                assert_eq!(hdr.header_size, 6);
                assert_eq!(hdr.total_wire_size, 6 + size);
                assert!(!hdr.compressed);
                assert_eq!(hdr.algorithm, 0);
            }
        }
    }

    #[test]
    fn test_roundtrip_compressed() {
        let mut buf = [0u8; HEADER_SIZE];
        write_header(&mut buf, 194, 2, Compressed::On, Algorithm::Lz4);
        assert_eq!(buf[0] & 0xf0, 0x90);
        let hdr = parse_header(&buf).unwrap().unwrap();
        assert!(hdr.compressed);
        assert_eq!(hdr.algorithm, Algorithm::Lz4 as u8);
        assert_eq!(hdr.payload_wire_size, 194);
        assert_eq!(hdr.message_type, 2);
    }

    #[test]
    fn test_short_input() {
        assert!(parse_header(&[0u8; 5]).unwrap().is_none());
        assert!(parse_header(&[]).unwrap().is_none());
    }

    #[test]
    fn test_reserved_bits_rejected() {
        // Uncompressed header with bit 2 set.
        let buf = [0x04, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(parse_header(&buf), Err(WireError::ReservedBits)));
        // Uncompressed header with an algorithm bit set.
        let buf = [0x10, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(parse_header(&buf), Err(WireError::ReservedBits)));
        // Compressed header with reserved bits 3..2 set.
        let buf = [0x94, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(parse_header(&buf), Err(WireError::ReservedBits)));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        // Compressed flag with algorithm id 2.
        let buf = [0xa0, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(
            parse_header(&buf),
            Err(WireError::UnknownAlgorithm(2))
        ));
    }

    #[test]
    fn test_size_bits_do_not_leak_into_flags() {
        let mut buf = [0u8; HEADER_SIZE];
        write_header(&mut buf, MAX_HEADER_PAYLOAD, 3, Compressed::On, Algorithm::Lz4);
        assert_eq!(buf[0], 0x93);
        let hdr = parse_header(&buf).unwrap().unwrap();
        assert_eq!(hdr.payload_wire_size, MAX_HEADER_PAYLOAD);
    }
}
