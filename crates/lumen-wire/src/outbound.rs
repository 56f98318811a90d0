//! Outbound message framing.
//!
//! An [`OutboundMessage`] packs a typed payload into a header-prefixed
//! buffer ready for transmission, and lazily produces a compressed copy
//! the first time a peer asks for one. Peers that negotiated compression
//! and peers that did not can share one instance: each requests the form
//! it wants and the compressed form is built at most once.

use crate::compression::{self, Algorithm, Compressed};
use crate::header::{write_header, HEADER_SIZE, MAX_HEADER_PAYLOAD};
use crate::message::{MessageType, Payload};
use crate::{WireError, WireResult};
use std::sync::OnceLock;
use tracing::debug;

/// Payloads at or below this size are never worth compressing.
const MIN_COMPRESSIBLE_BYTES: usize = 70;

/// Assigns a traffic-accounting category to a message.
pub trait Classifier {
    /// Categorize `msg` for traffic accounting.
    fn classify<M: Payload>(&self, msg: &M, message_type: MessageType, inbound: bool) -> u32;
}

/// Whether compression is attempted for a message type and payload size.
///
/// Bulk list-like messages benefit from LZ4; small control messages do
/// not, whatever their type.
pub fn compressible(message_type: u16, payload_size: usize) -> bool {
    if payload_size <= MIN_COMPRESSIBLE_BYTES {
        return false;
    }
    matches!(
        MessageType::try_from(message_type),
        Ok(MessageType::Manifests
            | MessageType::Endpoints
            | MessageType::Transaction
            | MessageType::GetLedger
            | MessageType::LedgerData
            | MessageType::GetObjects
            | MessageType::ValidatorList)
    )
}

/// A framed message ready for transmission.
#[derive(Debug)]
pub struct OutboundMessage {
    /// Header plus serialized payload. Never changes after construction.
    buffer: Vec<u8>,
    /// Compressed form, built at most once. An empty vector means the
    /// attempt was made and the result was not kept.
    buffer_compressed: OnceLock<Vec<u8>>,
    /// Traffic-accounting category.
    category: u32,
}

impl OutboundMessage {
    /// Frame `msg` with an uncompressed header.
    pub fn new<M: Payload, C: Classifier>(
        msg: &M,
        message_type: MessageType,
        classifier: &C,
    ) -> WireResult<Self> {
        let message_bytes = msg.byte_size();
        if message_bytes == 0 {
            return Err(WireError::EmptyPayload);
        }
        if message_bytes > MAX_HEADER_PAYLOAD as usize {
            return Err(WireError::MessageSize {
                size: message_bytes,
                max: MAX_HEADER_PAYLOAD as usize,
            });
        }

        let mut buffer = Vec::with_capacity(HEADER_SIZE + message_bytes);
        buffer.resize(HEADER_SIZE, 0);
        write_header(
            &mut buffer,
            message_bytes as u32,
            message_type as u16,
            Compressed::Off,
            Algorithm::None,
        );
        msg.serialize_to(&mut buffer);
        debug_assert_eq!(buffer.len(), HEADER_SIZE + message_bytes);

        Ok(Self {
            buffer,
            buffer_compressed: OnceLock::new(),
            category: classifier.classify(msg, message_type, false),
        })
    }

    /// The framed bytes in the requested form.
    ///
    /// Requesting the compressed form runs the compression attempt at
    /// most once, even across threads; when the attempt kept nothing the
    /// plain buffer is returned instead.
    pub fn buffer(&self, compressed: Compressed) -> &[u8] {
        if compressed == Compressed::Off {
            return &self.buffer;
        }
        let attempt = self.buffer_compressed.get_or_init(|| self.compress());
        if attempt.is_empty() {
            &self.buffer
        } else {
            attempt
        }
    }

    /// The traffic-accounting category.
    pub fn category(&self) -> u32 {
        self.category
    }

    /// The message type tag, recovered from the header.
    pub fn message_type(&self) -> u16 {
        u16::from_be_bytes([self.buffer[4], self.buffer[5]])
    }

    /// Build the compressed form, or an empty vector when the policy
    /// forbids it, compression does not save bytes, or the codec fails.
    fn compress(&self) -> Vec<u8> {
        let payload = &self.buffer[HEADER_SIZE..];
        let message_type = self.message_type();

        if !compressible(message_type, payload.len()) {
            return Vec::new();
        }

        let mut compressed = Vec::new();
        let result = compression::compress(payload, Algorithm::Lz4, |size| {
            compressed.resize(HEADER_SIZE + size, 0);
            &mut compressed[HEADER_SIZE..]
        });

        match result {
            Ok(size) if size < payload.len() => {
                compressed.truncate(HEADER_SIZE + size);
                write_header(
                    &mut compressed,
                    size as u32,
                    message_type,
                    Compressed::On,
                    Algorithm::Lz4,
                );
                compressed
            }
            Ok(_) => Vec::new(),
            Err(err) => {
                debug!(%err, message_type, "payload compression failed, keeping plain form");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::parse_header;
    use crate::message::{Manifests, Ping};
    use bytes::Bytes;

    struct FlatClassifier;

    impl Classifier for FlatClassifier {
        fn classify<M: Payload>(&self, _msg: &M, message_type: MessageType, _inbound: bool) -> u32 {
            message_type as u32
        }
    }

    fn manifests(fill: u8, len: usize) -> Manifests {
        Manifests {
            list: vec![Bytes::from(vec![fill; len])],
        }
    }

    #[test]
    fn test_policy_table() {
        assert!(compressible(MessageType::Manifests as u16, 200));
        assert!(compressible(MessageType::Endpoints as u16, 71));
        assert!(compressible(MessageType::Transaction as u16, 200));
        assert!(compressible(MessageType::GetLedger as u16, 200));
        assert!(compressible(MessageType::LedgerData as u16, 200));
        assert!(compressible(MessageType::GetObjects as u16, 200));
        assert!(compressible(MessageType::ValidatorList as u16, 200));

        // Size floor applies to every type.
        assert!(!compressible(MessageType::Manifests as u16, 70));
        assert!(!compressible(MessageType::Manifests as u16, 1));

        // Control messages never compress.
        assert!(!compressible(MessageType::Ping as u16, 200));
        assert!(!compressible(MessageType::Cluster as u16, 200));
        assert!(!compressible(MessageType::ProposeLedger as u16, 200));
        assert!(!compressible(MessageType::StatusChange as u16, 200));
        assert!(!compressible(MessageType::HaveSet as u16, 200));
        assert!(!compressible(MessageType::Validation as u16, 200));
        assert!(!compressible(MessageType::GetShardInfo as u16, 200));
        assert!(!compressible(9999, 200));
    }

    #[test]
    fn test_buffer_layout() {
        let msg = Ping {
            kind: crate::message::PingKind::Ping,
            seq: 1,
        };
        let out = OutboundMessage::new(&msg, MessageType::Ping, &FlatClassifier).unwrap();
        let buf = out.buffer(Compressed::Off);
        let hdr = parse_header(buf).unwrap().unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 5);
        assert_eq!(hdr.payload_wire_size, 5);
        assert_eq!(hdr.message_type, MessageType::Ping as u16);
        assert!(!hdr.compressed);
        assert_eq!(out.message_type(), 3);
        assert_eq!(out.category(), 3);
    }

    #[test]
    fn test_compressed_form_kept_when_smaller() {
        let out =
            OutboundMessage::new(&manifests(0x41, 200), MessageType::Manifests, &FlatClassifier)
                .unwrap();
        let plain = out.buffer(Compressed::Off).to_vec();
        let packed = out.buffer(Compressed::On);
        assert!(packed.len() < plain.len());
        assert_eq!(packed[0] & 0xf0, 0x90);
        assert_eq!(&packed[4..6], &[0x00, 0x02]);
        let hdr = parse_header(packed).unwrap().unwrap();
        assert!(hdr.compressed);
        assert_eq!(hdr.algorithm, Algorithm::Lz4 as u8);
        assert_eq!(hdr.payload_wire_size as usize, packed.len() - HEADER_SIZE);
    }

    #[test]
    fn test_small_message_stays_plain() {
        // Below the size floor the compressed request returns the plain
        // bytes untouched.
        let out =
            OutboundMessage::new(&manifests(0x41, 40), MessageType::Manifests, &FlatClassifier)
                .unwrap();
        assert_eq!(out.buffer(Compressed::On), out.buffer(Compressed::Off));
        assert_eq!(out.buffer(Compressed::On)[0], 0x00);
    }

    #[test]
    fn test_incompressible_type_stays_plain() {
        let out = OutboundMessage::new(
            &crate::message::Validation {
                validation: Bytes::from(vec![0x41; 200]),
            },
            MessageType::Validation,
            &FlatClassifier,
        )
        .unwrap();
        assert_eq!(out.buffer(Compressed::On), out.buffer(Compressed::Off));
    }

    #[test]
    fn test_incompressible_content_stays_plain() {
        // A short non-repeating payload grows under LZ4 framing, so the
        // strictly-smaller rule drops the attempt.
        let body: Vec<u8> = (0..200u32).map(|i| i as u8).collect();
        let out = OutboundMessage::new(
            &Manifests {
                list: vec![Bytes::from(body)],
            },
            MessageType::Manifests,
            &FlatClassifier,
        )
        .unwrap();
        assert_eq!(out.buffer(Compressed::On), out.buffer(Compressed::Off));
    }

    #[test]
    fn test_compression_attempted_once() {
        let out =
            OutboundMessage::new(&manifests(0x41, 200), MessageType::Manifests, &FlatClassifier)
                .unwrap();
        let first = out.buffer(Compressed::On).as_ptr();
        let second = out.buffer(Compressed::On).as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_payload_rejected() {
        #[derive(Default)]
        struct EmptyBody;

        impl Payload for EmptyBody {
            fn byte_size(&self) -> usize {
                0
            }
            fn serialize_to(&self, _buf: &mut Vec<u8>) {}
            fn parse<'s, 'a, S: crate::stream::ChunkSource<'a>>(
                _reader: &mut crate::stream::ChunkReader<'s, 'a, S>,
            ) -> WireResult<Self> {
                Ok(EmptyBody)
            }
        }

        let err = OutboundMessage::new(&EmptyBody, MessageType::Ping, &FlatClassifier).unwrap_err();
        assert!(matches!(err, WireError::EmptyPayload));
    }
}
