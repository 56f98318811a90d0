//! Inbound message demultiplexing.
//!
//! The demultiplexer consumes whole messages from a scatter-gather byte
//! queue: each call either delivers exactly one message to the handler
//! and reports its wire size consumed, or consumes nothing because more
//! bytes are needed, or reports an error as a value next to the consumed
//! count so the caller can keep the stream aligned.

use crate::compression::{self, Algorithm};
use crate::header::{parse_header, Header, HEADER_SIZE};
use crate::message::{
    Cluster, Endpoints, GetLedger, GetObjects, GetPeerShardInfo, GetShardInfo, HaveSet,
    LedgerData, Manifests, MessageType, Payload, PeerShardInfo, Ping, ProposeLedger,
    ProtocolMessage, ShardInfo, StatusChange, Transaction, Validation, ValidatorList,
};
use crate::stream::{ChunkReader, ChunkSource, SegmentCursor};
use crate::{WireError, WireResult, MAX_DECOMPRESSED_SIZE, MAX_PAYLOAD_SIZE};
use tracing::{debug, trace};

/// Returns the name of a protocol message given its type.
pub fn message_name(message_type: u16) -> &'static str {
    match MessageType::try_from(message_type) {
        Ok(MessageType::Manifests) => "manifests",
        Ok(MessageType::Ping) => "ping",
        Ok(MessageType::Cluster) => "cluster",
        Ok(MessageType::Endpoints) => "endpoints",
        Ok(MessageType::Transaction) => "tx",
        Ok(MessageType::GetLedger) => "get_ledger",
        Ok(MessageType::LedgerData) => "ledger_data",
        Ok(MessageType::ProposeLedger) => "propose",
        Ok(MessageType::StatusChange) => "status",
        Ok(MessageType::HaveSet) => "have_set",
        Ok(MessageType::Validation) => "validation",
        Ok(MessageType::GetObjects) => "get_objects",
        Ok(MessageType::GetShardInfo) => "get_shard_info",
        Ok(MessageType::ShardInfo) => "shard_info",
        Ok(MessageType::GetPeerShardInfo) => "get_peer_shard_info",
        Ok(MessageType::PeerShardInfo) => "peer_shard_info",
        Ok(MessageType::ValidatorList) => "validator_list",
        Err(_) => "unknown",
    }
}

/// Callbacks invoked as messages are decoded.
pub trait MessageHandler {
    /// Called before `on_message`, with the payload's wire size.
    fn on_message_begin(&mut self, _message_type: u16, _msg: &ProtocolMessage, _payload_wire_size: u32) {}

    /// Called once per decoded message.
    fn on_message(&mut self, msg: &ProtocolMessage);

    /// Called after `on_message`.
    fn on_message_end(&mut self, _message_type: u16, _msg: &ProtocolMessage) {}

    /// Called for message types this node does not know. Counts as
    /// successful delivery.
    fn on_message_unknown(&mut self, _message_type: u16) {}
}

/// Inbound message demultiplexer.
#[derive(Debug, Clone)]
pub struct MessageDemux {
    /// Largest payload accepted on the wire.
    max_payload_size: usize,
    /// Largest declared original size the decompressor will allocate.
    max_decompressed_size: usize,
}

impl Default for MessageDemux {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            max_decompressed_size: MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl MessageDemux {
    /// Create a demultiplexer with the protocol's default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a demultiplexer with custom size limits.
    pub fn with_limits(max_payload_size: usize, max_decompressed_size: usize) -> Self {
        Self {
            max_payload_size,
            max_decompressed_size,
        }
    }

    /// Decode and deliver up to one message from `buffers`.
    ///
    /// Returns the bytes consumed and an error, if any. Zero consumed
    /// with no error means more bytes are needed. A delivered or dropped
    /// message consumes its full wire size, so repeated calls drain the
    /// queue in arrival order.
    pub fn dispatch<B, H>(&self, buffers: &[B], handler: &mut H) -> (usize, Option<WireError>)
    where
        B: AsRef<[u8]>,
        H: MessageHandler,
    {
        let total: usize = buffers.iter().map(|b| b.as_ref().len()).sum();
        if total < HEADER_SIZE {
            return (0, None);
        }

        let mut raw = [0u8; HEADER_SIZE];
        let mut filled = 0;
        'fill: for segment in buffers {
            for &byte in segment.as_ref() {
                raw[filled] = byte;
                filled += 1;
                if filled == HEADER_SIZE {
                    break 'fill;
                }
            }
        }

        let header = match parse_header(&raw) {
            Ok(Some(header)) => header,
            // Unreachable: the total length was checked above.
            Ok(None) => return (0, None),
            Err(err) => return (0, Some(err)),
        };

        if header.payload_wire_size as usize > self.max_payload_size {
            return (
                0,
                Some(WireError::MessageSize {
                    size: header.payload_wire_size as usize,
                    max: self.max_payload_size,
                }),
            );
        }

        if header.total_wire_size as usize > total {
            return (0, None);
        }

        trace!(
            message_type = header.message_type,
            payload_wire_size = header.payload_wire_size,
            compressed = header.compressed,
            "dispatching {}",
            message_name(header.message_type)
        );

        let result = match MessageType::try_from(header.message_type) {
            Err(_) => {
                debug!(message_type = header.message_type, "unknown message type");
                handler.on_message_unknown(header.message_type);
                Ok(())
            }
            Ok(MessageType::Manifests) => {
                self.invoke::<Manifests, _, _>(&header, buffers, handler, ProtocolMessage::Manifests)
            }
            Ok(MessageType::Ping) => {
                self.invoke::<Ping, _, _>(&header, buffers, handler, ProtocolMessage::Ping)
            }
            Ok(MessageType::Cluster) => {
                self.invoke::<Cluster, _, _>(&header, buffers, handler, ProtocolMessage::Cluster)
            }
            Ok(MessageType::Endpoints) => {
                self.invoke::<Endpoints, _, _>(&header, buffers, handler, ProtocolMessage::Endpoints)
            }
            Ok(MessageType::Transaction) => self.invoke::<Transaction, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::Transaction,
            ),
            Ok(MessageType::GetLedger) => {
                self.invoke::<GetLedger, _, _>(&header, buffers, handler, ProtocolMessage::GetLedger)
            }
            Ok(MessageType::LedgerData) => self.invoke::<LedgerData, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::LedgerData,
            ),
            Ok(MessageType::ProposeLedger) => self.invoke::<ProposeLedger, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::ProposeLedger,
            ),
            Ok(MessageType::StatusChange) => self.invoke::<StatusChange, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::StatusChange,
            ),
            Ok(MessageType::HaveSet) => {
                self.invoke::<HaveSet, _, _>(&header, buffers, handler, ProtocolMessage::HaveSet)
            }
            Ok(MessageType::Validation) => self.invoke::<Validation, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::Validation,
            ),
            Ok(MessageType::GetObjects) => self.invoke::<GetObjects, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::GetObjects,
            ),
            Ok(MessageType::GetShardInfo) => self.invoke::<GetShardInfo, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::GetShardInfo,
            ),
            Ok(MessageType::ShardInfo) => {
                self.invoke::<ShardInfo, _, _>(&header, buffers, handler, ProtocolMessage::ShardInfo)
            }
            Ok(MessageType::GetPeerShardInfo) => self.invoke::<GetPeerShardInfo, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::GetPeerShardInfo,
            ),
            Ok(MessageType::PeerShardInfo) => self.invoke::<PeerShardInfo, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::PeerShardInfo,
            ),
            Ok(MessageType::ValidatorList) => self.invoke::<ValidatorList, _, _>(
                &header,
                buffers,
                handler,
                ProtocolMessage::ValidatorList,
            ),
        };

        match result {
            Ok(()) => (header.total_wire_size as usize, None),
            Err(err) => (header.total_wire_size as usize, Some(err)),
        }
    }

    /// Decode one payload of type `M` and run the handler callbacks.
    ///
    /// A zero-byte payload decodes as the type's default value.
    fn invoke<M, B, H>(
        &self,
        header: &Header,
        buffers: &[B],
        handler: &mut H,
        wrap: fn(M) -> ProtocolMessage,
    ) -> WireResult<()>
    where
        M: Payload,
        B: AsRef<[u8]>,
        H: MessageHandler,
    {
        let msg = if header.payload_wire_size == 0 {
            M::default()
        } else if header.compressed {
            let algorithm = Algorithm::try_from(header.algorithm)?;
            let mut cursor = SegmentCursor::new(buffers);
            cursor.skip(HEADER_SIZE);
            let mut decompressed = Vec::new();
            let size = compression::decompress(
                &mut cursor,
                header.payload_wire_size as usize,
                self.max_decompressed_size,
                algorithm,
                |size| {
                    decompressed.resize(size, 0);
                    &mut decompressed[..]
                },
            )?;
            M::parse_from(&decompressed[..size])?
        } else {
            let mut cursor = SegmentCursor::new(buffers);
            cursor.skip(HEADER_SIZE);
            let mut reader = ChunkReader::new(&mut cursor, header.payload_wire_size as usize);
            let msg = M::parse(&mut reader)?;
            if reader.remaining() != 0 {
                return Err(WireError::BadMessage("trailing payload bytes".into()));
            }
            msg
        };

        let msg = wrap(msg);
        handler.on_message_begin(header.message_type, &msg, header.payload_wire_size);
        handler.on_message(&msg);
        handler.on_message_end(header.message_type, &msg);

        Ok(())
    }
}
