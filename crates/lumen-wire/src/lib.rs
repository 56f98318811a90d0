//! # lumen-wire
//!
//! Wire-message codec for the Lumen ledger node's P2P overlay.
//!
//! Every message travels as a 6-byte header followed by the payload:
//!
//! ```text
//! +--------+-----------+--------------+------------------+
//! | Flags  |  Payload  |   Message    |     Payload      |
//! | 6 bits |   size    |    type      |  (size bytes)    |
//! |        |  26 bits  |   16 bits    |                  |
//! +--------+-----------+--------------+------------------+
//! ```
//!
//! This crate provides:
//! - bit-exact header packing and parsing
//! - outbound framing with opt-in, at-most-once LZ4 payload compression
//! - an inbound demultiplexer that decodes whole messages from
//!   scatter-gather buffers and routes them to a handler
//! - the LZ4-frame streaming codec with a varint original-size prefix

mod compression;
mod error;
mod header;
mod message;
mod outbound;
mod protocol;
mod stream;
mod varint;

pub use compression::{compress, compress_bound, decompress, Algorithm, Compressed};
pub use error::{WireError, WireResult};
pub use header::{parse_header, write_header, Header, HEADER_SIZE, MAX_HEADER_PAYLOAD};
pub use message::{
    Cluster, ClusterNode, Endpoint, Endpoints, GetLedger, GetObjects, GetPeerShardInfo,
    GetShardInfo, HaveSet, LedgerData, Manifests, MessageType, Payload, PeerShardInfo, Ping,
    PingKind, ProposeLedger, ProtocolMessage, ShardInfo, StatusChange, Transaction, Validation,
    ValidatorList,
};
pub use outbound::{compressible, Classifier, OutboundMessage};
pub use protocol::{message_name, MessageDemux, MessageHandler};
pub use stream::{ChunkReader, ChunkSource, SegmentCursor};
pub use varint::{read_varint, size_varint, varint_max, write_varint};

/// Largest payload the demultiplexer accepts on the wire.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Largest declared original size the decompressor will allocate.
pub const MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;
