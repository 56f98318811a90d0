//! Typed protocol messages.
//!
//! Every message the overlay routes is registered here: the numeric type
//! tags carried in the wire header, one struct per message with its
//! binary layout, and the [`Payload`] trait the framing layer uses to
//! serialize and parse them. Integers are big-endian; variable-length
//! fields carry a VLQ length prefix (7 value bits per byte, high bit
//! marks continuation).

use crate::stream::{ChunkReader, ChunkSource, SegmentCursor};
use crate::{WireError, WireResult};
use bytes::{BufMut, Bytes};

/// Message type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    /// Validator manifest broadcast.
    Manifests = 2,
    /// Liveness probe.
    Ping = 3,
    /// Cluster node report.
    Cluster = 5,
    /// Peer endpoint gossip.
    Endpoints = 15,
    /// Transaction relay.
    Transaction = 30,
    /// Ledger data request.
    GetLedger = 31,
    /// Ledger data response.
    LedgerData = 32,
    /// Consensus proposal.
    ProposeLedger = 33,
    /// Node status change.
    StatusChange = 34,
    /// Transaction set announcement.
    HaveSet = 35,
    /// Validation relay.
    Validation = 41,
    /// Object fetch by hash.
    GetObjects = 42,
    /// Shard info request.
    GetShardInfo = 50,
    /// Shard info response.
    ShardInfo = 51,
    /// Peer shard info request.
    GetPeerShardInfo = 52,
    /// Peer shard info response.
    PeerShardInfo = 53,
    /// Published validator list.
    ValidatorList = 54,
}

impl TryFrom<u16> for MessageType {
    type Error = WireError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(MessageType::Manifests),
            3 => Ok(MessageType::Ping),
            5 => Ok(MessageType::Cluster),
            15 => Ok(MessageType::Endpoints),
            30 => Ok(MessageType::Transaction),
            31 => Ok(MessageType::GetLedger),
            32 => Ok(MessageType::LedgerData),
            33 => Ok(MessageType::ProposeLedger),
            34 => Ok(MessageType::StatusChange),
            35 => Ok(MessageType::HaveSet),
            41 => Ok(MessageType::Validation),
            42 => Ok(MessageType::GetObjects),
            50 => Ok(MessageType::GetShardInfo),
            51 => Ok(MessageType::ShardInfo),
            52 => Ok(MessageType::GetPeerShardInfo),
            53 => Ok(MessageType::PeerShardInfo),
            54 => Ok(MessageType::ValidatorList),
            _ => Err(WireError::BadMessage(format!(
                "unknown message type: {}",
                value
            ))),
        }
    }
}

/// A message body the framing layer can serialize and parse.
///
/// Parsers reject trailing bytes and truncated fields. Zero-byte
/// payloads never reach a parser: the demultiplexer delivers the type's
/// default value for them instead.
pub trait Payload: Default {
    /// Serialized size in bytes.
    fn byte_size(&self) -> usize;

    /// Append the serialized body to `buf`.
    fn serialize_to(&self, buf: &mut Vec<u8>);

    /// Parse a body from a bounded reader over scatter-gather input.
    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self>;

    /// Parse a body from a contiguous buffer.
    fn parse_from(bytes: &[u8]) -> WireResult<Self> {
        let segments = [bytes];
        let mut cur = SegmentCursor::new(&segments);
        let mut reader = ChunkReader::new(&mut cur, bytes.len());
        let msg = Self::parse(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(WireError::BadMessage("trailing payload bytes".into()));
        }
        Ok(msg)
    }
}

fn put_vlq(buf: &mut Vec<u8>, value: u64) {
    let mut value = value;
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

fn vlq_len(value: u64) -> usize {
    let mut len = 1;
    let mut value = value >> 7;
    while value != 0 {
        len += 1;
        value >>= 7;
    }
    len
}

fn put_blob(buf: &mut Vec<u8>, data: &[u8]) {
    put_vlq(buf, data.len() as u64);
    buf.put_slice(data);
}

fn blob_len(data: &[u8]) -> usize {
    vlq_len(data.len() as u64) + data.len()
}

fn parse_flag(byte: u8) -> WireResult<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(WireError::BadMessage(format!("invalid flag byte: {}", other))),
    }
}

/// Validator manifest broadcast. Each entry is an opaque signed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifests {
    /// Serialized manifests.
    pub list: Vec<Bytes>,
}

impl Payload for Manifests {
    fn byte_size(&self) -> usize {
        vlq_len(self.list.len() as u64)
            + self.list.iter().map(|m| blob_len(m)).sum::<usize>()
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_vlq(buf, self.list.len() as u64);
        for manifest in &self.list {
            put_blob(buf, manifest);
        }
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let count = reader.get_vlq()?;
        let mut list = Vec::new();
        for _ in 0..count {
            list.push(reader.get_blob()?);
        }
        Ok(Self { list })
    }
}

/// Liveness probe direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PingKind {
    /// Request.
    #[default]
    Ping = 0,
    /// Response.
    Pong = 1,
}

/// Liveness probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ping {
    /// Request or response.
    pub kind: PingKind,
    /// Sequence number echoed by the response.
    pub seq: u32,
}

impl Payload for Ping {
    fn byte_size(&self) -> usize {
        5
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.kind as u8);
        buf.put_u32(self.seq);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let kind = match reader.get_u8()? {
            0 => PingKind::Ping,
            1 => PingKind::Pong,
            other => {
                return Err(WireError::BadMessage(format!(
                    "invalid ping kind: {}",
                    other
                )))
            }
        };
        let seq = reader.get_u32()?;
        Ok(Self { kind, seq })
    }
}

/// One node in a cluster report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterNode {
    /// Node public key.
    pub public_key: Bytes,
    /// Report timestamp, seconds.
    pub report_time: u32,
    /// Load fee the node reports.
    pub node_load: u32,
}

/// Cluster node report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    /// Cluster members.
    pub nodes: Vec<ClusterNode>,
}

impl Payload for Cluster {
    fn byte_size(&self) -> usize {
        vlq_len(self.nodes.len() as u64)
            + self
                .nodes
                .iter()
                .map(|n| blob_len(&n.public_key) + 8)
                .sum::<usize>()
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_vlq(buf, self.nodes.len() as u64);
        for node in &self.nodes {
            put_blob(buf, &node.public_key);
            buf.put_u32(node.report_time);
            buf.put_u32(node.node_load);
        }
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let count = reader.get_vlq()?;
        let mut nodes = Vec::new();
        for _ in 0..count {
            nodes.push(ClusterNode {
                public_key: reader.get_blob()?,
                report_time: reader.get_u32()?,
                node_load: reader.get_u32()?,
            });
        }
        Ok(Self { nodes })
    }
}

/// One gossiped peer endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Host address as text.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Hops from the sender. Zero means the sender itself.
    pub hops: u32,
}

/// Peer endpoint gossip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    /// Gossip format version.
    pub version: u8,
    /// Known endpoints.
    pub endpoints: Vec<Endpoint>,
}

impl Payload for Endpoints {
    fn byte_size(&self) -> usize {
        1 + vlq_len(self.endpoints.len() as u64)
            + self
                .endpoints
                .iter()
                .map(|e| blob_len(e.host.as_bytes()) + 6)
                .sum::<usize>()
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.version);
        put_vlq(buf, self.endpoints.len() as u64);
        for endpoint in &self.endpoints {
            put_blob(buf, endpoint.host.as_bytes());
            buf.put_u16(endpoint.port);
            buf.put_u32(endpoint.hops);
        }
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let version = reader.get_u8()?;
        let count = reader.get_vlq()?;
        let mut endpoints = Vec::new();
        for _ in 0..count {
            endpoints.push(Endpoint {
                host: reader.get_string()?,
                port: reader.get_u16()?,
                hops: reader.get_u32()?,
            });
        }
        Ok(Self { version, endpoints })
    }
}

/// Transaction relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Serialized transaction.
    pub raw: Bytes,
    /// Relay status.
    pub status: u8,
    /// Receive timestamp, seconds.
    pub receive_timestamp: u64,
    /// Whether the sender deferred checking this transaction.
    pub deferred: bool,
}

impl Payload for Transaction {
    fn byte_size(&self) -> usize {
        blob_len(&self.raw) + 10
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_blob(buf, &self.raw);
        buf.put_u8(self.status);
        buf.put_u64(self.receive_timestamp);
        buf.put_u8(self.deferred as u8);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            raw: reader.get_blob()?,
            status: reader.get_u8()?,
            receive_timestamp: reader.get_u64()?,
            deferred: parse_flag(reader.get_u8()?)?,
        })
    }
}

/// Ledger data request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLedger {
    /// Kind of data requested.
    pub item_type: u8,
    /// Target ledger hash, when known.
    pub ledger_hash: Option<[u8; 32]>,
    /// Target ledger sequence.
    pub ledger_seq: u32,
}

impl Payload for GetLedger {
    fn byte_size(&self) -> usize {
        6 + self.ledger_hash.map_or(0, |_| 32)
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.item_type);
        match &self.ledger_hash {
            Some(hash) => {
                buf.put_u8(1);
                buf.put_slice(hash);
            }
            None => buf.put_u8(0),
        }
        buf.put_u32(self.ledger_seq);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let item_type = reader.get_u8()?;
        let ledger_hash = if parse_flag(reader.get_u8()?)? {
            let mut hash = [0u8; 32];
            reader.copy_to_slice(&mut hash)?;
            Some(hash)
        } else {
            None
        };
        let ledger_seq = reader.get_u32()?;
        Ok(Self {
            item_type,
            ledger_hash,
            ledger_seq,
        })
    }
}

/// Ledger data response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerData {
    /// Ledger this data belongs to.
    pub ledger_hash: [u8; 32],
    /// Ledger sequence.
    pub ledger_seq: u32,
    /// Kind of data carried.
    pub item_type: u8,
    /// Serialized nodes.
    pub nodes: Vec<Bytes>,
}

impl Payload for LedgerData {
    fn byte_size(&self) -> usize {
        37 + vlq_len(self.nodes.len() as u64)
            + self.nodes.iter().map(|n| blob_len(n)).sum::<usize>()
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_slice(&self.ledger_hash);
        buf.put_u32(self.ledger_seq);
        buf.put_u8(self.item_type);
        put_vlq(buf, self.nodes.len() as u64);
        for node in &self.nodes {
            put_blob(buf, node);
        }
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let mut ledger_hash = [0u8; 32];
        reader.copy_to_slice(&mut ledger_hash)?;
        let ledger_seq = reader.get_u32()?;
        let item_type = reader.get_u8()?;
        let count = reader.get_vlq()?;
        let mut nodes = Vec::new();
        for _ in 0..count {
            nodes.push(reader.get_blob()?);
        }
        Ok(Self {
            ledger_hash,
            ledger_seq,
            item_type,
            nodes,
        })
    }
}

/// Consensus proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposeLedger {
    /// Proposal sequence within the round.
    pub propose_seq: u32,
    /// Proposed close time, seconds.
    pub close_time: u32,
    /// Hash of the previous ledger.
    pub prev_ledger: [u8; 32],
    /// Proposed transaction set hash.
    pub position: [u8; 32],
    /// Proposer public key.
    pub public_key: Bytes,
    /// Proposal signature.
    pub signature: Bytes,
}

impl Payload for ProposeLedger {
    fn byte_size(&self) -> usize {
        72 + blob_len(&self.public_key) + blob_len(&self.signature)
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u32(self.propose_seq);
        buf.put_u32(self.close_time);
        buf.put_slice(&self.prev_ledger);
        buf.put_slice(&self.position);
        put_blob(buf, &self.public_key);
        put_blob(buf, &self.signature);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let propose_seq = reader.get_u32()?;
        let close_time = reader.get_u32()?;
        let mut prev_ledger = [0u8; 32];
        reader.copy_to_slice(&mut prev_ledger)?;
        let mut position = [0u8; 32];
        reader.copy_to_slice(&mut position)?;
        Ok(Self {
            propose_seq,
            close_time,
            prev_ledger,
            position,
            public_key: reader.get_blob()?,
            signature: reader.get_blob()?,
        })
    }
}

/// Node status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChange {
    /// New node status.
    pub status: u8,
    /// Event that caused the change.
    pub event: u8,
    /// Current ledger sequence.
    pub ledger_seq: u32,
    /// Current ledger hash.
    pub ledger_hash: [u8; 32],
    /// Sender network time, seconds.
    pub network_time: u64,
}

impl Payload for StatusChange {
    fn byte_size(&self) -> usize {
        46
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.status);
        buf.put_u8(self.event);
        buf.put_u32(self.ledger_seq);
        buf.put_slice(&self.ledger_hash);
        buf.put_u64(self.network_time);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let status = reader.get_u8()?;
        let event = reader.get_u8()?;
        let ledger_seq = reader.get_u32()?;
        let mut ledger_hash = [0u8; 32];
        reader.copy_to_slice(&mut ledger_hash)?;
        let network_time = reader.get_u64()?;
        Ok(Self {
            status,
            event,
            ledger_seq,
            ledger_hash,
            network_time,
        })
    }
}

/// Transaction set announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HaveSet {
    /// Whether the sender has or wants the set.
    pub status: u8,
    /// Transaction set hash.
    pub hash: [u8; 32],
}

impl Payload for HaveSet {
    fn byte_size(&self) -> usize {
        33
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.status);
        buf.put_slice(&self.hash);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let status = reader.get_u8()?;
        let mut hash = [0u8; 32];
        reader.copy_to_slice(&mut hash)?;
        Ok(Self { status, hash })
    }
}

/// Validation relay. The body is an opaque signed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Serialized validation.
    pub validation: Bytes,
}

impl Payload for Validation {
    fn byte_size(&self) -> usize {
        blob_len(&self.validation)
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_blob(buf, &self.validation);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            validation: reader.get_blob()?,
        })
    }
}

/// Object fetch by hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetObjects {
    /// True for a request, false for a reply.
    pub query: bool,
    /// Kind of objects requested.
    pub kind: u8,
    /// Object hashes.
    pub hashes: Vec<[u8; 32]>,
}

impl Payload for GetObjects {
    fn byte_size(&self) -> usize {
        2 + vlq_len(self.hashes.len() as u64) + 32 * self.hashes.len()
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.query as u8);
        buf.put_u8(self.kind);
        put_vlq(buf, self.hashes.len() as u64);
        for hash in &self.hashes {
            buf.put_slice(hash);
        }
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        let query = parse_flag(reader.get_u8()?)?;
        let kind = reader.get_u8()?;
        let count = reader.get_vlq()?;
        let mut hashes = Vec::new();
        for _ in 0..count {
            let mut hash = [0u8; 32];
            reader.copy_to_slice(&mut hash)?;
            hashes.push(hash);
        }
        Ok(Self {
            query,
            kind,
            hashes,
        })
    }
}

/// Shard info request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetShardInfo {
    /// Relay hop limit.
    pub hops: u8,
}

impl Payload for GetShardInfo {
    fn byte_size(&self) -> usize {
        1
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.hops);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            hops: reader.get_u8()?,
        })
    }
}

/// Shard info response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardInfo {
    /// Held shard index ranges, as text.
    pub shard_indexes: String,
}

impl Payload for ShardInfo {
    fn byte_size(&self) -> usize {
        blob_len(self.shard_indexes.as_bytes())
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_blob(buf, self.shard_indexes.as_bytes());
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            shard_indexes: reader.get_string()?,
        })
    }
}

/// Peer shard info request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPeerShardInfo {
    /// Relay hop limit.
    pub hops: u8,
    /// Whether intermediate peers should relay the request.
    pub relays: bool,
}

impl Payload for GetPeerShardInfo {
    fn byte_size(&self) -> usize {
        2
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.hops);
        buf.put_u8(self.relays as u8);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            hops: reader.get_u8()?,
            relays: parse_flag(reader.get_u8()?)?,
        })
    }
}

/// Peer shard info response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerShardInfo {
    /// Held shard index ranges, as text.
    pub shard_indexes: String,
    /// Reporting node public key.
    pub public_key: Bytes,
    /// Reporting node endpoint.
    pub endpoint: String,
}

impl Payload for PeerShardInfo {
    fn byte_size(&self) -> usize {
        blob_len(self.shard_indexes.as_bytes())
            + blob_len(&self.public_key)
            + blob_len(self.endpoint.as_bytes())
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_blob(buf, self.shard_indexes.as_bytes());
        put_blob(buf, &self.public_key);
        put_blob(buf, self.endpoint.as_bytes());
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            shard_indexes: reader.get_string()?,
            public_key: reader.get_blob()?,
            endpoint: reader.get_string()?,
        })
    }
}

/// Published validator list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorList {
    /// Publisher manifest.
    pub manifest: Bytes,
    /// Signed list blob.
    pub blob: Bytes,
    /// Signature over the blob.
    pub signature: Bytes,
    /// List format version.
    pub version: u32,
}

impl Payload for ValidatorList {
    fn byte_size(&self) -> usize {
        blob_len(&self.manifest) + blob_len(&self.blob) + blob_len(&self.signature) + 4
    }

    fn serialize_to(&self, buf: &mut Vec<u8>) {
        put_blob(buf, &self.manifest);
        put_blob(buf, &self.blob);
        put_blob(buf, &self.signature);
        buf.put_u32(self.version);
    }

    fn parse<'s, 'a, S: ChunkSource<'a>>(
        reader: &mut ChunkReader<'s, 'a, S>,
    ) -> WireResult<Self> {
        Ok(Self {
            manifest: reader.get_blob()?,
            blob: reader.get_blob()?,
            signature: reader.get_blob()?,
            version: reader.get_u32()?,
        })
    }
}

/// A parsed inbound message, as delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolMessage {
    /// Validator manifest broadcast.
    Manifests(Manifests),
    /// Liveness probe.
    Ping(Ping),
    /// Cluster node report.
    Cluster(Cluster),
    /// Peer endpoint gossip.
    Endpoints(Endpoints),
    /// Transaction relay.
    Transaction(Transaction),
    /// Ledger data request.
    GetLedger(GetLedger),
    /// Ledger data response.
    LedgerData(LedgerData),
    /// Consensus proposal.
    ProposeLedger(ProposeLedger),
    /// Node status change.
    StatusChange(StatusChange),
    /// Transaction set announcement.
    HaveSet(HaveSet),
    /// Validation relay.
    Validation(Validation),
    /// Object fetch by hash.
    GetObjects(GetObjects),
    /// Shard info request.
    GetShardInfo(GetShardInfo),
    /// Shard info response.
    ShardInfo(ShardInfo),
    /// Peer shard info request.
    GetPeerShardInfo(GetPeerShardInfo),
    /// Peer shard info response.
    PeerShardInfo(PeerShardInfo),
    /// Published validator list.
    ValidatorList(ValidatorList),
}

impl ProtocolMessage {
    /// The wire type tag of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            ProtocolMessage::Manifests(_) => MessageType::Manifests,
            ProtocolMessage::Ping(_) => MessageType::Ping,
            ProtocolMessage::Cluster(_) => MessageType::Cluster,
            ProtocolMessage::Endpoints(_) => MessageType::Endpoints,
            ProtocolMessage::Transaction(_) => MessageType::Transaction,
            ProtocolMessage::GetLedger(_) => MessageType::GetLedger,
            ProtocolMessage::LedgerData(_) => MessageType::LedgerData,
            ProtocolMessage::ProposeLedger(_) => MessageType::ProposeLedger,
            ProtocolMessage::StatusChange(_) => MessageType::StatusChange,
            ProtocolMessage::HaveSet(_) => MessageType::HaveSet,
            ProtocolMessage::Validation(_) => MessageType::Validation,
            ProtocolMessage::GetObjects(_) => MessageType::GetObjects,
            ProtocolMessage::GetShardInfo(_) => MessageType::GetShardInfo,
            ProtocolMessage::ShardInfo(_) => MessageType::ShardInfo,
            ProtocolMessage::GetPeerShardInfo(_) => MessageType::GetPeerShardInfo,
            ProtocolMessage::PeerShardInfo(_) => MessageType::PeerShardInfo,
            ProtocolMessage::ValidatorList(_) => MessageType::ValidatorList,
        }
    }
}
