//! End-to-end framing properties: encode through `OutboundMessage`,
//! decode through `MessageDemux`, across arbitrary payloads and
//! segmentations.

use bytes::Bytes;
use lumen_wire::{
    read_varint, size_varint, write_varint, Classifier, Cluster, ClusterNode, Compressed,
    Endpoint, Endpoints, GetLedger, GetObjects, GetPeerShardInfo, GetShardInfo, HaveSet,
    LedgerData, Manifests, MessageDemux, MessageHandler, MessageType, OutboundMessage, Payload,
    PeerShardInfo, Ping, PingKind, ProposeLedger, ProtocolMessage, ShardInfo, StatusChange,
    Transaction, Validation, ValidatorList,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

struct FlatClassifier;

impl Classifier for FlatClassifier {
    fn classify<M: Payload>(&self, _msg: &M, message_type: MessageType, _inbound: bool) -> u32 {
        message_type as u32
    }
}

#[derive(Default)]
struct CollectHandler {
    messages: Vec<ProtocolMessage>,
}

impl MessageHandler for CollectHandler {
    fn on_message(&mut self, msg: &ProtocolMessage) {
        self.messages.push(msg.clone());
    }
}

fn check_roundtrip<M>(msg: M, message_type: MessageType, wrap: fn(M) -> ProtocolMessage)
where
    M: Payload + Clone + PartialEq + std::fmt::Debug,
{
    for form in [Compressed::Off, Compressed::On] {
        let out = OutboundMessage::new(&msg, message_type, &FlatClassifier).unwrap();
        let bytes = out.buffer(form).to_vec();
        let mut handler = CollectHandler::default();
        let (consumed, err) = MessageDemux::new().dispatch(&[&bytes], &mut handler);
        assert!(err.is_none(), "{:?}: {:?}", message_type, err);
        assert_eq!(consumed, bytes.len());
        assert_eq!(handler.messages, vec![wrap(msg.clone())]);
    }
}

#[test]
fn every_registered_type_roundtrips() {
    check_roundtrip(
        Manifests {
            list: vec![Bytes::from(vec![0x41; 100]), Bytes::from(vec![0x42; 100])],
        },
        MessageType::Manifests,
        ProtocolMessage::Manifests,
    );
    check_roundtrip(
        Ping {
            kind: PingKind::Pong,
            seq: 77,
        },
        MessageType::Ping,
        ProtocolMessage::Ping,
    );
    check_roundtrip(
        Cluster {
            nodes: vec![ClusterNode {
                public_key: Bytes::from(vec![1; 33]),
                report_time: 745_000_000,
                node_load: 256,
            }],
        },
        MessageType::Cluster,
        ProtocolMessage::Cluster,
    );
    check_roundtrip(
        Endpoints {
            version: 2,
            endpoints: (0..20)
                .map(|i| Endpoint {
                    host: format!("10.0.1.{}", i),
                    port: 51235,
                    hops: i,
                })
                .collect(),
        },
        MessageType::Endpoints,
        ProtocolMessage::Endpoints,
    );
    check_roundtrip(
        Transaction {
            raw: Bytes::from(vec![0xab; 300]),
            status: 1,
            receive_timestamp: 745_000_001,
            deferred: false,
        },
        MessageType::Transaction,
        ProtocolMessage::Transaction,
    );
    check_roundtrip(
        GetLedger {
            item_type: 1,
            ledger_hash: Some([9; 32]),
            ledger_seq: 12345,
        },
        MessageType::GetLedger,
        ProtocolMessage::GetLedger,
    );
    check_roundtrip(
        LedgerData {
            ledger_hash: [8; 32],
            ledger_seq: 12345,
            item_type: 1,
            nodes: vec![Bytes::from(vec![0x11; 64]); 4],
        },
        MessageType::LedgerData,
        ProtocolMessage::LedgerData,
    );
    check_roundtrip(
        ProposeLedger {
            propose_seq: 2,
            close_time: 745_000_002,
            prev_ledger: [3; 32],
            position: [4; 32],
            public_key: Bytes::from(vec![5; 33]),
            signature: Bytes::from(vec![6; 64]),
        },
        MessageType::ProposeLedger,
        ProtocolMessage::ProposeLedger,
    );
    check_roundtrip(
        StatusChange {
            status: 2,
            event: 1,
            ledger_seq: 42,
            ledger_hash: [7; 32],
            network_time: 745_000_003,
        },
        MessageType::StatusChange,
        ProtocolMessage::StatusChange,
    );
    check_roundtrip(
        HaveSet {
            status: 1,
            hash: [2; 32],
        },
        MessageType::HaveSet,
        ProtocolMessage::HaveSet,
    );
    check_roundtrip(
        Validation {
            validation: Bytes::from(vec![0xcd; 250]),
        },
        MessageType::Validation,
        ProtocolMessage::Validation,
    );
    check_roundtrip(
        GetObjects {
            query: true,
            kind: 2,
            hashes: vec![[1; 32], [2; 32], [3; 32], [4; 32]],
        },
        MessageType::GetObjects,
        ProtocolMessage::GetObjects,
    );
    check_roundtrip(
        GetShardInfo { hops: 3 },
        MessageType::GetShardInfo,
        ProtocolMessage::GetShardInfo,
    );
    check_roundtrip(
        ShardInfo {
            shard_indexes: "1-4,7".to_string(),
        },
        MessageType::ShardInfo,
        ProtocolMessage::ShardInfo,
    );
    check_roundtrip(
        GetPeerShardInfo {
            hops: 2,
            relays: true,
        },
        MessageType::GetPeerShardInfo,
        ProtocolMessage::GetPeerShardInfo,
    );
    check_roundtrip(
        PeerShardInfo {
            shard_indexes: "2-9".to_string(),
            public_key: Bytes::from(vec![0xee; 33]),
            endpoint: "peer.example.com:51235".to_string(),
        },
        MessageType::PeerShardInfo,
        ProtocolMessage::PeerShardInfo,
    );
    check_roundtrip(
        ValidatorList {
            manifest: Bytes::from(vec![0x10; 80]),
            blob: Bytes::from(vec![0x20; 400]),
            signature: Bytes::from(vec![0x30; 64]),
            version: 1,
        },
        MessageType::ValidatorList,
        ProtocolMessage::ValidatorList,
    );
}

#[test]
fn concurrent_compressed_requests_agree() {
    let msg = Manifests {
        list: vec![Bytes::from(vec![0x41; 4096])],
    };
    let out = Arc::new(OutboundMessage::new(&msg, MessageType::Manifests, &FlatClassifier).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let out = Arc::clone(&out);
            thread::spawn(move || out.buffer(Compressed::On).to_vec())
        })
        .collect();

    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(results[0].as_slice(), out.buffer(Compressed::On));
    // The compressed buffer was built once; later calls return the same
    // allocation.
    assert_eq!(
        out.buffer(Compressed::On).as_ptr(),
        out.buffer(Compressed::On).as_ptr()
    );
}

proptest! {
    #[test]
    fn varint_roundtrip(v in any::<u32>()) {
        let mut buf = [0u8; 8];
        let n = write_varint(&mut buf, v);
        prop_assert_eq!(n, size_varint(v));
        prop_assert_eq!(read_varint(&buf[..n]).unwrap(), (v, n));
    }

    #[test]
    fn manifests_roundtrip_any_segmentation(
        body in prop::collection::vec(any::<u8>(), 71..800),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        request_compressed in any::<bool>(),
    ) {
        let msg = Manifests { list: vec![Bytes::from(body)] };
        let out = OutboundMessage::new(&msg, MessageType::Manifests, &FlatClassifier).unwrap();
        let form = if request_compressed { Compressed::On } else { Compressed::Off };
        let bytes = out.buffer(form).to_vec();

        let mut points: Vec<usize> = cuts.iter().map(|c| c.index(bytes.len())).collect();
        points.sort_unstable();
        let mut segments: Vec<&[u8]> = Vec::new();
        let mut prev = 0;
        for point in points {
            segments.push(&bytes[prev..point]);
            prev = point;
        }
        segments.push(&bytes[prev..]);

        let mut handler = CollectHandler::default();
        let (consumed, err) = MessageDemux::new().dispatch(&segments, &mut handler);
        prop_assert!(err.is_none(), "{:?}", err);
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(&handler.messages, &vec![ProtocolMessage::Manifests(msg)]);
    }

    #[test]
    fn status_change_uncompressed_identity(
        status in any::<u8>(),
        event in any::<u8>(),
        ledger_seq in any::<u32>(),
        network_time in any::<u64>(),
    ) {
        let msg = StatusChange {
            status,
            event,
            ledger_seq,
            ledger_hash: [0x5a; 32],
            network_time,
        };
        let out = OutboundMessage::new(&msg, MessageType::StatusChange, &FlatClassifier).unwrap();
        // Status changes are never compressed, whatever the caller asks for.
        prop_assert_eq!(out.buffer(Compressed::On), out.buffer(Compressed::Off));
        let bytes = out.buffer(Compressed::On).to_vec();
        let mut handler = CollectHandler::default();
        let (consumed, err) = MessageDemux::new().dispatch(&[&bytes], &mut handler);
        prop_assert!(err.is_none());
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(&handler.messages, &vec![ProtocolMessage::StatusChange(msg)]);
    }
}
