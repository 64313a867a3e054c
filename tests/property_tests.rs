//! Property-based tests for the header-sync crate
//!
//! These verify codec determinism and difficulty-math invariants under
//! random inputs.

use proptest::prelude::*;
use relay_core::codec::{
    BlockHeader, Hash, Sink, Source, SyncBlockHeaderParam, SyncGenesisHeaderParam,
};
use relay_core::consensus::{compact_to_target, target_to_compact, work_for_bits};

fn arb_hash() -> impl Strategy<Value = Hash> {
    any::<[u8; 32]>().prop_map(Hash::from_bytes)
}

fn arb_header() -> impl Strategy<Value = BlockHeader> {
    (
        any::<i32>(),
        arb_hash(),
        arb_hash(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(version, prev_hash, merkle_root, timestamp, bits, nonce)| BlockHeader {
            version,
            prev_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
        })
}

proptest! {
    /// Encoding always round-trips byte-for-byte
    #[test]
    fn prop_header_roundtrip(header in arb_header()) {
        let bytes = header.encode();
        let decoded = BlockHeader::decode(&bytes).unwrap();
        prop_assert_eq!(&header, &decoded);
        prop_assert_eq!(decoded.encode(), bytes);
    }

    /// Identity hash depends only on the wire bytes
    #[test]
    fn prop_header_hash_deterministic(header in arb_header()) {
        let reparsed = BlockHeader::decode(&header.encode()).unwrap();
        prop_assert_eq!(header.hash(), reparsed.hash());
    }

    /// Inputs that are not exactly 80 bytes never decode
    #[test]
    fn prop_decode_rejects_wrong_length(len in 0usize..200, byte in any::<u8>()) {
        prop_assume!(len != 80);
        prop_assert!(BlockHeader::decode(&vec![byte; len]).is_err());
    }

    /// Compact encoding round-trips for normalized positive targets
    #[test]
    fn prop_compact_roundtrip(
        exponent in 4u32..=32,
        mantissa in 0x01_0000u32..=0x7fffff,
    ) {
        let bits = (exponent << 24) | mantissa;
        let target = compact_to_target(bits);
        prop_assert_eq!(target_to_compact(&target), bits);
    }

    /// At a fixed exponent, a larger mantissa (easier target) never has
    /// more work
    #[test]
    fn prop_work_monotonic_in_mantissa(
        exponent in 4u32..=32,
        mantissa in 0x01_0000u32..0x7fffff,
    ) {
        let easier = (exponent << 24) | (mantissa + 1);
        let harder = (exponent << 24) | mantissa;
        prop_assert!(work_for_bits(easier) <= work_for_bits(harder));
    }

    /// Varuint byte strings round-trip through sink and source
    #[test]
    fn prop_var_bytes_roundtrip(payload in proptest::collection::vec(any::<u8>(), 0..600)) {
        let mut sink = Sink::new();
        sink.write_var_bytes(&payload);
        let bytes = sink.into_bytes();
        let mut src = Source::new(&bytes);
        prop_assert_eq!(src.read_var_bytes().unwrap(), payload);
        prop_assert_eq!(src.remaining(), 0);
    }

    /// Genesis parameter blobs round-trip byte-for-byte
    #[test]
    fn prop_genesis_param_roundtrip(
        chain_id in any::<u64>(),
        blob in proptest::collection::vec(any::<u8>(), 0..120),
    ) {
        let param = SyncGenesisHeaderParam { chain_id, genesis_header: blob };
        let encoded = param.encode();
        let decoded = SyncGenesisHeaderParam::decode(&encoded).unwrap();
        prop_assert_eq!(&param, &decoded);
        prop_assert_eq!(decoded.encode(), encoded);
    }

    /// Batch parameter blobs round-trip byte-for-byte
    #[test]
    fn prop_block_param_roundtrip(
        chain_id in any::<u64>(),
        address in any::<[u8; 20]>(),
        headers in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..100),
            0..8,
        ),
    ) {
        let param = SyncBlockHeaderParam { chain_id, address, headers };
        let encoded = param.encode();
        let decoded = SyncBlockHeaderParam::decode(&encoded).unwrap();
        prop_assert_eq!(&param, &decoded);
        prop_assert_eq!(decoded.encode(), encoded);
    }
}
