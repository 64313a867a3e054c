//! Foreign-chain block header and its fixed 80-byte wire format
//!
//! Field layout and endianness follow the tracked chain's own encoding so
//! that relayer-submitted bytes hash to the same identity on every node.

use serde::{Deserialize, Serialize};
use super::hash::{sha256d, Hash};
use super::wire::CodecError;

/// Wire size of an encoded header
pub const HEADER_SIZE: usize = 80;

/// A foreign-chain block header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version
    pub version: i32,
    /// Hash of the previous header
    pub prev_hash: Hash,
    /// Merkle root of the block's transactions
    pub merkle_root: Hash,
    /// Block timestamp (seconds since Unix epoch)
    pub timestamp: u32,
    /// Difficulty target (compact representation)
    pub bits: u32,
    /// Nonce used for PoW
    pub nonce: u32,
}

impl BlockHeader {
    /// Serialize the header to its 80-byte wire form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_hash.0);
        out[36..68].copy_from_slice(&self.merkle_root.0);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Parse a header from exactly 80 wire bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != HEADER_SIZE {
            return Err(CodecError::BadLength {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let mut u32buf = [0u8; 4];
        u32buf.copy_from_slice(&bytes[0..4]);
        let version = i32::from_le_bytes(u32buf);

        let mut prev = [0u8; 32];
        prev.copy_from_slice(&bytes[4..36]);
        let mut merkle = [0u8; 32];
        merkle.copy_from_slice(&bytes[36..68]);

        u32buf.copy_from_slice(&bytes[68..72]);
        let timestamp = u32::from_le_bytes(u32buf);
        u32buf.copy_from_slice(&bytes[72..76]);
        let bits = u32::from_le_bytes(u32buf);
        u32buf.copy_from_slice(&bytes[76..80]);
        let nonce = u32::from_le_bytes(u32buf);

        Ok(Self {
            version,
            prev_hash: Hash(prev),
            merkle_root: Hash(merkle),
            timestamp,
            bits,
            nonce,
        })
    }

    /// Identity hash of this header (double SHA-256 over the wire bytes)
    pub fn hash(&self) -> Hash {
        sha256d(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            version: 2,
            prev_hash: sha256d(b"parent"),
            merkle_root: sha256d(b"txs"),
            timestamp: 1_600_000_000,
            bits: 0x207fffff,
            nonce: 42,
        }
    }

    #[test]
    fn test_encode_is_80_bytes() {
        assert_eq!(sample_header().encode().len(), HEADER_SIZE);
    }

    #[test]
    fn test_decode_roundtrip() {
        let header = sample_header();
        let decoded = BlockHeader::decode(&header.encode()).unwrap();
        assert_eq!(header, decoded);
        assert_eq!(header.hash(), decoded.hash());
    }

    #[test]
    fn test_decode_rejects_short_input() {
        let err = BlockHeader::decode(&[0u8; 79]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::BadLength { expected: HEADER_SIZE, actual: 79 }
        ));
    }

    #[test]
    fn test_decode_rejects_long_input() {
        assert!(BlockHeader::decode(&[0u8; 81]).is_err());
    }

    #[test]
    fn test_hash_depends_on_nonce() {
        let a = sample_header();
        let mut b = a.clone();
        b.nonce += 1;
        assert_ne!(a.hash(), b.hash());
    }
}
