//! Invocation parameter blobs for the header-sync entry points
//!
//! These are the binary arguments the enclosing ledger executor hands to the
//! handler, encoded with the shared sink/source conventions.

use super::wire::{CodecError, Sink, Source};

/// Length of a relayer (submitter) address
pub const SUBMITTER_ADDR_LEN: usize = 20;

/// Argument blob for `syncGenesisHeader`
///
/// `genesis_header` carries the 80 wire bytes of the trust-anchor header
/// followed by its trusted height as a big-endian u32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGenesisHeaderParam {
    pub chain_id: u64,
    pub genesis_header: Vec<u8>,
}

impl SyncGenesisHeaderParam {
    pub fn encode(&self) -> Vec<u8> {
        let mut sink = Sink::new();
        sink.write_u64_le(self.chain_id);
        sink.write_var_bytes(&self.genesis_header);
        sink.into_bytes()
    }

    pub fn decode(input: &[u8]) -> Result<Self, CodecError> {
        let mut src = Source::new(input);
        let chain_id = src.read_u64_le()?;
        let genesis_header = src.read_var_bytes()?;
        if src.remaining() != 0 {
            return Err(CodecError::TrailingBytes);
        }
        Ok(Self {
            chain_id,
            genesis_header,
        })
    }
}

/// Argument blob for `syncBlockHeader`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncBlockHeaderParam {
    pub chain_id: u64,
    /// Relayer account that submitted the batch. Economic checks on the
    /// submitter belong to the calling service.
    pub address: [u8; SUBMITTER_ADDR_LEN],
    pub headers: Vec<Vec<u8>>,
}

impl SyncBlockHeaderParam {
    pub fn encode(&self) -> Vec<u8> {
        let mut sink = Sink::new();
        sink.write_u64_le(self.chain_id);
        sink.write_bytes(&self.address);
        sink.write_var_uint(self.headers.len() as u64);
        for header in &self.headers {
            sink.write_var_bytes(header);
        }
        sink.into_bytes()
    }

    pub fn decode(input: &[u8]) -> Result<Self, CodecError> {
        let mut src = Source::new(input);
        let chain_id = src.read_u64_le()?;
        let mut address = [0u8; SUBMITTER_ADDR_LEN];
        address.copy_from_slice(src.read_bytes(SUBMITTER_ADDR_LEN)?);
        let count = src.read_var_uint()?;
        if count > src.remaining() as u64 {
            return Err(CodecError::LengthOverflow(count));
        }
        let mut headers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            headers.push(src.read_var_bytes()?);
        }
        if src.remaining() != 0 {
            return Err(CodecError::TrailingBytes);
        }
        Ok(Self {
            chain_id,
            address,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_param_roundtrip() {
        let param = SyncGenesisHeaderParam {
            chain_id: 3,
            genesis_header: vec![7u8; 84],
        };
        let decoded = SyncGenesisHeaderParam::decode(&param.encode()).unwrap();
        assert_eq!(param, decoded);
    }

    #[test]
    fn test_block_param_roundtrip() {
        let param = SyncBlockHeaderParam {
            chain_id: 1,
            address: [0xaa; SUBMITTER_ADDR_LEN],
            headers: vec![vec![1u8; 80], vec![2u8; 80], vec![]],
        };
        let decoded = SyncBlockHeaderParam::decode(&param.encode()).unwrap();
        assert_eq!(param, decoded);
    }

    #[test]
    fn test_block_param_rejects_truncated_address() {
        let mut bytes = SyncBlockHeaderParam {
            chain_id: 1,
            address: [0; SUBMITTER_ADDR_LEN],
            headers: vec![],
        }
        .encode();
        bytes.truncate(12);
        assert!(SyncBlockHeaderParam::decode(&bytes).is_err());
    }

    #[test]
    fn test_param_rejects_trailing_bytes() {
        let mut bytes = SyncGenesisHeaderParam {
            chain_id: 0,
            genesis_header: vec![1, 2, 3],
        }
        .encode();
        bytes.push(0);
        assert!(matches!(
            SyncGenesisHeaderParam::decode(&bytes),
            Err(CodecError::TrailingBytes)
        ));
    }
}
