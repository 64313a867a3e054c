//! Length-prefixed binary sink/source for the invocation contract
//!
//! Integers are fixed-width; byte strings carry a varuint length prefix
//! (single byte below 0xfd, then 0xfd/0xfe/0xff escapes for 2/4/8-byte
//! little-endian lengths). Encodings round-trip byte-for-byte.

use thiserror::Error;

/// Codec errors - every malformed input maps to a value-level error
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("bad length: expected {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("declared length {0} exceeds input")]
    LengthOverflow(u64),
    #[error("trailing bytes after parameter")]
    TrailingBytes,
}

/// Append-only byte sink
#[derive(Debug, Default)]
pub struct Sink {
    buf: Vec<u8>,
}

impl Sink {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64_le(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_var_uint(&mut self, v: u64) {
        if v < 0xfd {
            self.buf.push(v as u8);
        } else if v <= 0xffff {
            self.buf.push(0xfd);
            self.buf.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v <= 0xffff_ffff {
            self.buf.push(0xfe);
            self.buf.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            self.buf.push(0xff);
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_uint(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an input buffer
#[derive(Debug)]
pub struct Source<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Source<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof);
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u32_be(&mut self) -> Result<u32, CodecError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_be_bytes(b))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_le_bytes(b))
    }

    pub fn read_var_uint(&mut self) -> Result<u64, CodecError> {
        match self.read_u8()? {
            0xfd => {
                let mut b = [0u8; 2];
                b.copy_from_slice(self.read_bytes(2)?);
                Ok(u16::from_le_bytes(b) as u64)
            }
            0xfe => {
                let mut b = [0u8; 4];
                b.copy_from_slice(self.read_bytes(4)?);
                Ok(u32::from_le_bytes(b) as u64)
            }
            0xff => {
                let mut b = [0u8; 8];
                b.copy_from_slice(self.read_bytes(8)?);
                Ok(u64::from_le_bytes(b))
            }
            v => Ok(v as u64),
        }
    }

    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_var_uint()?;
        if len > self.remaining() as u64 {
            return Err(CodecError::LengthOverflow(len));
        }
        Ok(self.read_bytes(len as usize)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_roundtrip() {
        let mut sink = Sink::new();
        sink.write_u64_le(0xdead_beef_0102_0304);
        sink.write_u32_be(7);
        sink.write_u8(0xab);

        let bytes = sink.into_bytes();
        let mut src = Source::new(&bytes);
        assert_eq!(src.read_u64_le().unwrap(), 0xdead_beef_0102_0304);
        assert_eq!(src.read_u32_be().unwrap(), 7);
        assert_eq!(src.read_u8().unwrap(), 0xab);
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn test_var_uint_boundaries() {
        for v in [0u64, 1, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, u64::MAX] {
            let mut sink = Sink::new();
            sink.write_var_uint(v);
            let bytes = sink.into_bytes();
            let mut src = Source::new(&bytes);
            assert_eq!(src.read_var_uint().unwrap(), v, "value {v:#x}");
            assert_eq!(src.remaining(), 0);
        }
    }

    #[test]
    fn test_var_uint_encoding_width() {
        let mut sink = Sink::new();
        sink.write_var_uint(0xfc);
        assert_eq!(sink.bytes().len(), 1);

        let mut sink = Sink::new();
        sink.write_var_uint(0xfd);
        assert_eq!(sink.bytes().len(), 3);
    }

    #[test]
    fn test_var_bytes_roundtrip() {
        let payload = vec![9u8; 300];
        let mut sink = Sink::new();
        sink.write_var_bytes(&payload);
        let bytes = sink.into_bytes();
        let mut src = Source::new(&bytes);
        assert_eq!(src.read_var_bytes().unwrap(), payload);
    }

    #[test]
    fn test_var_bytes_rejects_overlong_prefix() {
        // length prefix claims 100 bytes but only 2 follow
        let mut src = Source::new(&[100, 1, 2]);
        assert!(matches!(
            src.read_var_bytes(),
            Err(CodecError::LengthOverflow(100))
        ));
    }

    #[test]
    fn test_eof_on_truncated_integer() {
        let mut src = Source::new(&[1, 2, 3]);
        assert!(matches!(src.read_u64_le(), Err(CodecError::UnexpectedEof)));
    }
}
