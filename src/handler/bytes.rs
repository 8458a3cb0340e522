//! Little-endian byte reading and writing helpers.

use crate::error::{PakError, Result};

/// Bounds-checked reader over a byte slice.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current offset from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(PakError::Decode {
                message: format!(
                    "Unexpected end of data at offset {} (need {} bytes, {} left)",
                    self.pos,
                    n,
                    self.remaining()
                ),
                help: Some("The container is truncated or its header is corrupt".to_string()),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    /// Read an `i32` that must be non-negative.
    pub fn read_len(&mut self, what: &str) -> Result<u32> {
        let offset = self.pos;
        let v = self.read_i32()?;
        u32::try_from(v)
            .map_err(|_| PakError::decode(format!("Negative {} ({}) at offset {}", what, v, offset)))
    }
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Write an unsigned size into an `i32` field.
pub fn put_len(out: &mut Vec<u8>, v: usize, what: &str) -> Result<()> {
    let v = i32::try_from(v).map_err(|_| PakError::encode(format!("{} {} does not fit in 32 bits", what, v)))?;
    put_i32(out, v);
    Ok(())
}
