pub trait ByteWriter: Sized {
    fn write_u8(&mut self, value: u8);
    fn write_u16(&mut self, value: u16) {
        self.write_u8(value as u8);
        self.write_u8((value >> 8) as u8);
    }
    fn write_u32(&mut self, value: u32) {
        self.write_u16(value as u16);
        self.write_u16((value >> 16) as u16);
    }
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_u8(b);
        }
    }
}

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, ReaderErr>;
    fn read_u16(&mut self) -> Result<u16, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u16::from_le_bytes(out))
    }
    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u32::from_le_bytes(out))
    }

    /// Reads exactly `len` bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        let mut out = Vec::with_capacity(len.min(1 << 16));
        for _ in 0..len {
            out.push(self.read_u8()?);
        }
        Ok(out)
    }

    /// Returns `true` when no bytes are left to read.
    fn is_exhausted(&mut self) -> bool;
}

/// Reads from a borrowed byte slice, advancing the slice as it goes.
impl ByteReader for &[u8] {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        let data: &[u8] = *self;
        let (&first, rest) = data.split_first().ok_or(ReaderErr::NotEnoughData)?;
        *self = rest;
        Ok(first)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        if self.len() < len {
            return Err(ReaderErr::NotEnoughData);
        }
        let data: &[u8] = *self;
        let (head, rest) = data.split_at(len);
        *self = rest;
        Ok(head.to_vec())
    }

    fn is_exhausted(&mut self) -> bool {
        self.is_empty()
    }
}


#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErr {
    #[error("Not enough data to read")]
    NotEnoughData,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_round_trip() {
        let mut buffer = Vec::new();
        buffer.write_u8(7);
        buffer.write_u16(0x1234);
        buffer.write_u32(0xDEADBEEF);
        assert_eq!(buffer, vec![7, 0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]);

        let mut reader = buffer.as_slice();
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
        assert!(reader.is_exhausted());
        assert_eq!(reader.read_u8(), Err(ReaderErr::NotEnoughData));
    }

    #[test]
    fn short_reads_fail() {
        let data = vec![1_u8, 2, 3];
        assert_eq!(data.as_slice().read_bytes(4), Err(ReaderErr::NotEnoughData));
        let mut slice = data.as_slice();
        assert_eq!(slice.read_bytes(2).unwrap(), vec![1, 2]);
        assert_eq!(slice.read_u16(), Err(ReaderErr::NotEnoughData));
    }
}
