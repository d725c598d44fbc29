//! Big-endian cursor over class file bytes.

use super::ClassParseError;

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        const MAGIC: u32 = 0xCAFEBABE;
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    pub(crate) fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        let slice = self.read_slice(1)?;
        Ok(slice[0])
    }

    pub(crate) fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let slice = self.read_slice(2)?;
        Ok(u16::from_be_bytes([slice[0], slice[1]]))
    }

    pub(crate) fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let slice = self.read_slice(4)?;
        Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ClassParseError::UnexpectedEof)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }
}
