//! Little endian readers and writers shared by every resource codec.
//!
//! [ResourceReader] never reads past the end of its slice. Any short read is
//! reported as [FormatError::TruncatedBuffer] with the offset it happened at.
use std::io::{Cursor, Seek, SeekFrom, Write};

use binrw::{BinRead, BinWrite, Endian};

use crate::resource::error::FormatError;
use crate::resource::tgi::FourCc;

pub struct ResourceReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ResourceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    pub fn len(&self) -> u64 {
        self.data().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    pub fn seek_to(&mut self, position: u64) -> Result<(), FormatError> {
        if position > self.len() {
            return Err(FormatError::truncated(
                self.position(),
                position - self.position(),
                self.remaining(),
            ));
        }
        self.cursor.set_position(position);
        Ok(())
    }

    /// Fails unless `needed` more bytes are available.
    pub fn require(&self, needed: u64) -> Result<(), FormatError> {
        if needed > self.remaining() {
            Err(FormatError::truncated(
                self.position(),
                needed,
                self.remaining(),
            ))
        } else {
            Ok(())
        }
    }

    /// Reads a fixed size value.
    pub fn read<T>(&mut self) -> Result<T, FormatError>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let offset = self.position();
        let available = self.remaining();
        T::read_options(&mut self.cursor, Endian::Little, ()).map_err(|e| {
            if e.is_eof() {
                FormatError::truncated(offset, std::mem::size_of::<T>() as u64, available)
            } else {
                e.into()
            }
        })
    }

    pub fn u8(&mut self) -> Result<u8, FormatError> {
        self.read()
    }

    pub fn u16(&mut self) -> Result<u16, FormatError> {
        self.read()
    }

    pub fn i16(&mut self) -> Result<i16, FormatError> {
        self.read()
    }

    pub fn u32(&mut self) -> Result<u32, FormatError> {
        self.read()
    }

    pub fn i32(&mut self) -> Result<i32, FormatError> {
        self.read()
    }

    pub fn u64(&mut self) -> Result<u64, FormatError> {
        self.read()
    }

    pub fn f32(&mut self) -> Result<f32, FormatError> {
        self.read()
    }

    /// Borrows the next `len` bytes without copying them.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        self.require(len as u64)?;
        let start = self.position() as usize;
        let data = self.data();
        self.cursor.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// Everything from the current position to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let start = (self.position() as usize).min(self.data().len());
        let data = self.data();
        self.cursor.set_position(data.len() as u64);
        &data[start..]
    }

    pub fn four_cc(&mut self) -> Result<FourCc, FormatError> {
        let bytes = self.bytes(4)?;
        Ok(FourCc([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a tag and fails with [FormatError::BadTag] on mismatch.
    pub fn expect_tag(&mut self, expected: FourCc) -> Result<(), FormatError> {
        let found = self.four_cc()?;
        if found != expected {
            return Err(FormatError::BadTag { expected, found });
        }
        Ok(())
    }
}

/// Growable output buffer with support for patching reserved fields.
pub struct ResourceWriter {
    cursor: Cursor<Vec<u8>>,
}

impl Default for ResourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cursor: Cursor::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    pub fn write<T>(&mut self, value: &T) -> Result<(), FormatError>
    where
        T: for<'b> BinWrite<Args<'b> = ()>,
    {
        value.write_options(&mut self.cursor, Endian::Little, ())?;
        Ok(())
    }

    pub fn u8(&mut self, value: u8) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn u16(&mut self, value: u16) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn i16(&mut self, value: i16) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn u32(&mut self, value: u32) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn i32(&mut self, value: i32) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn u64(&mut self, value: u64) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn f32(&mut self, value: f32) -> Result<(), FormatError> {
        self.write(&value)
    }

    pub fn bytes(&mut self, data: &[u8]) -> Result<(), FormatError> {
        self.cursor.write_all(data).map_err(binrw::Error::Io)?;
        Ok(())
    }

    pub fn four_cc(&mut self, tag: FourCc) -> Result<(), FormatError> {
        self.bytes(&tag.0)
    }

    /// Overwrites the u32 at `position` and returns to the current end.
    pub fn patch_u32(&mut self, position: u64, value: u32) -> Result<(), FormatError> {
        let end = self.position();
        self.cursor
            .seek(SeekFrom::Start(position))
            .map_err(binrw::Error::Io)?;
        self.u32(value)?;
        self.cursor
            .seek(SeekFrom::Start(end))
            .map_err(binrw::Error::Io)?;
        Ok(())
    }

    /// Pads with zeros until the position is a multiple of `alignment`.
    pub fn pad_to(&mut self, alignment: u64) -> Result<(), FormatError> {
        let padding = (alignment - self.position() % alignment) % alignment;
        for _ in 0..padding {
            self.u8(0)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

/// Number of bytes `value` takes once encoded.
pub fn encoded_len<T>(value: &T) -> Result<usize, FormatError>
where
    T: for<'b> BinWrite<Args<'b> = ()>,
{
    let mut writer = ResourceWriter::new();
    writer.write(value)?;
    Ok(writer.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_read_reports_offset() {
        let data = [1u8, 0, 0];
        let mut reader = ResourceReader::new(&data);
        let err = reader.u32().unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedBuffer {
                offset: 0,
                needed: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn bytes_are_bounds_checked() {
        let data = [1u8, 2, 3, 4];
        let mut reader = ResourceReader::new(&data);
        assert_eq!(reader.bytes(2).unwrap(), &[1, 2]);
        assert!(reader.bytes(3).is_err());
        assert_eq!(reader.rest(), &[3, 4]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn seek_past_end_fails() {
        let data = [0u8; 8];
        let mut reader = ResourceReader::new(&data);
        assert!(reader.seek_to(8).is_ok());
        assert!(reader.seek_to(9).is_err());
    }

    #[test]
    fn patch_keeps_write_position() {
        let mut writer = ResourceWriter::new();
        writer.u32(0).unwrap();
        writer.u16(7).unwrap();
        writer.patch_u32(0, 0xAABBCCDD).unwrap();
        writer.u8(1).unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![0xDD, 0xCC, 0xBB, 0xAA, 7, 0, 1]
        );
    }

    #[test]
    fn pad_to_alignment() {
        let mut writer = ResourceWriter::new();
        writer.u8(1).unwrap();
        writer.pad_to(4).unwrap();
        assert_eq!(writer.len(), 4);
        writer.pad_to(4).unwrap();
        assert_eq!(writer.len(), 4);
    }
}
