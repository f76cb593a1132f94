use bitflags::bitflags;

use crate::resource::error::FormatError;
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::FourCc;
use crate::resource::Resource;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IndexFlags: u32 {
        /// Each stored value is the difference to the previous index.
        const DIFFERENCED = 0x1;
        const USES_32BIT = 0x2;
        const DISPLAY_LIST = 0x4;
    }
}

/// Index buffer.
///
/// `indices` always holds absolute values. The stored width is recomputed on
/// every encode, so `USES_32BIT` in `flags` only reflects the last decode.
#[derive(Debug, Clone, PartialEq)]
pub struct IbufChunk {
    pub version: u32,
    pub flags: IndexFlags,
    pub display_list_usage: u32,
    pub indices: Vec<u32>,
}

impl Default for IbufChunk {
    fn default() -> Self {
        Self {
            version: 0x100,
            flags: IndexFlags::DIFFERENCED,
            display_list_usage: 0,
            indices: Vec::new(),
        }
    }
}

impl IbufChunk {
    pub fn is_differenced(&self) -> bool {
        self.flags.contains(IndexFlags::DIFFERENCED)
    }

    /// Values as they go on the wire, and whether they need 32 bits.
    ///
    /// Deltas wrap around u32, so every index sequence has a differenced form.
    fn stored_values(&self) -> (Vec<u32>, bool) {
        if !self.is_differenced() {
            let wide = self.indices.iter().any(|&i| i > u16::MAX as u32);
            return (self.indices.clone(), wide);
        }

        let mut previous = 0u32;
        let mut wide = false;
        let mut deltas = Vec::with_capacity(self.indices.len());
        for &index in &self.indices {
            let delta = index.wrapping_sub(previous) as i32;
            wide |= i16::try_from(delta).is_err();
            deltas.push(delta as u32);
            previous = index;
        }
        (deltas, wide)
    }
}

impl RcolChunk for IbufChunk {
    const TAG: FourCc = FourCc::new(b"IBUF");
    const VERSIONS: &'static [u32] = &[0x100];
}

impl Resource for IbufChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let flags = IndexFlags::from_bits_retain(reader.u32()?);
        let display_list_usage = reader.u32()?;

        let wide = flags.contains(IndexFlags::USES_32BIT);
        let differenced = flags.contains(IndexFlags::DIFFERENCED);
        let width = if wide { 4 } else { 2 };
        if reader.remaining() % width != 0 {
            return Err(FormatError::invalid("index data length", reader.remaining()));
        }

        let count = (reader.remaining() / width) as usize;
        let mut indices = Vec::with_capacity(count);
        let mut previous = 0u32;
        for _ in 0..count {
            let index = match (wide, differenced) {
                (false, false) => reader.u16()? as u32,
                (false, true) => previous.wrapping_add(reader.i16()? as i32 as u32),
                (true, false) => reader.u32()?,
                (true, true) => previous.wrapping_add(reader.i32()? as u32),
            };
            indices.push(index);
            previous = index;
        }

        Ok(Self {
            version,
            flags,
            display_list_usage,
            indices,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let (values, wide) = self.stored_values();
        let flags = if wide {
            self.flags | IndexFlags::USES_32BIT
        } else {
            self.flags - IndexFlags::USES_32BIT
        };

        let width = if wide { 4 } else { 2 };
        let mut writer = ResourceWriter::with_capacity(16 + width * values.len());
        write_chunk_header::<Self>(&mut writer, self.version)?;
        writer.u32(flags.bits())?;
        writer.u32(self.display_list_usage)?;
        // Narrow values were range checked in stored_values.
        for value in values {
            if wide {
                writer.u32(value)?;
            } else {
                writer.u16(value as u16)?;
            }
        }
        Ok(writer.into_inner())
    }
}
