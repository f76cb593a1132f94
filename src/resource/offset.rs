//! Offset patched sections.
//!
//! Several chunks store an `(offset, size)` pair near their start that points
//! at a block written after the variable length body. The offset is relative
//! to the position immediately after the offset field itself, not to the start
//! of the chunk. Encoding reserves the pair, writes the body and the block, and
//! then patches the pair once both positions are known.
use crate::resource::error::FormatError;
use crate::resource::list::{read_count, write_count, CountWidth, MAX_LIST_COUNT};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{TgiOrder, TGI};

/// A decoded `(offset, size)` pair resolved to absolute positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeBlock {
    pub start: u64,
    pub size: u64,
}

impl RelativeBlock {
    pub fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        let offset = reader.u32()? as u64;
        let base = reader.position();
        let size = reader.u32()? as u64;

        let start = base + offset;
        if start.saturating_add(size) > reader.len() {
            return Err(FormatError::invalid("relative block offset", offset));
        }
        Ok(Self { start, size })
    }
}

/// Two zeroed u32 fields waiting for the block position.
#[derive(Debug)]
#[must_use]
pub struct OffsetSizePlaceholder {
    position: u64,
}

impl OffsetSizePlaceholder {
    pub fn reserve(writer: &mut ResourceWriter) -> Result<Self, FormatError> {
        let position = writer.position();
        writer.u32(0)?;
        writer.u32(0)?;
        Ok(Self { position })
    }

    /// Points the pair at the block spanning `start..end`.
    pub fn patch(self, writer: &mut ResourceWriter, start: u64, end: u64) -> Result<(), FormatError> {
        let offset = start - (self.position + 4);
        writer.patch_u32(self.position, offset as u32)?;
        writer.patch_u32(self.position + 4, (end - start) as u32)
    }
}

/// A zeroed u32 field waiting for an absolute position.
#[derive(Debug)]
#[must_use]
pub struct AbsolutePlaceholder {
    position: u64,
}

impl AbsolutePlaceholder {
    pub fn reserve(writer: &mut ResourceWriter) -> Result<Self, FormatError> {
        let position = writer.position();
        writer.u32(0)?;
        Ok(Self { position })
    }

    pub fn patch(self, writer: &mut ResourceWriter, value: u64) -> Result<(), FormatError> {
        if value > u32::MAX as u64 {
            return Err(FormatError::invalid("absolute offset", value));
        }
        writer.patch_u32(self.position, value as u32)
    }
}

/// Reads the i32 counted TGI block described by `block`.
pub fn read_tgi_block(
    reader: &mut ResourceReader<'_>,
    block: RelativeBlock,
    order: TgiOrder,
) -> Result<Vec<TGI>, FormatError> {
    reader.seek_to(block.start)?;
    if block.size < 4 {
        return Err(FormatError::invalid("tgi block size", block.size));
    }
    let count = read_count(reader, CountWidth::I32, TGI::SIZE, MAX_LIST_COUNT, "tgi block")?;
    if 4 + count as u64 * TGI::SIZE > block.size {
        return Err(FormatError::BadCount {
            what: "tgi block",
            count: count as i64,
            limit: (block.size - 4) / TGI::SIZE,
        });
    }
    (0..count).map(|_| TGI::read(reader, order)).collect()
}

/// Writes an i32 counted TGI block and returns its end position.
pub fn write_tgi_block(
    writer: &mut ResourceWriter,
    tgis: &[TGI],
    order: TgiOrder,
) -> Result<u64, FormatError> {
    write_count(writer, CountWidth::I32, tgis.len(), "tgi block")?;
    for tgi in tgis {
        tgi.write(writer, order)?;
    }
    Ok(writer.position())
}
