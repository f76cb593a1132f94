use crate::resource::error::FormatError;
use crate::resource::list::{read_count, read_items, write_count, CountWidth, MAX_LIST_COUNT};
use crate::resource::offset::{read_tgi_block, write_tgi_block, OffsetSizePlaceholder, RelativeBlock};
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{FourCc, TgiOrder, TGI};
use crate::resource::Resource;

/// Value that always precedes the bounding box.
const TC02: u8 = 2;

/// Entries point into the chunk's TGI block by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VpxyEntry {
    /// Type 0.
    Lod { entry_id: u8, tgi_indices: Vec<u32> },
    /// Type 1.
    Single { tgi_index: u32 },
}

impl VpxyEntry {
    fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        match reader.u8()? {
            0 => {
                let entry_id = reader.u8()?;
                let count = read_count(reader, CountWidth::U8, 4, MAX_LIST_COUNT, "vpxy lod indices")?;
                Ok(Self::Lod {
                    entry_id,
                    tgi_indices: read_items(reader, count)?,
                })
            }
            1 => Ok(Self::Single {
                tgi_index: reader.u32()?,
            }),
            other => Err(FormatError::invalid("vpxy entry type", other)),
        }
    }

    fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        match self {
            Self::Lod {
                entry_id,
                tgi_indices,
            } => {
                writer.u8(0)?;
                writer.u8(*entry_id)?;
                write_count(writer, CountWidth::U8, tgi_indices.len(), "vpxy lod indices")?;
                for index in tgi_indices {
                    writer.u32(*index)?;
                }
            }
            Self::Single { tgi_index } => {
                writer.u8(1)?;
                writer.u32(*tgi_index)?;
            }
        }
        Ok(())
    }
}

/// Model proxy chunk listing the parts of a model and its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct VpxyChunk {
    pub version: u32,
    pub entries: Vec<VpxyEntry>,
    /// min x, y, z then max x, y, z
    pub bounds: [f32; 6],
    pub unused: [u8; 4],
    pub modular: bool,
    /// Only stored when `modular` is set.
    pub ftpt_index: i32,
    pub tgis: Vec<TGI>,
}

impl Default for VpxyChunk {
    fn default() -> Self {
        Self {
            version: 4,
            entries: Vec::new(),
            bounds: [0.0; 6],
            unused: [0; 4],
            modular: false,
            ftpt_index: 0,
            tgis: Vec::new(),
        }
    }
}

impl RcolChunk for VpxyChunk {
    const TAG: FourCc = FourCc::new(b"VPXY");
    const VERSIONS: &'static [u32] = &[4];
}

impl Resource for VpxyChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let tgi_block = RelativeBlock::read(&mut reader)?;

        // Smallest entry is a type byte and an index.
        let count = read_count(&mut reader, CountWidth::U8, 5, MAX_LIST_COUNT, "vpxy entries")?;
        let entries = (0..count)
            .map(|_| VpxyEntry::read(&mut reader))
            .collect::<Result<_, _>>()?;

        let tc02 = reader.u8()?;
        if tc02 != TC02 {
            return Err(FormatError::invalid("vpxy tc02", tc02));
        }
        let bounds = reader.read()?;
        let unused = reader.read()?;
        let modular = reader.u8()? != 0;
        let ftpt_index = if modular { reader.i32()? } else { 0 };

        let tgis = read_tgi_block(&mut reader, tgi_block, TgiOrder::Tgi)?;
        Ok(Self {
            version,
            entries,
            bounds,
            unused,
            modular,
            ftpt_index,
            tgis,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut writer = ResourceWriter::new();
        write_chunk_header::<Self>(&mut writer, self.version)?;
        let tgi_pair = OffsetSizePlaceholder::reserve(&mut writer)?;

        write_count(&mut writer, CountWidth::U8, self.entries.len(), "vpxy entries")?;
        for entry in &self.entries {
            entry.write(&mut writer)?;
        }
        writer.u8(TC02)?;
        writer.write(&self.bounds)?;
        writer.write(&self.unused)?;
        writer.u8(self.modular as u8)?;
        if self.modular {
            writer.i32(self.ftpt_index)?;
        }

        let start = writer.position();
        let end = write_tgi_block(&mut writer, &self.tgis, TgiOrder::Tgi)?;
        tgi_pair.patch(&mut writer, start, end)?;
        Ok(writer.into_inner())
    }
}
