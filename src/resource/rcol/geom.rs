//! Geometry chunk.
//!
//! Layout after the tag and version:
//!
//! ```text
//! tgi offset u32, tgi size u32      relative to the end of the offset field
//! shader u32                        material blob (u32 length) iff non zero
//! merge group u32, sort order u32
//! vertex count i32, formats, vertices
//! face point sizes (one entry, always 2), face point count, u16 indices
//! v5:    skin index i32
//! v0x0C: uv stitches, slotray intersections
//! bone hashes
//! tgi block (i32 count, type-group-instance)
//! ```
use binrw::binrw;
use log::debug;

use crate::resource::error::FormatError;
use crate::resource::list::{
    check_count, read_count, read_items, read_list, write_count, write_list, CountWidth,
    MAX_LIST_COUNT,
};
use crate::resource::offset::{read_tgi_block, write_tgi_block, OffsetSizePlaceholder, RelativeBlock};
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{FourCc, TgiOrder, TGI};
use crate::resource::Resource;

pub const GEOM_VERSION_SKIN_INDEX: u32 = 0x05;
pub const GEOM_VERSION_SLOTRAYS: u32 = 0x0C;

/// Usage code of the position attribute.
pub const GEOM_USAGE_POSITION: u32 = 1;
const GEOM_DATA_TYPE_FLOAT: u32 = 1;

/// Bytes per face point. No other value has been seen.
const FACE_POINT_SIZE: u8 = 2;

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct GeomVertexFormat {
    pub usage: u32,
    pub data_type: u32,
    pub element_size: u8,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UvStitch {
    pub index: u32,
    pub coordinates: Vec<[f32; 2]>,
}

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct SlotrayIntersection {
    pub slot_index: u32,
    pub indices: [u16; 3],
    pub values: [f32; 13],
    pub pivot_bone: u8,
}

impl SlotrayIntersection {
    const SIZE: u64 = 4 + 6 + 52 + 1;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeomChunk {
    pub version: u32,
    pub shader: u32,
    /// Material blob, only stored when `shader` is non zero.
    pub material: Vec<u8>,
    pub merge_group: u32,
    pub sort_order: u32,
    pub formats: Vec<GeomVertexFormat>,
    /// One entry per vertex, each `stride()` bytes long.
    pub vertices: Vec<Vec<u8>>,
    pub faces: Vec<[u16; 3]>,
    /// Version 5 only.
    pub skin_index: i32,
    /// Version 0x0C only.
    pub uv_stitches: Vec<UvStitch>,
    /// Version 0x0C only.
    pub slotray_intersections: Vec<SlotrayIntersection>,
    pub bone_hashes: Vec<u32>,
    pub tgis: Vec<TGI>,
}

impl Default for GeomChunk {
    fn default() -> Self {
        Self {
            version: GEOM_VERSION_SLOTRAYS,
            shader: 0,
            material: Vec::new(),
            merge_group: 0,
            sort_order: 0,
            formats: Vec::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            skin_index: 0,
            uv_stitches: Vec::new(),
            slotray_intersections: Vec::new(),
            bone_hashes: Vec::new(),
            tgis: Vec::new(),
        }
    }
}

impl GeomChunk {
    pub fn stride(&self) -> usize {
        self.formats.iter().map(|f| f.element_size as usize).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions, empty when the layout has no float position.
    pub fn positions(&self) -> Result<Vec<[f32; 3]>, FormatError> {
        let mut offset = 0usize;
        let mut position = None;
        for format in &self.formats {
            if format.usage == GEOM_USAGE_POSITION
                && format.data_type == GEOM_DATA_TYPE_FLOAT
                && format.element_size >= 12
            {
                position = Some(offset);
                break;
            }
            offset += format.element_size as usize;
        }
        let Some(offset) = position else {
            return Ok(Vec::new());
        };

        self.vertices
            .iter()
            .map(|vertex| {
                let mut reader = ResourceReader::new(vertex);
                reader.seek_to(offset as u64)?;
                reader.read::<[f32; 3]>()
            })
            .collect()
    }

    fn read_faces(reader: &mut ResourceReader<'_>) -> Result<Vec<[u16; 3]>, FormatError> {
        let sizes: Vec<u8> = read_list(reader, CountWidth::I32, "face point sizes")?;
        if sizes.len() != 1 {
            return Err(FormatError::BadCount {
                what: "face point sizes",
                count: sizes.len() as i64,
                limit: 1,
            });
        }
        if sizes[0] != FACE_POINT_SIZE {
            return Err(FormatError::invalid("face point size", sizes[0]));
        }

        let points = read_count(reader, CountWidth::I32, 2, MAX_LIST_COUNT, "face points")?;
        if points % 3 != 0 {
            return Err(FormatError::invalid("face point count", points as u64));
        }
        read_items(reader, points / 3)
    }

    fn read_uv_stitches(reader: &mut ResourceReader<'_>) -> Result<Vec<UvStitch>, FormatError> {
        let count = read_count(reader, CountWidth::I32, 8, MAX_LIST_COUNT, "uv stitches")?;
        (0..count)
            .map(|_| {
                Ok(UvStitch {
                    index: reader.u32()?,
                    coordinates: read_list(reader, CountWidth::I32, "uv stitch coordinates")?,
                })
            })
            .collect()
    }
}

impl RcolChunk for GeomChunk {
    const TAG: FourCc = FourCc::new(b"GEOM");
    const VERSIONS: &'static [u32] = &[GEOM_VERSION_SKIN_INDEX, GEOM_VERSION_SLOTRAYS];
}

impl Resource for GeomChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let tgi_block = RelativeBlock::read(&mut reader)?;

        let shader = reader.u32()?;
        let material = if shader != 0 {
            let len = read_count(&mut reader, CountWidth::U32, 1, MAX_LIST_COUNT, "material blob")?;
            reader.bytes(len)?.to_vec()
        } else {
            Vec::new()
        };
        let merge_group = reader.u32()?;
        let sort_order = reader.u32()?;

        let vertex_count = reader.i32()?;
        let formats: Vec<GeomVertexFormat> = {
            let count = read_count(&mut reader, CountWidth::I32, 9, MAX_LIST_COUNT, "vertex formats")?;
            read_items(&mut reader, count)?
        };
        let stride: u64 = formats.iter().map(|f| f.element_size as u64).sum();
        let vertex_count =
            check_count(&reader, vertex_count as i64, stride, MAX_LIST_COUNT, "vertices")?;
        // Zero-width vertices would let any count through the buffer check.
        if stride == 0 && vertex_count > 0 {
            return Err(FormatError::invalid("vertex count without formats", vertex_count as u64));
        }
        let vertices = (0..vertex_count)
            .map(|_| Ok(reader.bytes(stride as usize)?.to_vec()))
            .collect::<Result<Vec<_>, FormatError>>()?;

        let faces = Self::read_faces(&mut reader)?;

        let mut chunk = Self {
            version,
            shader,
            material,
            merge_group,
            sort_order,
            formats,
            vertices,
            faces,
            ..Default::default()
        };

        if version == GEOM_VERSION_SKIN_INDEX {
            chunk.skin_index = reader.i32()?;
        } else {
            chunk.uv_stitches = Self::read_uv_stitches(&mut reader)?;
            let count = read_count(
                &mut reader,
                CountWidth::I32,
                SlotrayIntersection::SIZE,
                MAX_LIST_COUNT,
                "slotray intersections",
            )?;
            chunk.slotray_intersections = read_items(&mut reader, count)?;
        }

        chunk.bone_hashes = read_list(&mut reader, CountWidth::I32, "bone hashes")?;

        let body_end = reader.position();
        if tgi_block.start != body_end {
            debug!(
                "GEOM tgi block at {} does not follow the body ending at {}",
                tgi_block.start, body_end
            );
        }
        chunk.tgis = read_tgi_block(&mut reader, tgi_block, TgiOrder::Tgi)?;
        Ok(chunk)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let stride = self.stride();
        if stride == 0 && !self.vertices.is_empty() {
            return Err(FormatError::invalid(
                "vertex count without formats",
                self.vertices.len() as u64,
            ));
        }
        let mut writer = ResourceWriter::new();
        write_chunk_header::<Self>(&mut writer, self.version)?;
        let tgi_pair = OffsetSizePlaceholder::reserve(&mut writer)?;

        writer.u32(self.shader)?;
        if self.shader != 0 {
            write_count(&mut writer, CountWidth::U32, self.material.len(), "material blob")?;
            writer.bytes(&self.material)?;
        }
        writer.u32(self.merge_group)?;
        writer.u32(self.sort_order)?;

        write_count(&mut writer, CountWidth::I32, self.vertices.len(), "vertices")?;
        write_list(&mut writer, CountWidth::I32, &self.formats, "vertex formats")?;
        for vertex in &self.vertices {
            if vertex.len() != stride {
                return Err(FormatError::invalid("vertex length", vertex.len() as u64));
            }
            writer.bytes(vertex)?;
        }

        write_list(&mut writer, CountWidth::I32, &[FACE_POINT_SIZE], "face point sizes")?;
        write_count(&mut writer, CountWidth::I32, self.faces.len() * 3, "face points")?;
        for face in &self.faces {
            writer.write(face)?;
        }

        if self.version == GEOM_VERSION_SKIN_INDEX {
            writer.i32(self.skin_index)?;
        } else {
            write_count(&mut writer, CountWidth::I32, self.uv_stitches.len(), "uv stitches")?;
            for stitch in &self.uv_stitches {
                writer.u32(stitch.index)?;
                write_list(
                    &mut writer,
                    CountWidth::I32,
                    &stitch.coordinates,
                    "uv stitch coordinates",
                )?;
            }
            write_list(
                &mut writer,
                CountWidth::I32,
                &self.slotray_intersections,
                "slotray intersections",
            )?;
        }

        write_list(&mut writer, CountWidth::I32, &self.bone_hashes, "bone hashes")?;

        let start = writer.position();
        let end = write_tgi_block(&mut writer, &self.tgis, TgiOrder::Tgi)?;
        tgi_pair.patch(&mut writer, start, end)?;
        Ok(writer.into_inner())
    }
}
