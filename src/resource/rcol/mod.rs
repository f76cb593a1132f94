//! RCOL containers and the mesh chunks they carry.
//!
//! An RCOL resource is a header listing chunk keys and external references,
//! an index of `(position, length)` pairs, and the chunk bodies. Every chunk
//! body starts with a four character tag and a version.
mod geom;
mod ibuf;
mod mesh;
mod rslt;
mod skin;
mod vbuf;
mod vpxy;
mod vrtf;

pub use geom::{
    GeomChunk, GeomVertexFormat, SlotrayIntersection, UvStitch, GEOM_USAGE_POSITION,
    GEOM_VERSION_SKIN_INDEX, GEOM_VERSION_SLOTRAYS,
};
pub use ibuf::{IbufChunk, IndexFlags};
pub use mesh::MeshBuffers;
pub use rslt::{Cone, ContainerFlags, RsltChunk, Slot, SlotScalars};
pub use skin::{Bone, SkinChunk};
pub use vbuf::{ElementValue, VbufChunk};
pub use vpxy::{VpxyChunk, VpxyEntry};
pub use vrtf::{ElementFormat, ElementUsage, VertexElement, VrtfChunk};

use log::{trace, warn};

use crate::resource::error::FormatError;
use crate::resource::list::{check_count, MAX_LIST_COUNT};
use crate::resource::offset::AbsolutePlaceholder;
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{FourCc, TgiOrder, TGI};
use crate::resource::Resource;

/// A chunk type that can live inside an RCOL container.
pub trait RcolChunk: Resource {
    const TAG: FourCc;
    /// Versions the decoder accepts.
    const VERSIONS: &'static [u32];
}

/// Reads the tag and version that open every chunk.
pub(crate) fn read_chunk_header<C: RcolChunk>(
    reader: &mut ResourceReader<'_>,
) -> Result<u32, FormatError> {
    reader.expect_tag(C::TAG)?;
    let version = reader.u32()?;
    check_chunk_version::<C>(version)?;
    Ok(version)
}

pub(crate) fn write_chunk_header<C: RcolChunk>(
    writer: &mut ResourceWriter,
    version: u32,
) -> Result<(), FormatError> {
    check_chunk_version::<C>(version)?;
    writer.four_cc(C::TAG)?;
    writer.u32(version)
}

fn check_chunk_version<C: RcolChunk>(version: u32) -> Result<(), FormatError> {
    if C::VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(FormatError::UnsupportedVersion {
            format: tag_name(C::TAG),
            version,
        })
    }
}

fn tag_name(tag: FourCc) -> &'static str {
    match &tag.0 {
        b"GEOM" => "GEOM",
        b"VRTF" => "VRTF",
        b"VBUF" => "VBUF",
        b"IBUF" => "IBUF",
        b"SKIN" => "SKIN",
        b"VPXY" => "VPXY",
        b"RSLT" => "RSLT",
        _ => "RCOL chunk",
    }
}

/// A decoded chunk body.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkData {
    Geom(GeomChunk),
    Vrtf(VrtfChunk),
    Vbuf(VbufChunk),
    Ibuf(IbufChunk),
    Skin(SkinChunk),
    Vpxy(VpxyChunk),
    Rslt(RsltChunk),
    /// Any other tag, kept byte for byte.
    Unknown(Vec<u8>),
}

impl ChunkData {
    /// Picks the decoder from the first four bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let Some(tag) = data.get(..4) else {
            return Ok(Self::Unknown(data.to_vec()));
        };
        trace!("decoding RCOL chunk {}", FourCc([tag[0], tag[1], tag[2], tag[3]]));
        Ok(match tag {
            b"GEOM" => Self::Geom(GeomChunk::from_bytes(data)?),
            b"VRTF" => Self::Vrtf(VrtfChunk::from_bytes(data)?),
            b"VBUF" => Self::Vbuf(VbufChunk::from_bytes(data)?),
            b"IBUF" => Self::Ibuf(IbufChunk::from_bytes(data)?),
            b"SKIN" => Self::Skin(SkinChunk::from_bytes(data)?),
            b"VPXY" => Self::Vpxy(VpxyChunk::from_bytes(data)?),
            b"RSLT" => Self::Rslt(RsltChunk::from_bytes(data)?),
            _ => Self::Unknown(data.to_vec()),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Geom(c) => c.to_bytes(),
            Self::Vrtf(c) => c.to_bytes(),
            Self::Vbuf(c) => c.to_bytes(),
            Self::Ibuf(c) => c.to_bytes(),
            Self::Skin(c) => c.to_bytes(),
            Self::Vpxy(c) => c.to_bytes(),
            Self::Rslt(c) => c.to_bytes(),
            Self::Unknown(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn tag(&self) -> Option<FourCc> {
        match self {
            Self::Geom(_) => Some(GeomChunk::TAG),
            Self::Vrtf(_) => Some(VrtfChunk::TAG),
            Self::Vbuf(_) => Some(VbufChunk::TAG),
            Self::Ibuf(_) => Some(IbufChunk::TAG),
            Self::Skin(_) => Some(SkinChunk::TAG),
            Self::Vpxy(_) => Some(VpxyChunk::TAG),
            Self::Rslt(_) => Some(RsltChunk::TAG),
            Self::Unknown(bytes) => bytes
                .get(..4)
                .map(|t| FourCc([t[0], t[1], t[2], t[3]])),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RcolEntry {
    pub tgi: TGI,
    pub data: ChunkData,
}

/// RCOL (resource collection) container.
#[derive(Debug, Clone, PartialEq)]
pub struct RcolResource {
    pub version: u32,
    pub public_chunks: i32,
    pub unused: u32,
    pub external_resources: Vec<TGI>,
    pub chunks: Vec<RcolEntry>,
}

impl Default for RcolResource {
    fn default() -> Self {
        Self {
            version: 3,
            public_chunks: 0,
            unused: 0,
            external_resources: Vec::new(),
            chunks: Vec::new(),
        }
    }
}

impl RcolResource {
    /// First chunk with the given tag.
    pub fn find(&self, tag: FourCc) -> Option<&ChunkData> {
        self.chunks
            .iter()
            .map(|entry| &entry.data)
            .find(|data| data.tag() == Some(tag))
    }
}

impl Resource for RcolResource {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = ResourceReader::new(data);
        let version = reader.u32()?;
        let public_chunks = reader.i32()?;
        let unused = reader.u32()?;
        let count_resources = reader.i32()? as i64;
        let count_chunks = reader.i32()? as i64;

        // Each chunk costs a key and an index entry, each resource a key.
        let count_chunks = check_count(&reader, count_chunks, 16 + 8, MAX_LIST_COUNT, "rcol chunks")?;
        let count_resources =
            check_count(&reader, count_resources, 16, MAX_LIST_COUNT, "rcol external resources")?;
        reader.require((count_chunks * 24 + count_resources * 16) as u64)?;

        let chunk_tgis = (0..count_chunks)
            .map(|_| TGI::read(&mut reader, TgiOrder::Itg))
            .collect::<Result<Vec<_>, _>>()?;
        let external_resources = (0..count_resources)
            .map(|_| TGI::read(&mut reader, TgiOrder::Itg))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = Vec::with_capacity(count_chunks);
        for _ in 0..count_chunks {
            let position = reader.u32()? as u64;
            let length = reader.i32()?;
            index.push((position, length as i64));
        }

        if let [(0, 0)] = index.as_slice() {
            warn!("RCOL single chunk has a zero index entry, using the rest of the buffer");
            index[0] = (reader.position(), reader.remaining() as i64);
        }

        // Overlapping entries are fine as long as the copies stay within the buffer size.
        let mut copied = 0u64;
        let mut chunks = Vec::with_capacity(count_chunks);
        for (tgi, (position, length)) in chunk_tgis.into_iter().zip(index) {
            if length < 0 {
                return Err(FormatError::BadCount {
                    what: "rcol chunk length",
                    count: length,
                    limit: i32::MAX as u64,
                });
            }
            reader.seek_to(position)?;
            let body = reader.bytes(length as usize)?;
            copied += length as u64;
            if copied > reader.len() {
                return Err(FormatError::BadCount {
                    what: "rcol chunk bytes",
                    count: copied as i64,
                    limit: reader.len(),
                });
            }
            chunks.push(RcolEntry {
                tgi,
                data: ChunkData::from_bytes(body)?,
            });
        }

        Ok(Self {
            version,
            public_chunks,
            unused,
            external_resources,
            chunks,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let count_chunks = i32::try_from(self.chunks.len()).map_err(|_| FormatError::CountOverflow {
            what: "rcol chunks",
            count: self.chunks.len(),
            max: i32::MAX as u64,
        })?;
        let count_resources =
            i32::try_from(self.external_resources.len()).map_err(|_| FormatError::CountOverflow {
                what: "rcol external resources",
                count: self.external_resources.len(),
                max: i32::MAX as u64,
            })?;

        let mut writer = ResourceWriter::new();
        writer.u32(self.version)?;
        writer.i32(self.public_chunks)?;
        writer.u32(self.unused)?;
        writer.i32(count_resources)?;
        writer.i32(count_chunks)?;
        for entry in &self.chunks {
            entry.tgi.write(&mut writer, TgiOrder::Itg)?;
        }
        for tgi in &self.external_resources {
            tgi.write(&mut writer, TgiOrder::Itg)?;
        }

        let mut index = Vec::with_capacity(self.chunks.len());
        for _ in &self.chunks {
            let position = AbsolutePlaceholder::reserve(&mut writer)?;
            let length = AbsolutePlaceholder::reserve(&mut writer)?;
            index.push((position, length));
        }

        for (entry, (position, length)) in self.chunks.iter().zip(index) {
            let body = entry.data.to_bytes()?;
            let start = writer.position();
            position.patch(&mut writer, start)?;
            length.patch(&mut writer, body.len() as u64)?;
            writer.bytes(&body)?;
            writer.pad_to(4)?;
        }

        Ok(writer.into_inner())
    }
}
