use crate::resource::error::FormatError;
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::rcol::{ElementFormat, VertexElement};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::FourCc;
use crate::resource::Resource;

/// One attribute value read out of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementValue<'a> {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Packed formats are handed back undecoded.
    Raw(&'a [u8]),
}

/// Raw vertex data. The layout comes from a separate VRTF chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct VbufChunk {
    pub version: u32,
    pub flags: u32,
    /// Chunk reference to the swizzle information.
    pub swizzle_info: u32,
    pub buffer: Vec<u8>,
}

impl Default for VbufChunk {
    fn default() -> Self {
        Self {
            version: 0x101,
            flags: 0,
            swizzle_info: 0,
            buffer: Vec::new(),
        }
    }
}

impl VbufChunk {
    fn reader_at(&self, offset: usize) -> Result<ResourceReader<'_>, FormatError> {
        let mut reader = ResourceReader::new(&self.buffer);
        reader.seek_to(offset as u64)?;
        Ok(reader)
    }

    pub fn read_f32(&self, offset: usize) -> Result<f32, FormatError> {
        self.reader_at(offset)?.f32()
    }

    pub fn read_vec3(&self, offset: usize) -> Result<[f32; 3], FormatError> {
        self.reader_at(offset)?.read()
    }

    /// Reads `element` of vertex number `vertex` without copying the buffer.
    pub fn read_element(
        &self,
        vertex: usize,
        stride: usize,
        element: &VertexElement,
    ) -> Result<ElementValue<'_>, FormatError> {
        let offset = vertex
            .checked_mul(stride)
            .and_then(|start| start.checked_add(element.offset as usize))
            .ok_or_else(|| FormatError::invalid("vertex offset", vertex as u64))?;
        let mut reader = self.reader_at(offset)?;
        Ok(match element.format {
            ElementFormat::Float1 => ElementValue::Float(reader.f32()?),
            ElementFormat::Float2 => ElementValue::Vec2(reader.read()?),
            ElementFormat::Float3 => ElementValue::Vec3(reader.read()?),
            ElementFormat::Float4 => ElementValue::Vec4(reader.read()?),
            other => {
                let size = other
                    .size()
                    .ok_or_else(|| FormatError::invalid("vertex element format", u8::from(other)))?;
                ElementValue::Raw(reader.bytes(size)?)
            }
        })
    }

    /// Number of whole vertices for the given stride.
    pub fn vertex_count(&self, stride: usize) -> usize {
        if stride == 0 {
            0
        } else {
            self.buffer.len() / stride
        }
    }
}

impl RcolChunk for VbufChunk {
    const TAG: FourCc = FourCc::new(b"VBUF");
    const VERSIONS: &'static [u32] = &[0x101];
}

impl Resource for VbufChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        Ok(Self {
            version,
            flags: reader.u32()?,
            swizzle_info: reader.u32()?,
            buffer: reader.rest().to_vec(),
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut writer = ResourceWriter::with_capacity(16 + self.buffer.len());
        write_chunk_header::<Self>(&mut writer, self.version)?;
        writer.u32(self.flags)?;
        writer.u32(self.swizzle_info)?;
        writer.bytes(&self.buffer)?;
        Ok(writer.into_inner())
    }
}
