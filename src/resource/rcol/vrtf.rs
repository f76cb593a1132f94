use crate::resource::error::FormatError;
use crate::resource::list::{check_count, write_count, CountWidth, MAX_LIST_COUNT};
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::FourCc;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementUsage {
    Position,
    Normal,
    UV,
    BlendIndex,
    BlendWeight,
    Tangent,
    Colour,
    Unknown(u8),
}

impl From<u8> for ElementUsage {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Position,
            1 => Self::Normal,
            2 => Self::UV,
            3 => Self::BlendIndex,
            4 => Self::BlendWeight,
            5 => Self::Tangent,
            6 => Self::Colour,
            other => Self::Unknown(other),
        }
    }
}

impl From<ElementUsage> for u8 {
    fn from(usage: ElementUsage) -> Self {
        match usage {
            ElementUsage::Position => 0,
            ElementUsage::Normal => 1,
            ElementUsage::UV => 2,
            ElementUsage::BlendIndex => 3,
            ElementUsage::BlendWeight => 4,
            ElementUsage::Tangent => 5,
            ElementUsage::Colour => 6,
            ElementUsage::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    Float1,
    Float2,
    Float3,
    Float4,
    UByte4,
    ColorUByte4,
    Short2,
    Short4,
    UByte4N,
    Short2N,
    Short4N,
    UShort2N,
    UShort4N,
    Dec3N,
    UDec3N,
    Float16x2,
    Float16x4,
    Unknown(u8),
}

impl ElementFormat {
    /// Bytes one element occupies, if the format is known.
    pub fn size(self) -> Option<usize> {
        Some(match self {
            Self::Float1 => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::UByte4 | Self::ColorUByte4 | Self::Short2 | Self::UByte4N | Self::Short2N => 4,
            Self::Short4 | Self::Short4N | Self::UShort4N => 8,
            Self::UShort2N | Self::Dec3N | Self::UDec3N | Self::Float16x2 => 4,
            Self::Float16x4 => 8,
            Self::Unknown(_) => return None,
        })
    }
}

impl From<u8> for ElementFormat {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Float1,
            0x01 => Self::Float2,
            0x02 => Self::Float3,
            0x03 => Self::Float4,
            0x04 => Self::UByte4,
            0x05 => Self::ColorUByte4,
            0x06 => Self::Short2,
            0x07 => Self::Short4,
            0x08 => Self::UByte4N,
            0x09 => Self::Short2N,
            0x0A => Self::Short4N,
            0x0B => Self::UShort2N,
            0x0C => Self::UShort4N,
            0x0D => Self::Dec3N,
            0x0E => Self::UDec3N,
            0x0F => Self::Float16x2,
            0x10 => Self::Float16x4,
            other => Self::Unknown(other),
        }
    }
}

impl From<ElementFormat> for u8 {
    fn from(format: ElementFormat) -> Self {
        match format {
            ElementFormat::Float1 => 0x00,
            ElementFormat::Float2 => 0x01,
            ElementFormat::Float3 => 0x02,
            ElementFormat::Float4 => 0x03,
            ElementFormat::UByte4 => 0x04,
            ElementFormat::ColorUByte4 => 0x05,
            ElementFormat::Short2 => 0x06,
            ElementFormat::Short4 => 0x07,
            ElementFormat::UByte4N => 0x08,
            ElementFormat::Short2N => 0x09,
            ElementFormat::Short4N => 0x0A,
            ElementFormat::UShort2N => 0x0B,
            ElementFormat::UShort4N => 0x0C,
            ElementFormat::Dec3N => 0x0D,
            ElementFormat::UDec3N => 0x0E,
            ElementFormat::Float16x2 => 0x0F,
            ElementFormat::Float16x4 => 0x10,
            ElementFormat::Unknown(other) => other,
        }
    }
}

/// Where one vertex attribute lives inside the stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    pub usage: ElementUsage,
    pub usage_index: u8,
    pub format: ElementFormat,
    pub offset: u8,
}

impl VertexElement {
    fn read(reader: &mut ResourceReader<'_>, extended: bool) -> Result<Self, FormatError> {
        let mut field = || -> Result<u8, FormatError> {
            if extended {
                let value = reader.u32()?;
                u8::try_from(value).map_err(|_| FormatError::invalid("vertex element field", value))
            } else {
                reader.u8()
            }
        };
        Ok(Self {
            usage: field()?.into(),
            usage_index: field()?,
            format: field()?.into(),
            offset: field()?,
        })
    }

    fn write(&self, writer: &mut ResourceWriter, extended: bool) -> Result<(), FormatError> {
        for value in [
            self.usage.into(),
            self.usage_index,
            self.format.into(),
            self.offset,
        ] {
            if extended {
                writer.u32(value as u32)?;
            } else {
                writer.u8(value)?;
            }
        }
        Ok(())
    }
}

/// Vertex layout shared by a VBUF chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct VrtfChunk {
    pub version: u32,
    pub stride: u32,
    /// Elements are stored as u32 fields instead of bytes.
    pub extended_format: bool,
    pub elements: Vec<VertexElement>,
}

impl Default for VrtfChunk {
    fn default() -> Self {
        Self {
            version: 2,
            stride: 0,
            extended_format: false,
            elements: Vec::new(),
        }
    }
}

impl VrtfChunk {
    pub fn element(&self, usage: ElementUsage) -> Option<&VertexElement> {
        self.elements.iter().find(|e| e.usage == usage)
    }
}

impl RcolChunk for VrtfChunk {
    const TAG: FourCc = FourCc::new(b"VRTF");
    const VERSIONS: &'static [u32] = &[2];
}

impl Resource for VrtfChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let stride = reader.u32()?;
        let count = reader.i32()?;
        let extended_format = reader.u32()? != 0;

        // The element width is only known once the flag after the count is read.
        let element_size = if extended_format { 16 } else { 4 };
        let count = check_count(
            &reader,
            count as i64,
            element_size,
            MAX_LIST_COUNT,
            "vertex elements",
        )?;

        let elements = (0..count)
            .map(|_| VertexElement::read(&mut reader, extended_format))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            version,
            stride,
            extended_format,
            elements,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut writer = ResourceWriter::new();
        write_chunk_header::<Self>(&mut writer, self.version)?;
        writer.u32(self.stride)?;
        write_count(&mut writer, CountWidth::I32, self.elements.len(), "vertex elements")?;
        writer.u32(self.extended_format as u32)?;
        for element in &self.elements {
            element.write(&mut writer, self.extended_format)?;
        }
        Ok(writer.into_inner())
    }
}
