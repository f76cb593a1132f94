//! Object definition resource (0xC0DB5AE7).
//!
//! ```text
//! version u16, table position u32 (absolute)
//! ... property values ...
//! table: u16 count, count x (property id u32, value position u32)
//! ```
//!
//! The value at each position has no tag of its own. Its shape follows from
//! the property id alone.
use log::{debug, trace};

use crate::resource::error::FormatError;
use crate::resource::list::{
    read_count, read_list, write_count, write_list, CountWidth, MAX_LIST_COUNT,
};
use crate::resource::offset::AbsolutePlaceholder;
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{TgiOrder, TGI};
use crate::resource::Resource;

/// Known property ids.
pub mod property {
    pub const NAME: u32 = 0xE7F07786;
    pub const TUNING: u32 = 0x790FA4BC;
    pub const MATERIAL_VARIANT: u32 = 0xECD5A95F;
    pub const TUNING_ID: u32 = 0xB994039B;
    pub const UNKNOWN3: u32 = 0x52F7F4BC;
    pub const ICON: u32 = 0xCADED888;
    pub const RIG: u32 = 0xE206AE4F;
    pub const SLOT: u32 = 0x8A85AFF3;
    pub const MODEL: u32 = 0x8D20ACC6;
    pub const FOOTPRINT: u32 = 0x6C737AD8;
    pub const COMPONENTS: u32 = 0xE6E421FB;
    pub const UNKNOWN1: u32 = 0xAC8E1BC0;
    pub const SIMOLEON_PRICE: u32 = 0xE4F4FAA4;
    pub const THUMBNAIL_GEOMETRY_STATE: u32 = 0x4233F8A0;
    pub const POSITIVE_ENVIRONMENT_SCORE: u32 = 0x7236BEEA;
    pub const NEGATIVE_ENVIRONMENT_SCORE: u32 = 0x44FC7512;
    pub const UNKNOWN2: u32 = 0xEC3712E6;
    pub const IS_BABY: u32 = 0xAEE67A1C;
    pub const ENVIRONMENT_SCORE_EMOTION_TAGS: u32 = 0x2172AEBE;
    pub const ENVIRONMENT_SCORES: u32 = 0xDCD08394;
    pub const UNKNOWN4: u32 = 0xF3936A90;
}

/// Value shape of a property id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    UInt64,
    TgiList,
    UInt32List,
    Byte,
    UInt32,
    Float,
    Bool,
    UInt16List,
    FloatList,
    ByteList,
    Unknown,
}

impl PropertyKind {
    pub fn for_id(id: u32) -> Self {
        use property::*;
        match id {
            NAME | TUNING | MATERIAL_VARIANT => Self::String,
            TUNING_ID | UNKNOWN3 => Self::UInt64,
            ICON | RIG | SLOT | MODEL | FOOTPRINT => Self::TgiList,
            COMPONENTS => Self::UInt32List,
            UNKNOWN1 => Self::Byte,
            SIMOLEON_PRICE | THUMBNAIL_GEOMETRY_STATE => Self::UInt32,
            POSITIVE_ENVIRONMENT_SCORE | NEGATIVE_ENVIRONMENT_SCORE => Self::Float,
            UNKNOWN2 | IS_BABY => Self::Bool,
            ENVIRONMENT_SCORE_EMOTION_TAGS => Self::UInt16List,
            ENVIRONMENT_SCORES => Self::FloatList,
            UNKNOWN4 => Self::ByteList,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    String(String),
    UInt64(u64),
    TgiList(Vec<TGI>),
    UInt32List(Vec<u32>),
    Byte(u8),
    UInt32(u32),
    Float(f32),
    Bool(bool),
    UInt16List(Vec<u16>),
    FloatList(Vec<f32>),
    ByteList(Vec<u8>),
    /// Raw bytes of a property whose id has no known shape.
    Unknown(Vec<u8>),
}

impl ObjectProperty {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::UInt64(_) => PropertyKind::UInt64,
            Self::TgiList(_) => PropertyKind::TgiList,
            Self::UInt32List(_) => PropertyKind::UInt32List,
            Self::Byte(_) => PropertyKind::Byte,
            Self::UInt32(_) => PropertyKind::UInt32,
            Self::Float(_) => PropertyKind::Float,
            Self::Bool(_) => PropertyKind::Bool,
            Self::UInt16List(_) => PropertyKind::UInt16List,
            Self::FloatList(_) => PropertyKind::FloatList,
            Self::ByteList(_) => PropertyKind::ByteList,
            Self::Unknown(_) => PropertyKind::Unknown,
        }
    }

    /// Reads a value of the given kind. `span` is the byte length available
    /// to unknown values.
    fn read(
        reader: &mut ResourceReader<'_>,
        kind: PropertyKind,
        span: usize,
    ) -> Result<Self, FormatError> {
        Ok(match kind {
            PropertyKind::String => {
                let len = read_count(reader, CountWidth::U32, 1, MAX_LIST_COUNT, "property string")?;
                Self::String(String::from_utf8_lossy(reader.bytes(len)?).into_owned())
            }
            PropertyKind::UInt64 => Self::UInt64(reader.u64()?),
            PropertyKind::TgiList => {
                // The stored count is four times the number of references.
                let stored = read_count(reader, CountWidth::U32, 4, MAX_LIST_COUNT, "property tgi list")?;
                if stored % 4 != 0 {
                    return Err(FormatError::BadCount {
                        what: "property tgi list",
                        count: stored as i64,
                        limit: MAX_LIST_COUNT,
                    });
                }
                let count = stored / 4;
                reader.require(count as u64 * TGI::SIZE)?;
                Self::TgiList(
                    (0..count)
                        .map(|_| TGI::read(reader, TgiOrder::SwappedItg))
                        .collect::<Result<_, _>>()?,
                )
            }
            PropertyKind::UInt32List => {
                Self::UInt32List(read_list(reader, CountWidth::U32, "property u32 list")?)
            }
            PropertyKind::Byte => Self::Byte(reader.u8()?),
            PropertyKind::UInt32 => Self::UInt32(reader.u32()?),
            PropertyKind::Float => Self::Float(reader.f32()?),
            PropertyKind::Bool => Self::Bool(reader.u8()? != 0),
            PropertyKind::UInt16List => {
                Self::UInt16List(read_list(reader, CountWidth::U32, "property u16 list")?)
            }
            PropertyKind::FloatList => {
                Self::FloatList(read_list(reader, CountWidth::U32, "property float list")?)
            }
            PropertyKind::ByteList => {
                Self::ByteList(read_list(reader, CountWidth::U32, "property byte list")?)
            }
            PropertyKind::Unknown => Self::Unknown(reader.bytes(span)?.to_vec()),
        })
    }

    fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        match self {
            Self::String(s) => {
                write_count(writer, CountWidth::U32, s.len(), "property string")?;
                writer.bytes(s.as_bytes())
            }
            Self::UInt64(v) => writer.u64(*v),
            Self::TgiList(tgis) => {
                let stored = tgis.len().checked_mul(4).ok_or(FormatError::CountOverflow {
                    what: "property tgi list",
                    count: tgis.len(),
                    max: u32::MAX as u64 / 4,
                })?;
                write_count(writer, CountWidth::U32, stored, "property tgi list")?;
                for tgi in tgis {
                    tgi.write(writer, TgiOrder::SwappedItg)?;
                }
                Ok(())
            }
            Self::UInt32List(v) => write_list(writer, CountWidth::U32, v, "property u32 list"),
            Self::Byte(v) => writer.u8(*v),
            Self::UInt32(v) => writer.u32(*v),
            Self::Float(v) => writer.f32(*v),
            Self::Bool(v) => writer.u8(*v as u8),
            Self::UInt16List(v) => write_list(writer, CountWidth::U32, v, "property u16 list"),
            Self::FloatList(v) => write_list(writer, CountWidth::U32, v, "property float list"),
            Self::ByteList(v) => write_list(writer, CountWidth::U32, v, "property byte list"),
            Self::Unknown(bytes) => writer.bytes(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinitionResource {
    pub version: u16,
    /// In table order. Ids are expected to be unique but duplicates are kept.
    pub properties: Vec<(u32, ObjectProperty)>,
}

impl Default for ObjectDefinitionResource {
    fn default() -> Self {
        Self {
            version: 2,
            properties: Vec::new(),
        }
    }
}

impl ObjectDefinitionResource {
    /// First property with the given id.
    pub fn get(&self, id: u32) -> Option<&ObjectProperty> {
        self.properties
            .iter()
            .find(|(prop_id, _)| *prop_id == id)
            .map(|(_, value)| value)
    }

    pub fn name(&self) -> Option<&str> {
        match self.get(property::NAME)? {
            ObjectProperty::String(name) => Some(name),
            _ => None,
        }
    }
}

impl Resource for ObjectDefinitionResource {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = ResourceReader::new(data);
        let version = reader.u16()?;
        let table_position = reader.u32()? as u64;

        reader.seek_to(table_position)?;
        let count = read_count(&mut reader, CountWidth::U16, 8, MAX_LIST_COUNT, "property table")?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = reader.u32()?;
            let position = reader.u32()? as u64;
            entries.push((id, position));
        }
        trace!("object definition v{} with {} properties", version, count);

        // Boundaries an unknown value cannot extend past.
        let mut bounds: Vec<u64> = entries.iter().map(|&(_, position)| position).collect();
        bounds.push(table_position);
        bounds.push(reader.len());

        let mut properties = Vec::with_capacity(count);
        for (id, position) in entries {
            let kind = PropertyKind::for_id(id);
            let end = bounds
                .iter()
                .copied()
                .filter(|&b| b > position)
                .min()
                .unwrap_or(position);
            if kind == PropertyKind::Unknown {
                debug!(
                    "keeping unknown object property 0x{:08X} as {} raw bytes",
                    id,
                    end - position
                );
            }
            reader.seek_to(position)?;
            let value = ObjectProperty::read(&mut reader, kind, (end - position) as usize)?;
            properties.push((id, value));
        }

        Ok(Self {
            version,
            properties,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        for (id, value) in &self.properties {
            let kind = value.kind();
            if kind != PropertyKind::Unknown && kind != PropertyKind::for_id(*id) {
                return Err(FormatError::invalid("object property kind", *id));
            }
        }

        let mut writer = ResourceWriter::new();
        writer.u16(self.version)?;
        let table = AbsolutePlaceholder::reserve(&mut writer)?;

        let mut positions = Vec::with_capacity(self.properties.len());
        for (_, value) in &self.properties {
            positions.push(writer.position());
            value.write(&mut writer)?;
        }

        let table_position = writer.position();
        table.patch(&mut writer, table_position)?;
        write_count(&mut writer, CountWidth::U16, self.properties.len(), "property table")?;
        for ((id, _), position) in self.properties.iter().zip(positions) {
            writer.u32(*id)?;
            writer.u32(position as u32)?;
        }
        Ok(writer.into_inner())
    }
}
