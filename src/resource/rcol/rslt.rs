//! Slot definitions.
//!
//! Each section is stored as columns: every name hash, then every bone hash,
//! then every transform, then the section's per slot scalars.
use crate::resource::error::FormatError;
use crate::resource::list::{check_count, read_items, write_count, CountWidth, MAX_LIST_COUNT};
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::FourCc;
use crate::resource::Resource;

/// Extra per slot values of one section.
pub trait SlotScalars: Sized + Clone + PartialEq + std::fmt::Debug {
    const SIZE: u64;
    fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError>;
    fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError>;
}

impl SlotScalars for () {
    const SIZE: u64 = 0;

    fn read(_reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        Ok(())
    }

    fn write(&self, _writer: &mut ResourceWriter) -> Result<(), FormatError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFlags(pub u32);

impl SlotScalars for ContainerFlags {
    const SIZE: u64 = 4;

    fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        Ok(Self(reader.u32()?))
    }

    fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        writer.u32(self.0)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cone {
    pub radius: f32,
    pub angle: f32,
}

impl SlotScalars for Cone {
    const SIZE: u64 = 8;

    fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            radius: reader.f32()?,
            angle: reader.f32()?,
        })
    }

    fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        writer.f32(self.radius)?;
        writer.f32(self.angle)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Slot<X> {
    pub name_hash: u32,
    pub bone_hash: u32,
    /// Three rows of four.
    pub transform: [[f32; 4]; 3],
    pub scalars: X,
}

const TRANSFORM_SIZE: u64 = 48;

fn read_section<X: SlotScalars>(
    reader: &mut ResourceReader<'_>,
    count: usize,
) -> Result<Vec<Slot<X>>, FormatError> {
    let names: Vec<u32> = read_items(reader, count)?;
    let bones: Vec<u32> = read_items(reader, count)?;
    let transforms: Vec<[[f32; 4]; 3]> = read_items(reader, count)?;
    let scalars = (0..count)
        .map(|_| X::read(reader))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(names
        .into_iter()
        .zip(bones)
        .zip(transforms)
        .zip(scalars)
        .map(|(((name_hash, bone_hash), transform), scalars)| Slot {
            name_hash,
            bone_hash,
            transform,
            scalars,
        })
        .collect())
}

fn write_section<X: SlotScalars>(
    writer: &mut ResourceWriter,
    slots: &[Slot<X>],
) -> Result<(), FormatError> {
    for slot in slots {
        writer.u32(slot.name_hash)?;
    }
    for slot in slots {
        writer.u32(slot.bone_hash)?;
    }
    for slot in slots {
        writer.write(&slot.transform)?;
    }
    for slot in slots {
        slot.scalars.write(writer)?;
    }
    Ok(())
}

fn section_count<X: SlotScalars>(
    reader: &ResourceReader<'_>,
    count: i32,
    what: &'static str,
) -> Result<usize, FormatError> {
    check_count(reader, count as i64, 8 + TRANSFORM_SIZE + X::SIZE, MAX_LIST_COUNT, what)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RsltChunk {
    pub version: u32,
    pub routes: Vec<Slot<()>>,
    pub containers: Vec<Slot<ContainerFlags>>,
    pub effects: Vec<Slot<()>>,
    pub ik_targets: Vec<Slot<()>>,
    pub cones: Vec<Slot<Cone>>,
}

impl Default for RsltChunk {
    fn default() -> Self {
        Self {
            version: 4,
            routes: Vec::new(),
            containers: Vec::new(),
            effects: Vec::new(),
            ik_targets: Vec::new(),
            cones: Vec::new(),
        }
    }
}

impl RcolChunk for RsltChunk {
    const TAG: FourCc = FourCc::new(b"RSLT");
    const VERSIONS: &'static [u32] = &[4];
}

impl Resource for RsltChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let counts: [i32; 5] = reader.read()?;

        let routes = section_count::<()>(&reader, counts[0], "rslt routes")?;
        let routes = read_section(&mut reader, routes)?;
        let containers = section_count::<ContainerFlags>(&reader, counts[1], "rslt containers")?;
        let containers = read_section(&mut reader, containers)?;
        let effects = section_count::<()>(&reader, counts[2], "rslt effects")?;
        let effects = read_section(&mut reader, effects)?;
        let ik_targets = section_count::<()>(&reader, counts[3], "rslt ik targets")?;
        let ik_targets = read_section(&mut reader, ik_targets)?;
        let cones = section_count::<Cone>(&reader, counts[4], "rslt cones")?;
        let cones = read_section(&mut reader, cones)?;

        Ok(Self {
            version,
            routes,
            containers,
            effects,
            ik_targets,
            cones,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut writer = ResourceWriter::new();
        write_chunk_header::<Self>(&mut writer, self.version)?;
        write_count(&mut writer, CountWidth::I32, self.routes.len(), "rslt routes")?;
        write_count(&mut writer, CountWidth::I32, self.containers.len(), "rslt containers")?;
        write_count(&mut writer, CountWidth::I32, self.effects.len(), "rslt effects")?;
        write_count(&mut writer, CountWidth::I32, self.ik_targets.len(), "rslt ik targets")?;
        write_count(&mut writer, CountWidth::I32, self.cones.len(), "rslt cones")?;
        write_section(&mut writer, &self.routes)?;
        write_section(&mut writer, &self.containers)?;
        write_section(&mut writer, &self.effects)?;
        write_section(&mut writer, &self.ik_targets)?;
        write_section(&mut writer, &self.cones)?;
        Ok(writer.into_inner())
    }
}
