//! Counted lists whose count field width varies per format.
use binrw::{binrw, BinRead, BinWrite};

use crate::resource::error::FormatError;
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{TgiOrder, TGI};

/// Catalog tag lists reject anything larger.
pub const MAX_TAG_COUNT: u64 = 10_000;
/// Ceiling for every other list.
pub const MAX_LIST_COUNT: u64 = 0x0100_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWidth {
    U8,
    U16,
    I32,
    U32,
}

impl CountWidth {
    pub fn max(self) -> u64 {
        match self {
            CountWidth::U8 => u8::MAX as u64,
            CountWidth::U16 => u16::MAX as u64,
            CountWidth::I32 => i32::MAX as u64,
            CountWidth::U32 => u32::MAX as u64,
        }
    }

    pub fn size(self) -> usize {
        match self {
            CountWidth::U8 => 1,
            CountWidth::U16 => 2,
            CountWidth::I32 | CountWidth::U32 => 4,
        }
    }
}

/// Reads a count and checks it against `limit` and the bytes left for
/// `element_size` sized elements.
pub fn read_count(
    reader: &mut ResourceReader<'_>,
    width: CountWidth,
    element_size: u64,
    limit: u64,
    what: &'static str,
) -> Result<usize, FormatError> {
    let count: i64 = match width {
        CountWidth::U8 => reader.u8()? as i64,
        CountWidth::U16 => reader.u16()? as i64,
        CountWidth::I32 => reader.i32()? as i64,
        CountWidth::U32 => reader.u32()? as i64,
    };
    check_count(reader, count, element_size, limit, what)
}

/// Validates a count that was read some other way.
pub fn check_count(
    reader: &ResourceReader<'_>,
    count: i64,
    element_size: u64,
    limit: u64,
    what: &'static str,
) -> Result<usize, FormatError> {
    if count < 0 || count as u64 > limit {
        return Err(FormatError::BadCount { what, count, limit });
    }
    reader.require(count as u64 * element_size)?;
    Ok(count as usize)
}

pub fn write_count(
    writer: &mut ResourceWriter,
    width: CountWidth,
    count: usize,
    what: &'static str,
) -> Result<(), FormatError> {
    if count as u64 > width.max() {
        return Err(FormatError::CountOverflow {
            what,
            count,
            max: width.max(),
        });
    }
    match width {
        CountWidth::U8 => writer.u8(count as u8),
        CountWidth::U16 => writer.u16(count as u16),
        CountWidth::I32 => writer.i32(count as i32),
        CountWidth::U32 => writer.u32(count as u32),
    }
}

/// Reads `count` fixed size elements.
pub fn read_items<T>(reader: &mut ResourceReader<'_>, count: usize) -> Result<Vec<T>, FormatError>
where
    T: for<'b> BinRead<Args<'b> = ()>,
{
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(reader.read::<T>()?);
    }
    Ok(items)
}

/// A count of `width` followed by fixed size elements.
pub fn read_list<T>(
    reader: &mut ResourceReader<'_>,
    width: CountWidth,
    what: &'static str,
) -> Result<Vec<T>, FormatError>
where
    T: for<'b> BinRead<Args<'b> = ()>,
{
    let count = read_count(
        reader,
        width,
        std::mem::size_of::<T>() as u64,
        MAX_LIST_COUNT,
        what,
    )?;
    read_items(reader, count)
}

pub fn write_list<T>(
    writer: &mut ResourceWriter,
    width: CountWidth,
    items: &[T],
    what: &'static str,
) -> Result<(), FormatError>
where
    T: for<'b> BinWrite<Args<'b> = ()>,
{
    write_count(writer, width, items.len(), what)?;
    for item in items {
        writer.write(item)?;
    }
    Ok(())
}

pub fn read_tgi_list(
    reader: &mut ResourceReader<'_>,
    width: CountWidth,
    order: TgiOrder,
    what: &'static str,
) -> Result<Vec<TGI>, FormatError> {
    let count = read_count(reader, width, TGI::SIZE, MAX_LIST_COUNT, what)?;
    (0..count).map(|_| TGI::read(reader, order)).collect()
}

pub fn write_tgi_list(
    writer: &mut ResourceWriter,
    width: CountWidth,
    order: TgiOrder,
    tgis: &[TGI],
    what: &'static str,
) -> Result<(), FormatError> {
    write_count(writer, width, tgis.len(), what)?;
    for tgi in tgis {
        tgi.write(writer, order)?;
    }
    Ok(())
}

/// Byte counted list of 32-bit ARGB colors.
#[binrw]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct ColorList {
    #[br(temp)]
    #[bw(try_calc = u8::try_from(colors.len()))]
    count: u8,
    #[br(count = count)]
    pub colors: Vec<u32>,
}

impl ColorList {
    /// Standalone read that checks the count against the buffer first.
    pub fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            colors: read_list(reader, CountWidth::U8, "colors")?,
        })
    }

    pub fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        write_list(writer, CountWidth::U8, &self.colors, "colors")
    }

    pub fn serialized_size(&self) -> usize {
        1 + 4 * self.colors.len()
    }
}

/// Exactly `N` references with no count on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceGroup<const N: usize> {
    pub references: [TGI; N],
}

pub type Gp4References = ReferenceGroup<4>;
pub type Gp9References = ReferenceGroup<9>;

impl<const N: usize> Default for ReferenceGroup<N> {
    fn default() -> Self {
        Self {
            references: [TGI::default(); N],
        }
    }
}

impl<const N: usize> ReferenceGroup<N> {
    pub const SIZE: usize = N * TGI::SIZE as usize;

    pub fn read(reader: &mut ResourceReader<'_>, order: TgiOrder) -> Result<Self, FormatError> {
        reader.require(Self::SIZE as u64)?;
        let mut references = [TGI::default(); N];
        for reference in references.iter_mut() {
            *reference = TGI::read(reader, order)?;
        }
        Ok(Self { references })
    }

    pub fn write(&self, writer: &mut ResourceWriter, order: TgiOrder) -> Result<(), FormatError> {
        for reference in &self.references {
            reference.write(writer, order)?;
        }
        Ok(())
    }
}
