use binrw::binrw;
use bitflags::bitflags;

use crate::resource::error::FormatError;
use crate::resource::list::{
    read_count, read_list, read_tgi_list, write_count, write_list, write_tgi_list, CountWidth,
    MAX_TAG_COUNT,
};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{TgiOrder, TGI};

/// Common block version that introduced the pack id and 32-bit tags.
pub const PACK_INFO_VERSION: u32 = 10;
pub const WIDE_TAGS_VERSION: u32 = 11;

bitflags! {
    /// Flags stored next to the pack id.
    ///
    /// Both names share bit 0. Callers should not treat them as exclusive.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagFlags: u8 {
        const AUTO_ASSIGNED = 0x01;
        const READ_ONLY = 0x01;
    }
}

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct SellingPoint {
    pub hash: u32,
    pub value: f32,
}

/// Metadata block shared by every catalog resource.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CatalogCommon {
    pub version: u32,
    pub name_hash: u32,
    pub description_hash: u32,
    pub price: u32,
    pub thumbnail_hash: u64,
    pub dev_category_flags: u32,
    pub product_styles: Vec<TGI>,
    /// Version 10 and later.
    pub pack_id: i16,
    /// Version 10 and later.
    pub tag_flags: TagFlags,
    /// Version 10 and later.
    pub reserved: [u8; 9],
    /// Before version 10.
    pub unused2: u8,
    /// Before version 10, and only when `unused2` is non zero.
    pub unused3: u8,
    /// Stored as u16 before version 11.
    pub tags: Vec<u32>,
    pub selling_points: Vec<SellingPoint>,
    pub unlock_by_hash: u32,
    pub unlocked_by_hash: u32,
    pub swatch_colors_sort_priority: u16,
    pub variant_thumb_image_hash: u64,
}

impl CatalogCommon {
    pub fn read(reader: &mut ResourceReader<'_>) -> Result<Self, FormatError> {
        let version = reader.u32()?;
        let name_hash = reader.u32()?;
        let description_hash = reader.u32()?;
        let price = reader.u32()?;
        let thumbnail_hash = reader.u64()?;
        let dev_category_flags = reader.u32()?;
        let product_styles =
            read_tgi_list(reader, CountWidth::U8, TgiOrder::Itg, "product styles")?;

        let mut common = Self {
            version,
            name_hash,
            description_hash,
            price,
            thumbnail_hash,
            dev_category_flags,
            product_styles,
            ..Default::default()
        };

        if version >= PACK_INFO_VERSION {
            common.pack_id = reader.i16()?;
            common.tag_flags = TagFlags::from_bits_retain(reader.u8()?);
            common.reserved = reader.read()?;
        } else {
            common.unused2 = reader.u8()?;
            if common.unused2 > 0 {
                common.unused3 = reader.u8()?;
            }
        }

        let tag_size = if version >= WIDE_TAGS_VERSION { 4 } else { 2 };
        let tag_count = read_count(reader, CountWidth::U32, tag_size, MAX_TAG_COUNT, "catalog tags")?;
        common.tags = Vec::with_capacity(tag_count);
        for _ in 0..tag_count {
            let tag = if version >= WIDE_TAGS_VERSION {
                reader.u32()?
            } else {
                reader.u16()? as u32
            };
            common.tags.push(tag);
        }

        common.selling_points = read_list(reader, CountWidth::U32, "selling points")?;
        common.unlock_by_hash = reader.u32()?;
        common.unlocked_by_hash = reader.u32()?;
        common.swatch_colors_sort_priority = reader.u16()?;
        common.variant_thumb_image_hash = reader.u64()?;
        Ok(common)
    }

    pub fn write(&self, writer: &mut ResourceWriter) -> Result<(), FormatError> {
        writer.u32(self.version)?;
        writer.u32(self.name_hash)?;
        writer.u32(self.description_hash)?;
        writer.u32(self.price)?;
        writer.u64(self.thumbnail_hash)?;
        writer.u32(self.dev_category_flags)?;
        write_tgi_list(
            writer,
            CountWidth::U8,
            TgiOrder::Itg,
            &self.product_styles,
            "product styles",
        )?;

        if self.version >= PACK_INFO_VERSION {
            writer.i16(self.pack_id)?;
            writer.u8(self.tag_flags.bits())?;
            writer.write(&self.reserved)?;
        } else {
            writer.u8(self.unused2)?;
            if self.unused2 > 0 {
                writer.u8(self.unused3)?;
            }
        }

        if self.tags.len() as u64 > MAX_TAG_COUNT {
            return Err(FormatError::CountOverflow {
                what: "catalog tags",
                count: self.tags.len(),
                max: MAX_TAG_COUNT,
            });
        }
        write_count(writer, CountWidth::U32, self.tags.len(), "catalog tags")?;
        for &tag in &self.tags {
            if self.version >= WIDE_TAGS_VERSION {
                writer.u32(tag)?;
            } else {
                let tag = u16::try_from(tag).map_err(|_| FormatError::invalid("16-bit catalog tag", tag))?;
                writer.u16(tag)?;
            }
        }

        write_list(writer, CountWidth::U32, &self.selling_points, "selling points")?;
        writer.u32(self.unlock_by_hash)?;
        writer.u32(self.unlocked_by_hash)?;
        writer.u16(self.swatch_colors_sort_priority)?;
        writer.u64(self.variant_thumb_image_hash)?;
        Ok(())
    }

    pub fn serialized_size(&self) -> usize {
        let pack_info = if self.version >= PACK_INFO_VERSION {
            2 + 1 + 9
        } else if self.unused2 > 0 {
            2
        } else {
            1
        };
        let tag_size = if self.version >= WIDE_TAGS_VERSION { 4 } else { 2 };

        28 + 1
            + 16 * self.product_styles.len()
            + pack_info
            + 4
            + tag_size * self.tags.len()
            + 4
            + 8 * self.selling_points.len()
            + 18
    }
}
