use crate::resource::catalog::{CatalogFamily, CatalogKind, PlacementBlock};
use crate::resource::error::FormatError;
use crate::resource::list::{read_count, write_count, CountWidth, Gp4References, MAX_LIST_COUNT};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{TgiOrder, TGI};

/// Record version that added the fallback object and fence variant data.
pub const FALLBACK_OBJECT_VERSION: u32 = 0x19;

/// Object catalog (COBJ).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObjectCatalog {
    pub placement: PlacementBlock,
    /// Version 0x19 and later.
    pub fallback_object: TGI,
}

impl CatalogKind for ObjectCatalog {
    const NAME: &'static str = "COBJ";
    const FAMILY: CatalogFamily = CatalogFamily::Object;
    const DEFAULT_VERSION: u32 = FALLBACK_OBJECT_VERSION;

    fn parse_type_specific(
        version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        let placement = reader.read()?;
        let fallback_object = if version >= FALLBACK_OBJECT_VERSION {
            TGI::read(reader, TgiOrder::Itg)?
        } else {
            TGI::default()
        };
        Ok(Self {
            placement,
            fallback_object,
        })
    }

    fn serialize_type_specific(
        &self,
        version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.write(&self.placement)?;
        if version >= FALLBACK_OBJECT_VERSION {
            self.fallback_object.write(writer, TgiOrder::Itg)?;
        }
        Ok(())
    }
}

/// Fence catalog (CFEN).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FenceCatalog {
    pub placement: PlacementBlock,
    pub models: Gp4References,
    pub material_variant: u32,
    pub swatch_grouping: u64,
    /// Version 0x19 and later.
    pub variant_data: Vec<u8>,
}

impl CatalogKind for FenceCatalog {
    const NAME: &'static str = "CFEN";
    const FAMILY: CatalogFamily = CatalogFamily::AuralExtended;
    const DEFAULT_VERSION: u32 = FALLBACK_OBJECT_VERSION;

    fn parse_type_specific(
        version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        let placement = reader.read()?;
        let models = Gp4References::read(reader, TgiOrder::Itg)?;
        let material_variant = reader.u32()?;
        let swatch_grouping = reader.u64()?;
        let variant_data = if version >= FALLBACK_OBJECT_VERSION {
            let len = read_count(reader, CountWidth::U32, 1, MAX_LIST_COUNT, "fence variant data")?;
            reader.bytes(len)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(Self {
            placement,
            models,
            material_variant,
            swatch_grouping,
            variant_data,
        })
    }

    fn serialize_type_specific(
        &self,
        version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.write(&self.placement)?;
        self.models.write(writer, TgiOrder::Itg)?;
        writer.u32(self.material_variant)?;
        writer.u64(self.swatch_grouping)?;
        if version >= FALLBACK_OBJECT_VERSION {
            write_count(writer, CountWidth::U32, self.variant_data.len(), "fence variant data")?;
            writer.bytes(&self.variant_data)?;
        }
        Ok(())
    }
}
