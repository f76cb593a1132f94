//! Build mode catalog kinds that store their fields right after the common block.
use binrw::binrw;

use crate::resource::catalog::{CatalogFamily, CatalogKind};
use crate::resource::error::FormatError;
use crate::resource::list::{ColorList, Gp4References, Gp9References};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::{ItgTGI, TgiOrder, TGI};

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct WallMaterial {
    /// Wall height the material applies to.
    pub label: u32,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub material: TGI,
}

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct WallImageGroup {
    pub unk01: u32,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub image: TGI,
}

/// Wall catalog (CWAL).
#[binrw]
#[derive(Debug, Default, Clone, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct WallCatalog {
    #[br(temp)]
    #[bw(try_calc = u32::try_from(materials.len()))]
    material_count: u32,
    #[br(count = material_count)]
    pub materials: Vec<WallMaterial>,
    #[br(temp)]
    #[bw(try_calc = u32::try_from(image_groups.len()))]
    image_group_count: u32,
    #[br(count = image_group_count)]
    pub image_groups: Vec<WallImageGroup>,
    pub unk01: u32,
    pub colors: ColorList,
    pub unk_iid01: u64,
}

impl CatalogKind for WallCatalog {
    const NAME: &'static str = "CWAL";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = 0x0A;

    fn parse_type_specific(
        _version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        reader.read()
    }

    fn serialize_type_specific(
        &self,
        _version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.write(self)
    }
}

/// Foundation catalog (CFND).
#[binrw]
#[derive(Debug, Default, Clone, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct FoundationCatalog {
    pub unk01: u8,
    pub unk02: u8,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub model: TGI,
    pub material_variant: u32,
    pub swatch_grouping: u64,
    pub float1: f32,
    pub float2: f32,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub trim: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub model2: TGI,
    pub colors: ColorList,
}

impl CatalogKind for FoundationCatalog {
    const NAME: &'static str = "CFND";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = 0x0A;

    fn parse_type_specific(
        _version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        reader.read()
    }

    fn serialize_type_specific(
        &self,
        _version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.write(self)
    }
}

#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct StairsReferences {
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub model01: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub model02: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub model03: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub unk_ref01: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub wall: TGI,
    #[br(map = ItgTGI::into_tgi)]
    #[bw(map = ItgTGI::from_tgi)]
    pub object: TGI,
}

/// Stairs catalog (CSTR).
#[binrw]
#[derive(Debug, Default, Clone, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct StairsCatalog {
    pub hash_indicator: u32,
    pub hash01: u32,
    pub hash02: u32,
    pub hash03: u32,
    pub references: StairsReferences,
    pub unk01: u8,
    pub unk02: u8,
    pub unk03: u8,
    pub material_variant: u32,
    pub swatch_grouping: u64,
    pub colors: ColorList,
    pub unk05: u8,
}

impl CatalogKind for StairsCatalog {
    const NAME: &'static str = "CSTR";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = 0x0A;

    fn parse_type_specific(
        _version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        reader.read()
    }

    fn serialize_type_specific(
        &self,
        _version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.write(self)
    }
}

/// Stair landing catalog (CSTL).
#[derive(Debug, Clone, PartialEq)]
pub struct StairLandingCatalog {
    /// 21 references at version 0x0D, 25 from version 0x0E.
    pub references: Vec<TGI>,
    pub material_variant: u32,
    pub swatch_grouping: u64,
    pub colors: ColorList,
    pub unk01: u32,
}

impl StairLandingCatalog {
    pub const FIRST_VERSION: u32 = 0x0D;
    pub const EXTENDED_VERSION: u32 = 0x0E;

    /// Number of references stored at `version`.
    pub fn reference_count(version: u32) -> Result<usize, FormatError> {
        match version {
            Self::FIRST_VERSION => Ok(21),
            v if v >= Self::EXTENDED_VERSION => Ok(25),
            _ => Err(FormatError::UnsupportedVersion {
                format: "CSTL",
                version,
            }),
        }
    }
}

impl Default for StairLandingCatalog {
    fn default() -> Self {
        Self {
            references: vec![TGI::default(); 25],
            material_variant: 0,
            swatch_grouping: 0,
            colors: ColorList::default(),
            unk01: 0,
        }
    }
}

impl CatalogKind for StairLandingCatalog {
    const NAME: &'static str = "CSTL";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = Self::EXTENDED_VERSION;

    fn parse_type_specific(
        version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        let count = Self::reference_count(version)?;
        reader.require(count as u64 * TGI::SIZE)?;
        let references = (0..count)
            .map(|_| TGI::read(reader, TgiOrder::Itg))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            references,
            material_variant: reader.u32()?,
            swatch_grouping: reader.u64()?,
            colors: ColorList::read(reader)?,
            unk01: reader.u32()?,
        })
    }

    fn serialize_type_specific(
        &self,
        version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        let count = Self::reference_count(version)?;
        if self.references.len() != count {
            return Err(FormatError::BadCount {
                what: "stair landing references",
                count: self.references.len() as i64,
                limit: count as u64,
            });
        }
        for tgi in &self.references {
            tgi.write(writer, TgiOrder::Itg)?;
        }
        writer.u32(self.material_variant)?;
        writer.u64(self.swatch_grouping)?;
        self.colors.write(writer)?;
        writer.u32(self.unk01)
    }
}

/// The two model layouts a column can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnModels {
    Four(Gp4References),
    Nine(Gp9References),
}

impl Default for ColumnModels {
    fn default() -> Self {
        Self::Four(Gp4References::default())
    }
}

impl ColumnModels {
    fn discriminator(&self) -> u8 {
        match self {
            Self::Four(_) => 0,
            Self::Nine(_) => 1,
        }
    }
}

/// Column catalog (CCOL).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnCatalog {
    pub models: ColumnModels,
    pub material_variant: u32,
    pub swatch_grouping: u64,
    pub colors: ColorList,
}

impl CatalogKind for ColumnCatalog {
    const NAME: &'static str = "CCOL";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = 0x0A;

    fn parse_type_specific(
        _version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        let models = match reader.u8()? {
            0 => ColumnModels::Four(Gp4References::read(reader, TgiOrder::Itg)?),
            1 => ColumnModels::Nine(Gp9References::read(reader, TgiOrder::Itg)?),
            other => return Err(FormatError::invalid("column model layout", other)),
        };
        Ok(Self {
            models,
            material_variant: reader.u32()?,
            swatch_grouping: reader.u64()?,
            colors: ColorList::read(reader)?,
        })
    }

    fn serialize_type_specific(
        &self,
        _version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.u8(self.models.discriminator())?;
        match &self.models {
            ColumnModels::Four(group) => group.write(writer, TgiOrder::Itg)?,
            ColumnModels::Nine(group) => group.write(writer, TgiOrder::Itg)?,
        }
        writer.u32(self.material_variant)?;
        writer.u64(self.swatch_grouping)?;
        self.colors.write(writer)
    }
}

/// Any other catalog kind. The body after the common block is kept as is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawCatalog {
    pub body: Vec<u8>,
}

impl CatalogKind for RawCatalog {
    const NAME: &'static str = "CATL";
    const FAMILY: CatalogFamily = CatalogFamily::Simple;
    const DEFAULT_VERSION: u32 = 0x0A;

    fn type_specific_size(&self, _version: u32) -> Result<usize, FormatError> {
        Ok(self.body.len())
    }

    fn parse_type_specific(
        _version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError> {
        Ok(Self {
            body: reader.rest().to_vec(),
        })
    }

    fn serialize_type_specific(
        &self,
        _version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError> {
        writer.bytes(&self.body)
    }
}
