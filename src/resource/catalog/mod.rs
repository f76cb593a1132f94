//! Catalog resources.
//!
//! Every catalog record starts with a version and a [CatalogCommon] block.
//! Placeable kinds follow it with a [PlacementBlock], and each kind then adds
//! its own fields. Optional fields are selected by comparing version numbers,
//! always against the version currently stored in the record, so changing
//! `version` before encoding changes which fields are written.
mod build;
mod common;
mod object;
mod placement;

pub use build::{
    ColumnCatalog, ColumnModels, FoundationCatalog, RawCatalog, StairLandingCatalog,
    StairsCatalog, StairsReferences, WallCatalog, WallImageGroup, WallMaterial,
};
pub use common::{CatalogCommon, SellingPoint, TagFlags, PACK_INFO_VERSION, WIDE_TAGS_VERSION};
pub use object::{FenceCatalog, ObjectCatalog, FALLBACK_OBJECT_VERSION};
pub use placement::{AuralProperties, PlacementBlock};

use log::{debug, trace, warn};

use crate::resource::error::FormatError;
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::Resource;

/// The structural family a catalog kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFamily {
    /// Common block followed directly by kind fields.
    Simple,
    /// Common block, placement block, then kind fields.
    AuralExtended,
    /// The object catalog itself.
    Object,
}

/// The fields one catalog kind stores after the shared blocks.
pub trait CatalogKind: std::fmt::Debug + Default + Clone + PartialEq {
    const NAME: &'static str;
    const FAMILY: CatalogFamily;
    const DEFAULT_VERSION: u32;

    /// Encoded size of the kind fields at `version`, measured by encoding them.
    fn type_specific_size(&self, version: u32) -> Result<usize, FormatError> {
        let mut writer = ResourceWriter::new();
        self.serialize_type_specific(version, &mut writer)?;
        Ok(writer.len())
    }

    fn parse_type_specific(
        version: u32,
        reader: &mut ResourceReader<'_>,
    ) -> Result<Self, FormatError>;

    fn serialize_type_specific(
        &self,
        version: u32,
        writer: &mut ResourceWriter,
    ) -> Result<(), FormatError>;
}

/// A decoded catalog record of kind `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogResource<K> {
    pub version: u32,
    pub common: CatalogCommon,
    pub data: K,
    /// Bytes after the known fields, written back unchanged.
    pub trailing: Vec<u8>,
}

impl<K: CatalogKind> Default for CatalogResource<K> {
    fn default() -> Self {
        Self {
            version: K::DEFAULT_VERSION,
            common: CatalogCommon::default(),
            data: K::default(),
            trailing: Vec::new(),
        }
    }
}

impl<K: CatalogKind> CatalogResource<K> {
    pub fn family(&self) -> CatalogFamily {
        K::FAMILY
    }

    pub fn serialized_size(&self) -> Result<usize, FormatError> {
        Ok(4 + self.common.serialized_size()
            + self.data.type_specific_size(self.version)?
            + self.trailing.len())
    }
}

impl<K: CatalogKind> Resource for CatalogResource<K> {
    fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = ResourceReader::new(bytes);
        let version = reader.u32()?;
        trace!("decoding {} catalog version 0x{:X}", K::NAME, version);

        let common = CatalogCommon::read(&mut reader)?;
        let data = K::parse_type_specific(version, &mut reader)?;

        let trailing = reader.rest().to_vec();
        if !trailing.is_empty() {
            debug!(
                "{} catalog keeps {} trailing bytes unparsed",
                K::NAME,
                trailing.len()
            );
        }

        Ok(Self {
            version,
            common,
            data,
            trailing,
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let size = self.serialized_size()?;
        let mut writer = ResourceWriter::with_capacity(size);
        writer.u32(self.version)?;
        self.common.write(&mut writer)?;
        self.data.serialize_type_specific(self.version, &mut writer)?;
        writer.bytes(&self.trailing)?;
        if writer.len() != size {
            warn!("{} catalog wrote {} bytes, expected {}", K::NAME, writer.len(), size);
            return Err(FormatError::invalid("catalog encoded size", writer.len() as u64));
        }
        Ok(writer.into_inner())
    }
}
