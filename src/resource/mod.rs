//! Resource codecs.
//!
//! Every format implements [Resource]: decode a flat byte buffer handed over by
//! the package layer and encode it back. [TypedResource::from_bytes] picks the
//! codec for a resource type id from [REGISTRY].
pub mod catalog;
pub mod error;
pub mod list;
pub mod objdef;
pub mod offset;
pub mod rcol;
pub mod stream;
pub mod tgi;

use log::trace;

use crate::resource::catalog::{
    CatalogResource, ColumnCatalog, FenceCatalog, FoundationCatalog, ObjectCatalog, RawCatalog,
    StairLandingCatalog, StairsCatalog, WallCatalog,
};
use crate::resource::error::FormatError;
use crate::resource::objdef::ObjectDefinitionResource;
use crate::resource::rcol::RcolResource;

pub trait Resource: std::fmt::Debug {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError>
    where
        Self: Sized;
    fn to_bytes(&self) -> Result<Vec<u8>, FormatError>;
}

/// A wrapper for unknown or generic resources
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenericResource {
    pub data: Vec<u8>,
}

impl Resource for GenericResource {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        Ok(Self {
            data: data.to_vec(),
        })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        Ok(self.data.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedResource {
    Object(CatalogResource<ObjectCatalog>),
    Fence(CatalogResource<FenceCatalog>),
    Wall(CatalogResource<WallCatalog>),
    Foundation(CatalogResource<FoundationCatalog>),
    Stairs(CatalogResource<StairsCatalog>),
    StairLanding(CatalogResource<StairLandingCatalog>),
    Column(CatalogResource<ColumnCatalog>),
    Catalog(CatalogResource<RawCatalog>),
    ObjectDefinition(ObjectDefinitionResource),
    Rcol(RcolResource),
    Generic(GenericResource),
}

pub type DecodeFn = fn(&[u8]) -> Result<TypedResource, FormatError>;

/// One row of the type id table.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub res_type: u32,
    pub name: &'static str,
    pub decode: DecodeFn,
}

macro_rules! register {
    ($res_type:expr, $name:expr, $variant:ident, $ty:ty) => {
        Registration {
            res_type: $res_type,
            name: $name,
            decode: |data| Ok(TypedResource::$variant(<$ty>::from_bytes(data)?)),
        }
    };
}

/// Every type id with a dedicated codec.
pub static REGISTRY: &[Registration] = &[
    register!(0x319E4F1D, "COBJ", Object, CatalogResource<ObjectCatalog>),
    register!(0x0418FE2A, "CFEN", Fence, CatalogResource<FenceCatalog>),
    register!(0xD5F0F921, "CWAL", Wall, CatalogResource<WallCatalog>),
    register!(0x2FAE983E, "CFND", Foundation, CatalogResource<FoundationCatalog>),
    register!(0x9A20CD1C, "CSTR", Stairs, CatalogResource<StairsCatalog>),
    register!(0x9F5CFF10, "CSTL", StairLanding, CatalogResource<StairLandingCatalog>),
    register!(0x1D6DF1CF, "CCOL", Column, CatalogResource<ColumnCatalog>),
    // Catalog kinds without a dedicated layout keep their body as bytes.
    register!(0xB4F762C9, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x07936CE0, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xA057811C, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xEBCBB16C, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x1C1CF1F7, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xE7ADA79D, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xA5DFFCF3, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xF1EDBD86, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x3F0C529A, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xB0311D0F, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x84C23219, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x74050B1F, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x91EDBD3E, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0x48C28979, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xA8F7B517, "CATL", Catalog, CatalogResource<RawCatalog>),
    register!(0xC0DB5AE7, "OBJD", ObjectDefinition, ObjectDefinitionResource),
    register!(0x015A1849, "RCOL", Rcol, RcolResource),
    register!(0x01D0E75D, "RCOL", Rcol, RcolResource),
    register!(0x01D10F34, "RCOL", Rcol, RcolResource),
    register!(0x01661233, "RCOL", Rcol, RcolResource),
];

pub fn registration(res_type: u32) -> Option<&'static Registration> {
    REGISTRY.iter().find(|r| r.res_type == res_type)
}

/// Four letter name of a registered type id.
pub fn resource_type_name(res_type: u32) -> Option<&'static str> {
    registration(res_type).map(|r| r.name)
}

impl TypedResource {
    pub fn from_bytes(res_type: u32, data: &[u8]) -> Result<Self, FormatError> {
        match registration(res_type) {
            Some(registration) => {
                trace!(
                    "decoding 0x{:08X} as {} ({} bytes)",
                    res_type,
                    registration.name,
                    data.len()
                );
                (registration.decode)(data)
            }
            None => Ok(TypedResource::Generic(GenericResource::from_bytes(data)?)),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Object(r) => r.to_bytes(),
            Self::Fence(r) => r.to_bytes(),
            Self::Wall(r) => r.to_bytes(),
            Self::Foundation(r) => r.to_bytes(),
            Self::Stairs(r) => r.to_bytes(),
            Self::StairLanding(r) => r.to_bytes(),
            Self::Column(r) => r.to_bytes(),
            Self::Catalog(r) => r.to_bytes(),
            Self::ObjectDefinition(r) => r.to_bytes(),
            Self::Rcol(r) => r.to_bytes(),
            Self::Generic(r) => r.to_bytes(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "COBJ",
            Self::Fence(_) => "CFEN",
            Self::Wall(_) => "CWAL",
            Self::Foundation(_) => "CFND",
            Self::Stairs(_) => "CSTR",
            Self::StairLanding(_) => "CSTL",
            Self::Column(_) => "CCOL",
            Self::Catalog(_) => "CATL",
            Self::ObjectDefinition(_) => "OBJD",
            Self::Rcol(_) => "RCOL",
            Self::Generic(_) => "generic",
        }
    }
}
