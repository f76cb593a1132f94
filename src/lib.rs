pub mod resource;

pub use resource::catalog::{
    CatalogCommon, CatalogFamily, CatalogKind, CatalogResource, ColumnCatalog, FenceCatalog,
    FoundationCatalog, ObjectCatalog, RawCatalog, StairLandingCatalog, StairsCatalog, TagFlags,
    WallCatalog,
};
pub use resource::error::FormatError;
pub use resource::objdef::{ObjectDefinitionResource, ObjectProperty, PropertyKind};
pub use resource::rcol::{
    ChunkData, GeomChunk, IbufChunk, MeshBuffers, RcolChunk, RcolEntry, RcolResource, RsltChunk,
    SkinChunk, VbufChunk, VpxyChunk, VrtfChunk,
};
pub use resource::stream::{ResourceReader, ResourceWriter};
pub use resource::tgi::{FourCc, ItgTGI, ResourceKey, TgiOrder, TGI};
pub use resource::{
    registration, resource_type_name, GenericResource, Registration, Resource, TypedResource,
    REGISTRY,
};
