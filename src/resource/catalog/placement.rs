use binrw::binrw;

use crate::resource::error::FormatError;
use crate::resource::list::ColorList;
use crate::resource::stream::encoded_len;

/// Sound settings of a placeable catalog object.
///
/// Which fields are stored depends only on `version`.
#[binrw]
#[derive(Debug, Default, Clone, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct AuralProperties {
    pub version: u32,
    pub quality: u32,
    /// Version 2 and later.
    #[br(if(version > 1))]
    #[bw(if(*version > 1))]
    pub ambient_object: u32,
    /// Version 3 only.
    #[br(if(version == 3))]
    #[bw(if(*version == 3))]
    pub ambience_file_instance: u64,
    /// Version 3 only.
    #[br(if(version == 3))]
    #[bw(if(*version == 3))]
    pub is_override_ambience: u8,
    /// Version 4 only.
    #[br(if(version == 4))]
    #[bw(if(*version == 4))]
    pub unknown01: u8,
}

impl AuralProperties {
    pub fn serialized_size(&self) -> Result<usize, FormatError> {
        encoded_len(self)
    }
}

/// The aural and placement extension stored after the common block by
/// objects and other placeable catalog kinds.
#[binrw]
#[derive(Debug, Default, Clone, PartialEq)]
#[br(little)]
#[bw(little)]
pub struct PlacementBlock {
    pub aural_materials_version: u32,
    pub aural_materials: [u32; 3],
    pub aural_properties: AuralProperties,
    pub unused: [u32; 3],
    pub placement_flags_high: u32,
    pub placement_flags_low: u32,
    pub slot_type_set: u64,
    pub slot_deco_size: u8,
    pub catalog_group: u64,
    pub state_usage: u8,
    pub colors: ColorList,
    pub fence_height: u32,
    pub is_stackable: u8,
    pub can_item_depreciate: u8,
}
