use crate::resource::error::FormatError;
use crate::resource::list::{read_count, read_items, write_count, CountWidth, MAX_LIST_COUNT};
use crate::resource::rcol::{read_chunk_header, write_chunk_header, RcolChunk};
use crate::resource::stream::{ResourceReader, ResourceWriter};
use crate::resource::tgi::FourCc;
use crate::resource::Resource;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bone {
    pub name_hash: u32,
    /// Four rows of three: the rotation rows, then the translation.
    pub inverse_bind_pose: [[f32; 3]; 4],
}

/// Bone list of a skinned mesh.
///
/// On disk all name hashes come first, followed by all matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinChunk {
    pub version: u32,
    pub bones: Vec<Bone>,
}

impl Default for SkinChunk {
    fn default() -> Self {
        Self {
            version: 1,
            bones: Vec::new(),
        }
    }
}

impl RcolChunk for SkinChunk {
    const TAG: FourCc = FourCc::new(b"SKIN");
    const VERSIONS: &'static [u32] = &[1];
}

impl Resource for SkinChunk {
    fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = ResourceReader::new(data);
        let version = read_chunk_header::<Self>(&mut reader)?;
        let count = read_count(&mut reader, CountWidth::I32, 4 + 48, MAX_LIST_COUNT, "skin bones")?;

        let names: Vec<u32> = read_items(&mut reader, count)?;
        let poses: Vec<[[f32; 3]; 4]> = read_items(&mut reader, count)?;
        let bones = names
            .into_iter()
            .zip(poses)
            .map(|(name_hash, inverse_bind_pose)| Bone {
                name_hash,
                inverse_bind_pose,
            })
            .collect();

        Ok(Self { version, bones })
    }

    fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut writer = ResourceWriter::with_capacity(12 + 52 * self.bones.len());
        write_chunk_header::<Self>(&mut writer, self.version)?;
        write_count(&mut writer, CountWidth::I32, self.bones.len(), "skin bones")?;
        for bone in &self.bones {
            writer.u32(bone.name_hash)?;
        }
        for bone in &self.bones {
            writer.write(&bone.inverse_bind_pose)?;
        }
        Ok(writer.into_inner())
    }
}
