use crate::resource::error::FormatError;
use crate::resource::rcol::{
    ChunkData, ElementUsage, ElementValue, IbufChunk, RcolResource, VbufChunk, VrtfChunk,
};

/// A mesh assembled from the three chunks that describe it.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuffers<'a> {
    pub format: &'a VrtfChunk,
    pub vertices: &'a VbufChunk,
    pub indices: &'a IbufChunk,
}

impl<'a> MeshBuffers<'a> {
    /// Uses the first VRTF, VBUF and IBUF chunk of `rcol`.
    pub fn from_rcol(rcol: &'a RcolResource) -> Option<Self> {
        let mut format = None;
        let mut vertices = None;
        let mut indices = None;
        for entry in &rcol.chunks {
            match &entry.data {
                ChunkData::Vrtf(c) if format.is_none() => format = Some(c),
                ChunkData::Vbuf(c) if vertices.is_none() => vertices = Some(c),
                ChunkData::Ibuf(c) if indices.is_none() => indices = Some(c),
                _ => {}
            }
        }
        Some(Self {
            format: format?,
            vertices: vertices?,
            indices: indices?,
        })
    }

    pub fn stride(&self) -> usize {
        self.format.stride as usize
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.vertex_count(self.stride())
    }

    /// Positions of every vertex, empty when the layout has none.
    pub fn positions(&self) -> Result<Vec<[f32; 3]>, FormatError> {
        let Some(element) = self.format.element(ElementUsage::Position) else {
            return Ok(Vec::new());
        };
        (0..self.vertex_count())
            .map(|vertex| {
                match self.vertices.read_element(vertex, self.stride(), element)? {
                    ElementValue::Vec3(p) => Ok(p),
                    ElementValue::Vec4([x, y, z, _]) => Ok([x, y, z]),
                    _ => Err(FormatError::invalid(
                        "position format",
                        u8::from(element.format),
                    )),
                }
            })
            .collect()
    }

    /// Triangles as index triples. A trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + 'a {
        self.indices
            .indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }
}
