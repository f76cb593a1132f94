use pretty_assertions::assert_eq;
use s4pi_codec::resource::rcol::{
    ElementFormat, ElementUsage, ElementValue, IndexFlags, VertexElement,
};
use s4pi_codec::{
    ChunkData, FormatError, IbufChunk, MeshBuffers, RcolEntry, RcolResource, Resource, VbufChunk,
    VrtfChunk, TGI,
};

fn ibuf(flags: IndexFlags, indices: &[u32]) -> IbufChunk {
    IbufChunk {
        flags,
        indices: indices.to_vec(),
        ..Default::default()
    }
}

fn flags_of(data: &[u8]) -> u32 {
    u32::from_le_bytes(data[8..12].try_into().unwrap())
}

#[test]
fn test_differenced_and_plain_decode_alike() {
    // A descending run and a repeated value.
    let indices = [0, 1, 2, 2, 1, 0, 5, 3, 3];

    let differenced = ibuf(IndexFlags::DIFFERENCED, &indices).to_bytes().unwrap();
    let plain = ibuf(IndexFlags::empty(), &indices).to_bytes().unwrap();
    assert_ne!(differenced, plain);
    assert_eq!(differenced.len(), 16 + 2 * indices.len());
    assert_eq!(plain.len(), 16 + 2 * indices.len());

    let a = IbufChunk::from_bytes(&differenced).unwrap();
    let b = IbufChunk::from_bytes(&plain).unwrap();
    assert_eq!(a.indices, indices.to_vec());
    assert_eq!(b.indices, indices.to_vec());
}

#[test]
fn test_hand_built_deltas() {
    let mut data = Vec::new();
    data.extend_from_slice(b"IBUF");
    data.extend_from_slice(&0x100u32.to_le_bytes());
    data.extend_from_slice(&IndexFlags::DIFFERENCED.bits().to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    for delta in [3i16, -1, -1, 0] {
        data.extend_from_slice(&delta.to_le_bytes());
    }

    let chunk = IbufChunk::from_bytes(&data).unwrap();
    assert_eq!(chunk.indices, vec![3, 2, 1, 1]);
    assert_eq!(chunk.to_bytes().unwrap(), data);
}

#[test]
fn test_large_index_forces_32_bit() {
    let indices = [0, 70_000, 1];
    for flags in [IndexFlags::DIFFERENCED, IndexFlags::empty()] {
        let data = ibuf(flags, &indices).to_bytes().unwrap();
        assert_eq!(data.len(), 16 + 4 * indices.len());
        assert_eq!(flags_of(&data), (flags | IndexFlags::USES_32BIT).bits());
        assert_eq!(IbufChunk::from_bytes(&data).unwrap().indices, indices.to_vec());
    }
}

#[test]
fn test_large_delta_forces_32_bit() {
    // Every value fits 16 bits but the jump from 0 to 40000 does not fit i16.
    let indices = [0, 40_000, 39_999];
    let data = ibuf(IndexFlags::DIFFERENCED, &indices).to_bytes().unwrap();
    assert_eq!(data.len(), 16 + 4 * indices.len());
    assert_eq!(IbufChunk::from_bytes(&data).unwrap().indices, indices.to_vec());

    let data = ibuf(IndexFlags::empty(), &indices).to_bytes().unwrap();
    assert_eq!(data.len(), 16 + 2 * indices.len());
}

#[test]
fn test_stale_width_flag_is_ignored() {
    let chunk = ibuf(IndexFlags::DIFFERENCED | IndexFlags::USES_32BIT, &[1, 2, 3]);
    let data = chunk.to_bytes().unwrap();
    assert_eq!(data.len(), 16 + 6);
    assert_eq!(flags_of(&data), IndexFlags::DIFFERENCED.bits());
}

#[test]
fn test_running_sums_wrap() {
    let mut data = Vec::new();
    data.extend_from_slice(b"IBUF");
    data.extend_from_slice(&0x100u32.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&(-1i16).to_le_bytes());
    let chunk = IbufChunk::from_bytes(&data).unwrap();
    assert_eq!(chunk.indices, vec![u32::MAX]);
    assert_eq!(chunk.to_bytes().unwrap(), data);

    // Half an index left over.
    data.push(0);
    assert!(matches!(
        IbufChunk::from_bytes(&data).unwrap_err(),
        FormatError::InvalidValue { .. }
    ));
}

#[test]
fn test_any_index_sequence_round_trips() {
    let indices = [0, 0xFFFF_FFFF, 0x8000_0000, 5, 0x7FFF_FFFF, 0];
    for flags in [IndexFlags::DIFFERENCED, IndexFlags::empty()] {
        let data = ibuf(flags, &indices).to_bytes().unwrap();
        assert_eq!(data.len(), 16 + 4 * indices.len());
        assert_eq!(IbufChunk::from_bytes(&data).unwrap().indices, indices.to_vec());
    }
}

fn position_uv_format() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"VRTF");
    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(&20u32.to_le_bytes()); // stride
    data.extend_from_slice(&2i32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes()); // not extended
    data.extend_from_slice(&[0, 0, 2, 0]); // position, float3, offset 0
    data.extend_from_slice(&[2, 0, 1, 12]); // uv, float2, offset 12
    data
}

fn two_vertices() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"VBUF");
    data.extend_from_slice(&0x101u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0x0000_0002u32.to_le_bytes());
    for v in [1.0f32, 2.0, 3.0, 0.25, 0.5, 4.0, 5.0, 6.0, 0.75, 1.0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    data
}

#[test]
fn test_vertex_format_round_trip() {
    let data = position_uv_format();
    let vrtf = VrtfChunk::from_bytes(&data).unwrap();
    assert_eq!(vrtf.stride, 20);
    assert_eq!(
        vrtf.elements,
        vec![
            VertexElement {
                usage: ElementUsage::Position,
                usage_index: 0,
                format: ElementFormat::Float3,
                offset: 0,
            },
            VertexElement {
                usage: ElementUsage::UV,
                usage_index: 0,
                format: ElementFormat::Float2,
                offset: 12,
            },
        ]
    );
    assert_eq!(vrtf.to_bytes().unwrap(), data);

    let mut extended = vrtf.clone();
    extended.extended_format = true;
    extended.elements[1].usage = ElementUsage::Unknown(0x20);
    let bytes = extended.to_bytes().unwrap();
    assert_eq!(bytes.len(), 20 + 2 * 16);
    assert_eq!(VrtfChunk::from_bytes(&bytes).unwrap(), extended);
}

#[test]
fn test_vertex_buffer_random_access() {
    let vrtf = VrtfChunk::from_bytes(&position_uv_format()).unwrap();
    let vbuf = VbufChunk::from_bytes(&two_vertices()).unwrap();
    assert_eq!(vbuf.swizzle_info, 2);
    assert_eq!(vbuf.vertex_count(20), 2);

    let uv = vrtf.element(ElementUsage::UV).unwrap();
    assert_eq!(
        vbuf.read_element(1, 20, uv).unwrap(),
        ElementValue::Vec2([0.75, 1.0])
    );
    assert_eq!(vbuf.read_vec3(20).unwrap(), [4.0, 5.0, 6.0]);
    assert_eq!(vbuf.read_f32(12).unwrap(), 0.25);
    assert!(matches!(
        vbuf.read_element(2, 20, uv).unwrap_err(),
        FormatError::TruncatedBuffer { .. }
    ));

    let position = vrtf.element(ElementUsage::Position).unwrap();
    assert!(matches!(
        VbufChunk::default()
            .read_element(usize::MAX, 2, position)
            .unwrap_err(),
        FormatError::InvalidValue { .. }
    ));
    assert!(matches!(
        vbuf.read_element(usize::MAX / 20 + 1, 20, uv).unwrap_err(),
        FormatError::InvalidValue { .. }
    ));
    assert_eq!(vbuf.to_bytes().unwrap(), two_vertices());
}

#[test]
fn test_mesh_view_over_rcol() {
    let mut indices = IbufChunk::default();
    indices.indices = vec![0, 1, 1, 1, 0, 0];
    let rcol = RcolResource {
        chunks: vec![
            RcolEntry {
                tgi: TGI::new(0x01D0E75D, 0, 1),
                data: ChunkData::Vrtf(VrtfChunk::from_bytes(&position_uv_format()).unwrap()),
            },
            RcolEntry {
                tgi: TGI::new(0x01D0E75D, 0, 2),
                data: ChunkData::Vbuf(VbufChunk::from_bytes(&two_vertices()).unwrap()),
            },
            RcolEntry {
                tgi: TGI::new(0x01D0E75D, 0, 3),
                data: ChunkData::Ibuf(indices),
            },
        ],
        ..Default::default()
    };
    let decoded = RcolResource::from_bytes(&rcol.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, rcol);

    let mesh = MeshBuffers::from_rcol(&decoded).unwrap();
    assert_eq!(mesh.vertex_count(), 2);
    assert_eq!(mesh.positions().unwrap(), vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 1], [1, 0, 0]]);

    assert!(MeshBuffers::from_rcol(&RcolResource::default()).is_none());
}
