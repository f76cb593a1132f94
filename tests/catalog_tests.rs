use pretty_assertions::assert_eq;
use s4pi_codec::resource::catalog::{
    AuralProperties, ColumnModels, PlacementBlock, StairsReferences, WallImageGroup, WallMaterial,
    FALLBACK_OBJECT_VERSION,
};
use s4pi_codec::resource::list::{ColorList, Gp9References};
use s4pi_codec::{
    CatalogCommon, CatalogFamily, CatalogResource, ColumnCatalog, FenceCatalog, FormatError,
    FoundationCatalog, ObjectCatalog, RawCatalog, Resource, ResourceReader, ResourceWriter,
    StairLandingCatalog, StairsCatalog, TagFlags, TypedResource, WallCatalog, TGI,
};

/// A common block with every field zeroed and every list empty.
fn minimal_common(version: u32) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&version.to_le_bytes());
    data.extend_from_slice(&[0u8; 24]); // name, description, price, thumbnail, dev flags
    data.push(0); // product styles
    if version >= 10 {
        data.extend_from_slice(&[0u8; 12]); // pack id, tag flags, reserved
    } else {
        data.push(0); // unused2
    }
    data.extend_from_slice(&0u32.to_le_bytes()); // tags
    data.extend_from_slice(&0u32.to_le_bytes()); // selling points
    data.extend_from_slice(&[0u8; 18]);
    data
}

fn record(outer_version: u32, common: &[u8], body: &[u8]) -> Vec<u8> {
    let mut data = outer_version.to_le_bytes().to_vec();
    data.extend_from_slice(common);
    data.extend_from_slice(body);
    data
}

#[test]
fn test_minimal_common_block_round_trip() {
    let data = record(0x0A, &minimal_common(11), &[]);
    assert_eq!(data.len(), 4 + 67);

    let res = CatalogResource::<RawCatalog>::from_bytes(&data).unwrap();
    assert_eq!(res.common.price, 0);
    assert_eq!(res.common.dev_category_flags, 0);
    assert!(res.common.tags.is_empty());
    assert!(res.common.product_styles.is_empty());
    assert!(res.data.body.is_empty());
    assert_eq!(res.serialized_size().unwrap(), data.len());
    assert_eq!(res.to_bytes().unwrap(), data);
}

#[test]
fn test_empty_input_gives_defaults() {
    let res = CatalogResource::<ObjectCatalog>::from_bytes(&[]).unwrap();
    assert_eq!(res.version, FALLBACK_OBJECT_VERSION);
    assert_eq!(res.family(), CatalogFamily::Object);
    assert_eq!(res, CatalogResource::default());
}

#[test]
fn test_legacy_common_block_fields() {
    let mut common = Vec::new();
    common.extend_from_slice(&9u32.to_le_bytes());
    common.extend_from_slice(&0x11u32.to_le_bytes()); // name
    common.extend_from_slice(&0x22u32.to_le_bytes()); // description
    common.extend_from_slice(&150u32.to_le_bytes()); // price
    common.extend_from_slice(&0x33u64.to_le_bytes()); // thumbnail
    common.extend_from_slice(&0u32.to_le_bytes()); // dev flags
    common.push(1); // one product style
    common.extend_from_slice(&0x0102030405060708u64.to_le_bytes());
    common.extend_from_slice(&0xAAAAAAAAu32.to_le_bytes());
    common.extend_from_slice(&0xBBBBBBBBu32.to_le_bytes());
    common.push(1); // unused2
    common.push(7); // unused3, present because unused2 is set
    common.extend_from_slice(&2u32.to_le_bytes());
    common.extend_from_slice(&5u16.to_le_bytes());
    common.extend_from_slice(&6u16.to_le_bytes());
    common.extend_from_slice(&1u32.to_le_bytes());
    common.extend_from_slice(&0x44u32.to_le_bytes());
    common.extend_from_slice(&1.5f32.to_le_bytes());
    common.extend_from_slice(&[0u8; 18]);

    let data = record(0x0A, &common, &[]);
    let res = CatalogResource::<RawCatalog>::from_bytes(&data).unwrap();
    let c = &res.common;
    assert_eq!(c.price, 150);
    assert_eq!(c.product_styles, vec![TGI::new(0xAAAAAAAA, 0xBBBBBBBB, 0x0102030405060708)]);
    assert_eq!(c.unused2, 1);
    assert_eq!(c.unused3, 7);
    assert_eq!(c.tags, vec![5, 6]);
    assert_eq!(c.selling_points.len(), 1);
    assert_eq!(c.selling_points[0].value, 1.5);
    assert_eq!(res.to_bytes().unwrap(), data);
}

#[test]
fn test_common_block_follows_current_version() {
    let mut common = CatalogCommon {
        version: 9,
        tags: vec![5, 6],
        ..Default::default()
    };
    let legacy_size = common.serialized_size();

    common.version = 11;
    let wide_size = common.serialized_size();
    // Pack info replaces the single unused byte and tags grow to four bytes.
    assert_eq!(wide_size, legacy_size + 11 + 4);

    let mut writer = ResourceWriter::new();
    common.write(&mut writer).unwrap();
    let bytes = writer.into_inner();
    assert_eq!(bytes.len(), wide_size);

    let mut reader = ResourceReader::new(&bytes);
    assert_eq!(CatalogCommon::read(&mut reader).unwrap(), common);
}

#[test]
fn test_narrow_tag_overflow_is_rejected() {
    let common = CatalogCommon {
        version: 10,
        tags: vec![0x10000],
        ..Default::default()
    };
    let mut writer = ResourceWriter::new();
    let err = common.write(&mut writer).unwrap_err();
    assert!(matches!(err, FormatError::InvalidValue { .. }));
}

#[test]
fn test_tag_count_ceiling() {
    let mut common = minimal_common(11);
    // Tag count sits after the fixed fields, styles and pack info.
    let tag_count_at = 28 + 1 + 12;
    common[tag_count_at..tag_count_at + 4].copy_from_slice(&10_001u32.to_le_bytes());
    let data = record(0x0A, &common, &[]);

    let err = CatalogResource::<RawCatalog>::from_bytes(&data).unwrap_err();
    assert!(matches!(err, FormatError::BadCount { count: 10_001, limit: 10_000, .. }));

    let too_many = CatalogCommon {
        version: 11,
        tags: vec![1; 10_001],
        ..Default::default()
    };
    let err = too_many.write(&mut ResourceWriter::new()).unwrap_err();
    assert!(matches!(err, FormatError::CountOverflow { .. }));
}

#[test]
fn test_tag_flags_share_a_bit() {
    assert_eq!(TagFlags::AUTO_ASSIGNED.bits(), TagFlags::READ_ONLY.bits());

    let flags = TagFlags::from_bits_retain(0x81);
    assert!(flags.contains(TagFlags::AUTO_ASSIGNED));
    assert!(flags.contains(TagFlags::READ_ONLY));

    let common = CatalogCommon {
        version: 10,
        tag_flags: flags,
        ..Default::default()
    };
    let mut writer = ResourceWriter::new();
    common.write(&mut writer).unwrap();
    let bytes = writer.into_inner();
    let decoded = CatalogCommon::read(&mut ResourceReader::new(&bytes)).unwrap();
    assert_eq!(decoded.tag_flags.bits(), 0x81);
}

#[test]
fn test_aural_properties_version_gates() {
    let cases: [(u32, usize); 5] = [(1, 8), (2, 12), (3, 21), (4, 13), (5, 12)];
    for (version, size) in cases {
        let aural = AuralProperties {
            version,
            quality: 0x1234,
            ambient_object: if version > 1 { 0x55 } else { 0 },
            ambience_file_instance: if version == 3 { 0x66 } else { 0 },
            is_override_ambience: if version == 3 { 1 } else { 0 },
            unknown01: if version == 4 { 9 } else { 0 },
        };
        assert_eq!(aural.serialized_size().unwrap(), size, "aural version {}", version);

        let mut writer = ResourceWriter::new();
        writer.write(&aural).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), size);

        let mut reader = ResourceReader::new(&bytes);
        assert_eq!(reader.read::<AuralProperties>().unwrap(), aural);
        assert_eq!(reader.remaining(), 0);
    }
}

#[test]
fn test_aural_properties_require_their_fields() {
    // Version 1 needs no ambient object.
    let mut data = 1u32.to_le_bytes().to_vec();
    data.extend_from_slice(&7u32.to_le_bytes());
    let aural: AuralProperties = ResourceReader::new(&data).read().unwrap();
    assert_eq!(aural.quality, 7);

    // The same bytes at version 3 lack the ambient object and instance.
    data[0] = 3;
    let err = ResourceReader::new(&data)
        .read::<AuralProperties>()
        .unwrap_err();
    assert!(matches!(err, FormatError::TruncatedBuffer { .. }));
}

#[test]
fn test_object_fallback_reference_gate() {
    let mut res = CatalogResource::<ObjectCatalog>::default();
    res.common.version = 11;
    res.data.placement.aural_properties.version = 2;
    res.data.placement.colors = ColorList {
        colors: vec![0xFF00FF00, 0xFFFFFFFF],
    };
    res.data.fallback_object = TGI::new(0x319E4F1D, 0, 0xABCDEF);

    let current = res.to_bytes().unwrap();
    assert_eq!(current.len(), res.serialized_size().unwrap());
    let decoded = CatalogResource::<ObjectCatalog>::from_bytes(&current).unwrap();
    assert_eq!(decoded, res);

    res.version = FALLBACK_OBJECT_VERSION - 1;
    let older = res.to_bytes().unwrap();
    assert_eq!(older.len() + 16, current.len());

    let decoded = CatalogResource::<ObjectCatalog>::from_bytes(&older).unwrap();
    assert_eq!(decoded.data.fallback_object, TGI::default());
    assert_eq!(decoded.data.placement, res.data.placement);
}

#[test]
fn test_fence_variant_data_gate() {
    let mut res = CatalogResource::<FenceCatalog>::default();
    assert_eq!(res.family(), CatalogFamily::AuralExtended);
    res.common.version = 11;
    res.data.placement = PlacementBlock {
        aural_properties: AuralProperties {
            version: 4,
            unknown01: 1,
            ..Default::default()
        },
        fence_height: 3,
        ..Default::default()
    };
    res.data.models.references[2] = TGI::new(1, 2, 3);
    res.data.variant_data = vec![1, 2, 3, 4, 5];

    let current = res.to_bytes().unwrap();
    assert_eq!(CatalogResource::<FenceCatalog>::from_bytes(&current).unwrap(), res);

    res.version = 0x18;
    let older = res.to_bytes().unwrap();
    assert_eq!(older.len() + 4 + 5, current.len());
    let decoded = CatalogResource::<FenceCatalog>::from_bytes(&older).unwrap();
    assert!(decoded.data.variant_data.is_empty());
    assert_eq!(decoded.data.models, res.data.models);
}

#[test]
fn test_stair_landing_reference_count() {
    let mut res = CatalogResource::<StairLandingCatalog>::default();
    res.common.version = 11;
    assert_eq!(res.data.references.len(), 25);
    res.data.references[24] = TGI::new(9, 9, 9);

    let bytes = res.to_bytes().unwrap();
    assert_eq!(CatalogResource::<StairLandingCatalog>::from_bytes(&bytes).unwrap(), res);

    res.version = 0x0D;
    let err = res.to_bytes().unwrap_err();
    assert!(matches!(err, FormatError::BadCount { limit: 21, .. }));

    res.data.references.truncate(21);
    let bytes = res.to_bytes().unwrap();
    let decoded = CatalogResource::<StairLandingCatalog>::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.data.references.len(), 21);

    let data = record(0x0C, &minimal_common(11), &[0u8; 64]);
    let err = CatalogResource::<StairLandingCatalog>::from_bytes(&data).unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedVersion { version: 0x0C, .. }));
}

#[test]
fn test_column_model_discriminator() {
    let mut res = CatalogResource::<ColumnCatalog>::default();
    res.common.version = 11;
    let mut nine = Gp9References::default();
    nine.references[8] = TGI::new(0x01661233, 0, 42);
    res.data.models = ColumnModels::Nine(nine);

    let mut bytes = res.to_bytes().unwrap();
    assert_eq!(CatalogResource::<ColumnCatalog>::from_bytes(&bytes).unwrap(), res);

    let discriminator_at = 4 + res.common.serialized_size();
    assert_eq!(bytes[discriminator_at], 1);
    bytes[discriminator_at] = 2;
    let err = CatalogResource::<ColumnCatalog>::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FormatError::InvalidValue { value: 2, .. }));
}

#[test]
fn test_wall_catalog_via_registry() {
    let mut res = CatalogResource::<WallCatalog>::default();
    res.common.version = 11;
    res.common.tags = vec![0x1234_5678];
    res.data.materials = vec![
        WallMaterial {
            label: 1,
            material: TGI::new(0x01D0E75D, 0, 1),
        },
        WallMaterial {
            label: 2,
            material: TGI::new(0x01D0E75D, 0, 2),
        },
    ];
    res.data.unk_iid01 = 77;
    let bytes = res.to_bytes().unwrap();

    match TypedResource::from_bytes(0xD5F0F921, &bytes).unwrap() {
        TypedResource::Wall(wall) => assert_eq!(wall, res),
        other => panic!("Expected Wall catalog, got {:?}", other.kind_name()),
    }
}

#[test]
fn test_trailing_bytes_are_kept() {
    let mut res = CatalogResource::<WallCatalog>::default();
    res.common.version = 11;
    let mut bytes = res.to_bytes().unwrap();
    bytes.extend_from_slice(&[0xDE, 0xAD]);

    let decoded = CatalogResource::<WallCatalog>::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.trailing, vec![0xDE, 0xAD]);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_truncated_kind_fields_fail() {
    let data = record(0x0A, &minimal_common(11), &[0u8; 10]);
    let err = CatalogResource::<WallCatalog>::from_bytes(&data).unwrap_err();
    assert!(matches!(
        err,
        FormatError::TruncatedBuffer { .. } | FormatError::BadCount { .. }
    ));
}

#[test]
fn test_foundation_references_are_instance_first() {
    let mut res = CatalogResource::<FoundationCatalog>::default();
    res.common.version = 11;
    res.data.unk02 = 5;
    res.data.model = TGI::new(0x01661233, 0x10, 0x1122334455667788);
    res.data.float2 = 0.5;
    res.data.model2 = TGI::new(0x01D0E75D, 0, 3);
    res.data.colors = ColorList {
        colors: vec![0xFF336699],
    };

    let bytes = res.to_bytes().unwrap();
    assert_eq!(bytes.len(), res.serialized_size().unwrap());
    let body = 4 + res.common.serialized_size();
    assert_eq!(bytes[body + 1], 5);
    assert_eq!(&bytes[body + 2..body + 10], &0x1122334455667788u64.to_le_bytes());
    assert_eq!(&bytes[body + 10..body + 14], &0x01661233u32.to_le_bytes());
    assert_eq!(&bytes[body + 14..body + 18], &0x10u32.to_le_bytes());
    // Two bytes, three references, variant, grouping, two floats, one color.
    assert_eq!(bytes.len() - body, 2 + 3 * 16 + 4 + 8 + 8 + 1 + 4);

    assert_eq!(CatalogResource::<FoundationCatalog>::from_bytes(&bytes).unwrap(), res);
}

#[test]
fn test_stairs_catalog_round_trip() {
    let mut res = CatalogResource::<StairsCatalog>::default();
    res.common.version = 11;
    res.data.hash02 = 0xABCD;
    res.data.references = StairsReferences {
        wall: TGI::new(0x9063660D, 0, 7),
        object: TGI::new(0x319E4F1D, 0, 8),
        ..Default::default()
    };
    res.data.unk05 = 1;

    let bytes = res.to_bytes().unwrap();
    let body = 4 + res.common.serialized_size();
    assert_eq!(bytes.len() - body, 16 + 6 * 16 + 3 + 4 + 8 + 1 + 1);
    // The wall reference is the fifth, instance first.
    let wall_at = body + 16 + 4 * 16;
    assert_eq!(&bytes[wall_at..wall_at + 8], &7u64.to_le_bytes());

    let decoded = CatalogResource::<StairsCatalog>::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, res);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_wall_lists_and_color_overflow() {
    let mut res = CatalogResource::<WallCatalog>::default();
    res.common.version = 11;
    res.data.image_groups = vec![WallImageGroup {
        unk01: 3,
        image: TGI::new(0x00B2D882, 0, 0x44),
    }];
    let bytes = res.to_bytes().unwrap();
    let body = 4 + res.common.serialized_size();
    assert_eq!(&bytes[body..body + 4], &0u32.to_le_bytes());
    assert_eq!(&bytes[body + 4..body + 8], &1u32.to_le_bytes());
    assert_eq!(&bytes[body + 12..body + 20], &0x44u64.to_le_bytes());
    assert_eq!(CatalogResource::<WallCatalog>::from_bytes(&bytes).unwrap(), res);

    res.data.colors = ColorList {
        colors: vec![0; 256],
    };
    assert!(res.serialized_size().is_err());
    assert!(res.to_bytes().is_err());
}
