//! End-to-end tests: container -> BMP -> container

use std::path::Path;

use hgtex::{IndexedRaster, PixelFormat, TextureRecord};
use tempfile::tempdir;

fn container_with(records: &[TextureRecord]) -> Vec<u8> {
    hgtex::write_container(records).expect("Failed to write container")
}

fn arbitrary_clut(seed: u8) -> Vec<u8> {
    (0..1024).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

/// Export a container, reimport it using itself as the reference.
fn export_then_import(raw: &[u8]) -> Vec<TextureRecord> {
    let exports = hgtex::export_textures(raw).expect("Failed to export");
    let rasters: Vec<IndexedRaster> = exports
        .iter()
        .map(|e| {
            let bmp = e.raster.to_bmp_bytes().expect("Failed to encode BMP");
            IndexedRaster::from_bmp_bytes(&bmp).expect("Failed to decode BMP")
        })
        .collect();
    let records = hgtex::import_textures(&rasters, raw).expect("Failed to import");
    let rebuilt = container_with(&records);
    hgtex::read_textures(&rebuilt).expect("Failed to reparse rebuilt container")
}

#[test]
fn test_indexed8_2x2_round_trip() {
    let original = TextureRecord {
        format: PixelFormat::Indexed8,
        width: 2,
        height: 2,
        unknown: [0x12, 0x34, 0x56, 0x78],
        pixel_data: vec![3, 200, 17, 64],
        clut: arbitrary_clut(5),
    };
    let raw = container_with(&[original.clone()]);
    let rebuilt = export_then_import(&raw);

    assert_eq!(1, rebuilt.len());
    let texture = &rebuilt[0];
    assert_eq!(original.format, texture.format);
    assert_eq!(original.width, texture.width);
    assert_eq!(original.height, texture.height);
    assert_eq!(original.unknown, texture.unknown);
    assert_eq!(original.pixel_data, texture.pixel_data);
}

#[test]
fn test_mixed_container_round_trip() {
    let originals = vec![
        TextureRecord {
            format: PixelFormat::Indexed4,
            width: 8,
            height: 4,
            unknown: [1, 0, 0, 0x40],
            pixel_data: (0..16).map(|i| (i * 37) as u8).collect(),
            clut: arbitrary_clut(9),
        },
        TextureRecord {
            format: PixelFormat::Indexed8,
            width: 4,
            height: 4,
            unknown: [2, 0, 0, 0x80],
            pixel_data: (0..16).map(|i| (255 - i * 13) as u8).collect(),
            clut: arbitrary_clut(77),
        },
    ];
    let raw = container_with(&originals);
    let rebuilt = export_then_import(&raw);

    assert_eq!(originals.len(), rebuilt.len());
    for (original, texture) in originals.iter().zip(&rebuilt) {
        assert_eq!(original.format, texture.format);
        assert_eq!(original.unknown, texture.unknown);
        assert_eq!(original.pixel_data, texture.pixel_data);
    }

    // RGB survives for the logical entries; alpha is resynthesized.
    let decoded_original = hgtex::clut::decode_clut(&originals[0].clut);
    let decoded_rebuilt = hgtex::clut::decode_clut(&rebuilt[0].clut);
    for k in 0..16 {
        assert_eq!(&decoded_original[k][..3], &decoded_rebuilt[k][..3]);
    }
}

#[test]
fn test_written_offsets_satisfy_invariant() {
    let records: Vec<TextureRecord> = (0..3)
        .map(|i| TextureRecord {
            format: if i % 2 == 0 {
                PixelFormat::Indexed8
            } else {
                PixelFormat::Indexed4
            },
            width: 4 + i as u16 * 2,
            height: 2,
            unknown: [i as u8; 4],
            pixel_data: vec![i as u8; if i % 2 == 0 { 8 + i * 4 } else { (8 + i * 4) / 2 }],
            clut: vec![0; 1024],
        })
        .collect();
    let raw = container_with(&records);
    let headers = hgtex::read_headers(&raw).unwrap();
    let descriptors = hgtex::read_descriptors(&raw).unwrap();

    let mut expected_offset = 0x10 + records.len() * 0x10;
    for (index, (header, descriptor)) in headers.iter().zip(&descriptors).enumerate() {
        let absolute = 0x10 + index as i64 * 16 + header.relative_data_offset as i64;
        assert_eq!(absolute, descriptor.data_offset as i64);
        assert_eq!(expected_offset, descriptor.data_offset);
        expected_offset += records[index].pixel_data.len() + 1024;
    }
    assert_eq!(expected_offset, raw.len());
}

#[test]
fn test_write_exports_to_disk() {
    let raw = container_with(&[TextureRecord {
        format: PixelFormat::Indexed4,
        width: 4,
        height: 4,
        unknown: [0; 4],
        pixel_data: vec![0x10; 8],
        clut: arbitrary_clut(1),
    }]);
    let dir = tempdir().expect("Failed to create temp dir");
    let exports = hgtex::export_textures(&raw).unwrap();
    let written = hgtex::write_exports(&exports, dir.path(), "TEST", false).unwrap();
    assert_eq!(2, written.len());

    let bmp_path = dir.path().join("TEST_texture1.bmp");
    let raster = IndexedRaster::read_bmp(Path::new(&bmp_path)).unwrap();
    assert_eq!(4, raster.width);
    assert_eq!(exports[0].raster.indices, raster.indices);
    assert!(!dir.path().join("TEST_texture1.png").exists());
}
