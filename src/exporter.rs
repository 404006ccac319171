use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{info, warn};

use crate::clut::{self, Rgb, Rgba};
use crate::container::{self, TextureDescriptor};
use crate::pixel_encodings::indices_to_rgba;
use crate::{IndexedRaster, RasterError, TexError};

type Result<T> = std::result::Result<T, TexError>;

pub struct ExportedTexture {
    pub descriptor: TextureDescriptor,
    pub indices: Vec<u8>,
    pub clut: Vec<Rgba>,
    pub rgba: RgbaImage,
    pub raster: IndexedRaster,
}

impl ExportedTexture {
    /// The decoded color table as raw RGBA bytes.
    pub fn clut_bytes(&self) -> Vec<u8> {
        clut::clut_to_bytes(&self.clut)
    }
}

/// Decodes every texture in a container. Nothing is returned unless the
/// whole container is valid.
pub fn export_textures(raw: &[u8]) -> Result<Vec<ExportedTexture>> {
    let descriptors = container::read_descriptors(raw)?;
    let mut exports: Vec<ExportedTexture> = Vec::new();
    for descriptor in descriptors {
        let width = descriptor.width as usize;
        let height = descriptor.height as usize;
        let pixel_data = &raw[descriptor.data_offset..descriptor.clut_offset()];
        let clut = clut::decode_clut(&raw[descriptor.clut_offset()..descriptor.end()]);
        let indices = descriptor.format.decode_indices(pixel_data, width, height);
        let rgba = indices_to_rgba(
            &indices,
            descriptor.width as u32,
            descriptor.height as u32,
            &clut,
        );
        let raster = build_raster(&descriptor, &indices, &clut);
        exports.push(ExportedTexture {
            descriptor,
            indices,
            clut,
            rgba,
            raster,
        });
    }
    Ok(exports)
}

// The palette holds only the texture's own logical colors, with alpha dropped.
// Entry k sits in slot n - 1 - k, which is the order the importer's index
// inversion and palette reversal map back onto k.
fn build_raster(descriptor: &TextureDescriptor, indices: &[u8], clut: &[Rgba]) -> IndexedRaster {
    let logical_size = descriptor.format.logical_palette_size();
    let last = (logical_size - 1) as u8;
    let palette: Vec<Rgb> = (0..logical_size)
        .rev()
        .map(|k| {
            let [r, g, b, _] = clut.get(k).copied().unwrap_or([0; 4]);
            [r, g, b]
        })
        .collect();
    IndexedRaster {
        width: descriptor.width as u32,
        height: descriptor.height as u32,
        palette,
        indices: indices.iter().map(|k| last.wrapping_sub(*k)).collect(),
    }
}

pub fn texture_file_stem(container_stem: &str, index: usize) -> String {
    format!("{}_texture{}", container_stem, index + 1)
}

/// Writes `{stem}_textureN.bmp` and `{stem}_textureN_clut.bin` for every
/// export, plus `{stem}_textureN.png` with alpha when `with_rgba` is set.
/// Textures with a zero dimension only get their CLUT file. Every file is
/// encoded before the first one is written.
pub fn write_exports(
    exports: &[ExportedTexture],
    output_dir: &Path,
    container_stem: &str,
    with_rgba: bool,
) -> std::result::Result<Vec<PathBuf>, RasterError> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    for (index, export) in exports.iter().enumerate() {
        let stem = texture_file_stem(container_stem, index);
        files.push((
            output_dir.join(format!("{}_clut.bin", stem)),
            export.clut_bytes(),
        ));
        if export.raster.width == 0 || export.raster.height == 0 {
            warn!(
                "Texture {} is {}x{}; skipping its image files",
                index + 1,
                export.raster.width,
                export.raster.height
            );
            continue;
        }
        files.push((
            output_dir.join(format!("{}.bmp", stem)),
            export.raster.to_bmp_bytes()?,
        ));
        if with_rgba {
            let mut png: Vec<u8> = Vec::new();
            export
                .rgba
                .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
            files.push((output_dir.join(format!("{}.png", stem)), png));
        }
    }

    std::fs::create_dir_all(output_dir)?;
    let mut written: Vec<PathBuf> = Vec::new();
    for (path, contents) in files {
        std::fs::write(&path, contents)?;
        info!("Exported {}", path.display());
        written.push(path);
    }
    Ok(written)
}
