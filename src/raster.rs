use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::{BmpDecoder, BmpEncoder};
use image::{ExtendedColorType, ImageDecoder};

use crate::clut::Rgb;
use crate::RasterError;

type Result<T> = std::result::Result<T, RasterError>;

pub const MAX_PALETTE_SIZE: usize = 256;

/// A palettized image: one palette index per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<Rgb>,
    pub indices: Vec<u8>,
}

impl IndexedRaster {
    pub fn new(width: u32, height: u32, palette: Vec<Rgb>, indices: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(RasterError::IndexCountMismatch(expected, indices.len()));
        }
        if palette.len() > MAX_PALETTE_SIZE {
            return Err(RasterError::PaletteTooLarge(palette.len()));
        }
        Ok(IndexedRaster {
            width,
            height,
            palette,
            indices,
        })
    }

    pub fn from_bmp_bytes(raw: &[u8]) -> Result<Self> {
        let mut decoder = BmpDecoder::new(Cursor::new(raw))?;
        decoder.set_indexed_color(true);
        let palette = decoder
            .get_palette()
            .map(|p| p.to_vec())
            .ok_or(RasterError::NotIndexed)?;
        let (width, height) = decoder.dimensions();
        let mut indices: Vec<u8> = vec![0; decoder.total_bytes() as usize];
        decoder.read_image(&mut indices)?;
        IndexedRaster::new(width, height, palette, indices)
    }

    pub fn read_bmp(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)?;
        IndexedRaster::from_bmp_bytes(&raw)
    }

    pub fn to_bmp_bytes(&self) -> Result<Vec<u8>> {
        let mut raw: Vec<u8> = Vec::new();
        BmpEncoder::new(&mut raw).encode_with_palette(
            &self.indices,
            self.width,
            self.height,
            ExtendedColorType::L8,
            Some(self.palette.as_slice()),
        )?;
        Ok(raw)
    }
}
