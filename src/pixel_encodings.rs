use image::RgbaImage;
use strum_macros::Display;

use crate::clut::Rgba;

pub const FORMAT_FLAG_INDEXED8: u32 = 0x13;
pub const FORMAT_FLAG_INDEXED4: u32 = 0x14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PixelFormat {
    #[strum(serialize = "8bpp")]
    Indexed8,
    #[strum(serialize = "4bpp")]
    Indexed4,
}

impl PixelFormat {
    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag {
            FORMAT_FLAG_INDEXED8 => Some(PixelFormat::Indexed8),
            FORMAT_FLAG_INDEXED4 => Some(PixelFormat::Indexed4),
            _ => None,
        }
    }

    pub fn flag(&self) -> u32 {
        match self {
            PixelFormat::Indexed8 => FORMAT_FLAG_INDEXED8,
            PixelFormat::Indexed4 => FORMAT_FLAG_INDEXED4,
        }
    }

    pub fn bits_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Indexed8 => 8,
            PixelFormat::Indexed4 => 4,
        }
    }

    /// Number of palette entries a texture of this format can address.
    pub fn logical_palette_size(&self) -> usize {
        match self {
            PixelFormat::Indexed8 => 256,
            PixelFormat::Indexed4 => 16,
        }
    }

    /// Size of the on-disk pixel block. Odd 4bpp totals truncate.
    pub fn pixel_data_size(&self, width: usize, height: usize) -> usize {
        match self {
            PixelFormat::Indexed8 => width * height,
            PixelFormat::Indexed4 => width * height / 2,
        }
    }

    /// Unpacks on-disk pixel bytes into a row-major index buffer of
    /// `width * height` entries. Pixels the data does not reach stay 0.
    pub fn decode_indices(&self, pixel_data: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut indices: Vec<u8> = vec![0; width * height];
        if width == 0 || height == 0 {
            return indices;
        }
        match self {
            PixelFormat::Indexed8 => {
                for (i, value) in pixel_data.iter().enumerate() {
                    if i / width < height {
                        indices[i] = *value;
                    }
                }
            }
            PixelFormat::Indexed4 => {
                for (i, value) in pixel_data.iter().enumerate() {
                    let row = (2 * i) / width;
                    let column = (2 * i) % width;
                    if row >= height {
                        continue;
                    }
                    let base = row * width + column;
                    indices[base] = value & 0x0F;
                    if column + 1 < width {
                        indices[base + 1] = (value & 0xF0) >> 4;
                    }
                }
            }
        }
        indices
    }

    /// Packs a row-major index buffer into on-disk pixel bytes.
    pub fn encode_indices(&self, indices: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut encoded: Vec<u8> = Vec::new();
        match self {
            PixelFormat::Indexed8 => {
                for row in 0..height {
                    for column in 0..width {
                        encoded.push(index_at(indices, row * width + column));
                    }
                }
            }
            PixelFormat::Indexed4 => {
                for row in 0..height {
                    for column in (0..width).step_by(2) {
                        let base = row * width + column;
                        let low = index_at(indices, base) & 0x0F;
                        let high = if column + 1 < width {
                            index_at(indices, base + 1) & 0x0F
                        } else {
                            0
                        };
                        encoded.push((high << 4) | low);
                    }
                }
            }
        }
        encoded
    }
}

fn index_at(indices: &[u8], position: usize) -> u8 {
    indices.get(position).copied().unwrap_or(0)
}

/// Looks every index up in the color table. Indices past the end of the
/// table leave their pixel transparent black.
pub fn indices_to_rgba(indices: &[u8], width: u32, height: u32, clut: &[Rgba]) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    if width == 0 {
        return image;
    }
    for (position, index) in indices.iter().enumerate() {
        let x = position as u32 % width;
        let y = position as u32 / width;
        if y >= height {
            break;
        }
        if let Some(color) = clut.get(*index as usize) {
            image.put_pixel(x, y, image::Rgba(*color));
        }
    }
    image
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_from_flag() {
        assert_eq!(Some(PixelFormat::Indexed8), PixelFormat::from_flag(0x13));
        assert_eq!(Some(PixelFormat::Indexed4), PixelFormat::from_flag(0x14));
        assert_eq!(None, PixelFormat::from_flag(0x99));
        assert_eq!("4bpp", PixelFormat::Indexed4.to_string());
    }

    #[test]
    fn pixel_data_size() {
        assert_eq!(64, PixelFormat::Indexed8.pixel_data_size(8, 8));
        assert_eq!(32, PixelFormat::Indexed4.pixel_data_size(8, 8));
        assert_eq!(7, PixelFormat::Indexed4.pixel_data_size(3, 5));
    }

    #[test]
    fn nibble_packing() {
        let packed = PixelFormat::Indexed4.encode_indices(&[1, 2], 2, 1);
        assert_eq!(vec![0x21], packed);
        let unpacked = PixelFormat::Indexed4.decode_indices(&[0x21], 2, 1);
        assert_eq!(vec![1, 2], unpacked);
    }

    #[test]
    fn indexed4_odd_width_pads_high_nibble() {
        let packed = PixelFormat::Indexed4.encode_indices(&[1, 2, 3, 4, 5, 6], 3, 2);
        assert_eq!(vec![0x21, 0x03, 0x54, 0x06], packed);
    }

    #[test]
    fn indexed4_odd_width_skips_high_nibble_past_row() {
        let decoded = PixelFormat::Indexed4.decode_indices(&[0x21, 0x43, 0x65], 3, 2);
        assert_eq!(vec![1, 2, 3, 0, 5, 6], decoded);
    }

    #[test]
    fn indexed4_round_trip() {
        let indices: Vec<u8> = (0..32).map(|i| (i * 7 % 16) as u8).collect();
        let packed = PixelFormat::Indexed4.encode_indices(&indices, 8, 4);
        assert_eq!(16, packed.len());
        assert_eq!(indices, PixelFormat::Indexed4.decode_indices(&packed, 8, 4));
    }

    #[test]
    fn indexed8_round_trip() {
        let indices: Vec<u8> = (0..=255).collect();
        let packed = PixelFormat::Indexed8.encode_indices(&indices, 16, 16);
        assert_eq!(indices, packed);
        assert_eq!(indices, PixelFormat::Indexed8.decode_indices(&packed, 16, 16));
    }

    #[test]
    fn decode_ignores_rows_past_height() {
        let decoded = PixelFormat::Indexed8.decode_indices(&[1, 2, 3, 4, 5, 6], 2, 2);
        assert_eq!(vec![1, 2, 3, 4], decoded);
    }

    #[test]
    fn decode_zero_width() {
        assert!(PixelFormat::Indexed4.decode_indices(&[0xFF], 0, 4).is_empty());
    }

    #[test]
    fn rgba_tolerates_out_of_range_index() {
        let clut: Vec<Rgba> = vec![[10, 20, 30, 40], [50, 60, 70, 80]];
        let image = indices_to_rgba(&[1, 0, 9, 1], 2, 2, &clut);
        assert_eq!(&[50, 60, 70, 80], &image.get_pixel(0, 0).0);
        assert_eq!(&[10, 20, 30, 40], &image.get_pixel(1, 0).0);
        assert_eq!(&[0, 0, 0, 0], &image.get_pixel(0, 1).0);
        assert_eq!(&[50, 60, 70, 80], &image.get_pixel(1, 1).0);
    }
}
