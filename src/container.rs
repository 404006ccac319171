use std::io::Cursor;

use binread::{BinRead, BinReaderExt};
use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::clut::CLUT_SIZE;
use crate::{PixelFormat, TexError};

type Result<T> = std::result::Result<T, TexError>;

pub const HEADER_REGION_START: usize = 0x10;
pub const HEADER_SIZE: usize = 0x10;
pub const MAX_TEXTURES: usize = 0xFF;

#[derive(BinRead, Debug, Clone)]
#[br(little)]
struct RawTextureHeader {
    format_flag: u32,
    width: u16,
    height: u16,
    unknown: [u8; 4],
    relative_data_offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHeader {
    pub format: PixelFormat,
    pub width: u16,
    pub height: u16,
    pub unknown: [u8; 4],
    pub relative_data_offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub format: PixelFormat,
    pub width: u16,
    pub height: u16,
    pub unknown: [u8; 4],
    pub relative_data_offset: i32,
    pub data_offset: usize,
    pub pixel_data_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    pub format: PixelFormat,
    pub width: u16,
    pub height: u16,
    pub unknown: [u8; 4],
    pub pixel_data: Vec<u8>,
    pub clut: Vec<u8>,
}

pub fn header_address(index: usize) -> usize {
    HEADER_REGION_START + index * HEADER_SIZE
}

impl TextureHeader {
    pub fn absolute_data_offset(&self, index: usize) -> i64 {
        header_address(index) as i64 + self.relative_data_offset as i64
    }
}

impl TextureDescriptor {
    pub fn clut_offset(&self) -> usize {
        self.data_offset + self.pixel_data_size
    }

    pub fn end(&self) -> usize {
        self.clut_offset() + CLUT_SIZE
    }
}

/// Reads and validates every header record. No pixel data is touched.
pub fn read_headers(raw: &[u8]) -> Result<Vec<TextureHeader>> {
    let texture_count = *raw.first().ok_or(TexError::TruncatedInput(1, 0))? as usize;
    let required = header_address(texture_count);
    if raw.len() < required {
        return Err(TexError::TruncatedInput(required, raw.len()));
    }
    debug!("Container declares {} texture(s)", texture_count);

    let mut cursor = Cursor::new(raw);
    cursor.set_position(HEADER_REGION_START as u64);
    let mut headers: Vec<TextureHeader> = Vec::new();
    for index in 0..texture_count {
        let header: RawTextureHeader = cursor
            .read_le()
            .map_err(|e| TexError::ParserError(format!("{:?}", e)))?;
        let format = PixelFormat::from_flag(header.format_flag)
            .ok_or(TexError::UnsupportedFormatFlag(index, header.format_flag))?;
        debug!(
            "Header {}: flag 0x{:x} ({}), {}x{}, unknown {:02x?}, relative offset 0x{:x}",
            index,
            header.format_flag,
            format,
            header.width,
            header.height,
            header.unknown,
            header.relative_data_offset
        );
        headers.push(TextureHeader {
            format,
            width: header.width,
            height: header.height,
            unknown: header.unknown,
            relative_data_offset: header.relative_data_offset,
        });
    }
    Ok(headers)
}

/// Reads every header and resolves where each texture's data lives,
/// failing if any texture's pixels or CLUT fall outside the input.
pub fn read_descriptors(raw: &[u8]) -> Result<Vec<TextureDescriptor>> {
    let headers = read_headers(raw)?;
    let mut descriptors: Vec<TextureDescriptor> = Vec::new();
    for (index, header) in headers.into_iter().enumerate() {
        let absolute = header.absolute_data_offset(index);
        if absolute < 0 {
            return Err(TexError::InvalidDataOffset(index, absolute));
        }
        let descriptor = TextureDescriptor {
            format: header.format,
            width: header.width,
            height: header.height,
            unknown: header.unknown,
            relative_data_offset: header.relative_data_offset,
            data_offset: absolute as usize,
            pixel_data_size: header
                .format
                .pixel_data_size(header.width as usize, header.height as usize),
        };
        if descriptor.end() > raw.len() {
            return Err(TexError::TruncatedInput(descriptor.end(), raw.len()));
        }
        debug!(
            "Texture {}: data at 0x{:x} ({} bytes), CLUT at 0x{:x}",
            index,
            descriptor.data_offset,
            descriptor.pixel_data_size,
            descriptor.clut_offset()
        );
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

/// Parses a whole container. All metadata is validated before any pixel
/// data is copied out.
pub fn read_textures(raw: &[u8]) -> Result<Vec<TextureRecord>> {
    let descriptors = read_descriptors(raw)?;
    Ok(descriptors
        .into_iter()
        .map(|descriptor| TextureRecord {
            format: descriptor.format,
            width: descriptor.width,
            height: descriptor.height,
            unknown: descriptor.unknown,
            pixel_data: raw[descriptor.data_offset..descriptor.clut_offset()].to_vec(),
            clut: raw[descriptor.clut_offset()..descriptor.end()].to_vec(),
        })
        .collect())
}

/// Serializes textures into a container. Data offsets are recomputed from
/// the sizes actually written.
pub fn write_container(textures: &[TextureRecord]) -> Result<Vec<u8>> {
    if textures.len() > MAX_TEXTURES {
        return Err(TexError::TooManyTextures(textures.len()));
    }
    for (index, texture) in textures.iter().enumerate() {
        let required = texture
            .format
            .pixel_data_size(texture.width as usize, texture.height as usize);
        if texture.pixel_data.len() < required {
            return Err(TexError::PixelDataTooShort(
                index,
                required,
                texture.pixel_data.len(),
            ));
        }
    }

    let header_length = header_address(textures.len());
    let mut headers: Vec<u8> = Vec::new();
    let mut data: Vec<u8> = Vec::new();
    for (index, texture) in textures.iter().enumerate() {
        let data_address = header_length + data.len();
        let relative_data_offset = (data_address - header_address(index)) as i32;
        headers.write_u32::<LittleEndian>(texture.format.flag())?;
        headers.write_u16::<LittleEndian>(texture.width)?;
        headers.write_u16::<LittleEndian>(texture.height)?;
        headers.extend(texture.unknown.iter());
        headers.write_i32::<LittleEndian>(relative_data_offset)?;
        debug!(
            "Writing texture {}: {} {}x{}, relative offset 0x{:x}",
            index, texture.format, texture.width, texture.height, relative_data_offset
        );

        data.extend(&texture.pixel_data);
        let mut clut = texture.clut.clone();
        clut.resize(CLUT_SIZE, 0);
        data.extend(clut);
    }

    let mut container: Vec<u8> = Vec::with_capacity(header_length + data.len());
    container.push(textures.len() as u8);
    container.resize(HEADER_REGION_START, 0);
    container.extend(headers);
    container.extend(data);
    Ok(container)
}
