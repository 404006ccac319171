use thiserror::Error;

#[derive(Error, Debug)]
pub enum TexError {
    #[error("Texture {0} has unsupported format flag '0x{1:x}'.")]
    UnsupportedFormatFlag(usize, u32),

    #[error("Input is truncated: expected at least '0x{0:x}' bytes but found '0x{1:x}'.")]
    TruncatedInput(usize, usize),

    #[error("Texture {0} resolves to data offset '{1}' which lies outside the container.")]
    InvalidDataOffset(usize, i64),

    #[error("Reference container has {1} header(s) but {0} raster(s) were supplied.")]
    InsufficientReferenceHeaders(usize, usize),

    #[error("Raster {0} is {1}x{2} which does not fit in a texture header.")]
    DimensionsTooLarge(usize, u32, u32),

    #[error("Texture {0} needs {1} bytes of pixel data but has {2}.")]
    PixelDataTooShort(usize, usize, usize),

    #[error("A container holds at most 255 textures, got {0}.")]
    TooManyTextures(usize),

    #[error("Failed to parse texture header: {0}")]
    ParserError(String),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Raster is not palette-indexed.")]
    NotIndexed,

    #[error("Raster palette has {0} entries, at most 256 are supported.")]
    PaletteTooLarge(usize),

    #[error("Raster should hold {0} indices but holds {1}.")]
    IndexCountMismatch(usize, usize),

    #[error(transparent)]
    ImageError(#[from] image::ImageError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    Tex(#[from] TexError),
}
