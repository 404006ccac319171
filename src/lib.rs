mod errors;
mod pixel_encodings;
mod raster;

pub mod clut;
pub mod container;
pub mod exporter;
pub mod importer;

#[cfg(test)]
mod utils;

pub use container::{
    read_descriptors, read_headers, read_textures, write_container, TextureDescriptor,
    TextureHeader, TextureRecord,
};
pub use errors::{RasterError, TexError};
pub use exporter::{export_textures, write_exports, ExportedTexture};
pub use importer::{import_textures, order_rasters, raster_order_key};
pub use pixel_encodings::{indices_to_rgba, PixelFormat};
pub use raster::IndexedRaster;
