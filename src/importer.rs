use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::clut;
use crate::container::{self, TextureRecord};
use crate::{IndexedRaster, TexError};

type Result<T> = std::result::Result<T, TexError>;

fn digit_runs() -> Option<&'static Regex> {
    static DIGIT_RUNS: OnceLock<Option<Regex>> = OnceLock::new();
    DIGIT_RUNS.get_or_init(|| Regex::new(r"[0-9]+").ok()).as_ref()
}

/// Sort key for a raster's identifier: the last run of digits in it, or 0.
pub fn raster_order_key(identifier: &str) -> u64 {
    digit_runs()
        .and_then(|pattern| pattern.find_iter(identifier).last())
        .and_then(|run| run.as_str().parse().ok())
        .unwrap_or(0)
}

/// Orders `(identifier, item)` pairs numerically by identifier. Items with
/// equal keys keep their relative order.
pub fn order_rasters<T>(mut items: Vec<(String, T)>) -> Vec<(String, T)> {
    items.sort_by_key(|(identifier, _)| raster_order_key(identifier));
    items
}

/// Converts rasters into container-ready texture records. Slot `i` takes
/// its format flag and opaque header bytes from header `i` of `reference`.
pub fn import_textures(rasters: &[IndexedRaster], reference: &[u8]) -> Result<Vec<TextureRecord>> {
    let headers = container::read_headers(reference)?;
    if headers.len() < rasters.len() {
        return Err(TexError::InsufficientReferenceHeaders(
            rasters.len(),
            headers.len(),
        ));
    }
    for (index, raster) in rasters.iter().enumerate() {
        if raster.width > u16::MAX as u32 || raster.height > u16::MAX as u32 {
            return Err(TexError::DimensionsTooLarge(
                index,
                raster.width,
                raster.height,
            ));
        }
    }

    let mut records: Vec<TextureRecord> = Vec::new();
    for (raster, header) in rasters.iter().zip(headers) {
        let format = header.format;
        let width = raster.width as usize;
        let height = raster.height as usize;
        if raster.palette.len() < format.logical_palette_size() {
            warn!(
                "Raster palette has {} colors, {} expects {}; padding with black",
                raster.palette.len(),
                format,
                format.logical_palette_size()
            );
        }

        let indices: Vec<u8> = raster.indices.iter().map(|v| 255 - v).collect();
        let pixel_data = format.encode_indices(&indices, width, height);
        let clut = clut::encode_clut(&raster.palette, format);
        debug!(
            "Imported {}x{} {} raster: {} pixel bytes",
            width,
            height,
            format,
            pixel_data.len()
        );
        records.push(TextureRecord {
            format,
            width: raster.width as u16,
            height: raster.height as u16,
            unknown: header.unknown,
            pixel_data,
            clut,
        });
    }
    Ok(records)
}
