use crate::PixelFormat;

pub type Rgba = [u8; 4];
pub type Rgb = [u8; 3];

pub const CLUT_ENTRY_COUNT: usize = 256;
pub const CLUT_SIZE: usize = CLUT_ENTRY_COUNT * 4;

const SWIZZLE_BLOCK: usize = 32;
const SWIZZLE_RUN: usize = 8;
const SYNTHESIZED_ALPHA: u8 = 0x80;

// Within every 32 entry block, the 8 entry runs are stored in the order 0, 2, 1, 3.
// Swapping the middle runs back is the same operation, so this serves both directions.
pub fn swizzle(entries: &[Rgba]) -> Vec<Rgba> {
    let mut swizzled: Vec<Rgba> = Vec::with_capacity(entries.len());
    for block in entries.chunks(SWIZZLE_BLOCK) {
        if block.len() < SWIZZLE_BLOCK {
            swizzled.extend_from_slice(block);
            continue;
        }
        for run in [0, 2, 1, 3] {
            let start = run * SWIZZLE_RUN;
            swizzled.extend_from_slice(&block[start..start + SWIZZLE_RUN]);
        }
    }
    swizzled
}

pub fn expand_alpha(raw_alpha: u8) -> u8 {
    raw_alpha.saturating_mul(2)
}

pub fn synthesize_alpha(color: Rgb) -> u8 {
    if color == [0, 0, 0] {
        0
    } else {
        SYNTHESIZED_ALPHA
    }
}

/// Decodes a raw on-disk CLUT into 256 usable RGBA entries. Input shorter
/// than a full table is zero-filled.
pub fn decode_clut(raw: &[u8]) -> Vec<Rgba> {
    let mut entries: Vec<Rgba> = vec![[0; 4]; CLUT_ENTRY_COUNT];
    for (entry, bytes) in entries.iter_mut().zip(raw.chunks_exact(4)) {
        entry.copy_from_slice(bytes);
    }
    swizzle(&entries)
        .into_iter()
        .map(|[r, g, b, a]| [r, g, b, expand_alpha(a)])
        .collect()
}

/// Builds the raw on-disk CLUT for a raster palette. Only the first
/// `format.logical_palette_size()` colors are used; they are stored in
/// reverse order with synthesized alpha.
pub fn encode_clut(palette: &[Rgb], format: PixelFormat) -> Vec<u8> {
    let logical_size = format.logical_palette_size();
    let mut logical: Vec<Rgba> = (0..logical_size)
        .map(|i| {
            let color = palette.get(i).copied().unwrap_or([0, 0, 0]);
            [color[0], color[1], color[2], synthesize_alpha(color)]
        })
        .collect();
    logical.reverse();
    logical.resize(CLUT_ENTRY_COUNT, [0; 4]);

    let mut raw: Vec<u8> = Vec::with_capacity(CLUT_SIZE);
    for entry in swizzle(&logical) {
        raw.extend_from_slice(&entry);
    }
    raw
}

pub fn clut_to_bytes(entries: &[Rgba]) -> Vec<u8> {
    entries.iter().flat_map(|entry| entry.iter().copied()).collect()
}
