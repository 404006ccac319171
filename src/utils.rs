pub struct TestTexture {
    pub flag: u32,
    pub width: u16,
    pub height: u16,
    pub unknown: [u8; 4],
    pub pixel_data: Vec<u8>,
    pub clut: Vec<u8>,
}

// Lays a container out by hand so reader tests do not depend on the writer.
pub fn build_test_container(textures: &[TestTexture]) -> Vec<u8> {
    let header_length = 0x10 + textures.len() * 0x10;
    let mut raw: Vec<u8> = vec![0; header_length];
    raw[0] = textures.len() as u8;
    for (i, texture) in textures.iter().enumerate() {
        let header = 0x10 + i * 0x10;
        let relative = (raw.len() - header) as i32;
        raw[header..header + 4].copy_from_slice(&texture.flag.to_le_bytes());
        raw[header + 4..header + 6].copy_from_slice(&texture.width.to_le_bytes());
        raw[header + 6..header + 8].copy_from_slice(&texture.height.to_le_bytes());
        raw[header + 8..header + 12].copy_from_slice(&texture.unknown);
        raw[header + 12..header + 16].copy_from_slice(&relative.to_le_bytes());
        raw.extend_from_slice(&texture.pixel_data);
        raw.extend_from_slice(&texture.clut);
    }
    raw
}
