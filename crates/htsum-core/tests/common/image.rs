//! Small synthetic images with two CMOS blocks.

use htsum_core::{CmosLayout, CMOS_HEADER_MAGIC};
use std::io::Write;

pub const IMAGE_LEN: usize = 0x100;

/// Two blocks at 0x10 and 0x90, each with a 0x40 byte checksummed area.
pub fn small_layout() -> CmosLayout {
    CmosLayout {
        base_offsets: vec![0x10, 0x90],
        area_length: 0x40,
        ..CmosLayout::default()
    }
}

/// Image with valid headers, a byte pattern in each area and zeroed checksum fields.
pub fn write_image(layout: &CmosLayout) -> tempfile::NamedTempFile {
    let mut data = vec![0u8; IMAGE_LEN];
    for base in &layout.base_offsets {
        let base = *base as usize;
        let header = base + layout.header_rel_offset as usize;
        data[header..header + 8].copy_from_slice(CMOS_HEADER_MAGIC.bytes());
        let area = base + layout.area_rel_offset as usize;
        for (i, b) in data[area..area + layout.area_length as usize]
            .iter_mut()
            .enumerate()
        {
            *b = (i * 7 + base) as u8;
        }
    }
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(&data).unwrap();
    f.flush().unwrap();
    f
}
