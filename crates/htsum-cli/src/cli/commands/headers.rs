//! `htsum headers` – verify the magic header of every image.

use anyhow::Result;
use htsum_core::{verify_image_headers, CmosLayout};
use std::path::PathBuf;

pub fn run_headers(layout: &CmosLayout, images: &[PathBuf], block: Option<usize>) -> Result<()> {
    for b in layout.blocks(block)? {
        println!("Block {} header @ {:#x}", b.index, b.header_offset);
        for report in verify_image_headers(images, b.header_offset, &layout.header_magic)? {
            println!("  {}", report);
        }
    }
    Ok(())
}
