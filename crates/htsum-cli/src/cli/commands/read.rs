//! `htsum read` – print the stored checksum of each block.

use anyhow::Result;
use htsum_core::header::spaced_hex;
use htsum_core::{read_checksum, CmosLayout};
use std::path::Path;

pub fn run_read(layout: &CmosLayout, image: &Path, block: Option<usize>) -> Result<()> {
    for b in layout.blocks(block)? {
        let stored = read_checksum(image, b.checksum_offset, b.region.algorithm)?;
        println!(
            "Block {} {} @ {:#x} : [{}]",
            b.index,
            b.region.algorithm,
            b.checksum_offset,
            spaced_hex(&stored)
        );
    }
    Ok(())
}
