//! `htsum check` – compare stored and computed checksums.

use anyhow::{bail, Result};
use htsum_core::header::spaced_hex;
use htsum_core::image::inspect_block;
use htsum_core::CmosLayout;
use std::path::PathBuf;

pub fn run_check(layout: &CmosLayout, images: &[PathBuf], block: Option<usize>) -> Result<()> {
    let blocks = layout.blocks(block)?;
    let mut mismatches = 0usize;
    for image in images {
        for b in &blocks {
            let status = inspect_block(image, layout, b)?;
            let verdict = if status.matches() {
                "OK"
            } else {
                mismatches += 1;
                "MISMATCH"
            };
            println!(
                "{:<8} block {} stored [{}] computed [{}] {}",
                verdict,
                b.index,
                spaced_hex(&status.stored),
                spaced_hex(&status.computed.bytes),
                image.display()
            );
        }
    }
    if mismatches > 0 {
        bail!("{} block(s) have a stale checksum", mismatches);
    }
    Ok(())
}
