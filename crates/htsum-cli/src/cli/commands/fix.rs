//! `htsum fix` – rewrite stale checksums in place.

use anyhow::Result;
use htsum_core::header::spaced_hex;
use htsum_core::image::fix_block;
use htsum_core::CmosLayout;
use std::path::PathBuf;

pub fn run_fix(
    layout: &CmosLayout,
    images: &[PathBuf],
    block: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let blocks = layout.blocks(block)?;
    for image in images {
        for b in &blocks {
            let outcome = fix_block(image, layout, b, dry_run)?;
            let status = &outcome.status;
            let action = if status.matches() {
                "unchanged"
            } else if outcome.written {
                "fixed"
            } else {
                "would fix"
            };
            println!(
                "{:<9} block {} [{}] -> [{}] {}",
                action,
                b.index,
                spaced_hex(&status.stored),
                spaced_hex(&status.computed.bytes),
                image.display()
            );
        }
    }
    Ok(())
}
