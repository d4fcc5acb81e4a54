//! Per-block check and fix of an image's stored checksum.

use std::path::Path;

use crate::engine::{calculate_checksum, ChecksumResult};
use crate::error::ChecksumError;
use crate::field::{read_checksum, write_checksum};
use crate::header::verify_image_headers;
use crate::layout::{CmosBlock, CmosLayout};

/// Stored vs. computed checksum for one block of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStatus {
    pub block: CmosBlock,
    pub stored: Vec<u8>,
    pub computed: ChecksumResult,
}

impl BlockStatus {
    pub fn matches(&self) -> bool {
        self.stored == self.computed.bytes
    }
}

/// What `fix_block` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub status: BlockStatus,
    /// True when new bytes were written (never in a dry run).
    pub written: bool,
}

/// Verify the block header, then read the stored field and compute the checksum.
pub fn inspect_block(
    path: &Path,
    layout: &CmosLayout,
    block: &CmosBlock,
) -> Result<BlockStatus, ChecksumError> {
    verify_image_headers(&[path], block.header_offset, &layout.header_magic)?;
    let stored = read_checksum(path, block.checksum_offset, block.region.algorithm)?;
    let computed = calculate_checksum(path, &block.region)?;
    Ok(BlockStatus {
        block: *block,
        stored,
        computed,
    })
}

/// Rewrite the block's checksum if it is stale, then read it back to confirm.
pub fn fix_block(
    path: &Path,
    layout: &CmosLayout,
    block: &CmosBlock,
    dry_run: bool,
) -> Result<FixOutcome, ChecksumError> {
    let status = inspect_block(path, layout, block)?;
    if status.matches() || dry_run {
        return Ok(FixOutcome {
            status,
            written: false,
        });
    }

    write_checksum(path, block.checksum_offset, &status.computed.bytes)?;
    let read_back = read_checksum(path, block.checksum_offset, block.region.algorithm)?;
    if read_back != status.computed.bytes {
        return Err(ChecksumError::WriteVerifyFailed {
            offset: block.checksum_offset,
            written: status.computed.bytes.clone(),
            read_back,
            path: path.to_path_buf(),
        });
    }
    tracing::info!(
        block = block.index,
        offset = block.checksum_offset,
        path = %path.display(),
        "checksum rewritten"
    );
    Ok(FixOutcome {
        status,
        written: true,
    })
}
