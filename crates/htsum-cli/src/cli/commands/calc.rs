//! `htsum calc` – compute a checksum for a block or an explicit region.

use anyhow::Result;
use htsum_core::header::spaced_hex;
use htsum_core::{calculate_checksum, ChecksumRegion, ChecksumResult, CmosLayout};
use serde::Serialize;
use std::path::Path;

use crate::cli::RegionArgs;

#[derive(Debug, Serialize)]
struct CalcReport<'a> {
    image: &'a Path,
    region: &'a ChecksumRegion,
    checksum: String,
    result: &'a ChecksumResult,
}

/// Start from the block's region and apply any explicit overrides. With both
/// `start` and `length` given no block is resolved; the layout only supplies
/// algorithm, endian and seed.
pub(crate) fn resolve_region(
    layout: &CmosLayout,
    block: usize,
    args: &RegionArgs,
) -> Result<ChecksumRegion> {
    let mut region = match (args.start, args.length) {
        (Some(start), Some(length)) => ChecksumRegion {
            start,
            length,
            algorithm: layout.algorithm,
            endian: layout.endian,
            seed: layout.seed,
        },
        _ => layout.block(block)?.region,
    };
    if let Some(start) = args.start {
        region.start = start;
    }
    if let Some(length) = args.length {
        region.length = length;
    }
    if let Some(algorithm) = args.algorithm {
        region.algorithm = algorithm;
    }
    if let Some(endian) = args.endian {
        region.endian = endian;
    }
    if let Some(seed) = args.seed {
        region.seed = seed;
    }
    Ok(region)
}

pub fn run_calc(
    layout: &CmosLayout,
    image: &Path,
    block: usize,
    args: &RegionArgs,
    json: bool,
) -> Result<()> {
    let region = resolve_region(layout, block, args)?;
    let result = calculate_checksum(image, &region)?;

    if json {
        let report = CalcReport {
            image,
            region: &region,
            checksum: spaced_hex(&result.bytes),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let end = result
        .end_offset
        .map(|e| format!("{:#010x}", e))
        .unwrap_or_else(|| "-".to_string());
    let last = result
        .last_word
        .as_deref()
        .map(spaced_hex)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} | {:#010x} -> {} | {:10} | {} | [{}]",
        region.algorithm,
        result.start_offset,
        end,
        result.words,
        last,
        spaced_hex(&result.bytes)
    );
    Ok(())
}
