//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    parse_cli(args).command
}

pub(super) fn parse_cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

/// Two-block layout at 0x10 and 0x90 with a 0x40 byte area each.
pub(super) fn small_layout() -> htsum_core::CmosLayout {
    htsum_core::CmosLayout {
        base_offsets: vec![0x10, 0x90],
        area_length: 0x40,
        ..htsum_core::CmosLayout::default()
    }
}

/// Image with valid headers, patterned areas and zeroed (stale) checksum fields.
pub(super) fn write_image(layout: &htsum_core::CmosLayout) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut data = vec![0u8; 0x100];
    for base in &layout.base_offsets {
        let base = *base as usize;
        let header = base + layout.header_rel_offset as usize;
        data[header..header + 8].copy_from_slice(layout.header_magic.bytes());
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
