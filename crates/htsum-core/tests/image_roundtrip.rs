//! Integration test: check, fix and re-check both blocks of a synthetic image.

mod common;

use common::image::{small_layout, write_image, IMAGE_LEN};
use htsum_core::image::{fix_block, inspect_block};
use htsum_core::{
    calculate_checksum, read_checksum, verify_image_headers, write_checksum, ChecksumError,
};

#[test]
fn fresh_image_does_not_match_until_fixed() {
    let layout = small_layout();
    let img = write_image(&layout);

    for block in layout.blocks(None).unwrap() {
        let status = inspect_block(img.path(), &layout, &block).unwrap();
        assert_eq!(status.stored, vec![0, 0, 0, 0]);
        assert!(!status.matches(), "block {} unexpectedly matches", block.index);

        let outcome = fix_block(img.path(), &layout, &block, false).unwrap();
        assert!(outcome.written);

        let after = inspect_block(img.path(), &layout, &block).unwrap();
        assert!(after.matches());
        assert_eq!(after.stored, outcome.status.computed.bytes);
    }

    let again = fix_block(img.path(), &layout, &layout.block(0).unwrap(), false).unwrap();
    assert!(!again.written);
}

#[test]
fn fix_only_touches_the_checksum_field() {
    let layout = small_layout();
    let img = write_image(&layout);
    let before = std::fs::read(img.path()).unwrap();

    let block = layout.block(1).unwrap();
    fix_block(img.path(), &layout, &block, false).unwrap();

    let after = std::fs::read(img.path()).unwrap();
    assert_eq!(after.len(), IMAGE_LEN);
    let field = block.checksum_offset as usize..block.checksum_offset as usize + 4;
    for (i, (a, b)) in before.iter().zip(after.iter()).enumerate() {
        if !field.contains(&i) {
            assert_eq!(a, b, "byte {:#x} changed", i);
        }
    }
}

#[test]
fn dry_run_leaves_file_untouched() {
    let layout = small_layout();
    let img = write_image(&layout);
    let before = std::fs::read(img.path()).unwrap();

    let outcome = fix_block(img.path(), &layout, &layout.block(0).unwrap(), true).unwrap();
    assert!(!outcome.written);
    assert!(!outcome.status.matches());
    assert_eq!(std::fs::read(img.path()).unwrap(), before);
}

#[test]
fn checksum_excludes_its_own_field() {
    let layout = small_layout();
    let img = write_image(&layout);
    let block = layout.block(0).unwrap();

    let first = calculate_checksum(img.path(), &block.region).unwrap();
    write_checksum(img.path(), block.checksum_offset, &first.bytes).unwrap();
    let second = calculate_checksum(img.path(), &block.region).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        read_checksum(img.path(), block.checksum_offset, block.region.algorithm).unwrap(),
        first.bytes
    );
    assert_eq!(second.end_offset, Some(block.region.start + 0x40 - 1));
}

#[test]
fn corrupted_header_blocks_fix() {
    let layout = small_layout();
    let img = write_image(&layout);
    let block = layout.block(1).unwrap();
    write_checksum(img.path(), block.header_offset + 4, &[0x99]).unwrap();

    let err = fix_block(img.path(), &layout, &block, false).unwrap_err();
    match err {
        ChecksumError::HeaderMismatch { found, offset, .. } => {
            assert_eq!(offset, block.header_offset);
            assert_eq!(found[4], 0x99);
        }
        other => panic!("expected HeaderMismatch, got {:?}", other),
    }
    assert!(verify_image_headers(&[img.path()], layout.block(0).unwrap().header_offset, &layout.header_magic).is_ok());
}
