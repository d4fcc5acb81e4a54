//! Error type shared by the header verifier, field accessors and checksum engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::header::spaced_hex;

/// Fatal error for a single checksum/verify invocation. Nothing is retried;
/// the caller decides whether to terminate.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// Magic bytes at the expected offset do not match.
    #[error(
        "image #{index:2} FAIL: expected [{}] but found [{}] @ {offset:#x} [{}]",
        spaced_hex(.expected),
        spaced_hex(.found),
        .path.display()
    )]
    HeaderMismatch {
        index: usize,
        expected: [u8; 8],
        found: Vec<u8>,
        offset: u64,
        path: PathBuf,
    },

    #[error("unknown checksum algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("unknown endianness '{0}' (expected 'little' or 'big')")]
    UnknownEndian(String),

    /// Region length is not a whole number of words.
    #[error(
        "checksum data length mismatch with algorithm: length {length:#x} must be a multiple of checksum byte width {width}"
    )]
    LengthMismatch { length: u64, width: usize },

    /// The file ends before the checksummed region does.
    #[error("region {start:#x}..+{length:#x} runs past the end of {}", .path.display())]
    RegionOutOfBounds {
        start: u64,
        length: u64,
        path: PathBuf,
    },

    #[error("block {index} does not exist (layout has {count} block(s))")]
    BlockOutOfRange { index: usize, count: usize },

    #[error("invalid header magic '{0}': expected 8 bytes of hex")]
    InvalidMagic(String),

    /// Re-reading the checksum field after a write returned different bytes.
    #[error(
        "checksum write did not stick at {offset:#x} in {}: wrote [{}], read back [{}]",
        .path.display(),
        spaced_hex(.written),
        spaced_hex(.read_back)
    )]
    WriteVerifyFailed {
        offset: u64,
        written: Vec<u8>,
        read_back: Vec<u8>,
        path: PathBuf,
    },

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ChecksumError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChecksumError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
