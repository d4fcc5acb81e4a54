//! Additive checksum engine.
//!
//! Words are summed into a wide accumulator, then a single uint32 overflow
//! step is approximated by subtracting the overflow count, the sum is cut to
//! the field width and one parity bit is folded into the low end of the
//! value range. The quirks reproduce what the firmware computes and must not
//! be "corrected":
//!
//! - parity toggles for every *even* word, and once more if the truncated
//!   sum is even;
//! - the overflow step subtracts `sum / 0xFFFFFFFF`, not a multiple of it;
//! - the final fold is `sum % (mask - 1) + parity`.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use crate::algorithm::{ChecksumAlgorithm, Endian};
use crate::error::ChecksumError;

/// Divisor of the one-shot overflow step.
const UINT32_OVERFLOW: u128 = 0xFFFF_FFFF;

/// Initial parity state, after the header and excluding the checksum field.
const PARITY_SEED: bool = false;

/// A span of an image to checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksumRegion {
    pub start: u64,
    pub length: u64,
    pub algorithm: ChecksumAlgorithm,
    pub endian: Endian,
    pub seed: u64,
}

impl ChecksumRegion {
    /// Number of words in the region, or LengthMismatch if it is not whole.
    pub fn word_count(&self) -> Result<u64, ChecksumError> {
        let width = self.algorithm.width();
        if width > 1 && self.length % width as u64 != 0 {
            return Err(ChecksumError::LengthMismatch {
                length: self.length,
                width,
            });
        }
        Ok(self.length / width as u64)
    }

    /// Inclusive offset of the last byte, `None` for an empty region.
    pub fn end_offset(&self) -> Option<u64> {
        self.length.checked_sub(1).map(|n| self.start + n)
    }
}

/// Outcome of one checksum computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecksumResult {
    /// Final checksum encoded in the region's byte order.
    pub bytes: Vec<u8>,
    pub start_offset: u64,
    /// Last byte read, inclusive.
    pub end_offset: Option<u64>,
    pub words: u64,
    /// Raw bytes of the final word summed.
    pub last_word: Option<Vec<u8>>,
}

/// Running sum and parity flag.
#[derive(Debug, Clone)]
struct Accumulator {
    algorithm: ChecksumAlgorithm,
    sum: u128,
    parity: bool,
}

impl Accumulator {
    fn new(algorithm: ChecksumAlgorithm, seed: u64) -> Self {
        Self {
            algorithm,
            sum: seed as u128 % algorithm.mask() as u128,
            parity: PARITY_SEED,
        }
    }

    fn add(&mut self, word: u64) {
        self.sum += word as u128;
        if word % 2 == 0 {
            self.parity = !self.parity;
        }
    }

    fn finish(self) -> u64 {
        let mask = self.algorithm.mask() as u128;
        let mut sum = self.sum;

        let overflows = sum / UINT32_OVERFLOW;
        sum -= overflows;

        sum %= mask;

        let mut parity = self.parity;
        if sum % 2 == 0 {
            parity = !parity;
        }

        sum %= mask - 1;
        sum += parity as u128;
        // sum < mask - 1 + 1, so it fits the field width.
        sum as u64
    }
}

/// Sum `words` words of `region` from a seekable source.
fn sum_region<R: Read + Seek>(
    mut reader: R,
    region: &ChecksumRegion,
    words: u64,
) -> io::Result<ChecksumResult> {
    let width = region.algorithm.width();

    reader.seek(SeekFrom::Start(region.start))?;
    let mut acc = Accumulator::new(region.algorithm, region.seed);
    let mut buf = [0u8; 4];
    for _ in 0..words {
        reader.read_exact(&mut buf[..width])?;
        acc.add(region.endian.decode(&buf[..width]));
    }
    let last_word = (words > 0).then(|| buf[..width].to_vec());

    let value = acc.finish();
    Ok(ChecksumResult {
        bytes: region.endian.encode(value, width),
        start_offset: region.start,
        end_offset: region.end_offset(),
        words,
        last_word,
    })
}

/// Checksum `region` of the image at `path`.
///
/// The file is opened read-only for the duration of the call and closed on
/// every path, including a failed read midway through the region.
pub fn calculate_checksum(
    path: &Path,
    region: &ChecksumRegion,
) -> Result<ChecksumResult, ChecksumError> {
    let words = region.word_count()?;
    let f = File::open(path).map_err(|e| ChecksumError::io("open", path, e))?;
    let result = sum_region(BufReader::new(f), region, words).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ChecksumError::RegionOutOfBounds {
                start: region.start,
                length: region.length,
                path: path.to_path_buf(),
            }
        } else {
            ChecksumError::io("read region", path, e)
        }
    })?;
    tracing::debug!(
        algorithm = %region.algorithm,
        start = result.start_offset,
        end = ?result.end_offset,
        words = result.words,
        path = %path.display(),
        "checksum [{}]",
        crate::header::spaced_hex(&result.bytes)
    );
    Ok(result)
}
