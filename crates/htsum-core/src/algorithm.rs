//! Supported additive checksum widths and word byte order.

use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::ChecksumError;

/// Additive checksum over 1, 2, 3 or 4 byte words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    Sum8,
    Sum16,
    Sum24,
    #[default]
    Sum32,
}

/// (tag, width in bytes, mask) for every algorithm, in declaration order.
const ALGORITHMS: [(ChecksumAlgorithm, &str, usize, u64); 4] = [
    (ChecksumAlgorithm::Sum8, "SUM8", 1, 0xFF),
    (ChecksumAlgorithm::Sum16, "SUM16", 2, 0xFFFF),
    (ChecksumAlgorithm::Sum24, "SUM24", 3, 0xFF_FFFF),
    (ChecksumAlgorithm::Sum32, "SUM32", 4, 0xFFFF_FFFF),
];

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 4] = [
        ChecksumAlgorithm::Sum8,
        ChecksumAlgorithm::Sum16,
        ChecksumAlgorithm::Sum24,
        ChecksumAlgorithm::Sum32,
    ];

    fn entry(self) -> &'static (ChecksumAlgorithm, &'static str, usize, u64) {
        &ALGORITHMS[self as usize]
    }

    pub fn tag(self) -> &'static str {
        self.entry().1
    }

    /// Word and checksum field width in bytes.
    pub fn width(self) -> usize {
        self.entry().2
    }

    /// `2^(8 * width) - 1`.
    pub fn mask(self) -> u64 {
        self.entry().3
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALGORITHMS
            .iter()
            .find(|(_, tag, _, _)| tag.eq_ignore_ascii_case(s))
            .map(|(alg, _, _, _)| *alg)
            .ok_or_else(|| ChecksumError::UnknownAlgorithm(s.to_string()))
    }
}

/// Byte order used to interpret each summed word and to encode the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Decode `buf` (1..=8 bytes) as an unsigned integer.
    pub fn decode(self, buf: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_uint(buf, buf.len()),
            Endian::Big => BigEndian::read_uint(buf, buf.len()),
        }
    }

    /// Encode `value` into exactly `width` bytes. `value` must fit.
    pub fn encode(self, value: u64, width: usize) -> Vec<u8> {
        let mut out = vec![0u8; width];
        match self {
            Endian::Little => LittleEndian::write_uint(&mut out, value, width),
            Endian::Big => BigEndian::write_uint(&mut out, value, width),
        }
        out
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => f.write_str("little"),
            Endian::Big => f.write_str("big"),
        }
    }
}

impl FromStr for Endian {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            _ => Err(ChecksumError::UnknownEndian(s.to_string())),
        }
    }
}
