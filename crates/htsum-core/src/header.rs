//! Header verification: each CMOS block starts with a fixed 8-byte magic.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChecksumError;

/// Expected 8-byte pattern at the start of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMagic(pub [u8; 8]);

/// Magic found at the start of every CMOS block.
pub const CMOS_HEADER_MAGIC: HeaderMagic =
    HeaderMagic([0x01, 0x00, 0x00, 0x00, 0x98, 0xba, 0xdc, 0xfe]);

impl HeaderMagic {
    pub fn bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Parse 16 hex digits; spaces between bytes are allowed.
    pub fn from_hex(s: &str) -> Result<Self, ChecksumError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = hex::decode(&compact).map_err(|_| ChecksumError::InvalidMagic(s.to_string()))?;
        let arr: [u8; 8] = bytes
            .try_into()
            .map_err(|_| ChecksumError::InvalidMagic(s.to_string()))?;
        Ok(HeaderMagic(arr))
    }
}

impl Default for HeaderMagic {
    fn default() -> Self {
        CMOS_HEADER_MAGIC
    }
}

impl fmt::Display for HeaderMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&spaced_hex(&self.0))
    }
}

impl Serialize for HeaderMagic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for HeaderMagic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HeaderMagic::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Lowercase hex with a space between bytes, e.g. `01 00 98 ba`.
pub fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One image whose header matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderReport {
    pub index: usize,
    pub path: PathBuf,
    pub offset: u64,
    pub found: [u8; 8],
}

impl fmt::Display for HeaderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image #{:2} PASS : Found [{}] @ {:#x} [{}]",
            self.index,
            spaced_hex(&self.found),
            self.offset,
            self.path.display()
        )
    }
}

/// Read up to 8 bytes at `offset`. Fewer are returned when the file is short.
fn read_header(path: &Path, offset: u64) -> Result<Vec<u8>, ChecksumError> {
    let mut f = File::open(path).map_err(|e| ChecksumError::io("open", path, e))?;
    f.seek(SeekFrom::Start(offset))
        .map_err(|e| ChecksumError::io("seek", path, e))?;
    let mut found = Vec::with_capacity(8);
    f.take(8)
        .read_to_end(&mut found)
        .map_err(|e| ChecksumError::io("read", path, e))?;
    Ok(found)
}

/// Check that every image carries `magic` at `offset`.
///
/// Stops at the first mismatch; the error names the image index, both byte
/// patterns, the offset and the path. Each file is opened and closed in turn.
pub fn verify_image_headers<P: AsRef<Path>>(
    paths: &[P],
    offset: u64,
    magic: &HeaderMagic,
) -> Result<Vec<HeaderReport>, ChecksumError> {
    let mut reports = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let found = read_header(path, offset)?;
        if found.as_slice() != magic.bytes() {
            tracing::warn!(
                index,
                offset,
                path = %path.display(),
                "header mismatch: found [{}]",
                spaced_hex(&found)
            );
            return Err(ChecksumError::HeaderMismatch {
                index,
                expected: magic.0,
                found,
                offset,
                path: path.to_path_buf(),
            });
        }
        let report = HeaderReport {
            index,
            path: path.to_path_buf(),
            offset,
            found: magic.0,
        };
        tracing::info!("{}", report);
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn image_with_magic_at(offset: usize, magic: &[u8]) -> tempfile::NamedTempFile {
        let mut data = vec![0xAAu8; offset + 32];
        data[offset..offset + magic.len()].copy_from_slice(magic);
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&data).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn magic_hex_roundtrip() {
        let m = HeaderMagic::from_hex("01 00 00 00 98 ba dc fe").unwrap();
        assert_eq!(m, CMOS_HEADER_MAGIC);
        assert_eq!(hex::encode(m.0), "0100000098badcfe");
        assert!(HeaderMagic::from_hex("0100").is_err());
        assert!(HeaderMagic::from_hex("zz00000098badcfe").is_err());
    }

    #[test]
    fn exact_magic_passes() {
        let a = image_with_magic_at(0x20, CMOS_HEADER_MAGIC.bytes());
        let b = image_with_magic_at(0x20, CMOS_HEADER_MAGIC.bytes());
        let reports = verify_image_headers(&[a.path(), b.path()], 0x20, &CMOS_HEADER_MAGIC).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].index, 1);
        assert_eq!(reports[1].offset, 0x20);
        assert!(reports[0].to_string().starts_with("Image # 0 PASS : Found [01 00 00 00 98 ba dc fe] @ 0x20"));
    }

    #[test]
    fn any_flipped_byte_fails() {
        for i in 0..8 {
            let mut magic = *CMOS_HEADER_MAGIC.bytes();
            magic[i] ^= 0x01;
            let good = image_with_magic_at(0x10, CMOS_HEADER_MAGIC.bytes());
            let bad = image_with_magic_at(0x10, &magic);
            let err = verify_image_headers(&[good.path(), bad.path()], 0x10, &CMOS_HEADER_MAGIC)
                .unwrap_err();
            match err {
                ChecksumError::HeaderMismatch {
                    index,
                    expected,
                    found,
                    offset,
                    path,
                } => {
                    assert_eq!(index, 1);
                    assert_eq!(&expected, CMOS_HEADER_MAGIC.bytes());
                    assert_eq!(found, magic.to_vec());
                    assert_eq!(offset, 0x10);
                    assert_eq!(path, bad.path());
                }
                other => panic!("expected HeaderMismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn first_mismatch_stops_verification() {
        let bad = image_with_magic_at(0, &[0u8; 8]);
        let missing = PathBuf::from("/nonexistent/htsum-never-opened.img");
        let err = verify_image_headers(&[bad.path(), missing.as_path()], 0, &CMOS_HEADER_MAGIC)
            .unwrap_err();
        assert!(matches!(err, ChecksumError::HeaderMismatch { index: 0, .. }));
    }

    #[test]
    fn truncated_file_is_a_mismatch() {
        let f = image_with_magic_at(0, CMOS_HEADER_MAGIC.bytes());
        let len = std::fs::metadata(f.path()).unwrap().len();
        let err = verify_image_headers(&[f.path()], len - 4, &CMOS_HEADER_MAGIC).unwrap_err();
        match err {
            ChecksumError::HeaderMismatch { found, .. } => assert_eq!(found.len(), 4),
            other => panic!("expected HeaderMismatch, got {:?}", other),
        }
    }
}
