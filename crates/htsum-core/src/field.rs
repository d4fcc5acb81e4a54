//! Raw access to the stored checksum field.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::algorithm::ChecksumAlgorithm;
use crate::error::ChecksumError;

/// Read the `algorithm.width()` bytes stored at `offset`, unaltered.
pub fn read_checksum(
    path: &Path,
    offset: u64,
    algorithm: ChecksumAlgorithm,
) -> Result<Vec<u8>, ChecksumError> {
    let mut f = File::open(path).map_err(|e| ChecksumError::io("open", path, e))?;
    f.seek(SeekFrom::Start(offset))
        .map_err(|e| ChecksumError::io("seek", path, e))?;
    let mut buf = vec![0u8; algorithm.width()];
    f.read_exact(&mut buf)
        .map_err(|e| ChecksumError::io("read checksum field", path, e))?;
    Ok(buf)
}

/// Overwrite `bytes` at `offset` in an existing file.
///
/// The length is not checked against any field width; that is on the caller.
pub fn write_checksum(path: &Path, offset: u64, bytes: &[u8]) -> Result<(), ChecksumError> {
    let mut f = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| ChecksumError::io("open for write", path, e))?;
    f.seek(SeekFrom::Start(offset))
        .map_err(|e| ChecksumError::io("seek", path, e))?;
    f.write_all(bytes)
        .map_err(|e| ChecksumError::io("write checksum field", path, e))?;
    f.flush().map_err(|e| ChecksumError::io("flush", path, e))?;
    tracing::debug!(offset, len = bytes.len(), path = %path.display(), "wrote checksum field");
    Ok(())
}
