//! Where the CMOS blocks live inside an image and how each one is checksummed.

use serde::{Deserialize, Serialize};

use crate::algorithm::{ChecksumAlgorithm, Endian};
use crate::engine::ChecksumRegion;
use crate::error::ChecksumError;
use crate::header::HeaderMagic;

/// Block layout (`[layout]` section in config.toml). Offsets inside a block
/// are relative to its base offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmosLayout {
    /// Absolute offset of each redundant copy of the block.
    pub base_offsets: Vec<u64>,
    pub header_magic: HeaderMagic,
    pub header_rel_offset: u64,
    pub checksum_rel_offset: u64,
    /// First byte of the checksummed area.
    pub area_rel_offset: u64,
    /// Length of the checksummed area in bytes.
    pub area_length: u64,
    pub algorithm: ChecksumAlgorithm,
    pub endian: Endian,
    /// Sum of the static header, so the header need not be part of the area.
    pub seed: u64,
}

impl Default for CmosLayout {
    fn default() -> Self {
        Self {
            base_offsets: vec![0x75B_E663, 0x75E_E663],
            header_magic: HeaderMagic::default(),
            header_rel_offset: 0,
            checksum_rel_offset: 0xC,
            area_rel_offset: 0x14,
            area_length: 0x1500,
            algorithm: ChecksumAlgorithm::Sum32,
            endian: Endian::Little,
            seed: 0xFEDC_BAF2,
        }
    }
}

/// One block resolved to absolute offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmosBlock {
    pub index: usize,
    pub base: u64,
    pub header_offset: u64,
    pub checksum_offset: u64,
    pub region: ChecksumRegion,
}

impl CmosLayout {
    pub fn block_count(&self) -> usize {
        self.base_offsets.len()
    }

    pub fn block(&self, index: usize) -> Result<CmosBlock, ChecksumError> {
        let base = *self
            .base_offsets
            .get(index)
            .ok_or(ChecksumError::BlockOutOfRange {
                index,
                count: self.block_count(),
            })?;
        Ok(CmosBlock {
            index,
            base,
            header_offset: base + self.header_rel_offset,
            checksum_offset: base + self.checksum_rel_offset,
            region: ChecksumRegion {
                start: base + self.area_rel_offset,
                length: self.area_length,
                algorithm: self.algorithm,
                endian: self.endian,
                seed: self.seed,
            },
        })
    }

    /// The selected block, or every block when `index` is `None`.
    pub fn blocks(&self, index: Option<usize>) -> Result<Vec<CmosBlock>, ChecksumError> {
        match index {
            Some(i) => Ok(vec![self.block(i)?]),
            None => (0..self.block_count()).map(|i| self.block(i)).collect(),
        }
    }
}
