//! Compute, verify and rewrite the additive checksum of CMOS blocks in
//! firmware images.

pub mod config;
pub mod logging;

pub mod algorithm;
pub mod engine;
pub mod error;
pub mod field;
pub mod header;
pub mod image;
pub mod layout;

pub use algorithm::{ChecksumAlgorithm, Endian};
pub use engine::{calculate_checksum, ChecksumRegion, ChecksumResult};
pub use error::ChecksumError;
pub use field::{read_checksum, write_checksum};
pub use header::{verify_image_headers, HeaderMagic, HeaderReport, CMOS_HEADER_MAGIC};
pub use layout::{CmosBlock, CmosLayout};
