//! CLI for the htsum CMOS image checksum tool.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use htsum_core::config;
use htsum_core::{ChecksumAlgorithm, Endian};
use std::path::PathBuf;

use commands::{run_calc, run_check, run_fix, run_headers, run_read};

/// Top-level CLI for htsum.
#[derive(Debug, Parser)]
#[command(name = "htsum")]
#[command(about = "htsum: verify and rewrite CMOS block checksums in firmware images", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/htsum/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Parse an offset, length or seed given as `0x`-prefixed hex or decimal.
pub fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

/// Region parameters that override the configured block for `calc`.
#[derive(Debug, Clone, Default, Args)]
pub struct RegionArgs {
    /// Absolute offset of the first summed byte.
    #[arg(long, value_parser = parse_number)]
    pub start: Option<u64>,
    /// Number of bytes to sum.
    #[arg(long, value_parser = parse_number)]
    pub length: Option<u64>,
    /// SUM8, SUM16, SUM24 or SUM32.
    #[arg(long)]
    pub algorithm: Option<ChecksumAlgorithm>,
    /// little or big.
    #[arg(long)]
    pub endian: Option<Endian>,
    /// Initial value of the running sum.
    #[arg(long, value_parser = parse_number)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Verify the magic header of each image.
    Headers {
        /// Image files.
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Only this block (default: all blocks).
        #[arg(long)]
        block: Option<usize>,
    },

    /// Print the checksum bytes stored in an image.
    Read {
        /// Image file.
        image: PathBuf,
        /// Only this block (default: all blocks).
        #[arg(long)]
        block: Option<usize>,
    },

    /// Compute the checksum of a block (or an explicit region).
    Calc {
        /// Image file.
        image: PathBuf,
        /// Block whose region is used as the base (default 0).
        #[arg(long, default_value = "0")]
        block: usize,
        #[command(flatten)]
        region: RegionArgs,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compare stored and computed checksums; fails if any block differs.
    Check {
        /// Image files.
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Only this block (default: all blocks).
        #[arg(long)]
        block: Option<usize>,
    },

    /// Rewrite stale checksums in place.
    Fix {
        /// Image files.
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Only this block (default: all blocks).
        #[arg(long)]
        block: Option<usize>,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let layout = &cfg.layout;

        match cli.command {
            CliCommand::Headers { images, block } => run_headers(layout, &images, block)?,
            CliCommand::Read { image, block } => run_read(layout, &image, block)?,
            CliCommand::Calc {
                image,
                block,
                region,
                json,
            } => run_calc(layout, &image, block, &region, json)?,
            CliCommand::Check { images, block } => run_check(layout, &images, block)?,
            CliCommand::Fix {
                images,
                block,
                dry_run,
            } => run_fix(layout, &images, block, dry_run)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
