//! CLI command handlers, one file per subcommand.

mod calc;
mod check;
mod fix;
mod headers;
mod read;

pub use calc::run_calc;
#[cfg(test)]
pub(crate) use calc::resolve_region;
pub use check::run_check;
pub use fix::run_fix;
pub use headers::run_headers;
pub use read::run_read;
