pub mod catalog;
pub mod compare;
pub mod evaluate;
pub mod init;
pub mod reset;
pub mod set;
pub mod validate;

use anyhow::Result;

use gradepath_core::catalog::YearKey;

/// Parse a `--year` argument.
pub(crate) fn parse_year(value: &str) -> Result<YearKey> {
    Ok(value.parse::<YearKey>()?)
}
