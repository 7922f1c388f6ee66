//! Export core (spreadsheet generation) used by the CLI.

#[cfg(feature = "excel")]
pub mod excel_core;
