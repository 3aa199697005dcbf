//! JSON line output
//!
//! - One solution per line on stdout, an object of its bound variables
//! - A final summary line
//! - UTF-8 only; logs go to stderr

use std::io::Write;

use serde::Serialize;

use super::errors::CliResult;

/// Write one value as a single JSON line
pub fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
