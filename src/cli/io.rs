//! JSON I/O handling for CLI
//!
//! - Input: JSON files, or one JSON object per line on stdin
//! - Output: one JSON response object per line on stdout
//! - UTF-8 only; an undecodable `run` line is rejected, not fatal

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::routing::{DocumentRevision, RevisionMetadata};

use super::errors::{CliError, CliResult};

/// One revision as supplied by the host on a `run` input line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RevisionInput {
    pub doc: DocumentRevision,
    #[serde(default)]
    pub old_doc: Option<DocumentRevision>,
    #[serde(default)]
    pub meta: RevisionMetadata,
}

impl RevisionInput {
    pub fn parse(line: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Read a JSON value from a file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}

/// Iterate over non-blank input lines as raw bytes.
///
/// Only read failures surface as errors here; decoding is left to
/// [`decode_line`] so a bad line can be rejected on its own.
pub fn read_lines<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Vec<u8>>> {
    reader
        .split(b'\n')
        .map(|line| {
            let mut line = line.map_err(CliError::from)?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(line)
        })
        .filter(|line| !matches!(line, Ok(l) if l.iter().all(u8::is_ascii_whitespace)))
}

/// Decode one input line as UTF-8
pub fn decode_line(bytes: &[u8]) -> CliResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| CliError::invalid_input(format!("line is not valid UTF-8: {}", e)))
}

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_value(writer, &response)
}

/// Write an error response
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_value(writer, &response)
}

fn write_value<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
