use std::path::Path;

use crate::report::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Parses an access count from a text cell.
///
/// Spreadsheet exports sometimes store counts as floats ("1234.0"); these
/// are accepted as long as the fractional part is zero. Anything else is a
/// fatal error for the run.
pub fn parse_count_str(content: &str, lineno: usize) -> ReportResult<u64> {
    let trimmed = content.trim();
    if let Ok(x) = trimmed.parse::<u64>() {
        return Ok(x);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => BadCountSnafu {
            lineno,
            content: content.to_string(),
        }
        .fail(),
    }
}
