use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Lines at or below this many code points are discarded; it keeps lone
/// page numbers and section labels out of the practice set.
pub const MIN_LINE_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read document: {0}")]
    Io(#[from] io::Error),
    #[error("document contains no readable text")]
    NoText,
}

/// Extracts the practice lines from a plain-text document: open, read,
/// filter, done. Each returned line is trimmed, non-empty, and longer
/// than [`MIN_LINE_LEN`] code points. A document with no surviving lines
/// (a scanned image dumped to text, say) is an ingestion failure rather
/// than a zero-line practice session.
pub fn extract_lines(path: &Path) -> Result<Vec<String>, IngestError> {
    let started = Instant::now();
    let content = fs::read_to_string(path)?;

    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_LEN)
        .map(str::to_string)
        .collect();

    debug!(
        "extracted {} lines from {} in {:.4}s",
        lines.len(),
        path.display(),
        started.elapsed().as_secs_f64()
    );

    if lines.is_empty() {
        return Err(IngestError::NoText);
    }
    Ok(lines)
}
