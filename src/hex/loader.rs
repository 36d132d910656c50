use crate::error::{HexError, Result};
use log::{error, info};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Read one token per line, trimming whitespace and skipping blank lines.
///
/// A missing file is not an error: it logs and yields an empty vector so the
/// caller can decide whether the dependent work is skipped.
pub fn read_hex_tokens<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("File not found: {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(HexError::io(path, e)),
    };
    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line.map_err(|e| HexError::io(path, e))?;
        let t = line.trim();
        if t.is_empty() { continue; }
        out.push(t.to_string());
    }
    Ok(out)
}

/// Overwrite `path` with one newline-terminated token per line.
pub fn write_hex_tokens<P: AsRef<Path>, S: AsRef<str>>(path: P, tokens: &[S]) -> Result<usize> {
    let path = path.as_ref();
    let f = File::create(path).map_err(|e| HexError::io(path, e))?;
    let mut w = BufWriter::new(f);
    for t in tokens {
        writeln!(w, "{}", t.as_ref()).map_err(|e| HexError::io(path, e))?;
    }
    w.flush().map_err(|e| HexError::io(path, e))?;
    info!("  Written {} entries to {}", tokens.len(), path.display());
    Ok(tokens.len())
}
