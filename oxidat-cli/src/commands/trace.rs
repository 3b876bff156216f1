//! Trace command implementation.
//!
//! Compresses one file to the windowed form and writes a `.clog` log of
//! every control group, match and sampled literal next to it.

use crate::utils::{compressed_path, write_output};
use oxidat_lzss::{LzssEncoder, TraceWriter};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of trace logs.
const LOG_EXTENSION: &str = "clog";

pub fn cmd_trace(
    input: &Path,
    output: Option<&Path>,
    log: Option<&Path>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| compressed_path(input, None));
    let log_path = log.map(Path::to_path_buf).unwrap_or_else(|| log_path_for(&output));

    let mut trace = TraceWriter::new(Vec::new())?;
    let compressed = LzssEncoder::default().encode_observed(&data, &mut trace)?;
    let (log_text, stats) = trace.finish()?;

    write_output(&output, &compressed, force)?;
    write_output(&log_path, &log_text, force)?;

    println!(
        "{} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        data.len(),
        compressed.len()
    );
    println!("{}", stats);
    println!("Log: {}", log_path.display());
    Ok(())
}

fn log_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".");
    name.push(LOG_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_for() {
        assert_eq!(
            log_path_for(Path::new("out/msg.bin.lz")),
            PathBuf::from("out/msg.bin.lz.clog")
        );
    }
}
