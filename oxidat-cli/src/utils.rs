//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use oxidat_core::OxiDatError;
use rayon::prelude::*;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of compressed files.
pub const LZ_EXTENSION: &str = "lz";

/// Extension given to decompressed files whose input lacked [`LZ_EXTENSION`].
pub const RAW_EXTENSION: &str = "out";

/// A failure on one file of a batch.
#[derive(Debug, Error)]
#[error("{} - {source}", path.display())]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub source: OxiDatError,
}

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let style =
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("█▓▒░ "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

/// Run `job` on every file in parallel.
///
/// Results come back in the order of `files`. The bar is only drawn for
/// batches of more than one file.
pub fn run_batch<T, F>(files: &[PathBuf], progress: bool, job: F) -> Vec<Result<T, FileError>>
where
    T: Send,
    F: Fn(&Path) -> Result<T, OxiDatError> + Sync,
{
    let pb = create_progress_bar(files.len() as u64, progress && files.len() > 1);

    let results = files
        .par_iter()
        .map(|path| {
            let result = job(path).map_err(|source| FileError {
                path: path.clone(),
                source,
            });
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_and_clear();
    results
}

/// Print failures of a batch and hand every success to `on_ok`.
///
/// Fails if any file failed.
pub fn report_batch<T>(
    results: Vec<Result<T, FileError>>,
    mut on_ok: impl FnMut(T),
) -> Result<(), Box<dyn std::error::Error>> {
    let total = results.len();
    let mut failed = 0usize;

    for result in results {
        match result {
            Ok(value) => on_ok(value),
            Err(err) => {
                failed += 1;
                eprintln!("  FAILED: {}", err);
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, total).into());
    }
    Ok(())
}

/// Path of the compressed counterpart of `input`.
pub fn compressed_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = file_name(input);
    name.push(".");
    name.push(LZ_EXTENSION);
    place(input, output_dir, name)
}

/// Path of the decompressed counterpart of `input`.
///
/// `name.lz` becomes `name`; anything else gets [`RAW_EXTENSION`] appended.
pub fn decompressed_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let name = match (input.extension(), input.file_stem()) {
        (Some(ext), Some(stem)) if ext == OsStr::new(LZ_EXTENSION) => stem.to_os_string(),
        _ => {
            let mut name = file_name(input);
            name.push(".");
            name.push(RAW_EXTENSION);
            name
        }
    };
    place(input, output_dir, name)
}

fn file_name(input: &Path) -> OsString {
    input
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("stdin"))
}

fn place(input: &Path, output_dir: Option<&Path>, name: OsString) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Write `bytes` to `path`, refusing to replace an existing file unless `force`.
pub fn write_output(path: &Path, bytes: &[u8], force: bool) -> Result<(), OxiDatError> {
    if !force && path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", path.display()),
        )
        .into());
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Format a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
