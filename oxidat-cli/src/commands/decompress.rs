//! Decompress command implementation.

use crate::utils::{decompressed_path, format_size, report_batch, run_batch, write_output};
use oxidat_core::OxiDatError;
use oxidat_lzss::{Header, LzssConfig, Unpacked, unpack};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for decompressing files.
pub struct DecompressOptions<'a> {
    pub output_dir: Option<&'a Path>,
    /// Overrides the length recorded in each header.
    pub length: Option<usize>,
    pub force: bool,
    pub verbose: bool,
    pub progress: bool,
}

struct Decompressed {
    input: PathBuf,
    output: PathBuf,
    input_len: usize,
    unpacked: Unpacked,
}

pub fn cmd_decompress(
    files: &[PathBuf],
    options: &DecompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = LzssConfig::STANDARD;

    if let Some(dir) = options.output_dir {
        fs::create_dir_all(dir)?;
    }

    let results = run_batch(files, options.progress, |input| {
        decompress_file(input, &config, options)
    });

    let mut count = 0usize;
    let mut raw = 0usize;

    report_batch(results, |done| {
        count += 1;
        let method = match done.unpacked.method {
            Some(method) => method.name(),
            None => {
                raw += 1;
                "raw"
            }
        };
        if options.verbose {
            println!(
                "  {} -> {} ({} -> {}, {})",
                done.input.display(),
                done.output.display(),
                format_size(done.input_len as u64),
                format_size(done.unpacked.data.len() as u64),
                method
            );
        }
    })?;

    if raw > 0 {
        println!(
            "Decompressed {} file(s), {} without a header copied as-is",
            count, raw
        );
    } else {
        println!("Decompressed {} file(s)", count);
    }
    Ok(())
}

fn decompress_file(
    input: &Path,
    config: &LzssConfig,
    options: &DecompressOptions,
) -> Result<Decompressed, OxiDatError> {
    let bytes = fs::read(input)?;

    // Headerless files are copied whole unless a length is given.
    let declared_len = options
        .length
        .or_else(|| Header::parse(&bytes).ok().map(|h| h.original_len()))
        .unwrap_or(bytes.len());

    // unpack warns about headerless input itself.
    let unpacked = unpack(&bytes, declared_len, config)?;

    let output = decompressed_path(input, options.output_dir);
    write_output(&output, &unpacked.data, options.force)?;

    Ok(Decompressed {
        input: input.to_path_buf(),
        output,
        input_len: bytes.len(),
        unpacked,
    })
}
