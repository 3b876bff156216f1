//! Compress command implementation.

use crate::utils::{compressed_path, format_size, report_batch, run_batch, write_output};
use oxidat_core::OxiDatError;
use oxidat_lzss::{LzssConfig, Packed, pack};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for compressing files.
pub struct CompressOptions<'a> {
    pub output_dir: Option<&'a Path>,
    pub store: bool,
    pub force: bool,
    pub search_span: Option<usize>,
    pub verbose: bool,
    pub progress: bool,
}

struct Compressed {
    input: PathBuf,
    output: PathBuf,
    packed: Packed,
}

pub fn cmd_compress(
    files: &[PathBuf],
    options: &CompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = LzssConfig::new();
    if let Some(span) = options.search_span {
        config = config.with_search_span(span);
    }
    if options.store {
        config = config.with_try_compress(false);
    }

    if let Some(dir) = options.output_dir {
        fs::create_dir_all(dir)?;
    }

    let results = run_batch(files, options.progress, |input| {
        compress_file(input, &config, options)
    });

    let mut total_in = 0u64;
    let mut total_out = 0u64;
    let mut count = 0usize;

    report_batch(results, |done| {
        total_in += u64::from(done.packed.original_len);
        total_out += done.packed.bytes.len() as u64;
        count += 1;
        if options.verbose {
            println!(
                "  {} -> {} ({} -> {}, {:.1}%, {})",
                done.input.display(),
                done.output.display(),
                format_size(u64::from(done.packed.original_len)),
                format_size(done.packed.bytes.len() as u64),
                done.packed.ratio() * 100.0,
                done.packed.method
            );
        }
    })?;

    println!(
        "Compressed {} file(s): {} -> {}",
        count,
        format_size(total_in),
        format_size(total_out)
    );
    Ok(())
}

fn compress_file(
    input: &Path,
    config: &LzssConfig,
    options: &CompressOptions,
) -> Result<Compressed, OxiDatError> {
    let data = fs::read(input)?;

    // With --store, `try_compress` is off and pack goes straight to "3;0".
    let packed = pack(&data, config)?;

    let output = compressed_path(input, options.output_dir);
    write_output(&output, &packed.bytes, options.force)?;
    log::debug!(
        "compress: {} ({} bytes) -> {} ({})",
        input.display(),
        data.len(),
        output.display(),
        packed.method
    );

    Ok(Compressed {
        input: input.to_path_buf(),
        output,
        packed,
    })
}
