//! Info command implementation.

use crate::utils::format_size;
use oxidat_lzss::{Header, LogObserver, LzssDecoder, Method, StatsObserver};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Token counts of a windowed stream.
#[derive(Debug, Serialize, Deserialize)]
struct TokenStatsJson {
    control_groups: usize,
    matches: usize,
    literals: usize,
    matched_bytes: usize,
}

impl From<&StatsObserver> for TokenStatsJson {
    fn from(stats: &StatsObserver) -> Self {
        Self {
            control_groups: stats.control_groups,
            matches: stats.matches,
            literals: stats.literals,
            matched_bytes: stats.matched_bytes,
        }
    }
}

/// JSON output for stream inspection.
#[derive(Debug, Serialize, Deserialize)]
struct StreamInfoJson {
    file: String,
    flag: u8,
    method: String,
    tag: String,
    original_size: u32,
    compressed_size: u64,
    ratio: f64,
    decoded_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<TokenStatsJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(file)?;
    let header = Header::parse(&bytes)?;

    // Decode once to validate the body and count its tokens. At -vv the
    // same pass also traces every event.
    let tracer = log::log_enabled!(log::Level::Trace).then(LogObserver::new);
    let mut observer = (StatsObserver::new(), tracer);
    let decoded =
        LzssDecoder::default().decode_observed(&bytes, header.original_len(), &mut observer);
    let stats = observer.0;
    let (decoded_size, error) = match decoded {
        Ok(data) => (data.len(), None),
        Err(err) => (0, Some(err.to_string())),
    };

    let ratio = if header.original_len == 0 {
        0.0
    } else {
        bytes.len() as f64 / f64::from(header.original_len) * 100.0
    };

    let info = StreamInfoJson {
        file: file.display().to_string(),
        flag: header.flag,
        method: header.method.name().to_string(),
        tag: String::from_utf8_lossy(header.method.tag()).into_owned(),
        original_size: header.original_len,
        compressed_size: bytes.len() as u64,
        ratio,
        decoded_size,
        tokens: (header.method == Method::Windowed).then(|| TokenStatsJson::from(&stats)),
        error,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File:            {}", info.file);
    println!("Flag byte:       0x{:02X}", info.flag);
    println!("Method:          {} (\"{}\")", info.method, info.tag);
    println!(
        "Original size:   {} ({} bytes)",
        format_size(u64::from(info.original_size)),
        info.original_size
    );
    println!(
        "Compressed size: {} ({} bytes)",
        format_size(info.compressed_size),
        info.compressed_size
    );
    println!("Ratio:           {:.1}%", info.ratio);

    if let Some(tokens) = &info.tokens {
        println!("Control groups:  {}", tokens.control_groups);
        println!(
            "Matches:         {} ({} bytes)",
            tokens.matches, tokens.matched_bytes
        );
        println!("Literals:        {}", tokens.literals);
    }

    match &info.error {
        Some(err) => println!("Status:          damaged ({})", err),
        None if info.decoded_size < header.original_len() => println!(
            "Status:          short ({} of {} bytes)",
            info.decoded_size, info.original_size
        ),
        None => println!("Status:          OK"),
    }

    Ok(())
}
