//! OxiDat CLI - The Oxidized DAT codec
//!
//! Compresses, decompresses and inspects the LZSS payloads stored in PIDX
//! `.dat` archives.

mod commands;
mod utils;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{
    CompressOptions, DecompressOptions, cmd_completions, cmd_compress, cmd_decompress, cmd_info,
    cmd_trace,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxidat")]
#[command(
    author,
    version,
    about = "The Oxidized DAT codec - Pure Rust LZSS for PIDX .dat payloads"
)]
#[command(long_about = "
OxiDat reads and writes the windowed LZSS streams (\"3;1\") and stored
streams (\"3;0\") found inside PIDX .dat archives.

Examples:
  oxidat compress script.bin
  oxidat compress -o packed/ *.bin
  oxidat compress --store font.tex
  oxidat decompress script.bin.lz
  oxidat decompress --length 4096 entry_0012
  oxidat info script.bin.lz
  oxidat info --json script.bin.lz
  oxidat trace script.bin
  oxidat completions bash
")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files into .lz streams
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Always write the stored ("3;0") form
        #[arg(short, long)]
        store: bool,

        /// How far back the encoder searches for matches (1-4088)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=4088))]
        search_span: Option<u16>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// List every file processed
        #[arg(short, long)]
        list: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Decompress .lz streams
    #[command(alias = "d", alias = "x")]
    Decompress {
        /// Files to decompress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decompressed length to use instead of the header's
        #[arg(short = 'n', long)]
        length: Option<usize>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// List every file processed
        #[arg(short, long)]
        list: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show header fields and token statistics of a stream
    #[command(alias = "i")]
    Info {
        /// Stream to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Compress one file and write a log of every token
    Trace {
        /// File to compress
        file: PathBuf,

        /// Compressed output (defaults to <file>.lz)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log path (defaults to <output>.clog)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbosity);

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            store,
            search_span,
            force,
            list,
            no_progress,
        } => cmd_compress(
            &files,
            &CompressOptions {
                output_dir: output.as_deref(),
                store,
                force,
                search_span: search_span.map(usize::from),
                verbose: list,
                progress: !no_progress,
            },
        ),
        Commands::Decompress {
            files,
            output,
            length,
            force,
            list,
            no_progress,
        } => cmd_decompress(
            &files,
            &DecompressOptions {
                output_dir: output.as_deref(),
                length,
                force,
                verbose: list,
                progress: !no_progress,
            },
        ),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Trace {
            file,
            output,
            log,
            force,
        } => cmd_trace(&file, output.as_deref(), log.as_deref(), force),
        Commands::Completions { shell } => cmd_completions(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
