//! Unity SerializedFile inspector CLI
//!
//! Command-line interface for decoding and inspecting Unity SerializedFile
//! containers (`globalgamemanagers`, `*.assets`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use unity_serialized_file::{DecodeStatus, decode_file};

#[derive(Parser)]
#[command(name = "unity-serialized")]
#[command(about = "Inspect Unity SerializedFile containers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header fields and table counts
    Info {
        /// Input file path (e.g. globalgamemanagers, *.assets)
        input: PathBuf,
    },

    /// Dump every decoded field as indented text
    Dump {
        /// Input file path
        input: PathBuf,
    },

    /// Print the decoded model as JSON
    Json {
        /// Input file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => info_command(input),
        Commands::Dump { input } => dump_command(input),
        Commands::Json { input } => json_command(input),
    }
}

fn info_command(input: PathBuf) -> Result<()> {
    let (file, status) =
        decode_file(&input).with_context(|| format!("failed to read {}", input.display()))?;

    let header = &file.header;
    println!("version:            {}", header.version);
    println!("metadata size:      {}", header.metadata_size);
    println!("file size:          {}", header.file_size);
    println!("object data offset: {}", header.object_data_offset);
    println!("big endian:         {}", header.big_endian);
    println!("generator:          {}", file.metadata.generator_version);
    println!("platform:           {}", file.metadata.platform);
    println!("num types:          {}", file.metadata.types.len());
    println!("num objects:        {}", file.metadata.objects.len());
    println!("num adds:           {}", file.metadata.adds.len());
    println!("num externals:      {}", file.metadata.external_files.len());

    report_status(&status);
    Ok(())
}

fn dump_command(input: PathBuf) -> Result<()> {
    let (mut file, status) =
        decode_file(&input).with_context(|| format!("failed to read {}", input.display()))?;

    print!("{}", file.dump_text());
    report_status(&status);
    Ok(())
}

fn json_command(input: PathBuf) -> Result<()> {
    let (file, status) =
        decode_file(&input).with_context(|| format!("failed to read {}", input.display()))?;

    println!("{}", serde_json::to_string_pretty(&file)?);
    report_status(&status);
    Ok(())
}

fn report_status(status: &DecodeStatus) {
    if status.errored {
        let detail = if status.eof {
            " (unexpected end of stream)"
        } else {
            ""
        };
        eprintln!("warning: file did not decode cleanly{detail}");
    }
}
