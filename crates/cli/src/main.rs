//! Command-line interface for zip archiving and extraction.
//!
//! This CLI tool provides a simple interface for archiving files and
//! directories, extracting archives and listing archive contents.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use ziputil::{ArchiveOptions, Compression};

#[derive(Parser)]
#[command(name = "ziputil")]
#[command(version, about = "Archive and extract zip files from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive a file or directory into a zip file
    Archive {
        /// File or directory to archive
        source: PathBuf,

        /// Zip file to create
        destination: PathBuf,

        /// Compression method: stored, deflated
        #[arg(long, default_value = "deflated")]
        compression: Compression,

        /// Compression level (0-9 for deflated)
        #[arg(long)]
        level: Option<i64>,

        /// Do not follow symbolic links while walking the source
        #[arg(long)]
        no_follow_symlinks: bool,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a zip file into a directory
    Extract {
        /// Zip file to extract
        archive: PathBuf,

        /// Output directory, created if missing
        destination: PathBuf,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the entries of a zip file
    List {
        /// Zip file to inspect
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Archive {
            source,
            destination,
            compression,
            level,
            no_follow_symlinks,
            json,
        } => {
            let options = ArchiveOptions {
                compression,
                compression_level: level,
                follow_symlinks: !no_follow_symlinks,
            };
            handle_archive(source, destination, options, json)
        }
        Commands::Extract {
            archive,
            destination,
            json,
        } => handle_extract(archive, destination, json),
        Commands::List { archive, json } => handle_list(archive, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn handle_archive(
    source: PathBuf,
    destination: PathBuf,
    options: ArchiveOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = ziputil::try_archive(&source, &destination, &options)?;

    if json {
        print_json(&stats)?;
    } else {
        println!(
            "Archived {} files ({} bytes) into {}",
            stats.files_archived,
            stats.bytes_read,
            destination.display()
        );
    }
    Ok(())
}

fn handle_extract(
    archive: PathBuf,
    destination: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = ziputil::try_extract(&archive, &destination)?;

    if json {
        print_json(&stats)?;
    } else {
        println!(
            "Extracted {} files ({} bytes) into {}",
            stats.files_extracted,
            stats.bytes_written,
            destination.display()
        );
    }
    Ok(())
}

fn handle_list(archive: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = ziputil::probe(&archive)?;

    if json {
        return print_json(&info);
    }

    for entry in &info.entry_list {
        let kind = if entry.is_directory { "d" } else { "-" };
        println!("{} {:>12}  {}", kind, entry.size, entry.path);
    }
    println!(
        "{} entries, {} bytes uncompressed",
        info.entries,
        info.uncompressed_estimate.unwrap_or(0)
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
