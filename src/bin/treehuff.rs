use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use treehuff::{BitReader, BitWriter, DebugLevel, HuffProcessor};

/// Compress or decompress files with tree-header Huffman coding
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print a summary; repeat to also list every decoded byte when decompressing
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// compresses INPUT into OUTPUT
    Compress { input: PathBuf, output: PathBuf },

    /// decompresses INPUT into OUTPUT
    Decompress { input: PathBuf, output: PathBuf },
}

fn run(args: Args) -> treehuff::Result<()> {
    let debug = match args.verbose {
        0 => DebugLevel::Off,
        1 => DebugLevel::Low,
        _ => DebugLevel::High,
    };
    let processor = HuffProcessor::with_debug(debug);

    match args.mode {
        Mode::Compress { input, output } => {
            let mut reader = BitReader::new(File::open(&input)?);
            let mut writer = BitWriter::new(File::create(&output)?);
            let stats = processor.compress_stream(&mut reader, &mut writer)?;
            if debug >= DebugLevel::Low {
                eprintln!(
                    "{}: {} bytes -> {} bits (header {}, body {})",
                    input.display(),
                    stats.bytes_read,
                    stats.bits_written,
                    stats.header_bits,
                    stats.body_bits
                );
            }
        }
        Mode::Decompress { input, output } => {
            let mut reader = BitReader::new(File::open(&input)?);
            let mut writer = BitWriter::new(File::create(&output)?);
            let mut show = |byte: u8, bits_read: u64| {
                if debug >= DebugLevel::High {
                    eprintln!("{:>10} {:#04x}", bits_read, byte);
                }
            };
            let stats = processor.decompress_with_observer(&mut reader, &mut writer, &mut show)?;
            if debug >= DebugLevel::Low {
                eprintln!(
                    "{}: {} bits -> {} bytes",
                    input.display(),
                    stats.bits_read,
                    stats.bytes_written
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("treehuff: {}", e);
            ExitCode::FAILURE
        }
    }
}
