use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::prelude::*;

use metro32::{assembler::assemble_source, hexdump};

#[derive(Parser)]
#[command(version)]
#[command(about = "Assemble metronome32 source into a memory image")]
struct Cli {
    #[clap(long)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
    #[clap(long)]
    #[clap(help = "Dump the populated memory image")]
    dump: bool,
    #[clap(help = "Assembly source file")]
    file: PathBuf,
}

pub fn trace() -> FlushGuard {
    let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
    tracing_subscriber::registry().with(chrome_layer).init();

    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = if cli.trace { Some(trace()) } else { None };

    let path = cli
        .file
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", cli.file.display()))?;
    let source = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let image = assemble_source(&source)?;
    println!(
        "{} words assembled, entry point {:#010x}",
        image.memory.len(),
        image.entry_point
    );
    if cli.dump {
        println!("{}", hexdump::dump_words(&image.memory, 4));
    }

    Ok(())
}
