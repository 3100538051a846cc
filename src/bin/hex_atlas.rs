//! Hex Atlas Tool
//!
//! Converts a square 16x16 tile atlas PNG into an 18x16 hex-masked atlas.
//!
//! Usage: `hex-atlas <INPUT> <OUTPUT> [--mirror] [--config grid.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hex_tilemap_engine::render::Hexagonizer;
use hex_tilemap_engine::world::GridConfig;

#[derive(Parser, Debug)]
#[command(name = "hex-atlas", about = "Hexagonize a square tile atlas")]
struct Args {
    /// Square tile atlas (PNG)
    input: PathBuf,
    /// Where to write the hex atlas (PNG)
    output: PathBuf,
    /// Flip the source atlas horizontally before masking
    #[arg(long)]
    mirror: bool,
    /// Grid configuration (JSON); defaults to the 16 -> 18 hex preset
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> hex_tilemap_engine::Result<()> {
    let config = match &args.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::hex(),
    };
    let hexagonizer = Hexagonizer::from_config(&config)?;

    let mut source = image::open(&args.input)?.to_rgba8();
    if args.mirror {
        source = image::imageops::flip_horizontal(&source);
    }

    let (hex, atlas) = hexagonizer.build_atlas(&source)?;
    hex.save(&args.output)?;

    println!(
        "[hex-atlas] {} -> {} ({}x{}, {} tiles)",
        args.input.display(),
        args.output.display(),
        hex.width(),
        hex.height(),
        atlas.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[hex-atlas] {e}");
            ExitCode::FAILURE
        }
    }
}
