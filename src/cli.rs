//! Command-line argument handling.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub wad: PathBuf,
    pub wasm: PathBuf,
    pub show_help: bool,
}

pub fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut opts = CliOptions {
        wad: PathBuf::from("doom1.wad"),
        wasm: default_wasm_path(),
        show_help: false,
    };

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--wad" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --wad"))?;
                opts.wad = PathBuf::from(v);
            }
            "--help" | "-h" => opts.show_help = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(opts)
}

fn default_wasm_path() -> PathBuf {
    env::var("DOOM_WASM")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("doom.wasm"))
}

pub fn print_usage() {
    println!("tui-doom - play DOOM in your terminal");
    println!();
    println!("USAGE:");
    println!("    tui-doom [--wad <path>]");
    println!();
    println!("OPTIONS:");
    println!("    --wad <path>    WAD file to load (default: doom1.wad)");
    println!("    --help, -h      Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("    DOOM_WASM          Path to the doomgeneric WASM module (default: doom.wasm)");
    println!("    DOOM_SAVE_DIR      Durable save directory (default: ~/.opentui-doom)");
    println!("    DOOM_DEBUG         1 or true enables debug logging to <save dir>/debug.log");
    println!("    DOOM_AUDIO_PLAYER  External audio player binary (default: ffplay)");
    println!();
    println!("CONTROLS:");
    println!("    Arrows / WASD  move and turn       Space / E  use");
    println!("    Ctrl / F       fire                Mouse      turn / fire");
    println!("    Esc            menu                Ctrl-Q     quit");
}
