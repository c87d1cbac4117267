//! z2music - inspect the music and credits of a Zelda II ROM.
//!
//! Read-only: nothing is ever written back to the image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use z2_ir::{Channel, Pattern};
use z2_rom::{Rom, SongTitle, TableGroup};

#[derive(Parser)]
#[command(name = "z2music")]
#[command(about = "Zelda II music and credits inspector")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every song with its pattern and sequence counts
    Songs {
        /// ROM image (.nes)
        rom: PathBuf,
    },

    /// Print one song's patterns as note mnemonics
    Dump {
        /// ROM image (.nes)
        rom: PathBuf,

        /// Song name, e.g. town-theme
        song: SongTitle,
    },

    /// Print the end credits pages
    Credits {
        /// ROM image (.nes)
        rom: PathBuf,
    },

    /// Print the song table address of each group
    Tables {
        /// ROM image (.nes)
        rom: PathBuf,
    },
}

fn open(path: &Path) -> Result<Rom> {
    Rom::open(path).with_context(|| format!("failed to load {}", path.display()))
}

fn print_pattern(index: usize, pattern: &Pattern) {
    if pattern.voiced() {
        println!(
            "pattern {}: voiced {:02x} {:02x}, {} ticks",
            index,
            pattern.voice1(),
            pattern.voice2(),
            pattern.length()
        );
    } else {
        println!("pattern {}: tempo {:02x}, {} ticks", index, pattern.tempo(), pattern.length());
    }

    for channel in Channel::ALL {
        let notes: Vec<&str> = pattern.notes(channel).iter().map(|n| n.mnemonic()).collect();
        println!("  {:<9} {}", format!("{:?}", channel), notes.join(" "));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Songs { rom } => {
            let rom = open(&rom)?;
            for title in SongTitle::all() {
                let song = rom.song(title);
                println!(
                    "{:<26} {:<12} {:>3} patterns {:>3} sequence",
                    title.name(),
                    format!("{:?}", title.group()),
                    song.pattern_count(),
                    song.sequence_length()
                );
            }
        }

        Commands::Dump { rom, song } => {
            let rom = open(&rom)?;
            let s = rom.song(song);
            println!("{}: sequence {:?}", song, s.sequence());
            for (i, pattern) in s.patterns().iter().enumerate() {
                print_pattern(i, pattern);
            }
        }

        Commands::Credits { rom } => {
            let rom = open(&rom)?;
            for (i, page) in rom.credits().pages().iter().enumerate() {
                println!("{:2}: {}", i, page.title);
                for name in [&page.name1, &page.name2] {
                    if !name.is_empty() {
                        println!("    {}", name);
                    }
                }
            }
        }

        Commands::Tables { rom } => {
            let rom = open(&rom)?;
            for group in TableGroup::ALL {
                println!(
                    "{:<12} loader {:06x} table {:06x}",
                    format!("{:?}", group),
                    rom.layout().loader(group),
                    rom.table_address(group)
                );
            }
        }
    }

    Ok(())
}
