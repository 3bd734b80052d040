use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use psymol::BackgroundColor;

#[derive(Parser)]
#[command(
    name = "psymol",
    about = "Resolve psychoactive substances to structures and draw them",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Log more (repeat for trace output); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up a substance by name or isomerdesign URL and draw it
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),

    /// Draw a SMILES string
    #[command(visible_alias = "s")]
    Smiles(SmilesArgs),

    /// Draw a V2000 molfile using its own coordinates
    #[command(visible_alias = "m")]
    Molfile(MolfileArgs),
}

/// Image options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Image")]
pub struct ImageOptions {
    /// Output PNG file
    #[arg(short, long, value_name = "FILE", default_value = "structure.png")]
    pub output: PathBuf,

    /// Background colour, a name or #rrggbb
    #[arg(long, value_name = "COLOUR", default_value = "white")]
    pub background: BackgroundColor,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Substance name or isomerdesign URL
    pub identifier: String,

    /// Also write the resolved molfile here
    #[arg(long, value_name = "FILE")]
    pub molfile: Option<PathBuf>,

    /// Database host to query
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(flatten)]
    pub image: ImageOptions,
}

#[derive(Args)]
pub struct SmilesArgs {
    pub smiles: String,

    #[command(flatten)]
    pub image: ImageOptions,
}

#[derive(Args)]
pub struct MolfileArgs {
    /// Molfile to draw
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    #[command(flatten)]
    pub image: ImageOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}
