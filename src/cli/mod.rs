pub mod completions;
pub mod convert;
pub mod export;
pub mod info;
pub mod pack;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::codec::Codec;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::types::Album;

/// spritepak - Sprite album container codec
#[derive(Parser, Debug)]
#[command(name = "spritepak")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print extra progress detail
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a container's header and entity table
    Info(info::InfoArgs),

    /// Export entities to PNG files
    Export(export::ExportArgs),

    /// Re-encode a container as another version
    Convert(convert::ConvertArgs),

    /// Build a container from a directory of PNG files
    Pack(pack::PackArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load a container and report it.
pub(crate) fn load_album(codec: &Codec, path: &Path, printer: &Printer) -> Result<Album> {
    let album = codec.load_file(path)?;
    printer.status(
        "Loading",
        &format!(
            "{} ({}, {})",
            display_path(path),
            album.version,
            plural(album.len(), "entity", "entities")
        ),
    );
    Ok(album)
}
