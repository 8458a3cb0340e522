//! Info command implementation.
//!
//! Prints a container's header fields and one line per entity.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::{PakError, Result};
use crate::output::Printer;
use crate::types::{Album, ColorKind, Compression, Point, Version};

/// Show a container's header and entity table
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Container file to inspect
    #[arg(required = true)]
    pub file: PathBuf,

    /// Print machine-readable JSON to stdout
    #[arg(long)]
    pub json: bool,
}

/// Serializable summary of an album.
#[derive(Debug, Serialize)]
pub struct AlbumSummary {
    pub name: String,
    pub version: Version,
    pub count: usize,
    pub length: usize,
    pub info_length: u64,
    pub palette: usize,
    pub entities: Vec<EntitySummary>,
}

#[derive(Debug, Serialize)]
pub struct EntitySummary {
    pub index: usize,
    pub kind: ColorKind,
    pub compression: Compression,
    pub width: u32,
    pub height: u32,
    pub location: Point,
    pub frame: (u32, u32),
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

impl AlbumSummary {
    pub fn new(album: &Album) -> Self {
        Self {
            name: album.name.clone(),
            version: album.version,
            count: album.count(),
            length: album.length(),
            info_length: album.info_length,
            palette: album.palette.len(),
            entities: album
                .entities
                .iter()
                .enumerate()
                .map(|(index, e)| EntitySummary {
                    index,
                    kind: e.kind,
                    compression: e.compression,
                    width: e.width,
                    height: e.height,
                    location: e.location,
                    frame: e.frame_size,
                    length: e.length(),
                    target: e.target,
                })
                .collect(),
        }
    }
}

pub fn run(args: InfoArgs, printer: &Printer) -> Result<()> {
    let codec = Codec::default();
    let album = super::load_album(&codec, &args.file, printer)?;
    let summary = AlbumSummary::new(&album);

    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| PakError::Parse {
            message: format!("Failed to serialize summary: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    printer.info("Version", &summary.version.to_string());
    printer.info("Length", &format!("{} bytes (index {})", summary.length, summary.info_length));
    if summary.palette > 0 {
        printer.info("Palette", &format!("{} colours", summary.palette));
    }

    println!(
        "{}",
        printer.heading(&format!(
            "{:>5}  {:<8}  {:>9}  {:>11}  {:>9}  {:>8}",
            "index", "kind", "size", "location", "frame", "bytes"
        ))
    );
    for e in &summary.entities {
        let kind = match e.target {
            Some(target) => format!("-> {}", target),
            None => e.kind.to_string(),
        };
        println!(
            "{:>5}  {:<8}  {:>9}  {:>11}  {:>9}  {:>8}",
            e.index,
            kind,
            format!("{}x{}", e.width, e.height),
            format!("{},{}", e.location.x, e.location.y),
            format!("{}x{}", e.frame.0, e.frame.1),
            e.length
        );
    }

    Ok(())
}
