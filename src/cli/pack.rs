//! Pack command implementation.
//!
//! Builds a container from a directory of PNG files, the inverse of a batch
//! export. Images are packed in file-name order; an `x.txt` position log in
//! the same directory supplies entity locations.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::codec::Codec;
use crate::error::{PakError, Result};
use crate::handler::{build_palette, MAX_PALETTE};
use crate::output::{display_path, plural, Printer};
use crate::types::{Album, ColorKind, Entity, Point, Version};

/// Build a container from a directory of PNG files
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Directory containing the PNG files
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Output container file
    #[arg(long, short)]
    pub output: PathBuf,

    /// Container version to write
    #[arg(long, default_value = "ver2")]
    pub version: Version,

    /// Colour kind of the packed entities
    #[arg(long, default_value = "argb8888")]
    pub kind: ColorKind,
}

/// Collect PNG files directly inside `dir`, sorted by name.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| PakError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to scan directory: {}", e),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some("png")
        {
            images.push(path.to_path_buf());
        }
    }
    Ok(images)
}

/// Parse a position log: one `"x y"` line per entity.
pub fn parse_positions(source: &str) -> Result<Vec<Point>> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            let mut parts = line.split_whitespace().map(str::parse::<i32>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
                _ => Err(PakError::Parse {
                    message: format!("Invalid position on line {}: '{}'", i + 1, line),
                    help: Some("Each line must hold two integers: x y".to_string()),
                }),
            }
        })
        .collect()
}

/// Build an album from image files and optional positions.
pub fn pack_album(
    codec: &Codec,
    images: &[PathBuf],
    positions: &[Point],
    version: Version,
    kind: ColorKind,
) -> Result<Album> {
    if kind == ColorKind::Link {
        return Err(PakError::Parse {
            message: "Cannot pack images as link entities".to_string(),
            help: None,
        });
    }

    let mut album = Album::new(version);
    if !codec.new_entities(&mut album, images.len(), kind, 0)? {
        album
            .entities
            .extend((0..images.len()).map(|_| Entity::new(kind)));
    }

    for (i, path) in images.iter().enumerate() {
        let image = image::open(path)
            .map_err(|e| PakError::Io {
                path: path.clone(),
                message: format!("Failed to load image: {}", e),
            })?
            .to_rgba8();

        let entity = &mut album.entities[i];
        entity.frame_size = image.dimensions();
        entity.location = positions.get(i).copied().unwrap_or_default();
        entity.replace_image(image);
    }

    if version == Version::Ver4 {
        let indexed = album
            .entities
            .iter()
            .filter(|e| e.kind == ColorKind::Argb1555)
            .filter_map(|e| e.image());
        album.palette = build_palette(indexed, MAX_PALETTE)?;
    }

    codec.adjust(&mut album)?;
    Ok(album)
}

pub fn run(args: PackArgs, printer: &Printer) -> Result<()> {
    let images = collect_images(&args.dir)?;
    printer.status(
        "Scanning",
        &format!("{} ({})", display_path(&args.dir), plural(images.len(), "image", "images")),
    );

    let positions_path = args.dir.join("x.txt");
    let positions = if positions_path.is_file() {
        let source = fs::read_to_string(&positions_path).map_err(|e| PakError::Io {
            path: positions_path.clone(),
            message: format!("Failed to read positions: {}", e),
        })?;
        parse_positions(&source)?
    } else {
        printer.verbose("Positions", "no x.txt, placing every entity at 0,0");
        Vec::new()
    };

    let codec = Codec::default();
    let mut album = pack_album(&codec, &images, &positions, args.version, args.kind)?;
    codec.save_file(&mut album, &args.output)?;

    printer.status(
        "Packed",
        &format!(
            "{} into {} ({}, {} bytes)",
            plural(album.count(), "entity", "entities"),
            display_path(&args.output),
            album.version,
            album.length()
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    use super::*;
    use crate::export::{ExportCommand, ExportOptions};

    #[test]
    fn test_parse_positions() {
        let points = parse_positions("1 2\r\n-3 4\n\n").unwrap();
        assert_eq!(points, vec![Point::new(1, 2), Point::new(-3, 4)]);
        assert!(parse_positions("1\n").is_err());
        assert!(parse_positions("1 2 3\n").is_err());
        assert!(parse_positions("a b\n").is_err());
    }

    #[test]
    fn test_pack_directory() {
        let dir = tempdir().unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))
            .save(dir.path().join("001.png"))
            .unwrap();
        RgbaImage::from_pixel(3, 1, Rgba([0, 255, 0, 255]))
            .save(dir.path().join("000.png"))
            .unwrap();
        fs::write(dir.path().join("x.txt"), "5 6\n7 8\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let output = dir.path().join("packed.img");
        let args = PackArgs {
            dir: dir.path().to_path_buf(),
            output: output.clone(),
            version: Version::Ver2,
            kind: ColorKind::Argb8888,
        };
        run(args, &Printer::new(false)).unwrap();

        let codec = Codec::default();
        let album = codec.load_file(&output).unwrap();
        assert_eq!(album.len(), 2);
        assert_eq!((album.entities[0].width, album.entities[0].height), (3, 1));
        assert_eq!(album.entities[1].location, Point::new(7, 8));
    }

    #[test]
    fn test_export_then_pack_restores_positions() {
        let dir = tempdir().unwrap();
        let codec = Codec::default();
        let mut album = crate::handler::testing::sample_album(Version::Ver2);
        codec.adjust(&mut album).unwrap();

        let options = ExportOptions {
            destination: dir.path().to_string_lossy().into_owned(),
            digits: 3,
            all: true,
            ..ExportOptions::default()
        };
        let report = ExportCommand::new(&codec, options).run(&mut album).unwrap();

        let images = collect_images(&report.directory).unwrap();
        let positions = parse_positions(&fs::read_to_string(report.directory.join("x.txt")).unwrap()).unwrap();
        let packed = pack_album(&codec, &images, &positions, Version::Ver2, ColorKind::Argb8888).unwrap();

        assert_eq!(packed.len(), album.len());
        for (a, b) in packed.entities.iter().zip(&album.entities) {
            assert_eq!(a.location, b.location);
        }
    }

    #[test]
    fn test_pack_legacy_without_factory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.png");
        RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let codec = Codec::default();
        let album = pack_album(&codec, &[path], &[], Version::Legacy, ColorKind::Argb8888).unwrap();
        assert_eq!(album.version, Version::Legacy);
        assert_eq!(album.count(), 1);
    }

    #[test]
    fn test_pack_ver4_builds_palette() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0.png");
        RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])).save(&path).unwrap();

        let codec = Codec::default();
        let album = pack_album(&codec, &[path], &[], Version::Ver4, ColorKind::Argb1555).unwrap();
        assert_eq!(album.palette.len(), 1);
        assert_eq!(album.entities[0].length(), 4);
    }
}
