//! Image export.
//!
//! Writes selected entities of an album to standalone PNG files. Batch
//! exports also leave two sidecar files next to the images: a position log
//! (`x.txt`, one `"x y"` line per exported entity) and an extents file
//! (`wh.txt`, the largest size and the largest location). Sidecars are never
//! overwritten, and failing to write one does not fail the export.
//!
//! Sidecar lines end in a bare `\n`, not `\r\n`.

pub mod effects;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::codec::Codec;
use crate::error::{PakError, Result};
use crate::types::{Album, Entity};

pub use effects::{parse_effect, Effect, EffectChain};

/// Extension of exported images.
pub const IMAGE_EXT: &str = "png";

/// Single image or batch export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Write the first requested entity to the destination file.
    Single,
    /// Write every requested entity into a derived directory.
    #[default]
    Batch,
}

/// How output file stems are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    /// Use the entity's index in the album.
    #[default]
    Original,
    /// Start at the given number and add the position in the request list.
    Increment(u32),
}

/// Parameters of one export run.
#[derive(Debug, Default)]
pub struct ExportOptions {
    pub mode: ExportMode,
    /// Requested entity indices; negative values mark empty slots.
    pub indices: Vec<i64>,
    /// Destination file (single) or base directory (batch).
    pub destination: String,
    pub prefix: String,
    pub numbering: Numbering,
    /// Minimum digits of the numeric file stem, zero-padded.
    pub digits: usize,
    /// Use the album's full path instead of its short name in the directory.
    pub full_path: bool,
    /// Export every entity regardless of `indices`.
    pub all: bool,
    pub effects: EffectChain,
}

/// What an export run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub directory: PathBuf,
    pub images: Vec<PathBuf>,
    /// Whether the position log was created by this run.
    pub positions_written: bool,
    /// Whether the extents file was created by this run.
    pub extents_written: bool,
}

/// Running maxima over exported entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extents {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Extents {
    pub fn update(&mut self, entity: &Entity) {
        self.width = self.width.max(entity.width);
        self.height = self.height.max(entity.height);
        self.x = self.x.max(entity.location.x);
        self.y = self.y.max(entity.location.y);
    }

    /// Contents of the extents sidecar.
    pub fn to_sidecar(self) -> String {
        format!("{} {}\n{} {}\n", self.width, self.height, self.x, self.y)
    }
}

/// Export command. It has no undo; files already written stay on disk even
/// when a later write fails.
pub struct ExportCommand<'a> {
    codec: &'a Codec,
    options: ExportOptions,
}

impl<'a> ExportCommand<'a> {
    pub fn new(codec: &'a Codec, options: ExportOptions) -> Self {
        Self { codec, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Run the export against `album`.
    pub fn run(&self, album: &mut Album) -> Result<ExportReport> {
        match self.options.mode {
            ExportMode::Single => self.export_single(album),
            ExportMode::Batch => self.export_batch(album),
        }
    }

    fn export_single(&self, album: &mut Album) -> Result<ExportReport> {
        let index = self
            .options
            .indices
            .first()
            .copied()
            .filter(|&i| i >= 0)
            .ok_or_else(|| PakError::Parse {
                message: "Single export needs one non-negative entity index".to_string(),
                help: None,
            })?;

        let image = self.codec.image(album, index as usize)?;
        let path = PathBuf::from(&self.options.destination);
        image.save_with_format(&path, ImageFormat::Png).map_err(|e| PakError::Io {
            path: path.clone(),
            message: format!("Failed to write image: {}", e),
        })?;

        Ok(ExportReport {
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            images: vec![path],
            ..ExportReport::default()
        })
    }

    fn export_batch(&self, album: &mut Album) -> Result<ExportReport> {
        let opts = &self.options;
        let (dir, prefix) = export_target(&opts.destination, album, &opts.prefix, opts.full_path);
        let dir = PathBuf::from(disambiguate(dir));

        fs::create_dir_all(&dir).map_err(|e| PakError::Io {
            path: dir.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;

        let indices: Vec<i64> = if opts.all {
            (0..album.len() as i64).collect()
        } else {
            opts.indices.clone()
        };
        let max = indices.len().min(album.len());

        let mut report = ExportReport {
            directory: dir.clone(),
            ..ExportReport::default()
        };
        let mut positions = String::new();
        let mut extents = Extents::default();

        for (i, &index) in indices.iter().take(max).enumerate() {
            if index < 0 {
                continue;
            }
            let index = index as usize;
            let entity = album.get(index).ok_or_else(|| PakError::Parse {
                message: format!("Entity {} out of range (album has {})", index, album.len()),
                help: None,
            })?;

            positions.push_str(&format!("{} {}\n", entity.location.x, entity.location.y));
            extents.update(entity);

            let stem = match opts.numbering {
                Numbering::Original => index,
                Numbering::Increment(start) => start as usize + i,
            };
            let path = dir.join(format!(
                "{}{:0width$}.{}",
                prefix,
                stem,
                IMAGE_EXT,
                width = opts.digits
            ));

            let image = self.codec.image(album, index)?;
            let image = opts.effects.apply(&album.entities[index], image);
            image
                .save_with_format(&path, ImageFormat::Png)
                .map_err(|e| PakError::Io {
                    path: path.clone(),
                    message: format!("Failed to write image: {}", e),
                })?;
            report.images.push(path);
        }

        report.positions_written = write_sidecar(&dir.join(format!("{}x.txt", prefix)), &positions);
        report.extents_written = write_sidecar(&dir.join(format!("{}wh.txt", prefix)), &extents.to_sidecar());
        Ok(report)
    }
}

/// Derive the output directory and file-name prefix for a batch export.
///
/// The base path, album path (or name) and prefix are joined, separators are
/// normalized to `/`, and the result is split after the last separator.
pub fn export_target(base: &str, album: &Album, prefix: &str, full_path: bool) -> (String, String) {
    let source = if full_path { &album.path } else { &album.name };
    let mut joined = format!("{}/{}/{}", base, source, prefix).replace('\\', "/");
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    let split = joined.rfind('/').map_or(0, |i| i + 1);
    let file_prefix = joined.split_off(split);
    (joined, file_prefix)
}

/// Append `_` to the directory name when a regular file already occupies it.
fn disambiguate(dir: String) -> String {
    let trimmed = dir.trim_end_matches('/');
    if !trimmed.is_empty() && Path::new(trimmed).is_file() {
        format!("{}_/", trimmed)
    } else {
        dir
    }
}

/// Create a sidecar file unless one exists. Errors are swallowed; returns
/// whether the file was written.
fn write_sidecar(path: &Path, contents: &str) -> bool {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    };
    write().is_ok()
}
