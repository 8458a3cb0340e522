//! Convert command implementation.
//!
//! Re-encodes a container as another format version.

use std::path::PathBuf;

use clap::Args;

use crate::codec::Codec;
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::types::Version;

/// Re-encode a container as another version
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Container file to convert
    #[arg(required = true)]
    pub input: PathBuf,

    /// Target version (legacy, ver1, ver2, ver4)
    #[arg(long)]
    pub to: Version,

    /// Output file
    #[arg(long, short)]
    pub output: PathBuf,
}

pub fn run(args: ConvertArgs, printer: &Printer) -> Result<()> {
    let codec = Codec::default();
    let mut album = super::load_album(&codec, &args.input, printer)?;
    let from = album.version;

    codec.convert(&mut album, args.to)?;
    if !album.palette.is_empty() {
        printer.verbose("Palette", &format!("{} colours", album.palette.len()));
    }
    codec.save_file(&mut album, &args.output)?;

    printer.status(
        "Converted",
        &format!("{} -> {} ({})", from, args.to, display_path(&args.output)),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::sample_album;
    use tempfile::tempdir;

    #[test]
    fn test_convert_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.img");
        let output = dir.path().join("out.img");
        let codec = Codec::default();
        let mut album = sample_album(Version::Ver2);
        codec.save_file(&mut album, &input).unwrap();

        let args = ConvertArgs {
            input,
            to: Version::Ver4,
            output: output.clone(),
        };
        run(args, &Printer::new(false)).unwrap();

        let converted = codec.load_file(&output).unwrap();
        assert_eq!(converted.version, Version::Ver4);
        assert_eq!(converted.len(), 4);
        assert!(!converted.palette.is_empty());
    }

    #[test]
    fn test_convert_to_unregistered_version_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.img");
        let codec = Codec::default();
        let mut album = sample_album(Version::Ver2);
        codec.save_file(&mut album, &input).unwrap();

        let args = ConvertArgs {
            input,
            to: Version::Ver6,
            output: dir.path().join("out.img"),
        };
        assert!(run(args, &Printer::new(false)).is_err());
    }
}
