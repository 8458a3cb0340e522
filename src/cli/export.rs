//! Export command implementation.
//!
//! Decodes entities of a container to PNG files, either a single entity to a
//! given file or a batch into a derived directory with position sidecars.

use std::path::PathBuf;

use clap::Args;

use crate::codec::Codec;
use crate::error::Result;
use crate::export::{EffectChain, ExportCommand, ExportMode, ExportOptions, ExportReport, Numbering};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};

/// Export entities to PNG files
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Container file to export from
    #[arg(required = true)]
    pub file: PathBuf,

    /// Entity indices to export (comma separated; negative values are skipped)
    #[arg(long, short, value_delimiter = ',', allow_negative_numbers = true)]
    pub index: Vec<i64>,

    /// Write the first requested entity to this file instead of a batch
    #[arg(long)]
    pub single: Option<PathBuf>,

    /// Base output directory (default: manifest output)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// File-name prefix; may contain sub-directories
    #[arg(long)]
    pub prefix: Option<String>,

    /// Zero-pad file names to this many digits
    #[arg(long)]
    pub digits: Option<usize>,

    /// Number files from this value instead of the entity index
    #[arg(long)]
    pub increment: Option<u32>,

    /// Use the container's full path in the output directory
    #[arg(long)]
    pub full_path: bool,

    /// Export every entity
    #[arg(long)]
    pub all: bool,

    /// Post-processing effect (canvas, dodge, scale:N, background:#RRGGBB); repeatable
    #[arg(long = "effect")]
    pub effects: Vec<String>,
}

/// Merge command-line flags over manifest defaults.
pub fn build_options(args: &ExportArgs, manifest: &Manifest) -> Result<ExportOptions> {
    if let Some(dest) = &args.single {
        return Ok(ExportOptions {
            mode: ExportMode::Single,
            indices: args.index.clone(),
            destination: dest.to_string_lossy().into_owned(),
            ..ExportOptions::default()
        });
    }

    let effects = if args.effects.is_empty() {
        manifest.effect_chain()?
    } else {
        EffectChain::parse(&args.effects)?
    };
    let numbering = match args.increment {
        Some(start) => Numbering::Increment(start),
        None => manifest.numbering(),
    };
    let output = args.output.clone().unwrap_or_else(|| manifest.output.clone());

    Ok(ExportOptions {
        mode: ExportMode::Batch,
        indices: args.index.clone(),
        destination: output.to_string_lossy().into_owned(),
        prefix: args.prefix.clone().unwrap_or_else(|| manifest.prefix.clone()),
        numbering,
        digits: args.digits.unwrap_or(manifest.digits),
        full_path: args.full_path || manifest.full_path,
        all: args.all || manifest.all || args.index.is_empty(),
        effects,
    })
}

pub fn run(args: ExportArgs, printer: &Printer) -> Result<()> {
    let manifest = Manifest::discover(&std::env::current_dir()?)?;
    let options = build_options(&args, &manifest)?;
    printer.verbose(
        "Options",
        &format!(
            "{:?} mode, {} requested, {} effects",
            options.mode,
            plural(options.indices.len(), "index", "indices"),
            options.effects.len()
        ),
    );

    let codec = Codec::default();
    let mut album = super::load_album(&codec, &args.file, printer)?;
    let mode = options.mode;
    let report = ExportCommand::new(&codec, options).run(&mut album)?;
    print_report(&report, mode, printer);

    Ok(())
}

fn print_report(report: &ExportReport, mode: ExportMode, printer: &Printer) {
    for path in &report.images {
        printer.verbose("Wrote", &display_path(path));
    }
    printer.status(
        "Exported",
        &format!(
            "{} to {}",
            plural(report.images.len(), "image", "images"),
            printer.path(&report.directory)
        ),
    );
    if mode == ExportMode::Batch {
        if !report.positions_written {
            printer.warning("Kept", "existing position log (or it could not be written)");
        }
        if !report.extents_written {
            printer.warning("Kept", "existing extents file (or it could not be written)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            file: PathBuf::from("body.img"),
            index: vec![],
            single: None,
            output: None,
            prefix: None,
            digits: None,
            increment: None,
            full_path: false,
            all: false,
            effects: vec![],
        }
    }

    #[test]
    fn test_manifest_defaults_apply() {
        let manifest = Manifest::parse("output: out\ndigits: 3\nincrement: 5\neffects: [canvas]").unwrap();
        let mut a = args();
        a.index = vec![0, 1];

        let options = build_options(&a, &manifest).unwrap();
        assert_eq!(options.mode, ExportMode::Batch);
        assert_eq!(options.destination, "out");
        assert_eq!(options.digits, 3);
        assert_eq!(options.numbering, Numbering::Increment(5));
        assert_eq!(options.effects.len(), 1);
        assert!(!options.all);
    }

    #[test]
    fn test_flags_override_manifest() {
        let manifest = Manifest::parse("digits: 3\nprefix: a_").unwrap();
        let mut a = args();
        a.index = vec![2];
        a.digits = Some(1);
        a.prefix = Some("b_".to_string());
        a.effects = vec!["scale:2".to_string(), "dodge".to_string()];

        let options = build_options(&a, &manifest).unwrap();
        assert_eq!(options.digits, 1);
        assert_eq!(options.prefix, "b_");
        assert_eq!(options.effects.len(), 2);
        assert_eq!(options.numbering, Numbering::Original);
    }

    #[test]
    fn test_no_indices_means_all() {
        let options = build_options(&args(), &Manifest::default()).unwrap();
        assert!(options.all);
    }

    #[test]
    fn test_single_mode() {
        let mut a = args();
        a.single = Some(PathBuf::from("one.png"));
        a.index = vec![4];

        let options = build_options(&a, &Manifest::default()).unwrap();
        assert_eq!(options.mode, ExportMode::Single);
        assert_eq!(options.indices, vec![4]);
        assert_eq!(options.destination, "one.png");
    }

    #[test]
    fn test_parses_negative_indices() {
        use clap::Parser;

        let cli = crate::cli::Cli::try_parse_from(["spritepak", "export", "a.img", "-i", "0,-1,2"]).unwrap();
        match cli.command {
            crate::cli::Commands::Export(a) => assert_eq!(a.index, vec![0, -1, 2]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
