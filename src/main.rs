use clap::Parser;
use miette::Result;
use spritepak::cli::{Cli, Commands};
use spritepak::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new(cli.verbose);

    match cli.command {
        Commands::Info(args) => spritepak::cli::info::run(args, &printer)?,
        Commands::Export(args) => spritepak::cli::export::run(args, &printer)?,
        Commands::Convert(args) => spritepak::cli::convert::run(args, &printer)?,
        Commands::Pack(args) => spritepak::cli::pack::run(args, &printer)?,
        Commands::Completions(args) => spritepak::cli::completions::run(args)?,
    }

    Ok(())
}
