use anyhow::Result;
use clap::Parser;
use voxtrain::cli::Cli;
use voxtrain::layout::PathLayout;
use voxtrain::stages::Trainer;
use voxtrain::tools::SystemToolRunner;

fn main() -> Result<()> {
    // Interactive interruption is a clean exit, not a failure
    ctrlc::set_handler(|| std::process::exit(0))?;

    let cli = Cli::parse();

    let base_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if cli.verbose >= 1 {
        eprintln!("Preparing training folder at [{}]", base_dir.display());
    }

    let layout = PathLayout::new(&base_dir, &cli.corpus, &cli.dictionary)?;
    let trainer = Trainer::new(layout, SystemToolRunner::new(cli.verbose), cli.verbose);

    trainer.run_stage(cli.command)?;
    Ok(())
}
