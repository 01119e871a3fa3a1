//! Command-line interface for voxtrain
//!
//! Provides argument parsing using clap derive macros.

use crate::layout;
use crate::stages::Stage;
use clap::Parser;
use std::path::PathBuf;

/// Prepare a VoxForge speech corpus for CMU Sphinx training
#[derive(Parser, Debug)]
#[command(
    name = "voxtrain",
    version,
    about = "Prepare a VoxForge speech corpus for CMU Sphinx training"
)]
pub struct Cli {
    /// Pipeline stage to run
    #[arg(value_enum, value_name = "COMMAND")]
    pub command: Stage,

    /// Verbose output (-v: stage progress, -vv: per-file detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base directory for the training corpus (default: current directory)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Corpus name used for the derived file names under etc/
    #[arg(long, value_name = "NAME", default_value = layout::DEFAULT_CORPUS_NAME)]
    pub corpus: String,

    /// Installed pocketsphinx dictionary copied into the corpus
    #[arg(long, value_name = "PATH", default_value = layout::DEFAULT_INSTALLED_DICTIONARY)]
    pub dictionary: PathBuf,
}
