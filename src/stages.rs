//! Pipeline stages and the stage dispatcher.
//!
//! Each stage is a method on [`Trainer`], taking its paths from the
//! [`PathLayout`] and reaching external tools only through the injected
//! [`ToolRunner`]. Stages run strictly in sequence; composites abort on the
//! first failure. The filesystem is the only state carried between stages.

use crate::collect;
use crate::error::Result;
use crate::layout::PathLayout;
use crate::partition;
use crate::patch::{patch_file, SPHINX_TRAIN_RULES};
use crate::tools::ToolRunner;
use clap::ValueEnum;
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::os::unix::fs as unix_fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// VoxForge 16kHz/16bit submission archive mirror.
const DOWNLOAD_URL: &str =
    "http://www.repository.voxforge1.org/downloads/SpeechCorpus/Trunk/Audio/Main/16kHz_16bit";

/// IRSTLM wrapper script; invoked by absolute path like the upstream recipe.
const BUILD_LM_TOOL: &str = "/usr/bin/build-lm.sh";

/// Working directories (and the report file) sphinxtrain generates, removed
/// by the `clean` stage.
const CLEAN_DIRS: &[&str] = &[
    "bwaccumdir",
    "falignout",
    "feat",
    "model_architecture",
    "model_parameters",
    "qmanager",
    "result",
    "trees",
];

const FILLER_TEMPLATE: &str = include_str!("resources/template.filler");
const PHONE_TEMPLATE: &str = include_str!("resources/template.phone");
const TREE_QUESTIONS_TEMPLATE: &str = include_str!("resources/template.tree_questions");
const DICTIONARY_PATCH: &str = include_str!("resources/dic.patch");

/// Named pipeline stages selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Mirror the VoxForge submission archives
    Download,
    /// Extract every downloaded archive into the wav directory
    Unpack,
    /// Convert FLAC submissions to WAV
    #[value(alias = "convert-flac")]
    Convert,
    /// Create the mfc feature-directory links
    #[value(alias = "link-mfc")]
    Link,
    /// Collect PROMPTS files and write the train/test lists
    Transcript,
    /// Build the language model from the full transcription list
    #[value(alias = "build_lm")]
    BuildLm,
    /// Write bundled templates and the patched dictionary
    Templates,
    /// Generate and patch the sphinxtrain configuration
    Setup,
    /// Run sphinxtrain
    Run,
    /// Remove generated working directories
    Clean,
    /// unpack, convert, link, transcript, build-lm, templates, setup
    Configure,
    /// clean, configure, run
    #[value(alias = "do-all")]
    All,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Download => "download",
            Stage::Unpack => "unpack",
            Stage::Convert => "convert",
            Stage::Link => "link",
            Stage::Transcript => "transcript",
            Stage::BuildLm => "build-lm",
            Stage::Templates => "templates",
            Stage::Setup => "setup",
            Stage::Run => "run",
            Stage::Clean => "clean",
            Stage::Configure => "configure",
            Stage::All => "all",
        })
    }
}

/// Orchestrator binding a path layout to a tool runner.
pub struct Trainer<R: ToolRunner> {
    layout: PathLayout,
    runner: R,
    verbosity: u8,
}

impl<R: ToolRunner> Trainer<R> {
    pub fn new(layout: PathLayout, runner: R, verbosity: u8) -> Self {
        Self {
            layout,
            runner,
            verbosity,
        }
    }

    /// Dispatch one named stage.
    pub fn run_stage(&self, stage: Stage) -> Result<()> {
        if self.verbosity >= 1 {
            eprintln!("Running stage [{stage}]");
        }
        match stage {
            Stage::Download => self.download(),
            Stage::Unpack => self.unpack(),
            Stage::Convert => self.convert(),
            Stage::Link => self.link(),
            Stage::Transcript => self.transcript(),
            Stage::BuildLm => self.build_lm(),
            Stage::Templates => self.templates(),
            Stage::Setup => self.setup(),
            Stage::Run => self.run(),
            Stage::Clean => self.clean(),
            Stage::Configure => self.configure(),
            Stage::All => self.do_all(),
        }
    }

    /// Mirror the VoxForge archive tree into the base directory.
    pub fn download(&self) -> Result<()> {
        let base = self.layout.base_dir.to_string_lossy();
        self.runner.run(
            "wget",
            &["--mirror", "-P", &base, "-A", "tgz", "-np", DOWNLOAD_URL],
            None,
            &[],
        )
    }

    /// Extract every `.tgz` under the staging directory into the wav dir.
    ///
    /// A missing staging directory just means nothing was downloaded yet; a
    /// corrupt archive is fatal.
    pub fn unpack(&self) -> Result<()> {
        if !self.layout.staging_dir.is_dir() {
            if self.verbosity >= 1 {
                eprintln!("No downloaded archives found, nothing to unpack");
            }
            return Ok(());
        }
        let wav = self.layout.wav_dir.to_string_lossy();
        for entry in WalkDir::new(&self.layout.staging_dir) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "tgz")
            {
                let archive = entry.path().to_string_lossy();
                if self.verbosity >= 2 {
                    eprintln!("Extracting [{archive}]");
                }
                self.runner
                    .run("tar", &["-xzf", &archive, "-C", &wav], None, &[])?;
            }
        }
        Ok(())
    }

    /// Convert every FLAC submission to WAV.
    ///
    /// First pass creates a sibling `wav/` output directory next to each
    /// `flac/` directory, second pass converts the files. The first failed
    /// conversion aborts the stage.
    pub fn convert(&self) -> Result<()> {
        for entry in WalkDir::new(&self.layout.wav_dir) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == "flac" {
                if let Some(parent) = entry.path().parent() {
                    fs::create_dir_all(parent.join("wav"))?;
                }
            }
        }

        for entry in WalkDir::new(&self.layout.wav_dir) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "flac")
            {
                let outfile = converted_path(entry.path());
                let infile = entry.path().to_string_lossy();
                let outfile = outfile.to_string_lossy();
                if self.verbosity >= 2 {
                    eprintln!("Converting [{infile}]");
                }
                self.runner
                    .run("flac", &["-f", "-s", "-d", &infile, "-o", &outfile], None, &[])?;
            }
        }
        Ok(())
    }

    /// Create the `mfc -> wav` feature-directory link beside every converted
    /// audio directory. An existing link counts as success.
    pub fn link(&self) -> Result<()> {
        for entry in WalkDir::new(&self.layout.wav_dir) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == "wav" {
                if let Some(parent) = entry.path().parent() {
                    match unix_fs::symlink("wav", parent.join("mfc")) {
                        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                        other => other?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Collect all PROMPTS entries and write the partitioned list files.
    pub fn transcript(&self) -> Result<()> {
        let records = collect::collect(&self.layout.wav_dir, self.verbosity)?;
        if self.verbosity >= 1 {
            eprintln!("Collected {} transcriptions", records.len());
        }
        partition::write_partitions(&records, &self.layout)
    }

    /// Build the decoder language model from the full transcription list.
    ///
    /// Stale artifacts are removed first so a failed build cannot leave the
    /// previous model looking current.
    pub fn build_lm(&self) -> Result<()> {
        remove_file_if_exists(&self.layout.lm)?;
        remove_file_if_exists(&self.layout.lm_gz)?;
        remove_file_if_exists(&self.layout.lm_dmp)?;

        let transcription = self.layout.transcription.to_string_lossy();
        let lm = self.layout.lm.to_string_lossy();
        self.runner.run(
            BUILD_LM_TOOL,
            &["-i", &transcription, "-o", &lm],
            None,
            &[("IRSTLM", "/usr")],
        )?;

        // build-lm.sh gzips its output; inflate it into the plain .lm file
        let mut decoder = GzDecoder::new(File::open(&self.layout.lm_gz)?);
        let mut plain = File::create(&self.layout.lm)?;
        io::copy(&mut decoder, &mut plain)?;

        let lm_dmp = self.layout.lm_dmp.to_string_lossy();
        self.runner
            .run("sphinx_lm_convert", &["-i", &lm, "-o", &lm_dmp], None, &[])
    }

    /// Write the bundled filler/phone/tree-questions templates, then install
    /// the patched pronunciation dictionary.
    pub fn templates(&self) -> Result<()> {
        fs::write(&self.layout.filler, FILLER_TEMPLATE)?;
        fs::write(&self.layout.phone, PHONE_TEMPLATE)?;
        fs::write(&self.layout.tree_questions, TREE_QUESTIONS_TEMPLATE)?;

        fs::copy(&self.layout.installed_dictionary, &self.layout.dictionary)?;

        let patch_path = self.layout.etc_dir.join("dic.patch");
        fs::write(&patch_path, DICTIONARY_PATCH)?;
        let dictionary = self.layout.dictionary.to_string_lossy();
        let patch = patch_path.to_string_lossy();
        self.runner.run("patch", &[&dictionary, &patch], None, &[])
    }

    /// Generate the sphinxtrain configuration, then apply the override rules.
    pub fn setup(&self) -> Result<()> {
        self.runner.run(
            "sphinxtrain",
            &["-t", &self.layout.corpus_name, "setup"],
            Some(&self.layout.base_dir),
            &[],
        )?;
        patch_file(&self.layout.train_config, SPHINX_TRAIN_RULES)
    }

    /// Run the sphinxtrain training schedule.
    pub fn run(&self) -> Result<()> {
        self.runner
            .run("sphinxtrain", &["run"], Some(&self.layout.base_dir), &[])
    }

    /// Remove generated working directories and the training report.
    /// Already-clean directories are success.
    pub fn clean(&self) -> Result<()> {
        for dir in CLEAN_DIRS {
            remove_dir_if_exists(&self.layout.base_dir.join(dir))?;
        }
        remove_file_if_exists(&self.layout.report)
    }

    /// unpack → convert → link → transcript → build_lm → templates → setup.
    pub fn configure(&self) -> Result<()> {
        self.unpack()?;
        self.convert()?;
        self.link()?;
        self.transcript()?;
        self.build_lm()?;
        self.templates()?;
        self.setup()
    }

    /// clean → configure → run.
    pub fn do_all(&self) -> Result<()> {
        self.clean()?;
        self.configure()?;
        self.run()
    }
}

/// Output path for a converted file: every `flac` path component becomes
/// `wav`, as does the extension.
fn converted_path(input: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in input.components() {
        if component.as_os_str() == "flac" {
            out.push("wav");
        } else {
            out.push(component);
        }
    }
    out.set_extension("wav");
    out
}

fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => Ok(other?),
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => Ok(other?),
    }
}
