//! On-disk path layout for a training corpus.
//!
//! `PathLayout` is a pure value object: every path the pipeline touches is
//! derived once from the base directory and corpus name. Constructing it also
//! guarantees that the base, wav and etc directories exist.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Corpus name used when none is given on the command line.
pub const DEFAULT_CORPUS_NAME: &str = "voxforge_en_sphinx";

/// Dictionary shipped with pocketsphinx, copied into the corpus by the
/// `templates` stage.
pub const DEFAULT_INSTALLED_DICTIONARY: &str =
    "/usr/share/pocketsphinx/model/lm/en_US/cmu07a.dic";

/// Directory wget mirrors the VoxForge archives into, relative to the base.
const STAGING_DIR_NAME: &str = "www.repository.voxforge1.org";

/// All file and directory paths derived from `(base_dir, corpus_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLayout {
    pub corpus_name: String,
    pub base_dir: PathBuf,
    pub wav_dir: PathBuf,
    pub etc_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub transcription: PathBuf,
    pub train_fileids: PathBuf,
    pub train_transcription: PathBuf,
    pub test_fileids: PathBuf,
    pub test_transcription: PathBuf,
    pub lm: PathBuf,
    pub lm_gz: PathBuf,
    pub lm_dmp: PathBuf,
    pub dictionary: PathBuf,
    pub filler: PathBuf,
    pub tree_questions: PathBuf,
    pub phone: PathBuf,
    pub train_config: PathBuf,
    pub report: PathBuf,
    pub installed_dictionary: PathBuf,
}

impl PathLayout {
    /// Derive the layout and ensure the base, wav and etc directories exist.
    ///
    /// Directory creation tolerates "already exists"; any other filesystem
    /// failure is returned as an I/O error.
    pub fn new(
        base_dir: &Path,
        corpus_name: &str,
        installed_dictionary: &Path,
    ) -> Result<Self> {
        let etc_dir = base_dir.join("etc");
        let layout = Self {
            corpus_name: corpus_name.to_string(),
            base_dir: base_dir.to_path_buf(),
            wav_dir: base_dir.join("wav"),
            staging_dir: base_dir.join(STAGING_DIR_NAME),
            transcription: etc_dir.join(format!("{corpus_name}.transcription")),
            train_fileids: etc_dir.join(format!("{corpus_name}_train.fileids")),
            train_transcription: etc_dir.join(format!("{corpus_name}_train.transcription")),
            test_fileids: etc_dir.join(format!("{corpus_name}_test.fileids")),
            test_transcription: etc_dir.join(format!("{corpus_name}_test.transcription")),
            lm: etc_dir.join(format!("{corpus_name}.lm")),
            lm_gz: etc_dir.join(format!("{corpus_name}.lm.gz")),
            lm_dmp: etc_dir.join(format!("{corpus_name}.lm.DMP")),
            dictionary: etc_dir.join(format!("{corpus_name}.dic")),
            filler: etc_dir.join(format!("{corpus_name}.filler")),
            tree_questions: etc_dir.join(format!("{corpus_name}.tree_questions")),
            phone: etc_dir.join(format!("{corpus_name}.phone")),
            train_config: etc_dir.join("sphinx_train.cfg"),
            report: base_dir.join(format!("{corpus_name}.html")),
            installed_dictionary: installed_dictionary.to_path_buf(),
            etc_dir,
        };

        // create_dir_all treats an existing directory as success
        fs::create_dir_all(&layout.base_dir)?;
        fs::create_dir_all(&layout.wav_dir)?;
        fs::create_dir_all(&layout.etc_dir)?;

        Ok(layout)
    }

    /// Derive the layout with the default corpus name and dictionary.
    pub fn with_defaults(base_dir: &Path) -> Result<Self> {
        Self::new(
            base_dir,
            DEFAULT_CORPUS_NAME,
            Path::new(DEFAULT_INSTALLED_DICTIONARY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_in(dir: &Path) -> PathLayout {
        PathLayout::new(dir, "testcorpus", Path::new("/usr/share/dict/words")).unwrap()
    }

    #[test]
    fn test_creates_base_wav_etc_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("corpus");
        let layout = layout_in(&base);

        assert!(layout.base_dir.is_dir());
        assert!(layout.wav_dir.is_dir());
        assert!(layout.etc_dir.is_dir());
    }

    #[test]
    fn test_construction_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("corpus");
        let first = layout_in(&base);
        let second = layout_in(&base);
        assert_eq!(first, second);
    }

    #[test]
    fn test_derived_file_names() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout_in(tmp.path());
        let etc = tmp.path().join("etc");

        assert_eq!(layout.transcription, etc.join("testcorpus.transcription"));
        assert_eq!(layout.train_fileids, etc.join("testcorpus_train.fileids"));
        assert_eq!(
            layout.train_transcription,
            etc.join("testcorpus_train.transcription")
        );
        assert_eq!(layout.test_fileids, etc.join("testcorpus_test.fileids"));
        assert_eq!(
            layout.test_transcription,
            etc.join("testcorpus_test.transcription")
        );
        assert_eq!(layout.lm, etc.join("testcorpus.lm"));
        assert_eq!(layout.lm_gz, etc.join("testcorpus.lm.gz"));
        assert_eq!(layout.lm_dmp, etc.join("testcorpus.lm.DMP"));
        assert_eq!(layout.dictionary, etc.join("testcorpus.dic"));
        assert_eq!(layout.filler, etc.join("testcorpus.filler"));
        assert_eq!(layout.tree_questions, etc.join("testcorpus.tree_questions"));
        assert_eq!(layout.phone, etc.join("testcorpus.phone"));
        assert_eq!(layout.train_config, etc.join("sphinx_train.cfg"));
        assert_eq!(layout.report, tmp.path().join("testcorpus.html"));
        assert_eq!(
            layout.staging_dir,
            tmp.path().join("www.repository.voxforge1.org")
        );
    }

    #[test]
    fn test_with_defaults_uses_default_names() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = PathLayout::with_defaults(tmp.path()).unwrap();
        assert_eq!(layout.corpus_name, DEFAULT_CORPUS_NAME);
        assert_eq!(
            layout.installed_dictionary,
            Path::new(DEFAULT_INSTALLED_DICTIONARY)
        );
        assert!(layout
            .transcription
            .ends_with("etc/voxforge_en_sphinx.transcription"));
    }

    #[test]
    fn test_creation_failure_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the base directory should go
        let blocker = tmp.path().join("blocked");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let result = PathLayout::new(&blocker, "x", Path::new("/dev/null"));
        assert!(result.is_err());
    }
}
