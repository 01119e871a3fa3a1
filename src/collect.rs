//! Corpus collection: speaker directories to sorted transcription records.

use crate::error::Result;
use crate::transcription::TranscriptionRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Collect every parseable PROMPTS entry under `wav_dir`.
///
/// Each immediate subdirectory of `wav_dir` is one speaker submission holding
/// `etc/PROMPTS`. Speakers without a PROMPTS file are skipped; malformed
/// lines are dropped. Neither aborts the collection — both are reported on
/// stderr when `verbosity >= 1`.
///
/// The returned records are sorted by rendered form, so downstream
/// partitioning is independent of directory iteration order.
pub fn collect(wav_dir: &Path, verbosity: u8) -> Result<Vec<TranscriptionRecord>> {
    let mut records = Vec::new();

    for entry in wav_dir.read_dir()? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let speaker = entry.file_name().to_string_lossy().into_owned();
        let prompts = entry.path().join("etc").join("PROMPTS");

        if !prompts.is_file() {
            if verbosity >= 1 {
                eprintln!("Directory [{speaker}] had no PROMPTS file, skipping");
            }
            continue;
        }

        let reader = BufReader::new(File::open(&prompts)?);
        for line in reader.lines() {
            let line = line?;
            match TranscriptionRecord::parse(&line, &speaker) {
                Ok(record) => records.push(record),
                Err(e) => {
                    if verbosity >= 1 {
                        eprintln!("{e}");
                    }
                }
            }
        }
    }

    records.sort();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn add_speaker(wav_dir: &Path, name: &str, prompts: &str) {
        let etc = wav_dir.join(name).join("etc");
        fs::create_dir_all(&etc).unwrap();
        fs::write(etc.join("PROMPTS"), prompts).unwrap();
    }

    #[test]
    fn test_collects_valid_lines_and_drops_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        add_speaker(
            tmp.path(),
            "spk1",
            "spk1/a1 Hello-World\nspk1/b2 Goodbye\nheader_no_digit bad\n",
        );

        let records = collect(tmp.path(), 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rendered(), "<s> goodbye </s> (b2)");
        assert_eq!(records[1].rendered(), "<s> hello world </s> (a1)");
    }

    #[test]
    fn test_speaker_without_prompts_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        add_speaker(tmp.path(), "spk1", "spk1/a1 hello\n");
        fs::create_dir_all(tmp.path().join("empty_speaker")).unwrap();

        let records = collect(tmp.path(), 0).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_regular_files_in_wav_dir_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        add_speaker(tmp.path(), "spk1", "spk1/a1 hello\n");
        fs::write(tmp.path().join("stray.tgz"), b"junk").unwrap();

        let records = collect(tmp.path(), 0).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_result_is_globally_sorted_across_speakers() {
        let tmp = tempfile::tempdir().unwrap();
        // Insertion order intentionally reversed relative to sort order
        add_speaker(tmp.path(), "zz_last", "z/a1 apple\n");
        add_speaker(tmp.path(), "aa_first", "a/b2 zebra\n");

        let records = collect(tmp.path(), 0).unwrap();
        let rendered: Vec<_> = records.iter().map(|r| r.rendered()).collect();
        assert_eq!(
            rendered,
            vec!["<s> apple </s> (a1)", "<s> zebra </s> (b2)"]
        );
    }

    #[test]
    fn test_rerun_on_unchanged_corpus_is_identical() {
        let tmp = tempfile::tempdir().unwrap();
        add_speaker(tmp.path(), "spk1", "spk1/a1 one\nspk1/b2 two\n");
        add_speaker(tmp.path(), "spk2", "spk2/c3 three\n");

        let first = collect(tmp.path(), 0).unwrap();
        let second = collect(tmp.path(), 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_wav_dir_yields_no_records() {
        let tmp = tempfile::tempdir().unwrap();
        let records = collect(tmp.path(), 0).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_wav_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = collect(&tmp.path().join("nope"), 0);
        assert!(result.is_err());
    }
}
