//! Parsing and ordering of PROMPTS lines.
//!
//! A PROMPTS line maps one recording to its spoken text:
//!
//! ```text
//! spk1/a1 Hello-World
//! ```
//!
//! The rendered form `<s> hello world </s> (a1)` is the exact line format the
//! language-model builder and the transcription files require. Records order
//! by that rendered form, so the train/test partition depends only on the
//! record set and never on filesystem iteration order.

use crate::error::{Result, TrainError};
use std::cmp::Ordering;
use std::fmt;

/// One parsed, normalized PROMPTS entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRecord {
    utterance: String,
    base_filename: String,
    file_id: String,
    rendered: String,
}

impl TranscriptionRecord {
    /// Parse one raw PROMPTS line from the given speaker directory.
    ///
    /// The text is normalized (trailing newline stripped, hyphens to spaces,
    /// lowercased). A line whose file-id segment contains no digit is a
    /// header or separator, not an utterance, and is rejected.
    pub fn parse(line: &str, speaker_dir: &str) -> Result<Self> {
        let invalid = || TrainError::InvalidPromptsLine {
            line: line.trim_end().to_string(),
            dir: speaker_dir.to_string(),
        };

        let (fileid_raw, quote_raw) = line.split_once(' ').ok_or_else(invalid)?;

        let utterance = quote_raw
            .trim_end_matches(['\n', '\r'])
            .replace('-', " ")
            .to_lowercase();

        // rsplit always yields at least one segment
        let base_filename = fileid_raw
            .rsplit('/')
            .next()
            .unwrap_or(fileid_raw)
            .to_string();
        if !base_filename.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let file_id = format!("{speaker_dir}/mfc/{base_filename}");
        let rendered = format!("<s> {utterance} </s> ({base_filename})");

        Ok(Self {
            utterance,
            base_filename,
            file_id,
            rendered,
        })
    }

    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    pub fn base_filename(&self) -> &str {
        &self.base_filename
    }

    /// Feature-file identifier: `<speaker>/mfc/<base_filename>`.
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Canonical `<s> utterance </s> (base_filename)` line.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for TranscriptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl Ord for TranscriptionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rendered.cmp(&other.rendered)
    }
}

impl PartialOrd for TranscriptionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
