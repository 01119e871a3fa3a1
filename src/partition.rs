//! Deterministic train/test partitioning of the sorted record set.
//!
//! Every tenth record by sorted position (0-based, so including the first)
//! is held out for testing. Because the input is globally sorted, the split
//! is a pure function of the record set and re-runs are byte-for-byte
//! reproducible.

use crate::error::Result;
use crate::layout::PathLayout;
use crate::transcription::TranscriptionRecord;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Sorted index `i` belongs to the test set iff `i % 10 == 0`.
pub fn is_test_index(index: usize) -> bool {
    index % 10 == 0
}

/// Write the five derived list files for the sorted record sequence.
///
/// Output files are created fresh on every call; stale entries from a prior
/// run never survive. Buffered writers are flushed explicitly so write
/// failures surface as errors instead of being lost on drop.
pub fn write_partitions(records: &[TranscriptionRecord], layout: &PathLayout) -> Result<()> {
    let mut transcription = BufWriter::new(File::create(&layout.transcription)?);
    let mut train_fileids = BufWriter::new(File::create(&layout.train_fileids)?);
    let mut train_transcription = BufWriter::new(File::create(&layout.train_transcription)?);
    let mut test_fileids = BufWriter::new(File::create(&layout.test_fileids)?);
    let mut test_transcription = BufWriter::new(File::create(&layout.test_transcription)?);

    for (idx, record) in records.iter().enumerate() {
        // The complete transcription feeds the language-model builder
        writeln!(transcription, "{record}")?;

        if is_test_index(idx) {
            writeln!(test_fileids, "{}", record.file_id())?;
            writeln!(test_transcription, "{record}")?;
        } else {
            writeln!(train_fileids, "{}", record.file_id())?;
            writeln!(train_transcription, "{record}")?;
        }
    }

    transcription.flush()?;
    train_fileids.flush()?;
    train_transcription.flush()?;
    test_fileids.flush()?;
    test_transcription.flush()?;
    Ok(())
}
