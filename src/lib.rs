//! voxtrain - VoxForge corpus preparation for CMU Sphinx training.
//!
//! Turns a directory of raw VoxForge speech submissions into a normalized,
//! deterministically partitioned training corpus: download, unpack, FLAC to
//! WAV conversion, feature-directory links, sorted train/test transcription
//! lists, a language model built from the full corpus, and a patched
//! `sphinx_train.cfg`. External tools (wget, tar, flac, IRSTLM, sphinxtrain)
//! are invoked as blocking subprocesses behind the [`tools::ToolRunner`]
//! trait.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod cli;
pub mod collect;
pub mod error;
pub mod layout;
pub mod partition;
pub mod patch;
pub mod stages;
pub mod tools;
pub mod transcription;

pub use error::{Result, TrainError};
pub use layout::PathLayout;
pub use stages::{Stage, Trainer};
pub use tools::{SystemToolRunner, ToolRunner};
pub use transcription::TranscriptionRecord;
