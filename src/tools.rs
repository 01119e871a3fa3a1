//! External tool invocation with testable command execution.
//!
//! Every external collaborator (wget, tar, flac, the IRSTLM build script,
//! sphinx_lm_convert, sphinxtrain, patch) is reached through the narrow
//! `ToolRunner` trait, so the orchestrator can be exercised in tests without
//! running real binaries.

use crate::error::{Result, TrainError};
use std::path::Path;
use std::process::Command;

/// Capability trait for running one external tool to completion.
pub trait ToolRunner {
    /// Run `program` with `args`, optionally in `cwd` and with extra
    /// environment variables, blocking until it exits.
    ///
    /// A non-zero exit status is an error; stdout/stderr are inherited so
    /// long-running tools stay visible to the user.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        env: &[(&str, &str)],
    ) -> Result<()>;
}

/// Production runner using `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemToolRunner {
    verbosity: u8,
}

impl SystemToolRunner {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl ToolRunner for SystemToolRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        env: &[(&str, &str)],
    ) -> Result<()> {
        if self.verbosity >= 2 {
            eprintln!("+ {program} {}", args.join(" "));
        }

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        for (key, value) in env {
            command.env(key, value);
        }

        let status = command.status().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TrainError::ToolNotFound {
                    tool: program.to_string(),
                }
            } else {
                TrainError::ToolFailed {
                    tool: program.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        if !status.success() {
            return Err(TrainError::ToolFailed {
                tool: program.to_string(),
                detail: status.to_string(),
            });
        }
        Ok(())
    }
}
