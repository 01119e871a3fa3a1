//! Text patching of the generated sphinxtrain configuration.
//!
//! The `setup` stage lets sphinxtrain generate `etc/sphinx_train.cfg`, then
//! overrides specific training parameters with an ordered list of literal
//! text substitutions. This is best-effort by contract: a rule whose match
//! text no longer appears (a newer sphinxtrain changed a default, or the file
//! was already patched) simply does not fire. Re-patching is therefore not
//! guaranteed to be idempotent.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// How a rule's match text is compared against a config line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole line (without its newline) must equal the match text.
    ExactLine,
    /// The match text may appear anywhere in the line; every occurrence is
    /// substituted.
    Substring,
}

/// One literal-text substitution. Replacements may span multiple lines.
#[derive(Debug, Clone, Copy)]
pub struct PatchRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub mode: MatchMode,
}

/// Apply `rules` to every line of the file at `path`, rewriting it in place.
///
/// Rules are applied in order to each line, mutating the line as they go, so
/// later rules see the text earlier rules substituted. Order is significant:
/// some replacements insert text that later rules must not re-match.
pub fn patch_file(path: &Path, rules: &[PatchRule]) -> Result<()> {
    let contents = fs::read_to_string(path)?;
    let patched = apply_rules(&contents, rules);
    fs::write(path, patched)?;
    Ok(())
}

/// Pure form of [`patch_file`], exposed for tests.
pub fn apply_rules(contents: &str, rules: &[PatchRule]) -> String {
    let mut out = String::with_capacity(contents.len());
    for line in contents.lines() {
        let mut line = line.to_string();
        for rule in rules {
            match rule.mode {
                MatchMode::ExactLine => {
                    if line == rule.pattern {
                        line = rule.replacement.to_string();
                    }
                }
                MatchMode::Substring => {
                    if line.contains(rule.pattern) {
                        line = line.replace(rule.pattern, rule.replacement);
                    }
                }
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// The fixed override set for `sphinx_train.cfg`.
///
/// Values follow the VoxForge full-corpus recipe: more Gaussian densities and
/// tied states than the sphinxtrain defaults, LDA/MLLT on, forced alignment
/// on, and a POSIX queue with twenty parts so feature extraction saturates
/// the machine.
pub const SPHINX_TRAIN_RULES: &[PatchRule] = &[
    PatchRule {
        pattern: "$CFG_VECTOR_LENGTH = 13;",
        replacement: "$CFG_VECTOR_LENGTH = 13;\n$CFG_FEAT_WINDOW = 0;",
        mode: MatchMode::ExactLine,
    },
    PatchRule {
        pattern: "$CFG_VARNORM = 'no';",
        replacement: "$CFG_VARNORM = 'no';\n\
            # (yes/no) Use letter-to-sound rules to guess pronunciations of\n\
            # unknown words (English, 40-phone specific)\n\
            $CFG_LTSOOV = 'no';",
        mode: MatchMode::ExactLine,
    },
    PatchRule {
        pattern: "$CFG_FINAL_NUM_DENSITIES = 8",
        replacement: "$CFG_FINAL_NUM_DENSITIES = 32",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_N_TIED_STATES = 200",
        replacement: "$CFG_N_TIED_STATES = 3000",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_NPART = 1",
        replacement: "$CFG_NPART = 20",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_LDA_MLLT = 'no'",
        replacement: "$CFG_LDA_MLLT = 'yes'",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_CONVERGENCE_RATIO = 0.1",
        replacement: "$CFG_CONVERGENCE_RATIO = 0.01",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_QUEUE_TYPE = \"Queue\"",
        replacement: "$CFG_QUEUE_TYPE = \"Queue::POSIX\"",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_MAKE_QUESTS = \"yes\"",
        replacement: "$CFG_MAKE_QUESTS = \"no\"",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_QUESTION_SET = \"${CFG_BASE_DIR}/model_architecture/${CFG_EXPTNAME}.tree_questions\";",
        replacement: "if ($CFG_MAKE_QUESTS eq  'yes') {\n\
            \x20 $CFG_QUESTION_SET = \"${CFG_BASE_DIR}/model_architecture/${CFG_EXPTNAME}.tree_questions\";\n\
            }\n\
            else {\n\
            \x20 $CFG_QUESTION_SET = \"${CFG_BASE_DIR}/etc/${CFG_EXPTNAME}.tree_questions\";\n\
            }",
        mode: MatchMode::ExactLine,
    },
    PatchRule {
        pattern: "$CFG_FORCEDALIGN = 'no'",
        replacement: "$CFG_FORCEDALIGN = 'yes'",
        mode: MatchMode::Substring,
    },
    PatchRule {
        pattern: "$CFG_FORCE_ALIGN_MODELDIR = \"$CFG_MODEL_DIR/$CFG_EXPTNAME.falign_ci_$CFG_DIRLABEL\";",
        replacement: "if ($CFG_FALIGN_CI_MGAU eq  'yes') {\n\
            \x20 $CFG_FORCE_ALIGN_MODELDIR = \"$CFG_MODEL_DIR/$CFG_EXPTNAME.falign_ci_${CFG_DIRLABEL}_$CFG_FINAL_NUM_DENSITIES\";\n\
            }\n\
            else {\n\
            \x20 $CFG_FORCE_ALIGN_MODELDIR = \"$CFG_MODEL_DIR/$CFG_EXPTNAME.falign_ci_$CFG_DIRLABEL\";\n\
            }",
        mode: MatchMode::ExactLine,
    },
];
