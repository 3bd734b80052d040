use thiserror::Error;

use crate::kekulize::KekulizeError;
use crate::valence::ValenceError;

/// Errors produced when reading a V2000 molfile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MolfileError {
    #[error("molfile is empty")]
    Empty,

    #[error("failed to parse molfile: {details} (at line {line})")]
    Parse { line: usize, details: String },

    #[error("V3000 molfiles are not supported (at line {line})")]
    UnsupportedVersion { line: usize },

    #[error(transparent)]
    Kekulize(#[from] KekulizeError),

    #[error(transparent)]
    Valence(#[from] ValenceError),
}

impl MolfileError {
    pub(crate) fn parse(line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            line,
            details: details.into(),
        }
    }
}
