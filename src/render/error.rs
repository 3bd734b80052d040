use thiserror::Error;

use crate::failure::FailureKind;
use crate::molfile::MolfileError;
use crate::smiles::SmilesError;

/// Errors produced while turning structure data into an image.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid SMILES: {0}")]
    Smiles(#[from] SmilesError),

    #[error("invalid molfile: {0}")]
    Molfile(#[from] MolfileError),

    #[error("failed to build drawing: {0}")]
    Scene(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {size}x{size} canvas")]
    Canvas { size: u32 },

    #[error("drawing is blank")]
    Blank,
}

impl RenderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Smiles(_) | Self::Molfile(_) => FailureKind::Unparsable,
            Self::Scene(_) | Self::Canvas { .. } | Self::Blank => FailureKind::Degenerate,
        }
    }
}
