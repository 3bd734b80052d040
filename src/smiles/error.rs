use std::fmt;

use crate::kekulize::KekulizeError;
use crate::valence::ValenceError;

/// Errors produced when parsing a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmilesError {
    /// The input string was empty or contained only whitespace.
    EmptyInput,
    /// A character outside the supported grammar was found.
    UnexpectedChar { pos: usize, ch: char },
    /// A bracket atom names no known element.
    InvalidElement { pos: usize, text: String },
    /// A bracket atom `[` was opened but never closed with `]`.
    UnclosedBracket { pos: usize },
    /// A ring-bond digit was opened and never closed.
    UnclosedRing { digit: u16 },
    /// A ring-bond digit appeared before any atom.
    InvalidRingBond { digit: u16, pos: usize },
    /// Both ends of a ring closure name different bond types.
    RingBondConflict { digit: u16 },
    /// A parenthesis without its partner.
    UnmatchedParen { pos: usize },
    /// A bracket-atom charge does not fit in an `i8`.
    InvalidCharge { pos: usize },
    /// A bracket-atom isotope does not fit in a `u16`.
    InvalidIsotope { pos: usize },
    /// An atom class (`:n`) does not fit in a `u16`.
    InvalidAtomClass { pos: usize },
    /// No Kekulé structure exists for the aromatic system.
    Kekulize(KekulizeError),
    /// An atom has more bonds than its element allows.
    Valence(ValenceError),
}

impl fmt::Display for SmilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty SMILES string"),
            Self::UnexpectedChar { pos, ch } => {
                write!(f, "unexpected character '{ch}' at position {pos}")
            }
            Self::InvalidElement { pos, text } => {
                write!(f, "invalid element '{text}' at position {pos}")
            }
            Self::UnclosedBracket { pos } => {
                write!(f, "unclosed bracket atom starting at position {pos}")
            }
            Self::UnclosedRing { digit } => write!(f, "unclosed ring {digit}"),
            Self::InvalidRingBond { digit, pos } => {
                write!(f, "ring bond {digit} at position {pos} has no preceding atom")
            }
            Self::RingBondConflict { digit } => {
                write!(f, "conflicting bond types on ring closure {digit}")
            }
            Self::UnmatchedParen { pos } => write!(f, "unmatched parenthesis at position {pos}"),
            Self::InvalidCharge { pos } => write!(f, "charge overflow in atom at position {pos}"),
            Self::InvalidIsotope { pos } => write!(f, "isotope overflow in atom at position {pos}"),
            Self::InvalidAtomClass { pos } => {
                write!(f, "atom class overflow in atom at position {pos}")
            }
            Self::Kekulize(e) => write!(f, "{e}"),
            Self::Valence(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SmilesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Kekulize(e) => Some(e),
            Self::Valence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KekulizeError> for SmilesError {
    fn from(e: KekulizeError) -> Self {
        Self::Kekulize(e)
    }
}

impl From<ValenceError> for SmilesError {
    fn from(e: ValenceError) -> Self {
        Self::Valence(e)
    }
}
