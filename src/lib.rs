//! Structure lookup and normalized 2D depictions for psychoactive substances.
//!
//! [`Resolver`] turns a substance name or database URL into a molfile;
//! [`Renderer`] turns a molfile or SMILES string into a cropped, fixed-width
//! RGB image.

pub mod atom;
pub mod bond;
pub mod element;
pub mod failure;
pub mod graph_ops;
pub mod kekulize;
pub mod layout;
pub mod mol;
pub mod molfile;
pub mod render;
pub mod resolve;
pub mod rings;
pub mod smiles;
pub mod traits;
pub mod valence;
pub mod wrappers;

pub use atom::Atom;
pub use bond::{Bond, BondOrder, BondStereo, SmilesBond, SmilesBondOrder};
pub use element::Element;
pub use failure::FailureKind;
pub use kekulize::{kekulize, KekulizeError};
pub use layout::{generate_coordinates, reflect, straighten};
pub use mol::{Mol, ParsedMolecule};
pub use molfile::{read_molfile, MolfileError};
pub use render::{BackgroundColor, RenderError, RenderStyle, Renderer};
pub use resolve::{RemoteStructureId, ResolveError, Resolver, ResolverConfig};
pub use rings::RingInfo;
pub use smiles::{from_smiles, parse_smiles, SmilesError};
pub use traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasBondStereo, HasFormalCharge, HasHydrogenCount,
    HasIsotope, HasPosition2D,
};
pub use wrappers::WithPosition2D;
