//! V2000 molfile reading.
//!
//! Only the first record of an SD file is read. Coordinates are kept as
//! written; aromatic bonds (type 4) are kekulized on the way in.

pub mod error;
mod reader;

pub use error::MolfileError;
pub use reader::read_molfile;
