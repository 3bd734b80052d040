//! 2D coordinate generation and orientation for molecules without a depiction.

mod coordgen;
pub(crate) mod geometry;
mod orient;
mod ring_system;

pub use coordgen::{generate_coordinates, BOND_LENGTH};
pub use orient::{reflect, straighten};
