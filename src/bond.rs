#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub fn valence_contribution(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// Depiction stereo of a bond, as read from a molfile bond block.
///
/// The narrow end of a wedge or hash sits on the bond's first atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    /// Solid wedge, pointing towards the viewer.
    Wedge,
    /// Hashed wedge, pointing away from the viewer.
    Hash,
    /// Unknown configuration, drawn as a wavy line.
    Either,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            order: BondOrder::Single,
            stereo: BondStereo::None,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondStereo for Bond {
    fn bond_stereo(&self) -> BondStereo {
        self.stereo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmilesBondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
    #[default]
    Implicit,
}

impl SmilesBondOrder {
    /// Contribution to an atom's bond-order sum before kekulization.
    pub fn valence_contribution(self) -> u8 {
        match self {
            SmilesBondOrder::Single => 1,
            SmilesBondOrder::Double => 2,
            SmilesBondOrder::Triple => 3,
            SmilesBondOrder::Aromatic => 1,
            SmilesBondOrder::Implicit => 1,
        }
    }
}

/// Bond type produced by the text parsers before Kekulé assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SmilesBond {
    pub order: SmilesBondOrder,
    pub stereo: BondStereo,
}

impl Default for SmilesBond {
    fn default() -> Self {
        Self {
            order: SmilesBondOrder::Implicit,
            stereo: BondStereo::None,
        }
    }
}

impl crate::traits::HasBondStereo for SmilesBond {
    fn bond_stereo(&self) -> BondStereo {
        self.stereo
    }
}
