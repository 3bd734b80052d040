use std::fmt;

use petgraph::graph::NodeIndex;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

/// An atom carrying more bonds and hydrogens than its element allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValenceError {
    pub atom: NodeIndex,
    pub element: Element,
    pub valence: u8,
}

impl fmt::Display for ValenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "explicit valence {} for atom {} ({}) is greater than permitted",
            self.valence,
            self.atom.index(),
            self.element.symbol()
        )
    }
}

impl std::error::Error for ValenceError {}

/// Sum of bond orders plus virtual hydrogens on `atom`.
pub fn total_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasHydrogenCount,
    B: HasBondOrder,
{
    let bond_sum: u8 = mol
        .bonds_of(atom)
        .map(|ei| mol.bond(ei).bond_order().valence_contribution())
        .sum();
    bond_sum + mol.atom(atom).hydrogen_count()
}

/// Allowed valences of a possibly charged atom.
///
/// A charged atom takes the valences of its isoelectronic neutral
/// neighbour in the periodic table: N+ behaves like C, O- like F, C+ like B.
pub fn allowed_valences(element: Element, formal_charge: i8) -> &'static [u8] {
    if formal_charge == 0 {
        return element.default_valences();
    }
    let shifted = element.atomic_num() as i16 - formal_charge as i16;
    u8::try_from(shifted)
        .ok()
        .and_then(Element::from_atomic_num)
        .map(Element::default_valences)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| element.default_valences())
}

/// Number of implicit hydrogens needed to reach the smallest allowed
/// valence that accommodates `bond_order_sum`.
///
/// Elements without default valences (metals, noble gases) never receive
/// implicit hydrogens.
pub fn implicit_hydrogens(element: Element, formal_charge: i8, bond_order_sum: u8) -> u8 {
    allowed_valences(element, formal_charge)
        .iter()
        .find(|&&v| v >= bond_order_sum)
        .map(|&v| v - bond_order_sum)
        .unwrap_or(0)
}

/// Reject the first atom whose total valence exceeds the largest one its
/// element and charge allow.
///
/// Elements without default valences are not checked.
pub fn check_valences<A, B>(mol: &Mol<A, B>) -> Result<(), ValenceError>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    for atom in mol.atoms() {
        let data = mol.atom(atom);
        let Some(element) = Element::from_atomic_num(data.atomic_num()) else {
            continue;
        };
        let Some(&max) = allowed_valences(element, data.formal_charge()).iter().max() else {
            continue;
        };
        let valence = total_valence(mol, atom);
        if valence > max {
            return Err(ValenceError {
                atom,
                element,
                valence,
            });
        }
    }
    Ok(())
}
