use std::ops::Range;
use std::str::FromStr;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{BondStereo, SmilesBond, SmilesBondOrder};
use crate::element::Element;
use crate::kekulize::kekulize;
use crate::mol::{Mol, ParsedMolecule};
use crate::molfile::error::MolfileError;
use crate::valence::{check_valences, implicit_hydrogens};
use crate::wrappers::WithPosition2D;

#[derive(Debug, Clone)]
struct RawAtom {
    element: Element,
    isotope: u16,
    charge: i8,
    position: [f64; 2],
}

#[derive(Debug, Clone)]
struct RawBond {
    a: usize,
    b: usize,
    order: SmilesBondOrder,
    stereo: BondStereo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    Charge,
    Isotope,
}

/// Read the first record of a V2000 molfile, keeping its 2D coordinates.
pub fn read_molfile(text: &str) -> Result<ParsedMolecule, MolfileError> {
    let lines: Vec<&str> = text.lines().take_while(|l| l.trim() != "$$$$").collect();
    if lines.iter().all(|l| l.trim().is_empty()) {
        return Err(MolfileError::Empty);
    }

    // Writers and transports sometimes drop blank header lines.
    let counts_idx = lines
        .iter()
        .take(4)
        .position(|l| l.contains("V2000") || l.contains("V3000"))
        .unwrap_or(3);
    let counts = lines
        .get(counts_idx)
        .ok_or_else(|| MolfileError::parse(lines.len(), "missing counts line"))?;
    let counts_line = counts_idx + 1;
    if counts.contains("V3000") {
        return Err(MolfileError::UnsupportedVersion { line: counts_line });
    }

    let atom_count: usize = number(counts, 0..3, counts_line, "atom count")?;
    let bond_count: usize = number(counts, 3..6, counts_line, "bond count")?;
    let atom_start = counts_idx + 1;
    let bond_start = atom_start + atom_count;
    let props_start = bond_start + bond_count;
    if lines.len() < props_start {
        return Err(MolfileError::parse(
            lines.len(),
            "molfile ended before atoms and bonds were fully specified",
        ));
    }

    let mut atoms = lines[atom_start..bond_start]
        .iter()
        .enumerate()
        .map(|(i, line)| parse_atom(line, atom_start + i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    let bonds = lines[bond_start..props_start]
        .iter()
        .enumerate()
        .map(|(i, line)| parse_bond(line, bond_start + i + 1, atom_count))
        .collect::<Result<Vec<_>, _>>()?;
    apply_properties(&lines[props_start..], props_start, &mut atoms)?;

    assemble(&atoms, &bonds)
}

fn column(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    let start = range.start.min(end);
    line.get(start..end).unwrap_or("").trim()
}

fn number<T: FromStr>(
    line: &str,
    range: Range<usize>,
    line_no: usize,
    what: &str,
) -> Result<T, MolfileError> {
    column(line, range)
        .parse()
        .map_err(|_| MolfileError::parse(line_no, format!("invalid {what}")))
}

/// Like [`number`], but a blank column reads as the default.
fn optional_number<T: FromStr + Default>(
    line: &str,
    range: Range<usize>,
    line_no: usize,
    what: &str,
) -> Result<T, MolfileError> {
    if column(line, range.clone()).is_empty() {
        Ok(T::default())
    } else {
        number(line, range, line_no, what)
    }
}

fn parse_atom(line: &str, line_no: usize) -> Result<RawAtom, MolfileError> {
    let x: f64 = number(line, 0..10, line_no, "x coordinate")?;
    let y: f64 = number(line, 10..20, line_no, "y coordinate")?;
    let (element, isotope) = match column(line, 31..34) {
        "D" => (Element::H, 2),
        "T" => (Element::H, 3),
        symbol => {
            let element = Element::from_symbol(symbol).ok_or_else(|| {
                MolfileError::parse(line_no, format!("unknown atom symbol '{symbol}'"))
            })?;
            (element, 0)
        }
    };
    let charge = match optional_number::<u8>(line, 36..39, line_no, "charge code")? {
        // 4 marks a doublet radical, which carries no charge.
        0 | 4 => 0,
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        code => {
            return Err(MolfileError::parse(
                line_no,
                format!("unsupported charge code {code}"),
            ))
        }
    };
    Ok(RawAtom {
        element,
        isotope,
        charge,
        position: [x, y],
    })
}

fn parse_bond(line: &str, line_no: usize, atom_count: usize) -> Result<RawBond, MolfileError> {
    let a: usize = number(line, 0..3, line_no, "first atom index")?;
    let b: usize = number(line, 3..6, line_no, "second atom index")?;
    if a == 0 || b == 0 || a > atom_count || b > atom_count {
        return Err(MolfileError::parse(
            line_no,
            "bond references atom outside declared range",
        ));
    }
    if a == b {
        return Err(MolfileError::parse(line_no, "bond joins an atom to itself"));
    }
    let order = match number::<u8>(line, 6..9, line_no, "bond type")? {
        1 => SmilesBondOrder::Single,
        2 => SmilesBondOrder::Double,
        3 => SmilesBondOrder::Triple,
        4 => SmilesBondOrder::Aromatic,
        other => {
            return Err(MolfileError::parse(
                line_no,
                format!("unsupported bond type {other}"),
            ))
        }
    };
    let stereo = match optional_number::<u8>(line, 9..12, line_no, "bond stereo")? {
        1 => BondStereo::Wedge,
        6 => BondStereo::Hash,
        4 => BondStereo::Either,
        _ => BondStereo::None,
    };
    Ok(RawBond {
        a: a - 1,
        b: b - 1,
        order,
        stereo,
    })
}

fn apply_properties(
    lines: &[&str],
    offset: usize,
    atoms: &mut [RawAtom],
) -> Result<(), MolfileError> {
    let mut seen: Vec<Property> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line_no = offset + i + 1;
        if line.starts_with("M  END") {
            break;
        }
        let (property, rest) = if let Some(rest) = line.strip_prefix("M  CHG") {
            (Property::Charge, rest)
        } else if let Some(rest) = line.strip_prefix("M  ISO") {
            (Property::Isotope, rest)
        } else {
            continue;
        };

        // The first property line of a kind supersedes the atom block.
        if !seen.contains(&property) {
            seen.push(property);
            for atom in atoms.iter_mut() {
                match property {
                    Property::Charge => atom.charge = 0,
                    Property::Isotope => atom.isotope = 0,
                }
            }
        }

        let values = rest
            .split_whitespace()
            .map(|t| t.parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MolfileError::parse(line_no, "invalid property value"))?;
        let Some((&count, pairs)) = values.split_first() else {
            return Err(MolfileError::parse(line_no, "property line without entries"));
        };
        let count = usize::try_from(count)
            .map_err(|_| MolfileError::parse(line_no, "invalid property entry count"))?;
        if pairs.len() < 2 * count {
            return Err(MolfileError::parse(line_no, "truncated property line"));
        }
        for pair in pairs.chunks_exact(2).take(count) {
            let atom = usize::try_from(pair[0])
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| atoms.get_mut(idx))
                .ok_or_else(|| {
                    MolfileError::parse(line_no, "property references atom outside declared range")
                })?;
            match property {
                Property::Charge => {
                    atom.charge = i8::try_from(pair[1])
                        .map_err(|_| MolfileError::parse(line_no, "charge out of range"))?;
                }
                Property::Isotope => {
                    atom.isotope = u16::try_from(pair[1])
                        .map_err(|_| MolfileError::parse(line_no, "isotope out of range"))?;
                }
            }
        }
    }
    Ok(())
}

/// Heavy atom each plain explicit hydrogen is folded into, by atom index.
fn foldable_hydrogens(atoms: &[RawAtom], bonds: &[RawBond]) -> Vec<Option<usize>> {
    let mut degree = vec![0usize; atoms.len()];
    for bond in bonds {
        degree[bond.a] += 1;
        degree[bond.b] += 1;
    }
    let mut fold = vec![None; atoms.len()];
    for bond in bonds {
        if bond.order != SmilesBondOrder::Single || bond.stereo != BondStereo::None {
            continue;
        }
        for (h, heavy) in [(bond.a, bond.b), (bond.b, bond.a)] {
            let atom = &atoms[h];
            let plain = atom.element == Element::H && atom.isotope == 0 && atom.charge == 0;
            if plain && degree[h] == 1 && atoms[heavy].element != Element::H {
                fold[h] = Some(heavy);
            }
        }
    }
    fold
}

fn assemble(atoms: &[RawAtom], bonds: &[RawBond]) -> Result<ParsedMolecule, MolfileError> {
    let fold = foldable_hydrogens(atoms, bonds);
    let mut explicit_h = vec![0u8; atoms.len()];
    for heavy in fold.iter().flatten() {
        explicit_h[*heavy] = explicit_h[*heavy].saturating_add(1);
    }

    let mut mol: Mol<Atom, SmilesBond> = Mol::new();
    let mut index: Vec<Option<NodeIndex>> = vec![None; atoms.len()];
    let mut positions: Vec<[f64; 2]> = Vec::new();
    for (i, raw) in atoms.iter().enumerate() {
        if fold[i].is_some() {
            continue;
        }
        index[i] = Some(mol.add_atom(Atom {
            atomic_num: raw.element.atomic_num(),
            formal_charge: raw.charge,
            isotope: raw.isotope,
            hydrogen_count: 0,
            is_aromatic: false,
        }));
        positions.push(raw.position);
    }

    for bond in bonds {
        let (Some(a), Some(b)) = (index[bond.a], index[bond.b]) else {
            continue;
        };
        if mol.bond_between(a, b).is_none() {
            mol.add_bond(
                a,
                b,
                SmilesBond {
                    order: bond.order,
                    stereo: bond.stereo,
                },
            );
        }
    }

    let hydrogens: Vec<(NodeIndex, u8, bool)> = atoms
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| index[i].map(|node| (i, raw, node)))
        .map(|(i, raw, node)| {
            let aromatic = mol
                .bonds_of(node)
                .any(|e| mol.bond(e).order == SmilesBondOrder::Aromatic);
            let bond_sum = mol
                .bonds_of(node)
                .map(|e| mol.bond(e).order.valence_contribution())
                .fold(explicit_h[i], u8::saturating_add);
            let mut implicit = implicit_hydrogens(raw.element, raw.charge, bond_sum);
            if aromatic {
                implicit = implicit.saturating_sub(1);
            }
            (node, implicit.saturating_add(explicit_h[i]), aromatic)
        })
        .collect();
    for (node, count, aromatic) in hydrogens {
        let atom = mol.atom_mut(node);
        atom.hydrogen_count = count;
        atom.is_aromatic = aromatic;
    }

    let mol = kekulize(mol)?;
    check_valences(&mol)?;
    Ok(mol.map_atoms(|idx, atom| WithPosition2D::new(atom.clone(), Some(positions[idx.index()]))))
}
