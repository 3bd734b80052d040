use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure {
        bond: Option<BondToken>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    /// Parsed so `@`/`@@` are accepted; depictions carry no parity.
    #[allow(dead_code)]
    pub chirality: ChiralityToken,
    pub hcount: Option<u8>,
    pub charge: i8,
    #[allow(dead_code)]
    pub atom_class: u16,
    pub is_bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChiralityToken {
    None,
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

// Organic-subset atoms allowed outside brackets. Two-letter symbols first.
const ORGANIC_SUBSET: [(&str, Element, bool); 16] = [
    ("Cl", Element::Cl, false),
    ("Br", Element::Br, false),
    ("B", Element::B, false),
    ("C", Element::C, false),
    ("N", Element::N, false),
    ("O", Element::O, false),
    ("P", Element::P, false),
    ("S", Element::S, false),
    ("F", Element::F, false),
    ("I", Element::I, false),
    ("b", Element::B, true),
    ("c", Element::C, true),
    ("n", Element::N, true),
    ("o", Element::O, true),
    ("p", Element::P, true),
    ("s", Element::S, true),
];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some((element, aromatic, len)) = match_organic(&chars, i) {
            tokens.push(Token::Atom(bare_atom(element, aromatic, i)));
            i += len;
            continue;
        }

        match chars[i] {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '[' => {
                let (tok, next) = parse_bracket_atom(&chars, i)?;
                tokens.push(Token::Atom(tok));
                i = next;
            }
            '-' => {
                if !looks_like_bond(&tokens) {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch: '-' });
                }
                tokens.push(Token::Bond(BondToken::Single));
                i += 1;
            }
            '=' | '#' | ':' | '/' | '\\' => {
                let bond = match chars[i] {
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    _ => BondToken::Down,
                };
                tokens.push(Token::Bond(bond));
                i += 1;
            }
            '(' => {
                tokens.push(Token::OpenParen(i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen(i));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            '%' => {
                let digit = parse_percent_ring(&chars, i)?;
                let bond = try_consume_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure { bond, digit, pos: i });
                i += 3;
            }
            d @ '0'..='9' => {
                let bond = try_consume_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure {
                    bond,
                    digit: d as u16 - '0' as u16,
                    pos: i,
                });
                i += 1;
            }
            ch => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        }
    }

    Ok(tokens)
}

fn match_organic(chars: &[char], i: usize) -> Option<(Element, bool, usize)> {
    ORGANIC_SUBSET.iter().find_map(|&(sym, element, aromatic)| {
        let len = sym.len();
        let matches = i + len <= chars.len() && sym.chars().zip(&chars[i..]).all(|(a, &b)| a == b);
        matches.then_some((element, aromatic, len))
    })
}

fn bare_atom(element: Element, aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        element,
        is_aromatic: aromatic,
        isotope: 0,
        chirality: ChiralityToken::None,
        hcount: None,
        charge: 0,
        atom_class: 0,
        is_bracket: false,
        pos,
    }
}

fn looks_like_bond(tokens: &[Token]) -> bool {
    matches!(
        tokens.last(),
        Some(Token::Atom(_))
            | Some(Token::RingClosure { .. })
            | Some(Token::CloseParen(_))
            | Some(Token::OpenParen(_))
            | None
    )
}

fn try_consume_pending_bond(tokens: &mut Vec<Token>) -> Option<BondToken> {
    match tokens.last() {
        Some(Token::Bond(b)) => {
            let b = *b;
            tokens.pop();
            Some(b)
        }
        _ => None,
    }
}

fn parse_percent_ring(chars: &[char], start: usize) -> Result<u16, SmilesError> {
    let digits = chars.get(start + 1..start + 3);
    match digits {
        Some([a, b]) if a.is_ascii_digit() && b.is_ascii_digit() => {
            Ok((*a as u16 - '0' as u16) * 10 + (*b as u16 - '0' as u16))
        }
        _ => Err(SmilesError::UnexpectedChar {
            pos: start,
            ch: '%',
        }),
    }
}

fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(AtomToken, usize), SmilesError> {
    let mut i = start + 1; // skip '['

    let isotope = parse_number(chars, &mut i)
        .map(|v| u16::try_from(v).map_err(|_| SmilesError::InvalidIsotope { pos: start }))
        .transpose()?
        .unwrap_or(0);
    let (element, is_aromatic) = parse_bracket_element(chars, &mut i, start)?;
    let chirality = parse_chirality(chars, &mut i);
    let hcount = parse_hcount(chars, &mut i);
    let charge = parse_charge(chars, &mut i, start)?;
    let atom_class = if chars.get(i) == Some(&':') {
        i += 1;
        parse_number(chars, &mut i)
            .map(|v| u16::try_from(v).map_err(|_| SmilesError::InvalidAtomClass { pos: start }))
            .transpose()?
            .unwrap_or(0)
    } else {
        0
    };

    if chars.get(i) != Some(&']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }
    i += 1;

    Ok((
        AtomToken {
            element,
            is_aromatic,
            isotope,
            chirality,
            hcount: Some(hcount.unwrap_or(0)),
            charge,
            atom_class,
            is_bracket: true,
            pos: start,
        },
        i,
    ))
}

fn parse_number(chars: &[char], i: &mut usize) -> Option<u32> {
    let begin = *i;
    let mut val: u32 = 0;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        val = val.saturating_mul(10).saturating_add(d);
        *i += 1;
    }
    (*i > begin).then_some(val)
}

fn parse_bracket_element(
    chars: &[char],
    i: &mut usize,
    bracket_start: usize,
) -> Result<(Element, bool), SmilesError> {
    if *i >= chars.len() {
        return Err(SmilesError::UnclosedBracket { pos: bracket_start });
    }

    const AROMATIC: [(&str, Element); 8] = [
        ("se", Element::Se),
        ("te", Element::Te),
        ("as", Element::As),
        ("b", Element::B),
        ("c", Element::C),
        ("n", Element::N),
        ("o", Element::O),
        ("p", Element::P),
    ];
    let rest: String = chars[*i..].iter().take(2).collect();
    for (pat, elem) in AROMATIC.iter().chain(std::iter::once(&("s", Element::S))) {
        if rest.starts_with(pat) {
            *i += pat.len();
            return Ok((*elem, true));
        }
    }

    // Two-char uppercase element first, then one-char.
    if let [first, second, ..] = &chars[*i..] {
        if first.is_ascii_uppercase() && second.is_ascii_lowercase() {
            let sym: String = [*first, *second].iter().collect();
            if let Some(e) = Element::from_symbol(&sym) {
                *i += 2;
                return Ok((e, false));
            }
        }
    }
    if let Some(e) = Element::from_symbol(&chars[*i].to_string()) {
        *i += 1;
        return Ok((e, false));
    }

    Err(SmilesError::InvalidElement {
        pos: *i,
        text: chars[*i].to_string(),
    })
}

fn parse_chirality(chars: &[char], i: &mut usize) -> ChiralityToken {
    if chars.get(*i) != Some(&'@') {
        return ChiralityToken::None;
    }
    *i += 1;
    if chars.get(*i) == Some(&'@') {
        *i += 1;
        ChiralityToken::Clockwise
    } else {
        ChiralityToken::CounterClockwise
    }
}

fn parse_hcount(chars: &[char], i: &mut usize) -> Option<u8> {
    if chars.get(*i) != Some(&'H') {
        return None;
    }
    *i += 1;
    match chars.get(*i).and_then(|c| c.to_digit(10)) {
        Some(d) => {
            *i += 1;
            Some(d as u8)
        }
        None => Some(1),
    }
}

fn parse_charge(chars: &[char], i: &mut usize, bracket_start: usize) -> Result<i8, SmilesError> {
    let sign: i8 = match chars.get(*i) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let symbol = chars[*i];
    *i += 1;

    let overflow = SmilesError::InvalidCharge { pos: bracket_start };
    if chars.get(*i) == Some(&symbol) {
        // `++`, `---`: repeated signs count up.
        let mut count: i8 = 1;
        while chars.get(*i) == Some(&symbol) {
            count = count.checked_add(1).ok_or(overflow.clone())?;
            *i += 1;
        }
        return Ok(sign * count);
    }
    match parse_number(chars, i) {
        Some(v) => i8::try_from(v).map(|v| sign * v).map_err(|_| overflow),
        None => Ok(sign),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(tok: &Token) -> &AtomToken {
        match tok {
            Token::Atom(a) => a,
            other => panic!("expected atom, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_methane() {
        let tokens = tokenize("C").unwrap();
        assert_eq!(tokens.len(), 1);
        let a = atom(&tokens[0]);
        assert_eq!(a.element, Element::C);
        assert!(!a.is_bracket);
        assert!(!a.is_aromatic);
    }

    #[test]
    fn tokenize_halogens_greedy() {
        let tokens = tokenize("ClCBr").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(atom(&tokens[0]).element, Element::Cl);
        assert_eq!(atom(&tokens[1]).element, Element::C);
        assert_eq!(atom(&tokens[2]).element, Element::Br);
    }

    #[test]
    fn tokenize_bracket_atom() {
        let tokens = tokenize("[NH4+]").unwrap();
        assert_eq!(tokens.len(), 1);
        let a = atom(&tokens[0]);
        assert_eq!(a.element, Element::N);
        assert!(a.is_bracket);
        assert_eq!(a.hcount, Some(4));
        assert_eq!(a.charge, 1);
    }

    #[test]
    fn tokenize_isotope() {
        let tokens = tokenize("[13C]").unwrap();
        let a = atom(&tokens[0]);
        assert_eq!(a.isotope, 13);
        assert_eq!(a.element, Element::C);
    }

    #[test]
    fn tokenize_ring_closure_with_bond() {
        let tokens = tokenize("C=1CC1").unwrap();
        assert!(matches!(
            &tokens[1],
            Token::RingClosure {
                digit: 1,
                bond: Some(BondToken::Double),
                ..
            }
        ));
    }

    #[test]
    fn tokenize_percent_ring() {
        let tokens = tokenize("C%10CC%10").unwrap();
        assert!(matches!(&tokens[1], Token::RingClosure { digit: 10, .. }));
        assert!(tokenize("C%1").is_err());
    }

    #[test]
    fn tokenize_chirality() {
        let tokens = tokenize("[C@@H](F)(Cl)Br").unwrap();
        let a = atom(&tokens[0]);
        assert_eq!(a.chirality, ChiralityToken::Clockwise);
        assert_eq!(a.hcount, Some(1));
    }

    #[test]
    fn bracket_aromatic_se() {
        let tokens = tokenize("[se]").unwrap();
        let a = atom(&tokens[0]);
        assert!(a.is_aromatic);
        assert_eq!(a.element, Element::Se);
    }

    #[test]
    fn bracket_two_letter_element() {
        let tokens = tokenize("[Na+]").unwrap();
        let a = atom(&tokens[0]);
        assert_eq!(a.element, Element::Na);
        assert_eq!(a.charge, 1);
    }

    #[test]
    fn charge_variants() {
        for (s, q) in [("[O-]", -1), ("[O-2]", -2), ("[O--]", -2), ("[Fe+++]", 3), ("[Fe+3]", 3)] {
            let tokens = tokenize(s).unwrap();
            assert_eq!(atom(&tokens[0]).charge, q, "{s}");
        }
    }

    #[test]
    fn atom_class() {
        let tokens = tokenize("[C:12]").unwrap();
        assert_eq!(atom(&tokens[0]).atom_class, 12);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            tokenize("C$C"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '$' })
        ));
        assert!(matches!(tokenize("[C"), Err(SmilesError::UnclosedBracket { .. })));
        assert!(matches!(tokenize("[Xx]"), Err(SmilesError::InvalidElement { .. })));
    }
}
