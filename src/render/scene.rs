//! Build an SVG drawing of a positioned molecule.

use petgraph::graph::{EdgeIndex, NodeIndex};

use super::style::RenderStyle;
use crate::bond::{BondOrder, BondStereo};
use crate::element::Element;
use crate::layout::geometry::{self, Point};
use crate::mol::ParsedMolecule;
use crate::rings::RingInfo;
use crate::traits::{
    HasAtomicNum, HasBondOrder, HasBondStereo, HasFormalCharge, HasHydrogenCount, HasIsotope,
    HasPosition2D,
};

/// Draw `mol` onto a transparent square canvas of `style.canvas_size`.
///
/// An average bond is drawn `style.bond_length` long unless the molecule
/// would not fit, in which case everything shrinks together. Layout y points
/// up, so it is flipped for the canvas.
pub(crate) fn build_svg(mol: &ParsedMolecule, style: &RenderStyle) -> String {
    let size = style.canvas_size as f64;
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">",
        style.canvas_size
    );

    let points: Vec<Point> = mol
        .atoms()
        .map(|a| mol.atom(a).position_2d().unwrap_or([0.0, 0.0]))
        .collect();
    if let Some(frame) = Frame::fit(&points, mean_bond_length(mol, &points), style) {
        let canvas: Vec<Point> = points.iter().map(|p| frame.to_canvas(*p, size)).collect();
        let painter = Painter::new(mol, canvas, &frame, style);
        painter.paint(&mut out);
    }
    out.push_str("</svg>");
    out
}

fn mean_bond_length(mol: &ParsedMolecule, points: &[Point]) -> Option<f64> {
    let lengths: Vec<f64> = mol
        .bonds()
        .filter_map(|e| mol.bond_endpoints(e))
        .map(|(a, b)| geometry::distance(points[a.index()], points[b.index()]))
        .collect();
    if lengths.is_empty() {
        return None;
    }
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    (mean > 1e-6).then_some(mean)
}

/// Mapping from layout units onto the canvas.
struct Frame {
    scale: f64,
    /// How much the drawing was shrunk to fit, 1 when it was not.
    shrink: f64,
    center: Point,
}

impl Frame {
    fn fit(points: &[Point], mean_bond: Option<f64>, style: &RenderStyle) -> Option<Self> {
        let (lo, hi) = geometry::bounds(points.iter().copied())?;
        let natural = mean_bond.map_or(1.0, |m| style.bond_length / m);
        let size = style.canvas_size as f64;
        let margin = 2.0 * style.max_font_size;
        let available = (size * (1.0 - 2.0 * style.canvas_padding) - 2.0 * margin).max(1.0);
        let span = (hi[0] - lo[0]).max(hi[1] - lo[1]);
        let scale = if span * natural > available {
            available / span
        } else {
            natural
        };
        Some(Self {
            scale,
            shrink: scale / natural,
            center: geometry::scale(geometry::add(lo, hi), 0.5),
        })
    }

    fn to_canvas(&self, p: Point, size: f64) -> Point {
        let d = geometry::scale(geometry::sub(p, self.center), self.scale);
        [size / 2.0 + d[0], size / 2.0 - d[1]]
    }
}

/// Text drawn in place of an atom.
#[derive(Debug, Clone, PartialEq)]
struct Label {
    isotope: u16,
    symbol: &'static str,
    hydrogens: u8,
    charge: i8,
    /// Write the hydrogens before the symbol (`HO`), for atoms whose bonds
    /// leave to the right.
    hydrogens_first: bool,
}

struct Painter<'a> {
    mol: &'a ParsedMolecule,
    canvas: Vec<Point>,
    labels: Vec<Option<Label>>,
    colours: Vec<[u8; 3]>,
    rings: RingInfo,
    line_width: f64,
    font_size: f64,
    bond_px: f64,
    style: &'a RenderStyle,
}

impl<'a> Painter<'a> {
    fn new(
        mol: &'a ParsedMolecule,
        canvas: Vec<Point>,
        frame: &Frame,
        style: &'a RenderStyle,
    ) -> Self {
        let bond_px = style.bond_length * frame.shrink;
        let font_size = (0.55 * bond_px).clamp(style.min_font_size, style.max_font_size);
        let labels = mol.atoms().map(|a| label_for(mol, a, &canvas)).collect();
        let colours = mol
            .atoms()
            .map(|a| style.palette.colour(mol.atom(a).atomic_num()))
            .collect();
        Self {
            mol,
            canvas,
            labels,
            colours,
            rings: RingInfo::sssr(mol),
            line_width: style.bond_line_width * frame.shrink,
            font_size,
            bond_px,
            style,
        }
    }

    fn paint(&self, out: &mut String) {
        out.push_str(&format!(
            "<g stroke-linecap=\"round\" stroke-width=\"{:.3}\" fill=\"none\">",
            self.line_width
        ));
        for bond in self.mol.bonds() {
            self.paint_bond(bond, out);
        }
        out.push_str("</g>");
        for atom in self.mol.atoms() {
            if let Some(label) = &self.labels[atom.index()] {
                self.paint_label(atom, label, out);
            }
        }
    }

    /// Clearance around a labelled atom that bonds stop short of.
    fn label_radius(&self, atom: NodeIndex) -> f64 {
        match self.labels[atom.index()] {
            Some(_) => self.font_size * (0.5 + self.style.label_padding),
            None => 0.0,
        }
    }

    fn paint_bond(&self, bond: EdgeIndex, out: &mut String) {
        let Some((a, b)) = self.mol.bond_endpoints(bond) else {
            return;
        };
        let (pa, pb) = (self.canvas[a.index()], self.canvas[b.index()]);
        let length = geometry::distance(pa, pb);
        let (ra, rb) = (self.label_radius(a), self.label_radius(b));
        if length < 1e-6 || ra + rb >= length {
            return;
        }
        let dir = geometry::scale(geometry::sub(pb, pa), 1.0 / length);
        let start = geometry::add(pa, geometry::scale(dir, ra));
        let end = geometry::sub(pb, geometry::scale(dir, rb));
        let (ca, cb) = (self.colours[a.index()], self.colours[b.index()]);

        let data = self.mol.bond(bond);
        match data.bond_stereo() {
            BondStereo::Wedge => return wedge(start, end, self.wedge_width(), ca, out),
            BondStereo::Hash => {
                return hash(start, end, self.wedge_width(), self.line_width, ca, out)
            }
            BondStereo::Either => {
                return wavy(start, end, self.wedge_width(), self.line_width, ca, out)
            }
            BondStereo::None => {}
        }

        let offset = self.style.multiple_bond_offset * self.bond_px;
        let normal = geometry::perpendicular(dir);
        match data.bond_order() {
            BondOrder::Single => split_line(start, end, ca, cb, out),
            BondOrder::Triple => {
                split_line(start, end, ca, cb, out);
                for side in [1.0, -1.0] {
                    let shift = geometry::scale(normal, side * offset);
                    split_line(geometry::add(start, shift), geometry::add(end, shift), ca, cb, out);
                }
            }
            BondOrder::Double => match self.inner_side(a, b, normal) {
                Some(side) => {
                    split_line(start, end, ca, cb, out);
                    let shift = geometry::scale(normal, side * offset);
                    // inner line stops short of unlabelled corners
                    let trim_a = if ra > 0.0 { 0.0 } else { offset };
                    let trim_b = if rb > 0.0 { 0.0 } else { offset };
                    let s =
                        geometry::add(geometry::add(start, shift), geometry::scale(dir, trim_a));
                    let e = geometry::sub(geometry::add(end, shift), geometry::scale(dir, trim_b));
                    split_line(s, e, ca, cb, out);
                }
                None => {
                    for side in [0.5, -0.5] {
                        let shift = geometry::scale(normal, side * offset);
                        let (s, e) = (geometry::add(start, shift), geometry::add(end, shift));
                        split_line(s, e, ca, cb, out);
                    }
                }
            },
        }
    }

    /// Side of the bond a second line goes on, or `None` to centre both.
    ///
    /// Ring double bonds put it towards the ring centre; chain double bonds
    /// with substituents on both ends put it towards the substituents.
    fn inner_side(&self, a: NodeIndex, b: NodeIndex, normal: Point) -> Option<f64> {
        let pa = self.canvas[a.index()];
        if let Some(ring) = self.rings.rings_with_bond(a, b).min_by_key(|r| r.len()) {
            let center = geometry::centroid(ring.iter().map(|x| self.canvas[x.index()]))?;
            return Some(side_of(normal, geometry::sub(center, pa)));
        }
        let others = |atom: NodeIndex, skip: NodeIndex| -> Vec<Point> {
            self.mol
                .neighbors(atom)
                .filter(|&n| n != skip)
                .map(|n| self.canvas[n.index()])
                .collect()
        };
        let (na, nb) = (others(a, b), others(b, a));
        if na.is_empty()
            || nb.is_empty()
            || self.labels[a.index()].is_some()
            || self.labels[b.index()].is_some()
        {
            return None;
        }
        let pull = na
            .iter()
            .chain(&nb)
            .map(|p| dot(normal, geometry::sub(*p, pa)))
            .sum::<f64>();
        Some(if pull < 0.0 { -1.0 } else { 1.0 })
    }

    fn wedge_width(&self) -> f64 {
        self.style.multiple_bond_offset * self.bond_px
    }

    fn paint_label(&self, atom: NodeIndex, label: &Label, out: &mut String) {
        let [x, y] = self.canvas[atom.index()];
        let [r, g, b] = self.colours[atom.index()];
        let small = self.font_size * 0.7;
        let half_symbol = 0.33 * self.font_size * label.symbol.len() as f64;
        let (anchor, ax) = match (label.hydrogens, label.hydrogens_first) {
            (0, _) => ("middle", x),
            (_, false) => ("start", x - half_symbol),
            (_, true) => ("end", x + half_symbol),
        };
        out.push_str(&format!(
            "<text x=\"{ax:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"#{r:02x}{g:02x}{b:02x}\" text-anchor=\"{anchor}\">",
            y + 0.35 * self.font_size,
            self.style.font_family,
            self.font_size,
        ));
        let hydrogens = match label.hydrogens {
            0 => String::new(),
            1 => "H".to_string(),
            n => format!("H<tspan baseline-shift=\"sub\" font-size=\"{small:.2}\">{n}</tspan>"),
        };
        if label.hydrogens_first {
            out.push_str(&hydrogens);
        }
        if label.isotope > 0 {
            out.push_str(&format!(
                "<tspan baseline-shift=\"super\" font-size=\"{small:.2}\">{}</tspan>",
                label.isotope
            ));
        }
        out.push_str(label.symbol);
        if !label.hydrogens_first {
            out.push_str(&hydrogens);
        }
        if label.charge != 0 {
            let sign = if label.charge > 0 { "+" } else { "\u{2212}" };
            let magnitude = match label.charge.unsigned_abs() {
                1 => String::new(),
                n => n.to_string(),
            };
            out.push_str(&format!(
                "<tspan baseline-shift=\"super\" font-size=\"{small:.2}\">{magnitude}{sign}</tspan>"
            ));
        }
        out.push_str("</text>");
    }
}

/// Heteroatoms, charged atoms and isotopes get a label; plain carbon does not.
fn label_for(mol: &ParsedMolecule, atom: NodeIndex, canvas: &[Point]) -> Option<Label> {
    let data = mol.atom(atom);
    let atomic_num = data.atomic_num();
    if atomic_num == 6 && data.formal_charge() == 0 && data.isotope() == 0 {
        return None;
    }
    let symbol = Element::from_atomic_num(atomic_num).map_or("*", |e| e.symbol());
    let here = canvas[atom.index()];
    let lean: f64 = mol
        .neighbors(atom)
        .map(|n| canvas[n.index()][0] - here[0])
        .sum();
    Some(Label {
        isotope: data.isotope(),
        symbol,
        hydrogens: data.hydrogen_count(),
        charge: data.formal_charge(),
        hydrogens_first: lean > 1e-6,
    })
}

fn dot(a: Point, b: Point) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

fn side_of(normal: Point, v: Point) -> f64 {
    if dot(normal, v) < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn line(from: Point, to: Point, colour: [u8; 3], out: &mut String) {
    out.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\"/>",
        from[0],
        from[1],
        to[0],
        to[1],
        hex(colour)
    ));
}

/// A line coloured after each end atom up to its midpoint.
fn split_line(from: Point, to: Point, from_colour: [u8; 3], to_colour: [u8; 3], out: &mut String) {
    if from_colour == to_colour {
        return line(from, to, from_colour, out);
    }
    let mid = geometry::scale(geometry::add(from, to), 0.5);
    line(from, mid, from_colour, out);
    line(mid, to, to_colour, out);
}

fn wedge(narrow: Point, wide: Point, width: f64, colour: [u8; 3], out: &mut String) {
    let normal = geometry::perpendicular(geometry::normalize(geometry::sub(wide, narrow)));
    let left = geometry::add(wide, geometry::scale(normal, width));
    let right = geometry::sub(wide, geometry::scale(normal, width));
    out.push_str(&format!(
        "<polygon points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{}\" stroke=\"none\"/>",
        narrow[0],
        narrow[1],
        left[0],
        left[1],
        right[0],
        right[1],
        hex(colour)
    ));
}

fn hash(narrow: Point, wide: Point, width: f64, stroke: f64, colour: [u8; 3], out: &mut String) {
    const STRIPES: usize = 6;
    let normal = geometry::perpendicular(geometry::normalize(geometry::sub(wide, narrow)));
    out.push_str(&format!("<g stroke-width=\"{:.3}\">", stroke * 0.6));
    for i in 1..=STRIPES {
        let t = i as f64 / STRIPES as f64;
        let at = geometry::add(narrow, geometry::scale(geometry::sub(wide, narrow), t));
        let half = geometry::scale(normal, width * t);
        line(geometry::add(at, half), geometry::sub(at, half), colour, out);
    }
    out.push_str("</g>");
}

fn wavy(from: Point, to: Point, width: f64, stroke: f64, colour: [u8; 3], out: &mut String) {
    const WAVES: f64 = 4.0;
    const STEPS: usize = 48;
    let normal = geometry::perpendicular(geometry::normalize(geometry::sub(to, from)));
    let points: Vec<String> = (0..=STEPS)
        .map(|i| {
            let t = i as f64 / STEPS as f64;
            let along = geometry::add(from, geometry::scale(geometry::sub(to, from), t));
            let swing = 0.5 * width * (t * WAVES * std::f64::consts::TAU).sin();
            let p = geometry::add(along, geometry::scale(normal, swing));
            format!("{:.2},{:.2}", p[0], p[1])
        })
        .collect();
    out.push_str(&format!(
        "<polyline points=\"{}\" stroke=\"{}\" stroke-width=\"{:.3}\"/>",
        points.join(" "),
        hex(colour),
        stroke * 0.8
    ));
}
