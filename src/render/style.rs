use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use image::Rgb;
use thiserror::Error;

/// Fixed drawing parameters shared by every render.
///
/// Pixel values refer to the oversized square canvas the molecule is first
/// drawn on; the final image is rescaled to `target_width`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Side of the square working canvas.
    pub canvas_size: u32,
    /// Border added around the cropped and rescaled drawing.
    pub padding: u32,
    /// Width of the drawing before padding.
    pub target_width: u32,
    /// Bond stroke width at the fixed bond length; thinner when a large
    /// molecule has to be shrunk to fit the canvas.
    pub bond_line_width: f64,
    /// Length of an average bond on the canvas.
    pub bond_length: f64,
    /// Distance between the lines of a multiple bond, as a fraction of the
    /// bond length.
    pub multiple_bond_offset: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Gap kept between a label and the bonds that end at it, as a fraction
    /// of the font size.
    pub label_padding: f64,
    /// Margin kept free on each side of the canvas, as a fraction of its size.
    pub canvas_padding: f64,
    /// CSS `font-family` list used for atom labels.
    pub font_family: String,
    pub palette: Palette,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            canvas_size: 2000,
            padding: 12,
            target_width: 600,
            bond_line_width: 3.5,
            bond_length: 40.0,
            multiple_bond_offset: 0.12,
            min_font_size: 18.0,
            max_font_size: 24.0,
            label_padding: 0.15,
            canvas_padding: 0.01,
            font_family: "DejaVu Sans".to_string(),
            palette: Palette::cdk(),
        }
    }
}

/// Per-element drawing colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub default: [u8; 3],
    pub colours: BTreeMap<u8, [u8; 3]>,
}

impl Palette {
    /// The CDK colour scheme: black carbon, Jmol-like heteroatoms.
    pub fn cdk() -> Self {
        let colours = [
            (5, [0xff, 0xb5, 0xb5]),
            (7, [0x30, 0x50, 0xf8]),
            (8, [0xff, 0x0d, 0x0d]),
            (9, [0x1f, 0xf0, 0x1f]),
            (11, [0xab, 0x5c, 0xf2]),
            (14, [0xf0, 0xc8, 0xa0]),
            (15, [0xff, 0x80, 0x00]),
            (16, [0xc6, 0xc6, 0x80]),
            (17, [0x1f, 0xf0, 0x1f]),
            (26, [0xe0, 0x66, 0x33]),
            (35, [0xa6, 0x29, 0x29]),
            (53, [0x94, 0x00, 0x94]),
        ]
        .into_iter()
        .collect();
        Self {
            default: [0, 0, 0],
            colours,
        }
    }

    pub fn colour(&self, atomic_num: u8) -> [u8; 3] {
        self.colours.get(&atomic_num).copied().unwrap_or(self.default)
    }
}

/// Solid colour behind the drawing and in the padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor(pub Rgb<u8>);

impl BackgroundColor {
    pub const WHITE: Self = Self(Rgb([255, 255, 255]));
    pub const BLACK: Self = Self(Rgb([0, 0, 0]));

    pub fn rgb(self) -> [u8; 3] {
        self.0 .0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown colour '{0}', expected a name such as 'white' or a #rrggbb value")]
pub struct ParseColorError(String);

impl FromStr for BackgroundColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ParseColorError(s.to_string()));
        }
        let rgb = match text.to_ascii_lowercase().as_str() {
            "white" => [255, 255, 255],
            "black" => [0, 0, 0],
            "grey" | "gray" => [128, 128, 128],
            "lightgrey" | "lightgray" => [211, 211, 211],
            "red" => [255, 0, 0],
            "green" => [0, 128, 0],
            "blue" => [0, 0, 255],
            "yellow" => [255, 255, 0],
            _ => return Err(ParseColorError(s.to_string())),
        };
        Ok(Self(Rgb(rgb)))
    }
}

fn parse_hex(hex: &str) -> Option<BackgroundColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(BackgroundColor(Rgb([channel(0)?, channel(2)?, channel(4)?])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style() {
        let style = RenderStyle::default();
        assert_eq!(style.canvas_size, 2000);
        assert_eq!(style.target_width, 600);
        assert_eq!(style.padding, 12);
    }

    #[test]
    fn cdk_palette() {
        let palette = Palette::cdk();
        assert_eq!(palette.colour(6), [0, 0, 0]);
        assert_eq!(palette.colour(8), [0xff, 0x0d, 0x0d]);
        assert_eq!(palette.colour(92), palette.default);
    }

    #[test]
    fn parse_colours() {
        assert_eq!("white".parse(), Ok(BackgroundColor::WHITE));
        assert_eq!("WHITE".parse(), Ok(BackgroundColor::WHITE));
        assert_eq!("#000000".parse(), Ok(BackgroundColor::BLACK));
        assert_eq!(
            "#1a2B3c".parse::<BackgroundColor>().unwrap().rgb(),
            [0x1a, 0x2b, 0x3c]
        );
        assert!("#12345".parse::<BackgroundColor>().is_err());
        assert!("#12345g".parse::<BackgroundColor>().is_err());
        assert!("mauve".parse::<BackgroundColor>().is_err());
    }

    #[test]
    fn display_round_trips_through_hex() {
        let colour = BackgroundColor(Rgb([1, 2, 255]));
        assert_eq!(colour.to_string(), "#0102ff");
        assert_eq!(colour.to_string().parse(), Ok(colour));
    }
}
