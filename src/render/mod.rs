//! Normalized 2D structure images from molfiles and SMILES.
//!
//! Every image comes out the same way: the molecule is drawn with a fixed
//! [`RenderStyle`] on a large transparent canvas, cropped to its ink,
//! rescaled to the target width and padded onto a solid background.

mod error;
mod raster;
mod scene;
mod style;

use std::sync::Arc;

use image::RgbImage;
use resvg::usvg::{self, fontdb};
use tracing::{debug, warn};

pub use error::RenderError;
pub use style::{BackgroundColor, Palette, ParseColorError, RenderStyle};

use crate::layout::{generate_coordinates, reflect, straighten};
use crate::mol::ParsedMolecule;
use crate::molfile::read_molfile;
use crate::smiles::from_smiles;

/// DejaVu Sans, the only face atom labels are set in by default.
const LABEL_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Font database holding just the bundled label face.
///
/// Labels look the same on every host, with or without system fonts.
pub fn bundled_fonts() -> fontdb::Database {
    let mut fonts = fontdb::Database::new();
    fonts.load_font_data(LABEL_FONT.to_vec());
    fonts
}

/// Draws molecules with one immutable style and font set.
///
/// Cheap to share: rendering takes `&self` and touches no shared state.
#[derive(Clone)]
pub struct Renderer {
    style: RenderStyle,
    fonts: Arc<fontdb::Database>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("style", &self.style)
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl Renderer {
    /// Renderer using the bundled label font.
    pub fn new(style: RenderStyle) -> Self {
        Self::with_fonts(style, Arc::new(bundled_fonts()))
    }

    /// Renderer over a caller-supplied font database.
    ///
    /// Labels in a family the database lacks are silently dropped when
    /// rasterized.
    pub fn with_fonts(style: RenderStyle, fonts: Arc<fontdb::Database>) -> Self {
        if fonts.is_empty() {
            warn!("font database is empty; atom labels will not be drawn");
        }
        Self { style, fonts }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render a molfile using the coordinates it carries.
    ///
    /// Returns `None` if the molfile cannot be read or nothing visible comes
    /// out of it.
    pub fn render_from_molfile(
        &self,
        molblock: &str,
        background: BackgroundColor,
    ) -> Option<RgbImage> {
        flatten(self.try_render_molfile(molblock, background))
    }

    /// Render a SMILES string with freshly generated coordinates.
    pub fn render_from_smiles(
        &self,
        smiles: &str,
        background: BackgroundColor,
    ) -> Option<RgbImage> {
        flatten(self.try_render_smiles(smiles, background))
    }

    pub fn try_render_molfile(
        &self,
        molblock: &str,
        background: BackgroundColor,
    ) -> Result<RgbImage, RenderError> {
        let mol = read_molfile(molblock)?;
        self.draw(&mol, background)
    }

    pub fn try_render_smiles(
        &self,
        smiles: &str,
        background: BackgroundColor,
    ) -> Result<RgbImage, RenderError> {
        let mol = depict_smiles(smiles)?;
        self.draw(&mol, background)
    }

    /// Draw an already positioned molecule.
    pub fn draw(
        &self,
        mol: &ParsedMolecule,
        background: BackgroundColor,
    ) -> Result<RgbImage, RenderError> {
        let svg = scene::build_svg(mol, &self.style);
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let layer = raster::rasterize(&svg, &options, self.style.canvas_size)?;
        raster::finish(&layer, &self.style, background)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderStyle::default())
    }
}

/// Parse a SMILES string and lay it out the way it is drawn.
pub fn depict_smiles(smiles: &str) -> Result<ParsedMolecule, RenderError> {
    let mol = from_smiles(smiles)?;
    let mut depiction = generate_coordinates(&mol);
    reflect(&mut depiction);
    straighten(&mut depiction);
    Ok(depiction)
}

fn flatten(result: Result<RgbImage, RenderError>) -> Option<RgbImage> {
    match result {
        Ok(image) => Some(image),
        Err(e) => {
            debug!(kind = %e.kind(), error = %e, "render produced no image");
            None
        }
    }
}
