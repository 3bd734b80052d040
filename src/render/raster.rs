//! Rasterize, crop, rescale and pad a drawing.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use super::error::RenderError;
use super::style::{BackgroundColor, RenderStyle};

/// Rasterize an SVG document onto a transparent canvas.
///
/// The returned image holds premultiplied RGBA.
pub(crate) fn rasterize(
    svg: &str,
    options: &usvg::Options<'_>,
    size: u32,
) -> Result<RgbaImage, RenderError> {
    let tree = usvg::Tree::from_str(svg, options)?;
    let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::Canvas { size })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    RgbaImage::from_raw(size, size, pixmap.take()).ok_or(RenderError::Canvas { size })
}

/// Smallest rectangle `(x, y, width, height)` holding every inked pixel.
pub(crate) fn ink_bounds(layer: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in layer.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crop to the ink, scale to the target width and pad onto `background`.
pub(crate) fn finish(
    layer: &RgbaImage,
    style: &RenderStyle,
    background: BackgroundColor,
) -> Result<RgbImage, RenderError> {
    let (x, y, width, height) = ink_bounds(layer).ok_or(RenderError::Blank)?;
    let cropped = imageops::crop_imm(layer, x, y, width, height).to_image();

    let target_height = scaled_height(width, height, style.target_width);
    let mut resized = imageops::resize(
        &cropped,
        style.target_width,
        target_height,
        FilterType::Lanczos3,
    );
    // Resampling may ring past the alpha; keep the colour premultiplied.
    for pixel in resized.pixels_mut() {
        let alpha = pixel.0[3];
        for channel in &mut pixel.0[..3] {
            *channel = (*channel).min(alpha);
        }
    }

    let pad = style.padding;
    let mut out = RgbImage::from_pixel(
        style.target_width + 2 * pad,
        target_height + 2 * pad,
        background.0,
    );
    for (px, py, pixel) in resized.enumerate_pixels() {
        out.put_pixel(px + pad, py + pad, over(pixel.0, background.rgb()));
    }
    Ok(out)
}

/// Height after scaling `width` to `target_width`, rounded down, at least 1.
pub(crate) fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = u64::from(height) * u64::from(target_width) / u64::from(width.max(1));
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Premultiplied `source` composited over an opaque colour.
fn over(source: [u8; 4], background: [u8; 3]) -> Rgb<u8> {
    let alpha = u32::from(source[3]);
    let mut rgb = [0u8; 3];
    for i in 0..3 {
        let behind = (u32::from(background[i]) * (255 - alpha) + 127) / 255;
        rgb[i] = (u32::from(source[i]) + behind).min(255) as u8;
    }
    Rgb(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn layer_with_block(x: u32, y: u32, w: u32, h: u32) -> RgbaImage {
        let mut layer = RgbaImage::new(100, 100);
        for py in y..y + h {
            for px in x..x + w {
                layer.put_pixel(px, py, Rgba([0, 0, 0, 255]));
            }
        }
        layer
    }

    #[test]
    fn bounds_of_blank_layer() {
        assert_eq!(ink_bounds(&RgbaImage::new(10, 10)), None);
    }

    #[test]
    fn bounds_cover_every_inked_pixel() {
        let mut layer = layer_with_block(10, 20, 5, 3);
        layer.put_pixel(40, 60, Rgba([0, 0, 0, 1]));
        assert_eq!(ink_bounds(&layer), Some((10, 20, 31, 41)));
    }

    #[test]
    fn height_rounds_down_and_never_vanishes() {
        assert_eq!(scaled_height(300, 100, 600), 200);
        assert_eq!(scaled_height(7, 3, 600), 257);
        assert_eq!(scaled_height(5000, 1, 600), 1);
    }

    #[test]
    fn finished_image_is_padded_target_width() {
        let style = RenderStyle::default();
        let layer = layer_with_block(10, 10, 40, 20);
        let out = finish(&layer, &style, BackgroundColor::WHITE).unwrap();
        assert_eq!(out.dimensions(), (600 + 24, 300 + 24));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(312, 162), &Rgb([0, 0, 0]));
    }

    #[test]
    fn blank_layer_is_an_error() {
        let style = RenderStyle::default();
        assert!(matches!(
            finish(&RgbaImage::new(50, 50), &style, BackgroundColor::WHITE),
            Err(RenderError::Blank)
        ));
    }

    #[test]
    fn compositing() {
        assert_eq!(over([0, 0, 0, 0], [10, 20, 30]), Rgb([10, 20, 30]));
        assert_eq!(over([200, 0, 0, 255], [10, 20, 30]), Rgb([200, 0, 0]));
        assert_eq!(over([64, 64, 64, 128], [255, 255, 255]), Rgb([191, 191, 191]));
    }
}
