//! Rasterizes a text panel into a PNG.
//!
//! Each character cell is drawn from the `font8x8` bitmap fonts, so the image
//! reads the same as the panel text. Lines wider than the image limit are cut
//! to fit; only a panel with too many rows is refused.
use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS,
};

use crate::export::{CaptureError, ExportableSurface};

const GLYPH_SIZE: u32 = 8;
const CELL_WIDTH: u32 = 8;
const CELL_HEIGHT: u32 = 10;
/// Pixel density multiplier.
const SCALE: u32 = 2;
const MARGIN_CELLS: u32 = 1;
const MAX_DIMENSION: u32 = 8192;
/// Widest line that still fits inside `MAX_DIMENSION`.
const MAX_COLUMNS: usize = (MAX_DIMENSION / (CELL_WIDTH * SCALE) - 2 * MARGIN_CELLS) as usize;
const CUT_MARKER: &str = "...";

const BACKGROUND: [u8; 4] = [0x0b, 0x10, 0x20, 0xff];
const FOREGROUND: [u8; 4] = [0xea, 0xf0, 0xff, 0xff];

/// A rendered text panel, one entry per display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPanelSurface {
    lines: Vec<String>,
}

impl TextPanelSurface {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into_iter().map(fit_line).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Pixel dimensions of the captured image.
    pub fn dimensions(&self) -> (u64, u64) {
        let columns = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as u64;
        let rows = self.lines.len() as u64;
        let margin = u64::from(MARGIN_CELLS) * 2;
        let width = (columns.max(1) + margin) * u64::from(CELL_WIDTH * SCALE);
        let height = (rows.max(1) + margin) * u64::from(CELL_HEIGHT * SCALE);
        (width, height)
    }

    fn paint(&self, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&BACKGROUND);
        }
        let pad_x = (CELL_WIDTH - GLYPH_SIZE) / 2 * SCALE;
        let pad_y = (CELL_HEIGHT - GLYPH_SIZE) / 2 * SCALE;
        for (row, line) in self.lines.iter().enumerate() {
            let top = (row as u32 + MARGIN_CELLS) * CELL_HEIGHT * SCALE + pad_y;
            for (column, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let left = (column as u32 + MARGIN_CELLS) * CELL_WIDTH * SCALE + pad_x;
                let bitmap = glyph(ch);
                for (gy, bits) in bitmap.iter().enumerate() {
                    for gx in 0..GLYPH_SIZE {
                        if bits & (1 << gx) == 0 {
                            continue;
                        }
                        for sy in 0..SCALE {
                            let y = top + gy as u32 * SCALE + sy;
                            let x = left + gx * SCALE;
                            let start = ((y * width + x) * 4) as usize;
                            let end = start + (SCALE * 4) as usize;
                            for px in pixels[start..end].chunks_exact_mut(4) {
                                px.copy_from_slice(&FOREGROUND);
                            }
                        }
                    }
                }
            }
        }
        pixels
    }
}

impl ExportableSurface for TextPanelSurface {
    fn capture_image(&self) -> Result<Vec<u8>, CaptureError> {
        let (width, height) = self.dimensions();
        let limit = u64::from(MAX_DIMENSION);
        if width > limit || height > limit {
            return Err(CaptureError::TooLarge { width, height });
        }
        let (width, height) = (width as u32, height as u32);
        let pixels = self.paint(width, height);

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|err| CaptureError::Failed(err.to_string()))?;
        writer
            .write_image_data(&pixels)
            .map_err(|err| CaptureError::Failed(err.to_string()))?;
        writer
            .finish()
            .map_err(|err| CaptureError::Failed(err.to_string()))?;
        Ok(out)
    }
}

fn fit_line(line: String) -> String {
    if line.chars().count() <= MAX_COLUMNS {
        return line;
    }
    let mut cut: String = line
        .chars()
        .take(MAX_COLUMNS - CUT_MARKER.len())
        .collect();
    cut.push_str(CUT_MARKER);
    cut
}

/// Bitmap rows for `ch`, least significant bit leftmost.
fn glyph(ch: char) -> [u8; 8] {
    let ch = match ch {
        '—' | '–' => '-',
        '…' => '.',
        '→' => '>',
        other => other,
    };
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0xff; 8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn painted(text: &str) -> Vec<u8> {
        let surface = TextPanelSurface::new(vec![text.to_string()]);
        let (w, h) = surface.dimensions();
        surface.paint(w as u32, h as u32)
    }

    #[test]
    fn dimensions_follow_longest_line_and_row_count() {
        let surface = TextPanelSurface::new(vec!["abc".into(), "a".into()]);
        let (w, h) = surface.dimensions();
        assert_eq!(w, (3 + 2) * 16);
        assert_eq!(h, (2 + 2) * 20);
    }

    #[test]
    fn empty_panel_still_captures() {
        let image = TextPanelSurface::new(Vec::new()).capture_image().unwrap();
        assert_eq!(image[..8], PNG_SIGNATURE);
    }

    #[test]
    fn overlong_line_is_cut_to_fit() {
        let surface = TextPanelSurface::new(vec![format!("https://{}", "x".repeat(2000))]);

        assert_eq!(surface.lines()[0].chars().count(), MAX_COLUMNS);
        assert!(surface.lines()[0].ends_with(CUT_MARKER));
        let (w, _) = surface.dimensions();
        assert!(w <= u64::from(MAX_DIMENSION));
        assert!(surface.capture_image().is_ok());
    }

    #[test]
    fn too_many_rows_are_refused() {
        let surface = TextPanelSurface::new(vec!["row".to_string(); 1000]);
        assert!(matches!(
            surface.capture_image(),
            Err(CaptureError::TooLarge { .. })
        ));
    }

    #[test]
    fn different_characters_draw_different_pixels() {
        let a = painted("A");
        let b = painted("B");
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
        assert!(a.chunks_exact(4).any(|px| px == FOREGROUND));
        assert_eq!(a[..4], BACKGROUND);
    }

    #[test]
    fn glyph_bits_map_to_scaled_pixels() {
        let bitmap = glyph('A');
        let (gy, gx) = (0..8)
            .flat_map(|y| (0..8).map(move |x| (y, x)))
            .find(|&(y, x)| bitmap[y] & (1 << x) != 0)
            .unwrap();
        let surface = TextPanelSurface::new(vec!["A".into()]);
        let (w, _) = surface.dimensions();
        let pixels = painted("A");
        let x = MARGIN_CELLS * CELL_WIDTH * SCALE + gx as u32 * SCALE;
        let y = MARGIN_CELLS * CELL_HEIGHT * SCALE
            + (CELL_HEIGHT - GLYPH_SIZE) / 2 * SCALE
            + gy as u32 * SCALE;
        let idx = ((y * w as u32 + x) * 4) as usize;
        assert_eq!(pixels[idx..idx + 4], FOREGROUND);
    }

    #[test]
    fn typographic_dash_draws_like_hyphen() {
        assert_eq!(glyph('—'), glyph('-'));
        assert_ne!(glyph('-'), glyph('?'));
    }
}
