//! PDF rendering engine.
//!
//! Draws a computed layout onto a single A4 page with printpdf and writes the
//! result to temporary storage. The write is flushed and synced before the
//! engine reports success, so the file is complete when upload starts.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use printpdf::{IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use tokio::io::AsyncWriteExt;
use ttf_parser::Face;

use super::layout::{Align, TextLine};
use super::RenderError;

/// DejaVu Sans, embedded when no font is configured. Covers `₹`.
pub static DEFAULT_FONT: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/fonts/DejaVuSans.ttf"));

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PT_TO_MM: f32 = 0.352_778;
const MARGIN_MM: f32 = 50.0 * PT_TO_MM;
const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const LINE_SPACING: f32 = 1.2;
const UNDERLINE_OFFSET_MM: f32 = 1.0;
const UNDERLINE_THICKNESS_PT: f32 = 0.5;

/// Advance widths read from the embedded font.
pub struct FontMetrics<'a> {
    face: Face<'a>,
}

impl<'a> FontMetrics<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, RenderError> {
        let face = Face::parse(data, 0).map_err(|e| RenderError::InvalidFont(e.to_string()))?;
        Ok(Self { face })
    }

    /// Width of `text` in millimetres. Characters without a glyph are not
    /// drawn by printpdf either, so they count as zero.
    pub fn text_width_mm(&self, text: &str, font_size: f32) -> f32 {
        let units_per_em = f32::from(self.face.units_per_em());
        let units: u32 = text
            .chars()
            .filter_map(|c| self.face.glyph_index(c))
            .filter_map(|glyph| self.face.glyph_hor_advance(glyph))
            .map(u32::from)
            .sum();
        units as f32 / units_per_em * font_size * PT_TO_MM
    }

    /// Break `text` into pieces no wider than `max_width` mm, on spaces where
    /// possible and inside a word when the word alone is too wide.
    pub fn wrap(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();

        for word in text.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if current.is_empty() || self.text_width_mm(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                pieces.push(std::mem::take(&mut current));
                current = word.to_string();
            }

            while self.text_width_mm(&current, font_size) > max_width {
                let split = self.fitting_prefix_len(&current, font_size, max_width);
                let rest = current.split_off(split);
                pieces.push(std::mem::replace(&mut current, rest));
            }
        }

        if !current.is_empty() || pieces.is_empty() {
            pieces.push(current);
        }
        pieces
    }

    /// Byte length of the longest prefix that fits, at least one character.
    fn fitting_prefix_len(&self, text: &str, font_size: f32, max_width: f32) -> usize {
        let mut end = 0;
        for (idx, ch) in text.char_indices() {
            let next = idx + ch.len_utf8();
            if end > 0 && self.text_width_mm(&text[..next], font_size) > max_width {
                break;
            }
            end = next;
        }
        end
    }
}

/// Stateless engine for turning layouts into PDF files.
pub struct PdfRenderEngine;

impl PdfRenderEngine {
    /// Build the PDF bytes for a layout.
    ///
    /// # Arguments
    /// * `title` - Document title, usually the invoice id.
    /// * `lines` - Text lines in top-to-bottom order.
    /// * `font_path` - Optional TrueType font; the bundled DejaVu Sans when `None`.
    pub fn build(
        title: &str,
        lines: &[TextLine],
        font_path: Option<&Path>,
    ) -> Result<Vec<u8>, RenderError> {
        let font_data: Cow<'static, [u8]> = match font_path {
            Some(path) => Cow::Owned(fs::read(path).map_err(|source| RenderError::FontIo {
                path: path.to_path_buf(),
                source,
            })?),
            None => Cow::Borrowed(DEFAULT_FONT),
        };
        let metrics = FontMetrics::parse(&font_data)?;

        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Invoice");
        let font = doc.add_external_font(font_data.as_ref())?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut baseline = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in lines {
            let height = line_height_mm(line.font_size);
            baseline -= height * line.gap_before;

            for piece in metrics.wrap(&line.text, line.font_size, CONTENT_WIDTH_MM) {
                baseline -= height;
                let width = metrics.text_width_mm(&piece, line.font_size);
                draw_piece(&layer, &font, line, &piece, width, baseline);
            }
        }

        Ok(doc.save_to_bytes()?)
    }

    /// Build the PDF off the async runtime and write it to `path`.
    pub async fn render_to_file(
        path: &Path,
        title: String,
        lines: Vec<TextLine>,
        font_path: Option<PathBuf>,
    ) -> Result<Vec<u8>, RenderError> {
        let bytes = tokio::task::spawn_blocking(move || {
            Self::build(&title, &lines, font_path.as_deref())
        })
        .await??;

        if let Err(source) = write_synced(path, &bytes).await {
            remove_partial(path).await;
            return Err(RenderError::Write {
                path: path.to_path_buf(),
                source,
            });
        }

        Ok(bytes)
    }
}

/// Left edge of a piece of text `width` mm wide.
fn x_position(align: Align, width: f32) -> f32 {
    match align {
        Align::Left => MARGIN_MM,
        Align::Right => PAGE_WIDTH_MM - MARGIN_MM - width,
        Align::Center => (PAGE_WIDTH_MM - width) / 2.0,
    }
    .max(MARGIN_MM)
}

fn draw_piece(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    line: &TextLine,
    piece: &str,
    width: f32,
    baseline: f32,
) {
    let x = x_position(line.align, width);
    layer.use_text(piece, line.font_size, Mm(x), Mm(baseline), font);

    if line.underline {
        let y = baseline - UNDERLINE_OFFSET_MM;
        layer.set_outline_thickness(UNDERLINE_THICKNESS_PT);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(y)), false),
                (Point::new(Mm(x + width), Mm(y)), false),
            ],
            is_closed: false,
        });
    }
}

fn line_height_mm(font_size: f32) -> f32 {
    font_size * LINE_SPACING * PT_TO_MM
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => log::debug!("Removed partial invoice file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove partial invoice file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::layout::{layout_invoice, InvoiceMeta};
    use crate::invoice::InvoiceRequest;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_lines(customer: &str) -> Vec<TextLine> {
        let request = InvoiceRequest::new(customer, Decimal::from(500), "Shararat Team")
            .with_line_item("Consulting", 3, Decimal::from(100));
        let meta = InvoiceMeta {
            invoice_id: "INV-000000000001",
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            currency_symbol: "₹",
        };
        layout_invoice(&request, &meta)
    }

    /// Every string shown with `Tj` on the first page, as raw glyph-id bytes.
    fn shown_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
        let doc = lopdf::Document::load_mem(pdf).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first()?.as_str().ok().map(<[u8]>::to_vec))
            .collect()
    }

    /// Encode text the way printpdf does for embedded fonts: big-endian glyph ids.
    fn glyph_bytes(text: &str) -> Vec<u8> {
        let face = Face::parse(DEFAULT_FONT, 0).unwrap();
        text.chars()
            .filter_map(|c| face.glyph_index(c))
            .flat_map(|glyph| glyph.0.to_be_bytes())
            .collect()
    }

    #[test]
    fn test_build_produces_pdf() {
        let bytes = PdfRenderEngine::build("INV-000000000001", &sample_lines("Shubham"), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_default_font_has_rupee_sign() {
        let face = Face::parse(DEFAULT_FONT, 0).unwrap();
        assert!(face.glyph_index('₹').is_some());
    }

    #[test]
    fn test_total_with_currency_symbol_is_drawn() {
        let bytes = PdfRenderEngine::build("INV-000000000001", &sample_lines("Shubham"), None).unwrap();
        let shown = shown_strings(&bytes);

        assert!(shown.contains(&glyph_bytes("Total: ₹500")));
        assert!(shown.contains(&glyph_bytes("1. Consulting — Qty: 3 — ₹100")));
        assert!(!shown.contains(&glyph_bytes("Total: 500")));
    }

    #[test]
    fn test_missing_font_is_reported() {
        let result = PdfRenderEngine::build("x", &sample_lines("Ann"), Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(RenderError::FontIo { .. })));
    }

    #[test]
    fn test_unreadable_font_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let result = PdfRenderEngine::build("x", &sample_lines("Ann"), Some(&path));
        assert!(matches!(result, Err(RenderError::InvalidFont(_))));
    }

    #[test]
    fn test_long_name_wraps_inside_margins() {
        let metrics = FontMetrics::parse(DEFAULT_FONT).unwrap();
        let name = "Shubham Kumar ".repeat(15);
        let name = name.trim_end();
        assert!(metrics.text_width_mm(name, 12.0) > CONTENT_WIDTH_MM);

        let pieces = metrics.wrap(name, 12.0, CONTENT_WIDTH_MM);
        assert!(pieces.len() > 1);
        assert_eq!(pieces.join(" "), name);
        for piece in &pieces {
            let width = metrics.text_width_mm(piece, 12.0);
            assert!(width <= CONTENT_WIDTH_MM);
            let x = x_position(Align::Right, width);
            assert!(x >= MARGIN_MM && x + width <= PAGE_WIDTH_MM - MARGIN_MM + 0.01);
        }
    }

    #[test]
    fn test_unbroken_word_is_split() {
        let metrics = FontMetrics::parse(DEFAULT_FONT).unwrap();
        let word = "W".repeat(200);

        let pieces = metrics.wrap(&word, 12.0, CONTENT_WIDTH_MM);
        assert!(pieces.len() > 1);
        assert_eq!(pieces.concat(), word);
        assert!(pieces
            .iter()
            .all(|piece| metrics.text_width_mm(piece, 12.0) <= CONTENT_WIDTH_MM));
    }

    #[test]
    fn test_short_text_is_one_piece() {
        let metrics = FontMetrics::parse(DEFAULT_FONT).unwrap();
        assert_eq!(metrics.wrap("Bill To:", 14.0, CONTENT_WIDTH_MM), vec!["Bill To:"]);
    }

    #[test]
    fn test_long_name_renders_every_piece() {
        let name = "A".repeat(200);
        let bytes = PdfRenderEngine::build("x", &sample_lines(&name), None).unwrap();
        let shown = shown_strings(&bytes);

        let metrics = FontMetrics::parse(DEFAULT_FONT).unwrap();
        for piece in metrics.wrap(&name, 12.0, CONTENT_WIDTH_MM) {
            assert!(shown.contains(&glyph_bytes(&piece)));
        }
    }

    #[tokio::test]
    async fn test_render_to_file_writes_complete_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("INV-000000000001_Shubham.pdf");

        let bytes = PdfRenderEngine::render_to_file(&path, "INV-000000000001".into(), sample_lines("Shubham"), None)
            .await
            .unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk, bytes);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("invoice.pdf");

        let result = PdfRenderEngine::render_to_file(&path, "x".into(), sample_lines("Ann"), None).await;

        assert!(matches!(result, Err(RenderError::Write { .. })));
        assert!(!path.exists());
    }
}
