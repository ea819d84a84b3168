// lib/src/export/pdf_writer.rs
// Renders laid-out pages with printpdf. Layout coordinates are measured from
// the top of the page; printpdf measures from the bottom.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::pdf_layout::{LayoutElement, LayoutPage, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::errors::{ClinicError, Result};

const LAYER_NAME: &str = "Layer 1";
const RULE_THICKNESS_PT: f32 = 0.57;

fn draw_page(layer: &PdfLayerReference, page: &LayoutPage, font: &IndirectFontRef) {
    layer.set_outline_thickness(RULE_THICKNESS_PT);
    for element in &page.elements {
        match element {
            LayoutElement::Text { x, y, size, text } => {
                layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT_MM - *y), font);
            }
            LayoutElement::Rule { x1, x2, y } => {
                let y = Mm(PAGE_HEIGHT_MM - *y);
                layer.add_line(Line {
                    points: vec![(Point::new(Mm(*x1), y), false), (Point::new(Mm(*x2), y), false)],
                    is_closed: false,
                });
            }
        }
    }
}

/// Serializes the pages into one A4 document titled `title`. An empty page
/// list still yields a single blank page.
pub fn write_pdf(title: &str, pages: &[LayoutPage]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ClinicError::ExportError(format!("PDF font error: {e}")))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &font);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ClinicError::ExportError(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ClinicError::ExportError(format!("PDF buffer error: {e}")))
}
