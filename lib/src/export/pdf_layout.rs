// lib/src/export/pdf_layout.rs
// Page geometry in millimetres on an A4 portrait page, origin top-left.

use models::VisitRecord;

use super::or_default;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const TITLE_Y: f32 = 15.0;
pub const TOP_MARGIN_Y: f32 = 10.0;
/// A visit whose header would start below this line goes to a new page.
pub const PAGE_BREAK_Y: f32 = 270.0;
pub const WRAP_WIDTH_MM: f32 = 180.0;

const TITLE_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const WRAPPED_LINE_STEP: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text { x: f32, y: f32, size: f32, text: String },
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPage {
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.elements.push(LayoutElement::Text { x, y, size, text: text.into() });
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Text { text, .. } => Some(text.as_str()),
            LayoutElement::Rule { .. } => None,
        })
    }
}

/// Greedy word wrap. Widths are estimated with Helvetica's average glyph
/// advance (about half the font size), converted from points to millimetres.
pub fn wrap_text(text: &str, width_mm: f32, font_size: f32) -> Vec<String> {
    let char_width_mm = font_size * 0.5 * 25.4 / 72.0;
    let columns = ((width_mm / char_width_mm).floor() as usize).max(1);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            // Words longer than a whole line are hard-split.
            while word.chars().count() > columns {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let head: String = word.chars().take(columns).collect();
                word = word.chars().skip(columns).collect();
                lines.push(head);
            }
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > columns && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }
    lines
}

/// Lays out the history PDF: a title, then one block per visit. Empty
/// fields print as `N/A`.
pub fn layout_history(title: &str, visits: &[VisitRecord]) -> Vec<LayoutPage> {
    let mut pages = vec![LayoutPage::default()];
    let mut y = TITLE_Y;
    pages[0].text(10.0, y, TITLE_SIZE, title);
    y += 10.0;

    for (index, visit) in visits.iter().enumerate() {
        if y > PAGE_BREAK_Y {
            pages.push(LayoutPage::default());
            y = TOP_MARGIN_Y;
        }
        let page = match pages.last_mut() {
            Some(page) => page,
            None => break,
        };

        page.text(
            10.0,
            y,
            HEADER_SIZE,
            format!("Encuentro #{} - Fecha: {}", index + 1, or_default(&visit.date, "N/A")),
        );
        y += 8.0;

        page.text(15.0, y, BODY_SIZE, format!("Motivo: {}", or_default(&visit.reason, "N/A")));
        y += 6.0;
        page.text(15.0, y, BODY_SIZE, format!("Peso: {} kg", or_default(&visit.weight, "N/A")));
        y += 6.0;
        page.text(15.0, y, BODY_SIZE, format!("Presión: {}", or_default(&visit.blood_pressure, "N/A")));
        y += 6.0;

        for (label, value) in [
            ("Diagnóstico", &visit.diagnosis),
            ("Tratamiento", &visit.treatment),
            ("Observaciones", &visit.notes),
        ] {
            let lines = wrap_text(&format!("{}: {}", label, or_default(value, "N/A")), WRAP_WIDTH_MM, BODY_SIZE);
            for (offset, line) in lines.iter().enumerate() {
                page.text(15.0, y + offset as f32 * WRAPPED_LINE_STEP, BODY_SIZE, line.clone());
            }
            y += lines.len() as f32 * WRAPPED_LINE_STEP + 3.0;
        }

        y += 2.0;
        page.elements.push(LayoutElement::Rule { x1: 10.0, x2: 200.0, y });
        y += 7.0;
    }
    pages
}
