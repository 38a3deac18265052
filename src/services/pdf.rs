//! PDF export of match results.
//!
//! Layout (text positions and pagination) is computed in points by
//! [`layout_results`] and only then drawn by [`render_pages`], so page breaks
//! can be checked without parsing the PDF.

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rgb};
use thiserror::Error;

use crate::models::MatchResults;

/// A4 in points
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

const TOP_Y: f32 = 800.0;
const LEFT_X: f32 = 50.0;
const INDENT_X: f32 = 70.0;
const LINE_HEIGHT: f32 = 20.0;
const WRAP_WIDTH: f32 = 450.0;
const FOOTER_Y: f32 = 50.0;
/// Lines are never placed below this
const BOTTOM_MARGIN: f32 = 70.0;
/// A resource or insight starts on a new page below this
pub const BLOCK_BREAK_Y: f32 = 150.0;
/// The insights heading starts on a new page below this
pub const SECTION_BREAK_Y: f32 = 200.0;

const PRIMARY: (f32, f32, f32) = (0.05, 0.34, 0.38);
const MUTED: (f32, f32, f32) = (0.5, 0.5, 0.5);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

pub const PDF_FILENAME: &str = "business-support-matches.pdf";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF rendering failed: {0}")]
    Render(#[from] printpdf::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One positioned run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub color: (f32, f32, f32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

// Helvetica advance widths (1/1000 em) for ASCII 0x20..=0x7E
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Approximate rendered width of ASCII text in points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (0x20..=0x7E).contains(&code) {
                HELVETICA_WIDTHS[code - 0x20] as u32
            } else {
                556
            }
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap to a maximum width in points
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, size) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map text onto the characters the built-in Helvetica encoding can draw
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '£' => out.push_str("GBP "),
            '€' => out.push_str("EUR "),
            '–' | '—' | '•' => out.push('-'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: TOP_Y,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = TOP_Y;
    }

    /// Start a new page when the cursor is below `min_y`
    fn ensure(&mut self, min_y: f32) {
        if self.y < min_y {
            self.new_page();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn line(&mut self, text: &str, x: f32, size: f32, weight: FontWeight, color: (f32, f32, f32)) {
        if self.y < BOTTOM_MARGIN {
            self.new_page();
        }
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine {
                text: text.to_string(),
                x,
                y,
                size,
                weight,
                color,
            });
        }
        self.y -= LINE_HEIGHT;
    }

    fn wrapped(&mut self, text: &str, x: f32, size: f32) {
        for line in wrap_text(&pdf_safe(text), size, WRAP_WIDTH) {
            self.line(&line, x, size, FontWeight::Regular, BLACK);
        }
    }

    /// Place text at a fixed position on the current page
    fn fixed(&mut self, text: &str, y: f32, size: f32, color: (f32, f32, f32)) {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine {
                text: pdf_safe(text),
                x: LEFT_X,
                y,
                size,
                weight: FontWeight::Regular,
                color,
            });
        }
    }
}

/// Lay out the results document page by page
pub fn layout_results(results: &MatchResults, generated_on: &str) -> Vec<PageLayout> {
    let mut cursor = Cursor::new();
    let profile = &results.business_profile;

    cursor.line("Your Business Support Matches", LEFT_X, 18.0, FontWeight::Bold, PRIMARY);
    cursor.advance(LINE_HEIGHT);
    cursor.line("Business Profile:", LEFT_X, 14.0, FontWeight::Bold, PRIMARY);
    cursor.advance(LINE_HEIGHT / 2.0);

    for (label, value) in [
        ("Business Type", profile.business_type.clone()),
        ("Industry Sector", profile.industry_sector.clone()),
        ("Team Size", profile.team_size.clone()),
        ("Funding Stage", profile.funding_stage.clone()),
        ("Growth Goals", profile.growth_goals.join(", ")),
    ] {
        for line in wrap_text(&pdf_safe(&format!("{}: {}", label, value)), 12.0, WRAP_WIDTH) {
            cursor.line(&line, LEFT_X, 12.0, FontWeight::Regular, BLACK);
        }
    }
    cursor.advance(LINE_HEIGHT);

    cursor.line("Recommended Support Options:", LEFT_X, 14.0, FontWeight::Bold, PRIMARY);
    cursor.advance(LINE_HEIGHT / 2.0);

    if results.matches.is_empty() {
        cursor.line("No matches found", LEFT_X, 12.0, FontWeight::Regular, BLACK);
        cursor.advance(LINE_HEIGHT / 2.0);
    }

    for ranked in &results.matches {
        let resource = &ranked.resource;
        cursor.ensure(BLOCK_BREAK_Y);

        cursor.line(&pdf_safe(&resource.name), LEFT_X, 12.0, FontWeight::Bold, BLACK);
        cursor.wrapped(&format!("Type: {}", resource.resource_type), INDENT_X, 10.0);
        cursor.wrapped(&resource.description, INDENT_X, 10.0);
        if let Some(amount) = &resource.amount {
            cursor.wrapped(&format!("Amount: {}", amount), INDENT_X, 10.0);
        }
        if let Some(deadline) = &resource.deadline {
            cursor.wrapped(&format!("Deadline: {}", deadline), INDENT_X, 10.0);
        }
        cursor.wrapped(&format!("Apply at: {}", resource.apply_url), INDENT_X, 10.0);
        cursor.advance(LINE_HEIGHT / 2.0);
    }

    cursor.ensure(SECTION_BREAK_Y);
    cursor.line("Personalized Insights:", LEFT_X, 14.0, FontWeight::Bold, PRIMARY);
    cursor.advance(LINE_HEIGHT / 2.0);

    for insight in &results.insights {
        cursor.ensure(BLOCK_BREAK_Y);
        cursor.wrapped(&format!("- {}", insight), LEFT_X, 10.0);
        cursor.advance(LINE_HEIGHT / 2.0);
    }

    cursor.fixed(
        &format!("Generated on {} by Business Baraka Finder", generated_on),
        FOOTER_Y,
        10.0,
        MUTED,
    );

    cursor.pages
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Draw laid-out pages into a PDF document
pub fn render_pages(title: &str, pages: &[PageLayout]) -> Result<Vec<u8>, PdfError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        for line in &page.lines {
            let font: &IndirectFontRef = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            let (r, g, b) = line.color;
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            layer.use_text(line.text.as_str(), line.size, mm(line.x), mm(line.y), font);
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Lay out and render the results document
pub fn render_results_pdf(results: &MatchResults) -> Result<Vec<u8>, PdfError> {
    let generated_on = chrono::Utc::now().format("%d %b %Y").to_string();
    let pages = layout_results(results, &generated_on);
    tracing::debug!("Rendering results PDF with {} pages", pages.len());
    render_pages("Your Business Support Matches", &pages)
}
