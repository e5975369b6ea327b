//! Structured layout renderer.
//!
//! Lays the declaration out as an ordered list of blocks and draws them
//! straight onto A4 pages with `printpdf`, without any intermediate markup.

use image::DynamicImage;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};

use super::common::{COMPANY_ADDRESS, COMPANY_NAME};
use super::signature::decode_signature_image;
use super::traits::Renderer;
use super::GeneratorError;
use crate::declaration::models::PassportDeclaration;
use crate::storage::NamingScheme;

// All geometry is in PostScript points; converted to millimetres when drawing.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 12.0;
const TABLE_FONT_SIZE: f32 = 11.0;
const TABLE_ROW_HEIGHT: f32 = 18.0;
const TABLE_COLUMNS: [f32; 4] = [100.0, 150.0, 120.0, 150.0];
const SIGNATURE_WIDTH: f32 = 120.0;
const SIGNATURE_HEIGHT: f32 = 60.0;
const IMAGE_DPI: f32 = 300.0;

// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
const BOLD_GLYPH_WIDTH: f32 = 0.55;

const TITLE_COLOR: (f32, f32, f32) = (10.0 / 255.0, 74.0 / 255.0, 130.0 / 255.0);
const HEADER_FILL: (f32, f32, f32) = (0.827, 0.827, 0.827);
const GRID_COLOR: (f32, f32, f32) = (0.5, 0.5, 0.5);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// One element of the document, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Paragraph { text: String, bold: bool },
    /// Paragraph mixing regular and bold spans.
    Rich(Vec<Run>),
    /// Regular label followed by a bold value on the same line.
    Field { label: String, value: String },
    Spacer(f32),
    Table(Vec<[String; 4]>),
    Signature,
}

/// A span of paragraph text set in a single weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// A word placed on a line; `x` is measured from the left margin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub bold: bool,
    pub x: f32,
}

impl Block {
    fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            bold: false,
        }
    }

    fn field(label: &str, value: &str) -> Self {
        Self::Field {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Build the ordered block list for a declaration.
pub fn build_blocks(declaration: &PassportDeclaration) -> Vec<Block> {
    vec![
        Block::Title("Passport Declaration Form".to_string()),
        Block::Spacer(20.0),
        Block::Paragraph {
            text: COMPANY_NAME.to_string(),
            bold: true,
        },
        Block::paragraph(COMPANY_ADDRESS),
        Block::Spacer(20.0),
        Block::field("Date:", &declaration.date),
        Block::Spacer(10.0),
        Block::Rich(vec![
            Run::plain(format!("I have joined {} as a ", COMPANY_NAME)),
            Run::bold(declaration.designation.as_str()),
            Run::plain(" on "),
            Run::bold(declaration.joining_date.as_str()),
            Run::plain("."),
        ]),
        Block::Spacer(10.0),
        Block::paragraph(
            "I request the company to retain my passport for safekeeping. \
             The details of my passport are as follows:",
        ),
        Block::Spacer(15.0),
        Block::Table(vec![
            [
                "Nationality".to_string(),
                declaration.nationality.clone(),
                "Passport Number".to_string(),
                declaration.passport_number.clone(),
            ],
            [
                "Issued Location".to_string(),
                declaration.issue_location.clone(),
                "Date of Issue".to_string(),
                declaration.issue_date.clone(),
            ],
            [
                "Date of Expiry".to_string(),
                declaration.expiry_date.clone(),
                String::new(),
                String::new(),
            ],
        ]),
        Block::Spacer(20.0),
        Block::paragraph(
            "I agree that my passport will be handed over to me whenever required by me \
             as per my request and the same will be returned to the company on the mentioned date.",
        ),
        Block::Spacer(40.0),
        Block::field("Employee Name:", &declaration.employee_name),
        Block::field("Employee Code:", &declaration.employee_code),
        Block::Spacer(20.0),
        Block::paragraph("Signature:"),
        Block::Signature,
    ]
}

/// Greedy word wrap on an estimated character budget.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap mixed-weight runs into lines no wider than `max_width` points.
///
/// A word that directly continues the previous run, such as trailing
/// punctuation, is glued to it and never starts a new line.
pub fn layout_runs(runs: &[Run], size: f32, max_width: f32) -> Vec<Vec<PlacedWord>> {
    let space = estimate_width(" ", size, false);
    let mut lines = Vec::new();
    let mut line: Vec<PlacedWord> = Vec::new();
    let mut width = 0.0;
    let mut after_space = true;

    for run in runs {
        let leading_space = run.text.starts_with(char::is_whitespace);
        for (index, word) in run.text.split_whitespace().enumerate() {
            let glued = index == 0 && !leading_space && !after_space;
            let word_width = estimate_width(word, size, run.bold);
            let mut gap = if line.is_empty() || glued { 0.0 } else { space };

            if !glued && !line.is_empty() && width + gap + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                gap = 0.0;
            }

            line.push(PlacedWord {
                text: word.to_string(),
                bold: run.bold,
                x: width + gap,
            });
            width += gap + word_width;
        }
        if !run.text.is_empty() {
            after_space = run.text.ends_with(char::is_whitespace);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn estimate_width(text: &str, size: f32, bold: bool) -> f32 {
    let factor = if bold { BOLD_GLYPH_WIDTH } else { GLYPH_WIDTH };
    text.chars().count() as f32 * size * factor
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Page cursor over a printpdf document.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl Canvas {
    fn new(title: &str) -> Result<Self, GeneratorError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| GeneratorError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| GeneratorError::Render(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.cursor - needed >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, mm(x), mm(y), font);
    }

    fn draw(&mut self, block: &Block, signature: &DynamicImage) {
        match block {
            Block::Title(title) => self.draw_title(title),
            Block::Paragraph { text, bold } => self.draw_paragraph(text, *bold),
            Block::Rich(runs) => self.draw_rich(runs),
            Block::Field { label, value } => self.draw_field(label, value),
            Block::Spacer(height) => {
                self.cursor -= height;
            }
            Block::Table(rows) => self.draw_table(rows),
            Block::Signature => self.draw_signature(signature),
        }
    }

    fn draw_title(&mut self, title: &str) {
        let leading = TITLE_SIZE * 1.2;
        self.ensure_space(leading);
        self.cursor -= leading;

        let width = estimate_width(title, TITLE_SIZE, true);
        let x = MARGIN + ((CONTENT_WIDTH - width) / 2.0).max(0.0);
        self.layer.set_fill_color(rgb(TITLE_COLOR));
        self.text(title, TITLE_SIZE, x, self.cursor, true);
        self.layer.set_fill_color(rgb(BLACK));
    }

    fn draw_paragraph(&mut self, text: &str, bold: bool) {
        let factor = if bold { BOLD_GLYPH_WIDTH } else { GLYPH_WIDTH };
        let max_chars = (CONTENT_WIDTH / (BODY_SIZE * factor)) as usize;

        for line in wrap_text(text, max_chars) {
            self.ensure_space(BODY_LEADING);
            self.cursor -= BODY_LEADING;
            self.text(&line, BODY_SIZE, MARGIN, self.cursor, bold);
        }
    }

    fn draw_rich(&mut self, runs: &[Run]) {
        for line in layout_runs(runs, BODY_SIZE, CONTENT_WIDTH) {
            self.ensure_space(BODY_LEADING);
            self.cursor -= BODY_LEADING;
            for word in &line {
                self.text(&word.text, BODY_SIZE, MARGIN + word.x, self.cursor, word.bold);
            }
        }
    }

    fn draw_field(&mut self, label: &str, value: &str) {
        self.ensure_space(BODY_LEADING);
        self.cursor -= BODY_LEADING;

        self.text(label, BODY_SIZE, MARGIN, self.cursor, false);
        let offset = estimate_width(label, BODY_SIZE, false) + BODY_SIZE * GLYPH_WIDTH;
        self.text(value, BODY_SIZE, MARGIN + offset, self.cursor, true);
    }

    fn draw_table(&mut self, rows: &[[String; 4]]) {
        let table_width: f32 = TABLE_COLUMNS.iter().sum();
        let table_height = TABLE_ROW_HEIGHT * rows.len() as f32;
        self.ensure_space(table_height);

        let left = MARGIN + (CONTENT_WIDTH - table_width) / 2.0;
        let top = self.cursor;
        let bottom = top - table_height;

        // header row background
        self.layer.set_fill_color(rgb(HEADER_FILL));
        self.layer.add_rect(
            Rect::new(
                mm(left),
                mm(top - TABLE_ROW_HEIGHT),
                mm(left + table_width),
                mm(top),
            )
            .with_mode(PaintMode::Fill),
        );
        self.layer.set_fill_color(rgb(BLACK));

        self.layer.set_outline_color(rgb(GRID_COLOR));
        self.layer.set_outline_thickness(0.5);
        for row in 1..rows.len() {
            let y = top - TABLE_ROW_HEIGHT * row as f32;
            self.stroke(&[(left, y), (left + table_width, y)], false);
        }
        let mut x = left;
        for width in &TABLE_COLUMNS[..TABLE_COLUMNS.len() - 1] {
            x += width;
            self.stroke(&[(x, top), (x, bottom)], false);
        }

        self.layer.set_outline_color(rgb(BLACK));
        self.layer.set_outline_thickness(1.0);
        self.stroke(
            &[
                (left, bottom),
                (left + table_width, bottom),
                (left + table_width, top),
                (left, top),
            ],
            true,
        );

        for (index, row) in rows.iter().enumerate() {
            let baseline = top - TABLE_ROW_HEIGHT * (index as f32 + 1.0) + (TABLE_ROW_HEIGHT - TABLE_FONT_SIZE) / 2.0 + 2.0;
            let mut x = left;
            for (cell, width) in row.iter().zip(TABLE_COLUMNS.iter()) {
                if !cell.is_empty() {
                    self.text(cell, TABLE_FONT_SIZE, x + 4.0, baseline, false);
                }
                x += width;
            }
        }

        self.cursor = bottom;
    }

    fn draw_signature(&mut self, signature: &DynamicImage) {
        self.ensure_space(SIGNATURE_HEIGHT);
        self.cursor -= SIGNATURE_HEIGHT;

        // printpdf sizes images by pixel count and DPI; scale to the fixed box.
        let natural_width = signature.width().max(1) as f32 * 72.0 / IMAGE_DPI;
        let natural_height = signature.height().max(1) as f32 * 72.0 / IMAGE_DPI;

        Image::from_dynamic_image(signature).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(MARGIN)),
                translate_y: Some(mm(self.cursor)),
                scale_x: Some(SIGNATURE_WIDTH / natural_width),
                scale_y: Some(SIGNATURE_HEIGHT / natural_height),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    fn stroke(&self, points: &[(f32, f32)], closed: bool) {
        let line = Line {
            points: points
                .iter()
                .map(|&(x, y)| (Point::new(mm(x), mm(y)), false))
                .collect(),
            is_closed: closed,
        };
        self.layer.add_line(line);
    }

    fn finish(self) -> Result<Vec<u8>, GeneratorError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| GeneratorError::Render(e.to_string()))
    }
}

/// Draws the declaration directly with `printpdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutRenderer;

impl LayoutRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for LayoutRenderer {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn naming_scheme(&self) -> NamingScheme {
        NamingScheme::Timestamp
    }

    fn render(&self, declaration: &PassportDeclaration) -> Result<Vec<u8>, GeneratorError> {
        let signature = decode_signature_image(&declaration.signature)?;

        let title = format!("Passport Declaration - {}", declaration.employee_name);
        let mut canvas = Canvas::new(&title)?;
        for block in build_blocks(declaration) {
            canvas.draw(&block, &signature);
        }
        canvas.finish()
    }
}
