// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF report writer
//!
//! US-letter pages with 1-inch margins. Layout is a single top-down cursor;
//! a new page starts whenever the next block would cross the bottom margin.

use chrono::Local;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;

use super::ExportError;
use crate::analysis::result::AnalysisResult;
use crate::config::defaults::{PDF_MAX_LABELS, PDF_MAX_OBJECTS};
use crate::vision::metadata::format_decimal;

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const INCH: f32 = 25.4;
const PT_TO_MM: f32 = 0.3528;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 7.0;

const TITLE_COLOR: (u8, u8, u8) = (0x1f, 0x29, 0x37);
const HEADING_COLOR: (u8, u8, u8) = (0x37, 0x41, 0x51);
const BODY_COLOR: (u8, u8, u8) = (0x00, 0x00, 0x00);
const HEADER_FILL: (u8, u8, u8) = (0xf3, 0xf4, 0xf6);
const GRID_COLOR: (u8, u8, u8) = (0xe5, 0xe7, 0xeb);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Approximate characters of Helvetica that fit in `width_mm` at `size` pt
fn chars_per_width(width_mm: f32, size: f32) -> usize {
    let avg_char_mm = size * 0.5 * PT_TO_MM;
    ((width_mm / avg_char_mm) as usize).max(1)
}

/// Greedy word wrap
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
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

fn fit_cell(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Cursor over the pages of one document
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance from page bottom, mm
    y: f32,
    pages: usize,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page if `height` mm would not fit above the bottom margin
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * 1.4
    }

    fn title(&mut self, text: &str) {
        let h = Self::line_height(TITLE_SIZE);
        self.ensure_space(h);
        self.y -= h;
        self.text(text, TITLE_SIZE, MARGIN, true, TITLE_COLOR);
        self.y -= 3.0;
    }

    fn heading(&mut self, text: &str) {
        let h = Self::line_height(HEADING_SIZE);
        // keep a heading together with at least one row of content
        self.ensure_space(h + ROW_HEIGHT + 4.0);
        self.y -= 4.0 + h;
        self.text(text, HEADING_SIZE, MARGIN, true, HEADING_COLOR);
        self.y -= 2.0;
    }

    fn paragraph(&mut self, text: &str) {
        let h = Self::line_height(BODY_SIZE);
        let max_chars = chars_per_width(self.content_width(), BODY_SIZE);
        for line in wrap_text(text, max_chars) {
            self.ensure_space(h);
            self.y -= h;
            self.text(&line, BODY_SIZE, MARGIN, false, BODY_COLOR);
        }
    }

    fn numbered(&mut self, items: &[String]) {
        let h = Self::line_height(BODY_SIZE);
        let indent = 6.0;
        let max_chars = chars_per_width(self.content_width() - indent, BODY_SIZE);
        for (i, item) in items.iter().enumerate() {
            for (j, line) in wrap_text(item, max_chars).iter().enumerate() {
                self.ensure_space(h);
                self.y -= h;
                if j == 0 {
                    self.text(&format!("{}.", i + 1), BODY_SIZE, MARGIN, false, BODY_COLOR);
                }
                self.text(line, BODY_SIZE, MARGIN + indent, false, BODY_COLOR);
            }
        }
    }

    fn rect_points(x: f32, y: f32, w: f32, h: f32) -> Vec<(Point, bool)> {
        vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ]
    }

    /// One table row; `self.y` is the row's top edge and moves to its bottom
    fn row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        self.ensure_space(ROW_HEIGHT);
        let top = self.y;
        let bottom = top - ROW_HEIGHT;
        let total: f32 = widths.iter().sum();

        if header {
            self.layer.set_fill_color(rgb(HEADER_FILL));
            self.layer.add_polygon(Polygon {
                rings: vec![Self::rect_points(MARGIN, bottom, total, ROW_HEIGHT)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }

        self.layer.set_outline_color(rgb(GRID_COLOR));
        self.layer.set_outline_thickness(0.5);
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths) {
            self.layer.add_line(Line {
                points: Self::rect_points(x, bottom, *width, ROW_HEIGHT),
                is_closed: true,
            });
            self.y = bottom + 2.3;
            let max_chars = chars_per_width(width - 4.0, BODY_SIZE);
            self.text(&fit_cell(cell, max_chars), BODY_SIZE, x + 2.0, header, BODY_COLOR);
            x += width;
        }
        self.y = bottom;
    }

    /// Table with a shaded header row; widths are in inches
    fn table(&mut self, headers: &[&str], rows: &[Vec<String>], widths_in: &[f32]) {
        let widths: Vec<f32> = widths_in.iter().map(|w| w * INCH).collect();
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

        self.row(&header_cells, &widths, true);
        for row in rows {
            if self.y - ROW_HEIGHT < MARGIN {
                self.new_page();
                self.row(&header_cells, &widths, true);
            }
            self.row(row, &widths, false);
        }
    }

    fn finish(self, file: File) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(pdf_err)?;
        Ok(())
    }
}

/// Render `result` as a PDF report
pub fn write_pdf(result: &AnalysisResult, file: File) -> Result<(), ExportError> {
    let mut report = ReportWriter::new("VisionAI Analysis Report")?;

    report.title("VisionAI Analysis Report");
    let generated = Local::now().format("Generated: %B %d, %Y at %I:%M %p").to_string();
    report.paragraph(&generated);
    report.y -= 4.0;

    if !result.summary.is_empty() {
        report.heading("Summary");
        report.paragraph(&result.summary);
    }

    let stats = result.statistics.rows();
    if !stats.is_empty() {
        report.heading("Statistics");
        let rows: Vec<Vec<String>> = stats
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v])
            .collect();
        report.table(&["Metric", "Value"], &rows, &[3.0, 2.0]);
    }

    if !result.captions.is_empty() {
        report.heading("Generated Captions");
        report.numbered(&result.captions);
    }

    if !result.labels.is_empty() {
        report.heading("Classification Labels");
        let rows: Vec<Vec<String>> = result
            .labels
            .iter()
            .take(PDF_MAX_LABELS)
            .map(|l| vec![l.description.clone(), format!("{}%", format_decimal(l.confidence))])
            .collect();
        report.table(&["Label", "Confidence"], &rows, &[3.5, 1.5]);
    }

    if !result.objects.is_empty() {
        report.heading("Detected Objects");
        let rows: Vec<Vec<String>> = result
            .objects
            .iter()
            .take(PDF_MAX_OBJECTS)
            .map(|o| {
                vec![
                    o.name.clone(),
                    o.count.to_string(),
                    format!("{}%", format_decimal(o.confidence)),
                ]
            })
            .collect();
        report.table(&["Object", "Count", "Confidence"], &rows, &[2.5, 1.0, 1.5]);
    }

    let meta = &result.metadata;
    if meta.width > 0 || meta.height > 0 || !meta.format.is_empty() {
        report.heading("Image Metadata");
        let rows: Vec<Vec<String>> = meta
            .display_rows()
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), v])
            .collect();
        report.table(&["Property", "Value"], &rows, &[2.5, 2.5]);
    }

    report.finish(file)
}
