//! PDF rendering of a laid-out `ReportDocument`.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use thiserror::Error;

use crate::report::document::{
    LineStyle, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, REPORT_TITLE, ReportDocument,
};

/// Failure to produce or persist a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render PDF: {0}")]
    Render(String),
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn for_style(&self, style: LineStyle) -> &IndirectFontRef {
        match style {
            LineStyle::Title | LineStyle::Heading => &self.bold,
            LineStyle::Body => &self.regular,
            LineStyle::Footer => &self.italic,
        }
    }
}

/// Render the document to PDF bytes in memory.
pub fn render_pdf(doc: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let (pdf, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font = |f: BuiltinFont| {
        pdf.add_builtin_font(f)
            .map_err(|e| ReportError::Render(format!("font: {e}")))
    };
    let fonts = Fonts {
        regular: font(BuiltinFont::Helvetica)?,
        bold: font(BuiltinFont::HelveticaBold)?,
        italic: font(BuiltinFont::HelveticaOblique)?,
    };

    for (i, page) in doc.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = pdf.get_page(page_idx).get_layer(layer_idx);

        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            let size = line.style.font_size_pt();
            let x = if line.style.centered() {
                centered_x(&line.text, size)
            } else {
                MARGIN_MM
            };
            // PDF origin is bottom-left; place the baseline ~70% down the cell.
            let y = PAGE_HEIGHT_MM - line.top_mm - cell_baseline_mm(size);
            layer.use_text(line.text.as_str(), size, Mm(x), Mm(y), fonts.for_style(line.style));
        }
    }

    pdf.save_to_bytes()
        .map_err(|e| ReportError::Render(e.to_string()))
}

fn cell_baseline_mm(size_pt: f32) -> f32 {
    5.0 + size_pt * 0.3528 * 0.35
}

fn centered_x(text: &str, size_pt: f32) -> f32 {
    let approx_width = text.chars().count() as f32 * size_pt * 0.3528 * 0.5;
    ((PAGE_WIDTH_MM - approx_width) / 2.0).max(MARGIN_MM)
}

impl ReportDocument {
    /// Render to PDF bytes in memory.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, ReportError> {
        render_pdf(self)
    }
}
