//! Report layout: header, user details, prediction insight, page footer.
//!
//! Layout and rendering are separate steps. `build_report` produces a list of
//! positioned text lines per page; `pdf::render_pdf` only draws them. This
//! keeps the content checkable without parsing PDF streams.

use crate::domain::{ApplicantRecord, Category, PremiumEstimate};
use crate::report::format::format_currency;

pub const REPORT_TITLE: &str = "Medical Insurance Premium Report";
/// Suggested download file name.
pub const REPORT_FILE_NAME: &str = "Insurance_Premium_Report.pdf";
pub const REPORT_MIME: &str = "application/pdf";

/// A4 portrait, millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// First body baseline region starts below the header cell plus a 5mm gap.
pub const BODY_TOP_MM: f32 = 25.0;
/// Body flows to a new page below this line (20mm bottom margin).
pub const BODY_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - 20.0;
/// Footer cell top, 15mm from the bottom edge.
pub const FOOTER_TOP_MM: f32 = PAGE_HEIGHT_MM - 15.0;
pub const LINE_HEIGHT_MM: f32 = 10.0;

const GREETING: &str = "Dear Sir/Madam,\n\nThank you for using the Medical Insurance Premium Predictor. Based on the information you provided, your predicted annual premium falls into the following range:";
const INSIGHT_LEAD: &str = "Based on our trained machine learning model, your expected premium is:";
const INSIGHT_BODY: &str = "This prediction considers your physical and lifestyle characteristics, as well as regional factors, to help insurance providers assess premium rates accurately. Please consult your insurer for detailed breakdowns and eligibility terms.\n\nWarm regards,\nThe InsureSmart Team";

/// Font and size of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Bold 14pt, centered (page header).
    Title,
    /// Bold 12pt.
    Heading,
    /// Regular 12pt.
    Body,
    /// Italic 8pt, centered (page footer).
    Footer,
}

impl LineStyle {
    pub fn font_size_pt(self) -> f32 {
        match self {
            LineStyle::Title => 14.0,
            LineStyle::Heading | LineStyle::Body => 12.0,
            LineStyle::Footer => 8.0,
        }
    }

    pub fn centered(self) -> bool {
        matches!(self, LineStyle::Title | LineStyle::Footer)
    }
}

/// One positioned line. `top_mm` is the top of its cell, from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
    pub top_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub number: usize,
    pub lines: Vec<ReportLine>,
}

/// A laid-out report, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    /// All line texts in reading order (headers and footers included).
    pub fn text_lines(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.as_str()))
            .collect()
    }

    /// Plain-text rendering, one line per row and a form feed between pages.
    pub fn to_plain_text(&self) -> String {
        let pages: Vec<String> = self
            .pages
            .iter()
            .map(|p| {
                let lines: Vec<&str> = p.lines.iter().map(|l| l.text.as_str()).collect();
                lines.join("\n")
            })
            .collect();
        pages.join("\n\x0c\n")
    }
}

/// The `- Field: value` lines of the User Details section.
pub fn user_detail_lines(record: &ApplicantRecord) -> Vec<String> {
    vec![
        format!("- Age: {}", record.age()),
        format!("- Sex: {}", record.sex().display_name()),
        format!("- BMI: {:?}", record.bmi()),
        format!("- Children: {}", record.children()),
        format!("- Smoker: {}", record.smoker().display_name()),
        format!("- Region: {}", record.region().display_name()),
    ]
}

/// Lay out the report for one submission.
pub fn build_report(record: &ApplicantRecord, estimate: PremiumEstimate) -> ReportDocument {
    let mut flow = Flow::new();

    flow.paragraph(LineStyle::Body, GREETING);
    flow.gap(LINE_HEIGHT_MM);

    flow.line(LineStyle::Heading, "User Details:");
    for line in user_detail_lines(record) {
        flow.line(LineStyle::Body, &line);
    }
    flow.gap(5.0);

    flow.line(LineStyle::Heading, "Prediction Insight:");
    let amount = format!("USD ${} per year", format_currency(estimate.value()));
    flow.paragraph(
        LineStyle::Body,
        &format!("{INSIGHT_LEAD}\n\n{amount}\n\n{INSIGHT_BODY}"),
    );

    flow.finish()
}

/// Cursor-based page flow, filling pages top to bottom.
struct Flow {
    pages: Vec<ReportPage>,
    y: f32,
}

impl Flow {
    fn new() -> Self {
        let mut flow = Self {
            pages: Vec::new(),
            y: BODY_TOP_MM,
        };
        flow.new_page();
        flow
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(ReportPage {
            number,
            lines: vec![ReportLine {
                style: LineStyle::Title,
                text: REPORT_TITLE.to_string(),
                top_mm: MARGIN_MM,
            }],
        });
        self.y = BODY_TOP_MM;
    }

    fn gap(&mut self, mm: f32) {
        self.y += mm;
    }

    fn line(&mut self, style: LineStyle, text: &str) {
        if self.y + LINE_HEIGHT_MM > BODY_BOTTOM_MM {
            self.new_page();
        }
        let top_mm = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(ReportLine {
                style,
                text: text.to_string(),
                top_mm,
            });
        }
        self.y += LINE_HEIGHT_MM;
    }

    /// Multi-line cell: explicit newlines are kept, long lines are wrapped.
    fn paragraph(&mut self, style: LineStyle, text: &str) {
        let max_chars = chars_per_line(style, PAGE_WIDTH_MM - 2.0 * MARGIN_MM);
        for raw in text.split('\n') {
            if raw.is_empty() {
                self.line(style, "");
                continue;
            }
            for wrapped in wrap_words(raw, max_chars) {
                self.line(style, &wrapped);
            }
        }
    }

    fn finish(mut self) -> ReportDocument {
        for page in &mut self.pages {
            page.lines.push(ReportLine {
                style: LineStyle::Footer,
                text: format!("Page {}", page.number),
                top_mm: FOOTER_TOP_MM,
            });
        }
        ReportDocument { pages: self.pages }
    }
}

/// Approximate character capacity of a line.
///
/// Helvetica averages about half an em per glyph for mixed prose.
pub fn chars_per_line(style: LineStyle, width_mm: f32) -> usize {
    let char_mm = style.font_size_pt() * 0.3528 * 0.5;
    ((width_mm / char_mm).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are hard-split.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let split: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            out.push(split);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, Sex, Smoker};

    fn record(age: i64, sex: Sex, smoker: Smoker, region: Region) -> ApplicantRecord {
        ApplicantRecord::new(age, sex, 25.0, 0, smoker, region).unwrap()
    }

    fn est(v: f64) -> PremiumEstimate {
        PremiumEstimate::from_model_output(v).unwrap()
    }

    #[test]
    fn user_details_are_capitalized() {
        let doc = build_report(&record(30, Sex::Male, Smoker::No, Region::Southeast), est(5000.0));
        let lines = doc.text_lines();
        for expected in [
            "User Details:",
            "- Age: 30",
            "- Sex: Male",
            "- BMI: 25.0",
            "- Children: 0",
            "- Smoker: No",
            "- Region: Southeast",
            "Prediction Insight:",
            "USD $5,000.00 per year",
            "The InsureSmart Team",
        ] {
            assert!(lines.contains(&expected), "missing line {expected:?}");
        }
    }

    #[test]
    fn every_page_has_header_and_footer() {
        let doc = build_report(&record(30, Sex::Male, Smoker::No, Region::Southeast), est(5000.0));
        assert!(!doc.pages.is_empty());
        for page in &doc.pages {
            let first = page.lines.first().unwrap();
            let last = page.lines.last().unwrap();
            assert_eq!(first.style, LineStyle::Title);
            assert_eq!(first.text, REPORT_TITLE);
            assert_eq!(last.style, LineStyle::Footer);
            assert_eq!(last.text, format!("Page {}", page.number));
        }
    }

    #[test]
    fn body_stays_inside_margins() {
        let doc = build_report(&record(64, Sex::Female, Smoker::Yes, Region::Northwest), est(48000.0));
        for page in &doc.pages {
            for line in page.lines.iter().filter(|l| l.style != LineStyle::Footer && l.style != LineStyle::Title) {
                assert!(line.top_mm >= BODY_TOP_MM);
                assert!(line.top_mm + LINE_HEIGHT_MM <= BODY_BOTTOM_MM + 1e-3);
            }
        }
    }

    #[test]
    fn same_estimate_differs_only_in_user_details() {
        let a = build_report(&record(30, Sex::Male, Smoker::No, Region::Southeast), est(5000.0));
        let b = build_report(&record(58, Sex::Female, Smoker::Yes, Region::Northeast), est(5000.0));

        let la = a.text_lines();
        let lb = b.text_lines();
        assert_eq!(la.len(), lb.len());

        let details_a = user_detail_lines(&record(30, Sex::Male, Smoker::No, Region::Southeast));
        let mut diffs = 0;
        for (x, y) in la.iter().zip(lb.iter()) {
            if x != y {
                diffs += 1;
                assert!(details_a.iter().any(|d| d == x), "unexpected difference at {x:?}");
            }
        }
        // age, sex, smoker, region (bmi and children are equal)
        assert_eq!(diffs, 4);
    }

    #[test]
    fn wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_words(text, 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), text);

        let long = wrap_words("abcdefghijkl", 5);
        assert_eq!(long, vec!["abcde", "fghij", "kl"]);
    }
}
