//! Terminal/result formatting: currency strings and the tier result panel.
//!
//! We keep formatting code in one place so the CLI, the TUI and the PDF
//! report all print the same numbers the same way.

use crate::domain::{PremiumEstimate, RiskTier, TierStyle};

pub const PANEL_TITLE: &str = "Your Predicted Premium";
pub const PANEL_NOTE: &str = "This estimate is calculated using advanced machine learning techniques and helps you anticipate future insurance costs more accurately.";

/// Format with thousands separators and two decimals: `5000.0` -> `5,000.00`.
pub fn format_currency(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Inverse of `format_currency` for its own output.
pub fn parse_currency(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse().ok()
}

/// Everything needed to show one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultView {
    pub estimate: PremiumEstimate,
    pub tier: RiskTier,
    pub style: TierStyle,
}

impl ResultView {
    pub fn new(estimate: PremiumEstimate) -> Self {
        let tier = RiskTier::for_estimate(estimate);
        Self {
            estimate,
            tier,
            style: tier.style(),
        }
    }

    /// `$ 5,000.00`
    pub fn amount(&self) -> String {
        format!("$ {}", format_currency(self.estimate.value()))
    }

    pub fn headline(&self) -> String {
        format!("Estimated Annual Premium: {}", self.amount())
    }
}

/// Plain-text result panel for terminal output.
pub fn format_result_text(view: &ResultView) -> String {
    let mut out = String::new();
    out.push_str(&view.headline());
    out.push_str("\n\n");
    out.push_str(&format!("[{} tier] {PANEL_TITLE}\n", view.tier.display_name()));
    out.push_str(view.style.description);
    out.push('\n');
    out.push_str(PANEL_NOTE);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(v: f64) -> PremiumEstimate {
        PremiumEstimate::from_model_output(v).unwrap()
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(999.999), "1,000.00");
        assert_eq!(format_currency(5000.0), "5,000.00");
        assert_eq!(format_currency(123456.789), "123,456.79");
        assert_eq!(format_currency(1234567.0), "1,234,567.00");
        assert_eq!(format_currency(-4321.5), "-4,321.50");
    }

    #[test]
    fn currency_is_idempotent() {
        for v in [0.0, 0.005, 42.4242, 8000.0, 15000.01, 63770.428, 1_000_000.999] {
            let once = format_currency(v);
            let twice = format_currency(parse_currency(&once).unwrap());
            assert_eq!(once, twice, "value {v}");
        }
    }

    #[test]
    fn view_amount_and_tier() {
        let view = ResultView::new(est(5000.0));
        assert_eq!(view.amount(), "$ 5,000.00");
        assert_eq!(view.tier, RiskTier::Low);
        assert_eq!(view.headline(), "Estimated Annual Premium: $ 5,000.00");

        let view = ResultView::new(est(15000.01));
        assert_eq!(view.tier, RiskTier::High);
        assert_eq!(view.style, RiskTier::High.style());
    }

    #[test]
    fn text_panel_contains_tier_description() {
        let view = ResultView::new(est(9000.0));
        let text = format_result_text(&view);
        assert!(text.starts_with("Estimated Annual Premium: $ 9,000.00"));
        assert!(text.contains("[Mid tier] Your Predicted Premium"));
        assert!(text.contains("Mid-Tier Premium Plan"));
        assert!(text.contains(PANEL_NOTE));
    }
}
