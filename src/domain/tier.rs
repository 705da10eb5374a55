//! Risk tiers derived from the premium estimate.

use serde::Serialize;

use crate::domain::PremiumEstimate;

/// Estimates strictly above this are at least `Mid`.
pub const MID_THRESHOLD: f64 = 8000.0;
/// Estimates strictly above this are `High`.
pub const HIGH_THRESHOLD: f64 = 15000.0;

/// Ordinal premium tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Mid,
    High,
}

/// Colors (hex `#rrggbb`) and wording for a tier's result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub description: &'static str,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Mid, RiskTier::High];

    /// Classify a raw premium. Values exactly on a threshold stay in the lower tier.
    pub fn classify(estimate: f64) -> RiskTier {
        if estimate > HIGH_THRESHOLD {
            RiskTier::High
        } else if estimate > MID_THRESHOLD {
            RiskTier::Mid
        } else {
            RiskTier::Low
        }
    }

    pub fn for_estimate(estimate: PremiumEstimate) -> RiskTier {
        Self::classify(estimate.value())
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Mid => "Mid",
            RiskTier::High => "High",
        }
    }

    pub fn style(self) -> TierStyle {
        match self {
            RiskTier::Low => TierStyle {
                background: "#e3fceb",
                border: "#43a047",
                text: "#2e7d32",
                description: "You fall under the Low-Tier Premium Plan with great health and non-smoking status.",
            },
            RiskTier::Mid => TierStyle {
                background: "#fff8e1",
                border: "#f9a825",
                text: "#f57f17",
                description: "You fall under the Mid-Tier Premium Plan based on your health and lifestyle indicators.",
            },
            RiskTier::High => TierStyle {
                background: "#ffebee",
                border: "#c62828",
                text: "#b71c1c",
                description: "You fall under the High-Tier Premium Plan due to higher risk factors like smoking or high BMI.",
            },
        }
    }
}

/// Parse `#rrggbb` into an RGB triple.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.strip_prefix('#')?;
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}
