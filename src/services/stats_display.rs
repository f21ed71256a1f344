use serde::Serialize;

use crate::domain::simulation::SimulationSummary;

/// The five text fields shown after a run, keyed by their element ids.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatsDisplay {
    #[serde(rename = "pCur")]
    pub p_current_limited: String,
    #[serde(rename = "pOff")]
    pub p_off: String,
    #[serde(rename = "pOther")]
    pub p_other_limited: String,
    #[serde(rename = "min6")]
    pub min_6star: String,
    #[serde(rename = "e5")]
    pub e_5star: String,
}

impl StatsDisplay {
    pub fn from_summary(summary: &SimulationSummary) -> Self {
        Self {
            p_current_limited: format_percent(summary.p_current_limited),
            p_off: format_percent(summary.p_off),
            p_other_limited: format_percent(summary.p_other_limited),
            min_6star: summary.min_6star.to_string(),
            e_5star: format_fixed2(summary.e_5star),
        }
    }
}

/// `0.1234` -> `"12.34%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", format_fixed2(fraction * 100.0))
}

/// Two decimals; negative zero prints as `0.00`. An exact halfway value
/// rounds away from zero (`0.125` -> `"0.13"`), the way browsers print
/// fixed-point numbers.
pub fn format_fixed2(value: f64) -> String {
    let magnitude = value.abs();
    if is_exact_tie(magnitude) {
        let sign = if value < 0.0 { "-" } else { "" };
        let rounded = (magnitude * 100.0).ceil() / 100.0;
        return format!("{sign}{rounded:.2}");
    }
    format!("{:.2}", value + 0.0)
}

// A binary double sits exactly halfway between two hundredths only when it
// is an odd number of eighths.
fn is_exact_tie(magnitude: f64) -> bool {
    let eighths = magnitude * 8.0;
    magnitude < 1e15 && eighths.fract() == 0.0 && eighths % 2.0 == 1.0
}
