use serde::{Deserialize, Serialize};

/// Payload shared by `/simulate` and `/series`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationRequest {
    pub pity_6: u32,
    pub pity_120: u32,
    pub rolls: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub p_current_limited: f64,
    pub p_off: f64,
    pub p_other_limited: f64,
    pub min_6star: u64,
    pub e_5star: f64,
}

// Float noise from the service's DP sums can push a probability a hair past 1.
const PROBABILITY_TOLERANCE: f64 = 1e-9;

impl SimulationSummary {
    /// Rejects values that would otherwise render as garbage ("NaN%", "-3.00%").
    pub fn validate(&self) -> Result<(), String> {
        check_probability("p_current_limited", self.p_current_limited)?;
        check_probability("p_off", self.p_off)?;
        check_probability("p_other_limited", self.p_other_limited)?;
        if !self.e_5star.is_finite() || self.e_5star < 0.0 {
            return Err(format!(
                "e_5star must be a finite non-negative number, got {}",
                self.e_5star
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesResponse {
    pub character: Vec<SeriesPoint>,
}

impl SeriesResponse {
    pub fn validate(&self) -> Result<(), String> {
        for (index, point) in self.character.iter().enumerate() {
            if !point.x.is_finite() {
                return Err(format!("character[{index}].x is not finite"));
            }
            check_probability(&format!("character[{index}].y"), point.y)?;
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 || value > 1.0 + PROBABILITY_TOLERANCE {
        return Err(format!("{name} must be a probability in [0, 1], got {value}"));
    }
    Ok(())
}
