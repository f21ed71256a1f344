use thiserror::Error;

use crate::domain::simulation::SimulationRequest;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} is empty")]
    Empty { field: &'static str },
    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be a whole number, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },
    #[error("{field} must not be negative, got '{value}'")]
    Negative { field: &'static str, value: String },
    #[error("{field} is too large: '{value}'")]
    TooLarge { field: &'static str, value: String },
}

/// Raw values of the three input fields, exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationInputs {
    pub pity6: String,
    pub pity120: String,
    pub rolls: String,
}

impl SimulationInputs {
    pub fn new(pity6: impl Into<String>, pity120: impl Into<String>, rolls: impl Into<String>) -> Self {
        Self {
            pity6: pity6.into(),
            pity120: pity120.into(),
            rolls: rolls.into(),
        }
    }

    /// Splits a whitespace separated `pity6 pity120 rolls` line.
    /// Returns `None` unless the line has exactly three tokens.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let inputs = Self::new(tokens.next()?, tokens.next()?, tokens.next()?);
        if tokens.next().is_some() {
            return None;
        }
        Some(inputs)
    }

    pub fn parse(&self) -> Result<SimulationRequest, InputError> {
        Ok(SimulationRequest {
            pity_6: parse_count("pity6", &self.pity6)?,
            pity_120: parse_count("pity120", &self.pity120)?,
            rolls: parse_count("rolls", &self.rolls)?,
        })
    }
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, InputError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(InputError::Empty { field });
    }

    let parsed = match value.parse::<i64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            return Err(match value.parse::<f64>() {
                Ok(number) if number.is_finite() => InputError::NotAnInteger {
                    field,
                    value: value.to_string(),
                },
                _ => InputError::NotANumber {
                    field,
                    value: value.to_string(),
                },
            });
        }
    };

    if parsed < 0 {
        return Err(InputError::Negative {
            field,
            value: value.to_string(),
        });
    }
    u32::try_from(parsed).map_err(|_| InputError::TooLarge {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_builds_request_from_trimmed_fields() {
        let inputs = SimulationInputs::new(" 12", "40 ", "100");
        assert_eq!(
            inputs.parse().unwrap(),
            SimulationRequest {
                pity_6: 12,
                pity_120: 40,
                rolls: 100,
            }
        );
    }

    #[test]
    fn parse_rejects_empty_field() {
        let inputs = SimulationInputs::new("0", "", "100");
        assert_eq!(
            inputs.parse().unwrap_err(),
            InputError::Empty { field: "pity120" }
        );
    }

    #[test]
    fn parse_rejects_text() {
        let inputs = SimulationInputs::new("abc", "0", "100");
        assert!(matches!(
            inputs.parse().unwrap_err(),
            InputError::NotANumber { field: "pity6", .. }
        ));
    }

    #[test]
    fn parse_rejects_fractional_and_negative_values() {
        let fractional = SimulationInputs::new("0", "0", "10.5");
        assert!(matches!(
            fractional.parse().unwrap_err(),
            InputError::NotAnInteger { field: "rolls", .. }
        ));

        let negative = SimulationInputs::new("-1", "0", "10");
        assert!(matches!(
            negative.parse().unwrap_err(),
            InputError::Negative { field: "pity6", .. }
        ));
    }

    #[test]
    fn parse_rejects_values_beyond_u32() {
        let inputs = SimulationInputs::new("0", "0", "4294967296");
        assert!(matches!(
            inputs.parse().unwrap_err(),
            InputError::TooLarge { field: "rolls", .. }
        ));
    }

    #[test]
    fn parse_rejects_nan_as_not_a_number() {
        let inputs = SimulationInputs::new("NaN", "0", "10");
        assert!(matches!(
            inputs.parse().unwrap_err(),
            InputError::NotANumber { .. }
        ));
    }

    #[test]
    fn from_line_requires_three_tokens() {
        assert_eq!(
            SimulationInputs::from_line("1 2 3"),
            Some(SimulationInputs::new("1", "2", "3"))
        );
        assert_eq!(SimulationInputs::from_line("1 2"), None);
        assert_eq!(SimulationInputs::from_line("1 2 3 4"), None);
    }
}
