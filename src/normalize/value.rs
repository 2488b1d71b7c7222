use crate::constants::CO_MG_TO_UG;
use crate::parser::RawValue;
use crate::types::Parameter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

/// Which numeric run to pull out of a text cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPattern {
    /// Leading digits only; decimals are cut at the point.
    Integer,
    #[default]
    Decimal,
}

impl NumberPattern {
    fn regex(&self) -> &'static Regex {
        match self {
            NumberPattern::Integer => &INTEGER,
            NumberPattern::Decimal => &DECIMAL,
        }
    }
}

/// Turn a raw cell or field into a µg/m³ value, or `None` when it carries no
/// usable reading. Missing and empty inputs are never read as zero.
pub fn normalize_value(raw: &RawValue, parameter: Parameter, pattern: NumberPattern) -> Option<f64> {
    let value = match raw {
        RawValue::Missing => return None,
        RawValue::Number(n) => *n,
        RawValue::Text(text) => pattern.regex().find(text)?.as_str().parse::<f64>().ok()?,
    };

    let value = if parameter == Parameter::Co {
        value * CO_MG_TO_UG
    } else {
        value
    };

    // Checked after conversion: a huge CO reading overflows to infinity.
    if !value.is_finite() {
        return None;
    }

    // Negative readings are sensor or parse noise.
    if value.is_sign_negative() {
        return None;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_non_numeric_inputs_are_absent_not_zero() {
        for raw in [text(""), text("n/a"), text("—"), text("   "), RawValue::Missing] {
            assert_eq!(normalize_value(&raw, Parameter::Pm25, NumberPattern::Decimal), None);
            assert_eq!(normalize_value(&raw, Parameter::Pm25, NumberPattern::Integer), None);
        }
    }

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(normalize_value(&text("35"), Parameter::Pm25, NumberPattern::Decimal), Some(35.0));
        assert_eq!(normalize_value(&text(" 12.5 "), Parameter::No2, NumberPattern::Decimal), Some(12.5));
        assert_eq!(normalize_value(&RawValue::Number(41.0), Parameter::O3, NumberPattern::Decimal), Some(41.0));
        assert_eq!(normalize_value(&text("0"), Parameter::So2, NumberPattern::Decimal), Some(0.0));
    }

    #[test]
    fn test_first_run_is_taken_from_text_with_units() {
        assert_eq!(normalize_value(&text("58μg/m³"), Parameter::Pm10, NumberPattern::Integer), Some(58.0));
        assert_eq!(normalize_value(&text("58.7 μg/m³"), Parameter::Pm10, NumberPattern::Integer), Some(58.0));
        assert_eq!(normalize_value(&text("58.7 μg/m³"), Parameter::Pm10, NumberPattern::Decimal), Some(58.7));
    }

    #[test]
    fn test_co_is_converted_to_micrograms() {
        assert_eq!(normalize_value(&text("2.5"), Parameter::Co, NumberPattern::Decimal), Some(2500.0));
        assert_eq!(normalize_value(&RawValue::Number(1.0), Parameter::Co, NumberPattern::Decimal), Some(1000.0));
        assert_eq!(normalize_value(&text("2.5"), Parameter::Pm25, NumberPattern::Decimal), Some(2.5));
    }

    #[test]
    fn test_negative_and_non_finite_values_are_dropped() {
        assert_eq!(normalize_value(&text("-5"), Parameter::Pm25, NumberPattern::Decimal), None);
        assert_eq!(normalize_value(&RawValue::Number(-1.0), Parameter::Co, NumberPattern::Decimal), None);
        assert_eq!(normalize_value(&RawValue::Number(f64::NAN), Parameter::Pm25, NumberPattern::Decimal), None);
        assert_eq!(normalize_value(&RawValue::Number(f64::INFINITY), Parameter::Pm25, NumberPattern::Decimal), None);
    }

    #[test]
    fn test_co_overflowing_to_infinity_is_dropped() {
        assert_eq!(normalize_value(&RawValue::Number(1e306), Parameter::Co, NumberPattern::Decimal), None);
        let huge = "9".repeat(306);
        assert_eq!(normalize_value(&text(&huge), Parameter::Co, NumberPattern::Decimal), None);
        assert_eq!(normalize_value(&RawValue::Number(1e306), Parameter::Pm25, NumberPattern::Decimal), Some(1e306));
    }
}
