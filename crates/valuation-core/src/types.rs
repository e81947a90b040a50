use serde::{Deserialize, Serialize};

use crate::ValuationError;

/// A stock-data record: field names mapped to heterogeneous JSON values
pub type Record = serde_json::Map<String, serde_json::Value>;

pub const EPS_FIELD: &str = "eps";
pub const PRICE_FIELD: &str = "price";
pub const PE_RATIO_FIELD: &str = "pe_ratio";
pub const VALUATION_LABEL_FIELD: &str = "valuation_label";

/// P/E strictly below this is undervalued; at or above is overvalued
pub const UNDERVALUED_PE_THRESHOLD: f64 = 15.0;

/// Valuation classification written to `valuation_label`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationLabel {
    Undervalued,
    Overvalued,
    Unknown,
    Error,
}

impl ValuationLabel {
    /// Label for a computed (already rounded) P/E ratio
    pub fn from_pe_ratio(pe_ratio: f64) -> Self {
        if pe_ratio < UNDERVALUED_PE_THRESHOLD {
            ValuationLabel::Undervalued
        } else {
            ValuationLabel::Overvalued
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationLabel::Undervalued => "undervalued",
            ValuationLabel::Overvalued => "overvalued",
            ValuationLabel::Unknown => "unknown",
            ValuationLabel::Error => "error",
        }
    }

    /// Whether this label is backed by a P/E ratio
    pub fn is_priced(&self) -> bool {
        matches!(self, ValuationLabel::Undervalued | ValuationLabel::Overvalued)
    }
}

impl std::fmt::Display for ValuationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of valuing one record.
///
/// `pe_ratio` is `Some` exactly when `label` is undervalued or overvalued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub pe_ratio: Option<f64>,
    pub label: ValuationLabel,
}

impl Valuation {
    pub fn priced(pe_ratio: f64) -> Self {
        Self {
            pe_ratio: Some(pe_ratio),
            label: ValuationLabel::from_pe_ratio(pe_ratio),
        }
    }

    pub fn unknown() -> Self {
        Self {
            pe_ratio: None,
            label: ValuationLabel::Unknown,
        }
    }

    pub fn error() -> Self {
        Self {
            pe_ratio: None,
            label: ValuationLabel::Error,
        }
    }

    /// Decision table over typed inputs.
    ///
    /// Missing EPS, missing price or zero EPS is `unknown`. Otherwise the
    /// ratio is rounded to cents and labelled against the threshold.
    pub fn from_fields(eps: Option<f64>, price: Option<f64>) -> Result<Self, ValuationError> {
        let (eps, price) = match (eps, price) {
            (Some(eps), Some(price)) if eps != 0.0 => (eps, price),
            _ => return Ok(Self::unknown()),
        };

        let ratio = price / eps;
        if !ratio.is_finite() {
            return Err(ValuationError::NonFiniteRatio { price, eps });
        }
        Ok(Self::priced(round_to_cents(ratio)))
    }

    /// Write both output fields into the record, overwriting stale values
    pub fn apply_to(&self, record: &mut Record) {
        let pe_ratio = match self.pe_ratio {
            Some(ratio) => serde_json::Value::from(ratio),
            None => serde_json::Value::Null,
        };
        record.insert(PE_RATIO_FIELD.to_string(), pe_ratio);
        record.insert(
            VALUATION_LABEL_FIELD.to_string(),
            serde_json::Value::from(self.label.as_str()),
        );
    }
}

/// Round to 2 decimal places, half away from zero.
///
/// Magnitudes of 1e15 and up have no sub-cent digits left in an `f64` and are
/// returned unchanged, which also keeps the `* 100.0` from overflowing.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    (value * 100.0).round() / 100.0
}
