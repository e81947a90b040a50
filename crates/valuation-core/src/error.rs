use thiserror::Error;

/// A fault that prevents computing a valuation from a record.
///
/// Every variant is recovered inside the enricher and only ever surfaces as
/// the `"error"` label plus one logged warning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("{field} is not numeric (found {found})")]
    NonNumeric { field: &'static str, found: &'static str },

    #[error("price / eps is not finite (price={price}, eps={eps})")]
    NonFiniteRatio { price: f64, eps: f64 },

    #[error("valuation panicked: {0}")]
    Panicked(String),
}
