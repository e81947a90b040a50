use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use valuation_core::{
    Record, RecordEnricher, Valuation, ValuationError, WarningLogger, EPS_FIELD, PRICE_FIELD,
};

mod logger;

pub use logger::TracingLogger;

const FAILURE_MESSAGE: &str = "Failed to compute valuation";

/// Adds `pe_ratio` and `valuation_label` to stock-data records.
///
/// Enrichment never fails from the caller's point of view: faults on the
/// `eps`/`price` fields are logged once as a warning and recorded as the
/// `"error"` label.
pub struct ValuationEnricher {
    logger: Arc<dyn WarningLogger>,
}

impl ValuationEnricher {
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }

    pub fn with_logger(logger: Arc<dyn WarningLogger>) -> Self {
        Self { logger }
    }

    /// Enrich an owned record and hand the same map back
    pub fn enrich(&self, mut record: Record) -> Record {
        self.enrich_in_place(&mut record);
        record
    }

    /// Overwrite the output fields of `record` and return the typed outcome
    pub fn enrich_in_place(&self, record: &mut Record) -> Valuation {
        let valuation = self.evaluate(record);
        valuation.apply_to(record);
        valuation
    }

    /// Value a record without writing to it. Faults are logged and mapped to `error`.
    pub fn evaluate(&self, record: &Record) -> Valuation {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| value_record(record)))
            .unwrap_or_else(|payload| Err(ValuationError::Panicked(panic_message(payload))));

        match outcome {
            Ok(valuation) => {
                let symbol = record
                    .get("symbol")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("-");
                tracing::debug!(
                    symbol,
                    pe_ratio = ?valuation.pe_ratio,
                    "Valuation: {}",
                    valuation.label
                );
                valuation
            }
            Err(e) => {
                self.logger.warn(FAILURE_MESSAGE, &e);
                Valuation::error()
            }
        }
    }
}

impl Default for ValuationEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordEnricher for ValuationEnricher {
    fn enrich(&self, record: Record) -> Record {
        ValuationEnricher::enrich(self, record)
    }
}

/// Presence is checked before types, and zero EPS before the price is read,
/// so `{eps: 0, price: "n/a"}` is `unknown` rather than `error`.
fn value_record(record: &Record) -> Result<Valuation, ValuationError> {
    let (eps, price) = match (present(record, EPS_FIELD), present(record, PRICE_FIELD)) {
        (Some(eps), Some(price)) => (eps, price),
        _ => return Ok(Valuation::unknown()),
    };

    let eps = numeric(EPS_FIELD, eps)?;
    if eps == 0.0 {
        return Ok(Valuation::unknown());
    }
    let price = numeric(PRICE_FIELD, price)?;

    Valuation::from_fields(Some(eps), Some(price))
}

fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

/// Bools count as 1/0 so `false` EPS takes the zero-EPS path.
fn numeric(field: &'static str, value: &Value) -> Result<f64, ValuationError> {
    let found = match value {
        // `as_f64` only fails for out-of-range arbitrary-precision numbers; NaN
        // then surfaces as a non-finite ratio
        Value::Number(n) => return Ok(n.as_f64().unwrap_or(f64::NAN)),
        Value::Bool(b) => return Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => "null",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(ValuationError::NonNumeric { field, found })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
