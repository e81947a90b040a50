use crate::{Record, ValuationError};

/// Trait for engines that augment a record with derived fields
pub trait RecordEnricher: Send + Sync {
    fn enrich(&self, record: Record) -> Record;
}

/// Warning-level logging capability handed to an enricher.
///
/// The enricher never configures or initialises the logger; the process does
/// that once and shares it.
pub trait WarningLogger: Send + Sync {
    fn warn(&self, message: &str, error: &ValuationError);
}
