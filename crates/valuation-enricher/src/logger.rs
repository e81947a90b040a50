use valuation_core::{ValuationError, WarningLogger};

/// Forwards enrichment warnings to whatever `tracing` subscriber the process installed
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl WarningLogger for TracingLogger {
    fn warn(&self, message: &str, error: &ValuationError) {
        tracing::warn!("{}: {}", message, error);
    }
}
