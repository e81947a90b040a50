use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub json_logging: bool,   // RUST_LOG_FORMAT=json
    pub pretty_output: bool,  // ENRICH_PRETTY, default true
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup so tests don't have to touch process env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            json_logging: lookup("RUST_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            pretty_output: lookup("ENRICH_PRETTY")
                .unwrap_or_else(|| "true".to_string())
                .trim()
                .parse()
                .context("ENRICH_PRETTY must be true or false")?,
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(|_| None).unwrap();
        assert!(!config.json_logging);
        assert!(config.pretty_output);
    }

    #[test]
    fn test_overrides() {
        let config =
            CliConfig::from_lookup(lookup_from(&[("RUST_LOG_FORMAT", "JSON"), ("ENRICH_PRETTY", "false")]))
                .unwrap();
        assert!(config.json_logging);
        assert!(!config.pretty_output);
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let err = CliConfig::from_lookup(lookup_from(&[("ENRICH_PRETTY", "sometimes")])).unwrap_err();
        assert!(err.to_string().contains("ENRICH_PRETTY"));
    }
}
