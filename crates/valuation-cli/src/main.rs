use std::io::Read;

use anyhow::{bail, Context, Result};
use valuation_core::{Record, Valuation};
use valuation_enricher::ValuationEnricher;

mod config;

use config::CliConfig;

fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();
    let config = CliConfig::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if config.json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // 2. Read one record from the first argument or stdin
    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
    };
    let mut record = parse_record(&input)?;

    // 3. Enrich and print
    enrich_record(&ValuationEnricher::new(), &mut record);
    println!("{}", render(&record, config.pretty_output)?);

    Ok(())
}

fn enrich_record(enricher: &ValuationEnricher, record: &mut Record) -> Valuation {
    let valuation = enricher.enrich_in_place(record);
    tracing::info!(pe_ratio = ?valuation.pe_ratio, "Record valued as {}", valuation.label);
    valuation
}

fn parse_record(input: &str) -> Result<Record> {
    let value: serde_json::Value =
        serde_json::from_str(input.trim()).context("Input is not valid JSON")?;
    match value {
        serde_json::Value::Object(record) => Ok(record),
        other => bail!("Expected a JSON object record, got {}", json_kind(&other)),
    }
}

fn render(record: &Record, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(out)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_record_accepts_objects() {
        let record = parse_record(" {\"eps\": 2, \"price\": 20}\n").unwrap();
        assert_eq!(record["eps"], json!(2));
    }

    #[test]
    fn test_parse_record_rejects_non_objects() {
        let err = parse_record("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(parse_record("not json").is_err());
    }

    #[test]
    fn test_enrich_and_render_compact() {
        let mut record = parse_record(r#"{"eps": 2, "price": 20}"#).unwrap();
        let valuation = enrich_record(&ValuationEnricher::new(), &mut record);
        assert_eq!(valuation, Valuation::priced(10.0));
        let out = render(&record, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["pe_ratio"], json!(10.0));
        assert_eq!(value["valuation_label"], json!("undervalued"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_enrich_record_reads_bool_eps() {
        let mut record = parse_record(r#"{"eps": true, "price": 20}"#).unwrap();
        let valuation = enrich_record(&ValuationEnricher::new(), &mut record);
        assert_eq!(valuation.pe_ratio, Some(20.0));
        assert_eq!(record["valuation_label"], json!("overvalued"));
    }
}
