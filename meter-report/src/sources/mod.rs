pub mod readings_csv_file;
pub mod readings_ndjson_file;

pub use readings_csv_file::ReadingsCsvFileSource;
pub use readings_ndjson_file::ReadingsNdjsonFileSource;

use crate::pipeline::PipelineError;

/// Parse a kWh figure, accepting a decimal comma ("27324,00").
pub(crate) fn parse_kwh(raw: &str) -> Result<f64, PipelineError> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse()
        .map_err(|e| PipelineError::Record(format!("invalid value '{raw}': {e}")))
}

pub(crate) fn parse_optional_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_comma() {
        assert_eq!(parse_kwh("27324,00").unwrap(), 27324.0);
        assert_eq!(parse_kwh(" 35892.5 ").unwrap(), 35892.5);
    }

    #[test]
    fn rejects_garbage_value() {
        assert!(matches!(parse_kwh("12a"), Err(PipelineError::Record(_))));
    }

    #[test]
    fn blank_optional_is_none() {
        assert_eq!(parse_optional_string("  "), None);
        assert_eq!(parse_optional_string(" x "), Some("x".to_string()));
    }
}
