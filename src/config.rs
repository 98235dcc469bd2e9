//! YAML configuration for the generate command.
//!
//! Every key is optional; command-line flags take precedence over the file
//! and built-in defaults fill the rest.

use crate::generator::{
    GeneratorOptions, StatusThresholds, DEFAULT_CERTIFICATION_PROBABILITY, DEFAULT_RECORD_COUNT,
};
use crate::schema::{header_cells, Column};
use crate::writer::{collides, QuoteStyle, DEFAULT_DELIMITER, DEFAULT_OUTPUT_FILE};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a generate config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateYamlConfig {
    /// Number of records
    pub count: Option<usize>,
    /// Random seed
    pub seed: Option<u64>,
    /// Output file path
    pub output: Option<PathBuf>,
    /// Field delimiter (a single character)
    pub delimiter: Option<String>,
    /// Quoting of values containing the delimiter
    pub quote: Option<QuoteStyle>,
    /// Anchor date for relative dates (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
    /// Cumulative status thresholds
    pub status: Option<StatusThresholds>,
    /// Probability that a record requires certification
    pub certification_probability: Option<f64>,
}

impl GenerateYamlConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub quote: Option<QuoteStyle>,
    pub date: Option<NaiveDate>,
}

/// Fully resolved and validated settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub count: usize,
    pub seed: Option<u64>,
    pub output: PathBuf,
    pub delimiter: char,
    pub quote: QuoteStyle,
    pub date: Option<NaiveDate>,
    pub options: GeneratorOptions,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_RECORD_COUNT,
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            delimiter: DEFAULT_DELIMITER,
            quote: QuoteStyle::Never,
            date: None,
            options: GeneratorOptions::default(),
        }
    }
}

impl GenerateConfig {
    /// Merge overrides over the file over defaults, then validate
    pub fn resolve(
        file: Option<GenerateYamlConfig>,
        overrides: GenerateOverrides,
    ) -> anyhow::Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let delimiter = match overrides.delimiter.or(file.delimiter) {
            Some(d) => parse_delimiter(&d)?,
            None => defaults.delimiter,
        };

        let config = Self {
            count: overrides.count.or(file.count).unwrap_or(defaults.count),
            seed: overrides.seed.or(file.seed),
            output: overrides.output.or(file.output).unwrap_or(defaults.output),
            delimiter,
            quote: overrides.quote.or(file.quote).unwrap_or(defaults.quote),
            date: overrides.date.or(file.date),
            options: GeneratorOptions {
                status_thresholds: file.status.unwrap_or_default(),
                certification_probability: file
                    .certification_probability
                    .unwrap_or(DEFAULT_CERTIFICATION_PROBABILITY),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.count == 0 {
            anyhow::bail!("record count must be at least 1");
        }
        validate_delimiter(self.delimiter)?;
        if self.quote == QuoteStyle::Never {
            if let Some(header) = header_cells(&Column::ALL)
                .into_iter()
                .find(|h| collides(h, self.delimiter))
            {
                anyhow::bail!(
                    "delimiter {:?} appears in column header '{}'; set quote to necessary",
                    self.delimiter,
                    header
                );
            }
        }
        self.options.status_thresholds.validate()?;
        let p = self.options.certification_probability;
        if !(0.0..=1.0).contains(&p) {
            anyhow::bail!("certification probability must be between 0 and 1, got {}", p);
        }
        Ok(())
    }
}

/// Parse a delimiter given as text. Accepts a single character or the
/// escape `\t`.
pub fn parse_delimiter(s: &str) -> anyhow::Result<char> {
    if s == "\\t" {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            validate_delimiter(c)?;
            Ok(c)
        }
        _ => anyhow::bail!("delimiter must be a single character, got {:?}", s),
    }
}

fn validate_delimiter(c: char) -> anyhow::Result<()> {
    if !c.is_ascii() || matches!(c, '"' | '\n' | '\r') {
        anyhow::bail!("unsupported delimiter {:?}", c);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_run() {
        let config = GenerateConfig::resolve(None, GenerateOverrides::default()).unwrap();
        assert_eq!(config.count, 2000);
        assert_eq!(config.output, PathBuf::from("lab_equipment_2000.csv"));
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quote, QuoteStyle::Never);
        assert_eq!(config.options, GeneratorOptions::default());
    }

    #[test]
    fn test_unquoted_delimiter_colliding_with_headers_rejected() {
        let overrides = GenerateOverrides {
            delimiter: Some(",".to_string()),
            ..GenerateOverrides::default()
        };
        let err = GenerateConfig::resolve(None, overrides).unwrap_err();
        assert!(err.to_string().contains("column header"));

        let overrides = GenerateOverrides {
            delimiter: Some(",".to_string()),
            quote: Some(QuoteStyle::Necessary),
            ..GenerateOverrides::default()
        };
        assert!(GenerateConfig::resolve(None, overrides).is_ok());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("§").is_err());
    }
}
