//! Read-back validation of a generated equipment file.
//!
//! Checks that a file still honours the import contract:
//! - header matches the fixed column schema
//! - every row has one field per column
//! - typed custom fields parse (dates, booleans, options)
//! - record invariants hold (tags match category, valuation bounds,
//!   warranty span, asset id shape, date windows relative to a clock)
//!
//! It also collects the distinct values of every `option` column, the same
//! way the importer derives option lists from a file.

use crate::generator::{
    parse_date, OperationalStatus, DAYS_PER_WARRANTY_YEAR, MAX_CALIBRATION_AGE_DAYS,
    MAX_PURCHASE_AGE_DAYS, WARRANTY_YEARS,
};
use crate::reference::ReferenceTables;
use crate::schema::{Column, ColumnDescriptor, FieldKind};
use crate::writer::{delimiter_byte, DEFAULT_DELIMITER};
use anyhow::Context;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Maximum number of issues to collect before stopping
const MAX_ISSUES: usize = 1000;

static ASSET_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}\d{4}-\d{3}$").unwrap());

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A problem found in the file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    /// 1-based line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ValidationIssue {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            line: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.code)?;
        if let Some(line) = self.line {
            write!(f, " line {}", line)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Options for a validation run
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub path: PathBuf,
    pub delimiter: char,
    /// Anchor date the file was generated with; enables date window checks
    pub clock: Option<NaiveDate>,
    pub tables: ReferenceTables,
}

impl ValidateOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            clock: None,
            tables: ReferenceTables::standard(),
        }
    }
}

/// Result of validating one file
#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub rows: usize,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<ValidationIssue>,
    /// Distinct values per `option` column, keyed by column header
    pub option_values: BTreeMap<String, BTreeSet<String>>,
}

impl ValidationSummary {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }
}

pub struct Validator {
    options: ValidateOptions,
    issues: Vec<ValidationIssue>,
    errors: usize,
    warnings: usize,
    option_values: BTreeMap<String, BTreeSet<String>>,
}

impl Validator {
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            options,
            issues: Vec::new(),
            errors: 0,
            warnings: 0,
            option_values: BTreeMap::new(),
        }
    }

    fn add_issue(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(issue);
        }
    }

    /// Read and validate the file
    pub fn validate(self) -> anyhow::Result<ValidationSummary> {
        let content = fs::read_to_string(&self.options.path)
            .with_context(|| format!("failed to read {}", self.options.path.display()))?;
        Ok(self.validate_str(&content))
    }

    /// Validate already loaded content
    pub fn validate_str(mut self, content: &str) -> ValidationSummary {
        let mut rows = 0;

        match delimiter_byte(self.options.delimiter) {
            Ok(delimiter) => {
                let mut reader = csv::ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(content.as_bytes());

                let mut schema_ok = None;
                for result in reader.records() {
                    let record = match result {
                        Ok(record) => record,
                        Err(e) => {
                            let line = e.position().map(|p| p.line() as usize);
                            let mut issue = ValidationIssue::error("PARSE", e.to_string());
                            issue.line = line;
                            self.add_issue(issue);
                            continue;
                        }
                    };
                    let line_no = record.position().map(|p| p.line() as usize).unwrap_or_default();
                    let fields: Vec<&str> = record.iter().collect();

                    let Some(header_ok) = schema_ok else {
                        schema_ok = Some(self.check_header(&fields));
                        continue;
                    };

                    rows += 1;
                    if fields.len() != Column::ALL.len() {
                        self.add_issue(
                            ValidationIssue::error(
                                "FIELD_COUNT",
                                format!(
                                    "expected {} fields, found {}",
                                    Column::ALL.len(),
                                    fields.len()
                                ),
                            )
                            .at_line(line_no),
                        );
                        continue;
                    }
                    if header_ok {
                        self.check_row(&fields, line_no);
                    }
                }

                if schema_ok.is_none() {
                    self.add_issue(ValidationIssue::error("EMPTY_FILE", "file has no header line"));
                }
            }
            Err(e) => self.add_issue(ValidationIssue::error("DELIMITER", e.to_string())),
        }

        if !content.is_empty() && !content.ends_with('\n') {
            self.add_issue(ValidationIssue::warning(
                "NO_TRAILING_NEWLINE",
                "last line is not terminated by a newline",
            ));
        }

        ValidationSummary {
            rows,
            errors: self.errors,
            warnings: self.warnings,
            issues: self.issues,
            option_values: self.option_values,
        }
    }

    fn check_header(&mut self, cells: &[&str]) -> bool {
        if cells.len() != Column::ALL.len() {
            self.add_issue(
                ValidationIssue::error(
                    "HEADER",
                    format!(
                        "header has {} columns, expected {}",
                        cells.len(),
                        Column::ALL.len()
                    ),
                )
                .at_line(1),
            );
            return false;
        }

        let mut ok = true;
        for (cell, column) in cells.iter().zip(Column::ALL) {
            let expected = column.descriptor();
            match ColumnDescriptor::parse(cell) {
                Ok(found) if found == expected => {}
                Ok(found) => {
                    ok = false;
                    self.add_issue(
                        ValidationIssue::error(
                            "HEADER",
                            format!("expected column '{}', found '{}'", expected, found),
                        )
                        .at_line(1),
                    );
                }
                Err(e) => {
                    ok = false;
                    self.add_issue(ValidationIssue::error("HEADER", e.to_string()).at_line(1));
                }
            }
        }
        ok
    }

    fn check_row(&mut self, fields: &[&str], line_no: usize) {
        let field = |column: Column| fields[column.position()];

        for column in Column::ALL {
            let descriptor = column.descriptor();
            let value = field(column);
            match descriptor.kind {
                Some(FieldKind::Date) if parse_date(value).is_none() => {
                    self.add_issue(
                        ValidationIssue::error(
                            "DATE_FORMAT",
                            format!("{}: '{}' is not MM/DD/YYYY", descriptor.name, value),
                        )
                        .at_line(line_no),
                    );
                }
                Some(FieldKind::Boolean) if !matches!(value, "yes" | "no") => {
                    self.add_issue(
                        ValidationIssue::error(
                            "BOOLEAN",
                            format!("{}: '{}' is not yes/no", descriptor.name, value),
                        )
                        .at_line(line_no),
                    );
                }
                Some(FieldKind::Option) if !value.is_empty() => {
                    self.option_values
                        .entry(descriptor.header())
                        .or_default()
                        .insert(value.to_string());
                }
                _ => {}
            }
        }

        if !ASSET_ID_RE.is_match(field(Column::AssetId)) {
            self.add_issue(
                ValidationIssue::error(
                    "ASSET_ID",
                    format!("asset id '{}' does not match XX####-###", field(Column::AssetId)),
                )
                .at_line(line_no),
            );
        }

        if let Err(e) = field(Column::OperationalStatus).parse::<OperationalStatus>() {
            self.add_issue(ValidationIssue::error("STATUS", e).at_line(line_no));
        }

        self.check_category(fields, line_no);
        self.check_dates(fields, line_no);
    }

    fn check_category(&mut self, fields: &[&str], line_no: usize) {
        let category = fields[Column::Category.position()];
        let Some(equipment) = self.options.tables.equipment_type(category) else {
            self.add_issue(
                ValidationIssue::error("CATEGORY", format!("unknown category '{}'", category))
                    .at_line(line_no),
            );
            return;
        };

        let tags = fields[Column::Tags.position()];
        if tags != equipment.tags.join(",") {
            self.add_issue(
                ValidationIssue::error(
                    "TAGS",
                    format!("tags '{}' do not belong to category '{}'", tags, category),
                )
                .at_line(line_no),
            );
        }

        let raw = fields[Column::Valuation.position()];
        match raw.parse::<i64>() {
            Ok(valuation) => {
                let (low, high) = equipment.price_range();
                if !(low..=high).contains(&valuation) {
                    self.add_issue(
                        ValidationIssue::error(
                            "VALUATION",
                            format!(
                                "valuation {} outside {}..={} for '{}'",
                                valuation, low, high, category
                            ),
                        )
                        .at_line(line_no),
                    );
                }
            }
            Err(_) => self.add_issue(
                ValidationIssue::error(
                    "VALUATION",
                    format!("valuation '{}' is not an integer", raw),
                )
                .at_line(line_no),
            ),
        }
    }

    fn check_dates(&mut self, fields: &[&str], line_no: usize) {
        let date = |column: Column| parse_date(fields[column.position()]);
        let (Some(purchase), Some(expiry), Some(calibration)) = (
            date(Column::PurchaseDate),
            date(Column::WarrantyExpiry),
            date(Column::LastCalibration),
        ) else {
            // format problems were already reported
            return;
        };

        let span = (expiry - purchase).num_days();
        if span <= 0 {
            self.add_issue(
                ValidationIssue::error(
                    "WARRANTY",
                    "warranty expiry is not after the purchase date",
                )
                .at_line(line_no),
            );
        } else if !WARRANTY_YEARS
            .iter()
            .any(|years| span == (years * DAYS_PER_WARRANTY_YEAR) as i64)
        {
            self.add_issue(
                ValidationIssue::warning(
                    "WARRANTY",
                    format!("warranty span of {} days is not 3, 5 or 7 years", span),
                )
                .at_line(line_no),
            );
        }

        let Some(clock) = self.options.clock else {
            return;
        };
        let purchase_age = (clock - purchase).num_days();
        if !(0..=MAX_PURCHASE_AGE_DAYS).contains(&purchase_age) {
            self.add_issue(
                ValidationIssue::error(
                    "PURCHASE_DATE",
                    format!("purchase date is {} days before {}", purchase_age, clock),
                )
                .at_line(line_no),
            );
        }
        let calibration_age = (clock - calibration).num_days();
        if !(0..=MAX_CALIBRATION_AGE_DAYS).contains(&calibration_age) {
            self.add_issue(
                ValidationIssue::error(
                    "CALIBRATION_DATE",
                    format!(
                        "last calibration is {} days before {}",
                        calibration_age, clock
                    ),
                )
                .at_line(line_no),
            );
        }
    }
}
