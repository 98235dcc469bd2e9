use chrono::NaiveDate;
use lab_fixtures::config::parse_delimiter;
use lab_fixtures::validate::{ValidateOptions, Validator};
use std::path::PathBuf;
use std::time::Instant;

pub fn run(
    file: PathBuf,
    delimiter: Option<String>,
    date: Option<NaiveDate>,
    strict: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("input file does not exist: {}", file.display());
    }

    let mut options = ValidateOptions::new(&file);
    if let Some(ref d) = delimiter {
        options.delimiter = parse_delimiter(d)?;
    }
    options.clock = date;

    if !json {
        eprintln!("Validating fixture file: {}", file.display());
        eprintln!();
    }

    let start_time = Instant::now();
    let summary = Validator::new(options).validate()?;
    let elapsed = start_time.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for issue in &summary.issues {
            eprintln!("{}", issue);
        }
        if !summary.issues.is_empty() {
            eprintln!();
        }

        eprintln!("Validation summary:");
        eprintln!("  Rows: {}", summary.rows);
        eprintln!("  Time: {:.3?}", elapsed);
        if date.is_none() {
            eprintln!("  Date windows: skipped (pass --date to check)");
        }
        eprintln!();
        eprintln!("  Option values:");
        for (column, values) in &summary.option_values {
            eprintln!("    - {}: {} distinct", column, values.len());
        }
        eprintln!();
        eprintln!(
            "  Total: {} errors, {} warnings",
            summary.errors, summary.warnings
        );
        eprintln!();

        if summary.has_errors() {
            eprintln!("Result: FAILED");
        } else if summary.has_warnings() && strict {
            eprintln!("Result: FAILED (--strict mode, warnings treated as errors)");
        } else if summary.has_warnings() {
            eprintln!("Result: PASSED (with warnings)");
        } else {
            eprintln!("Result: PASSED");
        }
    }

    if summary.has_errors() || (strict && summary.has_warnings()) {
        std::process::exit(1);
    }

    Ok(())
}
