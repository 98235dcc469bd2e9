use super::GenerateArgs;
use chrono::{Local, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use lab_fixtures::config::{GenerateConfig, GenerateOverrides, GenerateYamlConfig};
use lab_fixtures::generator::{GenerationSummary, Generator};
use lab_fixtures::random::SeededSource;
use lab_fixtures::reference::ReferenceTables;
use lab_fixtures::writer::{FileOutput, QuoteStyle, WriteStats};
use serde::Serialize;
use std::time::Instant;

/// JSON output for the generate command
#[derive(Serialize)]
struct GenerateJsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    dry_run: bool,
    seed: u64,
    date: NaiveDate,
    summary: GenerationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    write: Option<WriteStats>,
    elapsed_secs: f64,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let file_config = match args.config {
        Some(ref path) => Some(GenerateYamlConfig::load(path)?),
        None => None,
    };

    let quote: Option<QuoteStyle> = args
        .quote
        .map(|q| q.parse())
        .transpose()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let config = GenerateConfig::resolve(
        file_config,
        GenerateOverrides {
            count: args.count,
            seed: args.seed,
            output: args.output,
            delimiter: args.delimiter,
            quote,
            date: args.date,
        },
    )?;

    let clock = config.date.unwrap_or_else(|| Local::now().date_naive());
    let source = match config.seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    let seed = source.seed();
    tracing::debug!(
        count = config.count,
        seed,
        date = %clock,
        delimiter = ?config.delimiter,
        quote = %config.quote,
        "generating records"
    );

    let start_time = Instant::now();
    let tables = ReferenceTables::standard();
    let records = Generator::new(&tables, clock, source)?
        .with_options(config.options)
        .generate(config.count);
    let summary = GenerationSummary::from_records(&records);

    let write = if args.dry_run {
        None
    } else {
        let pb = if args.progress && !args.json {
            let pb = ProgressBar::new(records.len() as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%)",
                )
                .unwrap()
                .progress_chars("█▓▒░  "),
            );
            Some(pb)
        } else {
            None
        };

        let output = FileOutput::new(&config.output)
            .with_delimiter(config.delimiter)
            .with_quote(config.quote);
        let stats = output.write(&records, |rows| {
            if let Some(ref pb) = pb {
                pb.set_position(rows as u64);
            }
        })?;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        Some(stats)
    };

    let elapsed = start_time.elapsed();

    if args.json {
        let output = GenerateJsonOutput {
            output_file: write.map(|_| config.output.display().to_string()),
            dry_run: args.dry_run,
            seed,
            date: clock,
            summary,
            write,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if write.is_some() {
        eprintln!(
            "Wrote {} (seed {}, date {}, {:.3?})",
            config.output.display(),
            seed,
            clock,
            elapsed
        );
    } else {
        eprintln!("Dry run: nothing written (seed {}, date {})", seed, clock);
    }
    println!("Generated {} records", summary.records);
    println!("Number of unique locations: {}", summary.distinct_locations);
    println!("Number of unique custodians: {}", summary.distinct_custodians);

    Ok(())
}
