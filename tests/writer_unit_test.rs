//! Tests for delimited serialization and file output.

use chrono::NaiveDate;
use lab_fixtures::generator::{generate, EquipmentRecord};
use lab_fixtures::random::SeededSource;
use lab_fixtures::reference::ReferenceTables;
use lab_fixtures::schema::{header_cells, Column};
use lab_fixtures::writer::{serialize, DelimitedWriter, FileOutput, QuoteStyle};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "title;description;category;tags;location;valuation;custodian;cf:Asset ID,type:text;cf:Manufacturer,type:option;cf:Purchase date,type:date;cf:Warranty expiry,type:date;cf:Last calibration,type:date;cf:Operational status,type:option;cf:Requires certification,type:boolean";

fn records(count: usize) -> Vec<EquipmentRecord> {
    let clock = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    generate(count, &ReferenceTables::standard(), clock, SeededSource::new(42)).unwrap()
}

#[test]
fn test_serialize_line_and_field_counts() {
    let text = serialize(&records(2000), &Column::ALL, ';', QuoteStyle::Never).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2001);
    assert_eq!(lines[0], HEADER);
    for line in &lines[1..] {
        assert_eq!(line.split(';').count(), 14, "bad row: {}", line);
    }
    assert!(text.ends_with('\n'));
    assert!(!text.contains("\n\n"));
}

#[test]
fn test_serialize_zero_records_is_header_only() {
    let text = serialize(&[], &Column::ALL, ';', QuoteStyle::Never).unwrap();
    assert_eq!(text, format!("{}\n", HEADER));
}

#[test]
fn test_serialize_respects_column_order() {
    let records = records(3);
    let columns = [Column::AssetId, Column::Title];
    let text = serialize(&records, &columns, ';', QuoteStyle::Never).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("cf:Asset ID,type:text;title"));
    for (line, record) in lines.zip(&records) {
        assert_eq!(line, format!("{};{}", record.asset_id, record.title));
    }
}

#[test]
fn test_quote_necessary_protects_embedded_delimiter() {
    let mut records = records(1);
    records[0].title = "Zeiss; refurbished".to_string();

    let raw = serialize(&records, &Column::ALL, ';', QuoteStyle::Never).unwrap();
    let row = raw.lines().nth(1).unwrap();
    assert_eq!(row.split(';').count(), 15);

    let quoted = serialize(&records, &Column::ALL, ';', QuoteStyle::Necessary).unwrap();
    let row = quoted.lines().nth(1).unwrap();
    assert!(row.starts_with("\"Zeiss; refurbished\";"));
}

#[test]
fn test_comma_delimiter_quotes_custom_field_headers() {
    let text = serialize(&records(5), &Column::ALL, ',', QuoteStyle::Necessary).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("title,description,category,tags,location,valuation,custodian,\"cf:Asset ID,type:text\","));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 6);
    for row in &rows {
        assert_eq!(row.len(), 14);
    }
    assert_eq!(&rows[0][7], "cf:Asset ID,type:text");
    assert_eq!(&rows[0][3], "tags");
    assert!(rows[1][3].contains(','));
}

#[test]
fn test_quoted_line_break_stays_in_one_record() {
    let mut records = records(2);
    records[0].description = "LSM 1000\nrefurbished".to_string();
    let text = serialize(&records, &Column::ALL, ';', QuoteStyle::Necessary).unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_reader(text.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][1], "LSM 1000\nrefurbished");
}

#[test]
fn test_tags_column_uses_commas_inside_field() {
    let text = serialize(&records(50), &Column::ALL, ';', QuoteStyle::Never).unwrap();
    for line in text.lines().skip(1) {
        let tags = line.split(';').nth(Column::Tags.position()).unwrap();
        assert_eq!(tags.split(',').count(), 2);
    }
}

#[test]
fn test_delimited_writer_stats_and_collisions() {
    let mut records = records(5);
    records[2].description = "split;here".to_string();

    let mut writer = DelimitedWriter::new(Vec::new(), &Column::ALL, ';', QuoteStyle::Never).unwrap();
    writer.write_header().unwrap();
    for record in &records {
        writer.write_record(record).unwrap();
    }
    let (bytes, stats) = writer.finish().unwrap();

    assert_eq!(stats.rows_written, 5);
    assert_eq!(stats.delimiter_collisions, 1);
    assert_eq!(stats.bytes_written, bytes.len() as u64);
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        serialize(&records, &Column::ALL, ';', QuoteStyle::Never).unwrap()
    );
}

#[test]
fn test_custom_delimiter() {
    let text = serialize(&records(10), &Column::ALL, '\t', QuoteStyle::Never).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), header_cells(&Column::ALL).join("\t"));
    for line in lines {
        assert_eq!(line.split('\t').count(), 14);
    }
}

#[test]
fn test_file_output_writes_and_reports_progress() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("equipment.csv");
    let records = records(250);

    let mut seen = Vec::new();
    let stats = FileOutput::new(&path)
        .write(&records, |rows| seen.push(rows))
        .unwrap();

    assert_eq!(stats.rows_written, 250);
    assert_eq!(seen.last(), Some(&250));
    assert!(seen.contains(&100));
    assert!(seen.contains(&200));

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, serialize(&records, &Column::ALL, ';', QuoteStyle::Never).unwrap());
    assert_eq!(stats.bytes_written, content.len() as u64);
}

#[test]
fn test_file_output_leaves_no_temp_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("equipment.csv");
    FileOutput::new(&path).write(&records(10), |_| {}).unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_file_output_replaces_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("equipment.csv");
    fs::write(&path, "stale content\n").unwrap();

    FileOutput::new(&path).write(&records(3), |_| {}).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(HEADER));
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_file_output_missing_directory_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("equipment.csv");

    let result = FileOutput::new(&path).write(&records(3), |_| {});
    assert!(result.is_err());
    assert!(!path.exists());
}
