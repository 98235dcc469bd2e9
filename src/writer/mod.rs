//! Delimited text output.
//!
//! Records are written one line each, fields joined by a single delimiter
//! character and terminated by `\n`. The default [`QuoteStyle::Never`] emits
//! values verbatim, so a value containing the delimiter corrupts its row;
//! such collisions are counted and logged. [`QuoteStyle::Necessary`] wraps
//! offending values (header cells included) in double quotes instead, which
//! changes the output bytes.

use crate::generator::EquipmentRecord;
use crate::schema::{header_cells, Column};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_OUTPUT_FILE: &str = "lab_equipment_2000.csv";

/// Rows between progress callbacks
const PROGRESS_INTERVAL: usize = 100;

/// How field values are protected against delimiter collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Write values as-is (import-compatible default)
    #[default]
    Never,
    /// Quote values containing the delimiter, a quote or a line break
    Necessary,
}

impl QuoteStyle {
    fn csv_style(self) -> csv::QuoteStyle {
        match self {
            QuoteStyle::Never => csv::QuoteStyle::Never,
            QuoteStyle::Necessary => csv::QuoteStyle::Necessary,
        }
    }
}

impl std::str::FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" | "none" => Ok(QuoteStyle::Never),
            "necessary" | "minimal" => Ok(QuoteStyle::Necessary),
            _ => Err(format!(
                "Unknown quote style: {}. Valid options: never, necessary",
                s
            )),
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStyle::Never => write!(f, "never"),
            QuoteStyle::Necessary => write!(f, "necessary"),
        }
    }
}

/// Statistics from a write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub rows_written: usize,
    pub bytes_written: u64,
    /// Cells (header included) that contained the delimiter or a line break
    pub delimiter_collisions: usize,
}

/// The delimiter as a single byte; only ASCII delimiters are supported
pub fn delimiter_byte(delimiter: char) -> anyhow::Result<u8> {
    if !delimiter.is_ascii() {
        anyhow::bail!("unsupported delimiter {:?}: must be ASCII", delimiter);
    }
    Ok(delimiter as u8)
}

/// True if the raw value would split or break a row when written unquoted
pub fn collides(value: &str, delimiter: char) -> bool {
    value.contains(delimiter) || value.contains(['\n', '\r'])
}

/// Counts bytes passing through to the inner writer
struct CountingWriter<W> {
    inner: W,
    bytes: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes records as delimited lines to any `Write`
pub struct DelimitedWriter<W: Write> {
    writer: csv::Writer<CountingWriter<W>>,
    columns: Vec<Column>,
    delimiter: char,
    quote: QuoteStyle,
    stats: WriteStats,
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(
        inner: W,
        columns: &[Column],
        delimiter: char,
        quote: QuoteStyle,
    ) -> anyhow::Result<Self> {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .quote_style(quote.csv_style())
            .terminator(csv::Terminator::Any(b'\n'))
            .buffer_capacity(WRITER_BUFFER_SIZE)
            .from_writer(CountingWriter { inner, bytes: 0 });
        Ok(Self {
            writer,
            columns: columns.to_vec(),
            delimiter,
            quote,
            stats: WriteStats::default(),
        })
    }

    pub fn write_header(&mut self) -> csv::Result<()> {
        let cells = header_cells(&self.columns);
        for cell in &cells {
            self.note_collision(cell);
        }
        self.writer.write_record(&cells)
    }

    pub fn write_record(&mut self, record: &EquipmentRecord) -> csv::Result<()> {
        for i in 0..self.columns.len() {
            let column = self.columns[i];
            let value = record.value(column);
            if self.note_collision(&value) {
                tracing::debug!(
                    column = %column.descriptor(),
                    value = %value,
                    "value contains the delimiter"
                );
            }
            self.writer.write_field(value.as_bytes())?;
        }
        self.writer.write_record(None::<&[u8]>)?;
        self.stats.rows_written += 1;
        Ok(())
    }

    fn note_collision(&mut self, value: &str) -> bool {
        let collision = collides(value, self.delimiter);
        if collision {
            self.stats.delimiter_collisions += 1;
        }
        collision
    }

    /// Flush and hand back the inner writer
    pub fn finish(self) -> io::Result<(W, WriteStats)> {
        let mut stats = self.stats;
        let counting = self.writer.into_inner().map_err(|e| e.into_error())?;
        stats.bytes_written = counting.bytes;
        if stats.delimiter_collisions > 0 && self.quote == QuoteStyle::Never {
            tracing::warn!(
                collisions = stats.delimiter_collisions,
                delimiter = %self.delimiter,
                "values contain the delimiter and were written unquoted; affected rows will not parse"
            );
        }
        Ok((counting.inner, stats))
    }
}

/// Serialize records to a string: header line, then one line per record.
pub fn serialize(
    records: &[EquipmentRecord],
    columns: &[Column],
    delimiter: char,
    quote: QuoteStyle,
) -> anyhow::Result<String> {
    let mut writer = DelimitedWriter::new(Vec::new(), columns, delimiter, quote)?;
    writer.write_header()?;
    for record in records {
        writer.write_record(record)?;
    }
    let (bytes, _) = writer.finish()?;
    String::from_utf8(bytes).context("serialized output is not valid UTF-8")
}

/// Destination file and format for a write
#[derive(Debug, Clone)]
pub struct FileOutput {
    pub path: PathBuf,
    pub delimiter: char,
    pub quote: QuoteStyle,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            quote: QuoteStyle::Never,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }

    /// Write header and records atomically: the data goes to a temporary
    /// file next to the target, which is renamed into place only after a
    /// complete flush. On failure the target is left untouched.
    pub fn write<F>(&self, records: &[EquipmentRecord], mut progress: F) -> anyhow::Result<WriteStats>
    where
        F: FnMut(usize),
    {
        let dir = parent_dir(&self.path);
        let temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

        let mut writer = DelimitedWriter::new(temp, &Column::ALL, self.delimiter, self.quote)?;
        writer
            .write_header()
            .with_context(|| format!("failed to write header for {}", self.path.display()))?;
        for (i, record) in records.iter().enumerate() {
            writer
                .write_record(record)
                .with_context(|| format!("failed to write record {} to {}", i + 1, self.path.display()))?;
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                progress(i + 1);
            }
        }
        progress(records.len());

        let (temp, stats) = writer
            .finish()
            .with_context(|| format!("failed to flush {}", self.path.display()))?;
        temp.as_file()
            .sync_all()
            .with_context(|| format!("failed to sync {}", self.path.display()))?;
        temp.persist(&self.path)
            .with_context(|| format!("failed to move output into place at {}", self.path.display()))?;

        tracing::info!(
            path = %self.path.display(),
            rows = stats.rows_written,
            bytes = stats.bytes_written,
            "wrote output file"
        );
        Ok(stats)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
