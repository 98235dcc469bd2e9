//! Synthetic laboratory equipment fixtures.
//!
//! Generates fake equipment records for an asset-tracking import and writes
//! them as a delimited file whose `cf:Name,type:kind` headers describe custom
//! fields.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lab_fixtures::generator::generate;
//! use lab_fixtures::random::SeededSource;
//! use lab_fixtures::reference::ReferenceTables;
//! use lab_fixtures::schema::Column;
//! use lab_fixtures::writer::{serialize, QuoteStyle};
//!
//! let tables = ReferenceTables::standard();
//! let clock = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let records = generate(10, &tables, clock, SeededSource::new(42)).unwrap();
//!
//! let text = serialize(&records, &Column::ALL, ';', QuoteStyle::Never).unwrap();
//! assert_eq!(text.lines().count(), 11);
//! ```

pub mod config;
pub mod generator;
pub mod random;
pub mod reference;
pub mod schema;
pub mod validate;
pub mod writer;
