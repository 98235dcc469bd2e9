//! Equipment record generator.
//!
//! Produces synthetic laboratory equipment records by independent uniform
//! sampling from [`ReferenceTables`]. All relative dates are anchored on a
//! single clock date fixed for the whole run, and every random draw goes
//! through a [`RandomSource`], so a seeded source makes a run reproducible.

mod status;
mod summary;

pub use status::{OperationalStatus, StatusThresholds};
pub use summary::GenerationSummary;

use crate::random::RandomSource;
use crate::reference::{EquipmentType, ReferenceTables};
use crate::schema::Column;
use chrono::{Days, NaiveDate};
use std::borrow::Cow;

/// Records produced by a default run
pub const DEFAULT_RECORD_COUNT: usize = 2000;

/// Date format used for every date column
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Warranty lengths, in fixed 365-day years
pub const WARRANTY_YEARS: [u64; 3] = [3, 5, 7];
pub const DAYS_PER_WARRANTY_YEAR: u64 = 365;

/// Purchases go back up to four years
pub const MAX_PURCHASE_AGE_DAYS: i64 = 1460;
/// Calibrations happened within the last year
pub const MAX_CALIBRATION_AGE_DAYS: i64 = 365;

const ASSET_SERIAL_RANGE: (i64, i64) = (1000, 9999);
const ASSET_BATCH_RANGE: (i64, i64) = (100, 999);
const MODEL_NUMBER_RANGE: (i64, i64) = (1000, 9999);

/// Default probability that an instrument requires certification
pub const DEFAULT_CERTIFICATION_PROBABILITY: f64 = 0.9;

/// Tunables that do not change the shape of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    pub status_thresholds: StatusThresholds,
    pub certification_probability: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            status_thresholds: StatusThresholds::default(),
            certification_probability: DEFAULT_CERTIFICATION_PROBABILITY,
        }
    }
}

/// One synthetic equipment record
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub tags: String,
    pub location: &'static str,
    pub valuation: i64,
    pub custodian: &'static str,
    pub asset_id: String,
    pub manufacturer: &'static str,
    pub purchase_date: NaiveDate,
    pub warranty_expiry: NaiveDate,
    pub last_calibration: NaiveDate,
    pub operational_status: OperationalStatus,
    pub requires_certification: bool,
}

impl EquipmentRecord {
    /// Text value of a column as it appears in the output file
    pub fn value(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::Title => Cow::Borrowed(&self.title),
            Column::Description => Cow::Borrowed(&self.description),
            Column::Category => Cow::Borrowed(self.category),
            Column::Tags => Cow::Borrowed(&self.tags),
            Column::Location => Cow::Borrowed(self.location),
            Column::Valuation => Cow::Owned(self.valuation.to_string()),
            Column::Custodian => Cow::Borrowed(self.custodian),
            Column::AssetId => Cow::Borrowed(&self.asset_id),
            Column::Manufacturer => Cow::Borrowed(self.manufacturer),
            Column::PurchaseDate => Cow::Owned(format_date(self.purchase_date)),
            Column::WarrantyExpiry => Cow::Owned(format_date(self.warranty_expiry)),
            Column::LastCalibration => Cow::Owned(format_date(self.last_calibration)),
            Column::OperationalStatus => Cow::Borrowed(self.operational_status.label()),
            Column::RequiresCertification => {
                Cow::Borrowed(if self.requires_certification { "yes" } else { "no" })
            }
        }
    }

    /// Warranty length in whole days
    pub fn warranty_days(&self) -> i64 {
        (self.warranty_expiry - self.purchase_date).num_days()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Two leading characters of the manufacturer, uppercased
fn asset_prefix(manufacturer: &str) -> String {
    manufacturer
        .chars()
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Longest possible warranty, in days
fn max_warranty_days() -> u64 {
    WARRANTY_YEARS.iter().max().copied().unwrap_or_default() * DAYS_PER_WARRANTY_YEAR
}

/// Every date derived from `clock` must be representable
pub fn ensure_clock_in_range(clock: NaiveDate) -> anyhow::Result<()> {
    let earliest = clock.checked_sub_days(Days::new(MAX_PURCHASE_AGE_DAYS as u64));
    let latest = clock.checked_add_days(Days::new(max_warranty_days()));
    if earliest.is_none() || latest.is_none() {
        anyhow::bail!(
            "date {} is out of range: purchase dates go back {} days and warranties run up to {} days",
            clock,
            MAX_PURCHASE_AGE_DAYS,
            max_warranty_days()
        );
    }
    Ok(())
}

/// Record generator over a set of reference tables
pub struct Generator<'a, R: RandomSource> {
    tables: &'a ReferenceTables,
    clock: NaiveDate,
    source: R,
    options: GeneratorOptions,
}

impl<'a, R: RandomSource> Generator<'a, R> {
    /// Fails if any reference table is empty or the clock leaves no room
    /// for the purchase and warranty date windows
    pub fn new(tables: &'a ReferenceTables, clock: NaiveDate, source: R) -> anyhow::Result<Self> {
        tables.ensure_sampleable()?;
        ensure_clock_in_range(clock)?;
        Ok(Self {
            tables,
            clock,
            source,
            options: GeneratorOptions::default(),
        })
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Draw one record. The order of draws is fixed; changing it changes
    /// every seeded fixture.
    pub fn next_record(&mut self) -> EquipmentRecord {
        let equipment: &EquipmentType = self.source.pick(self.tables.equipment_types);
        let manufacturer: &'static str = *self.source.pick(self.tables.manufacturers);

        let purchase_age = self.source.int_inclusive(0, MAX_PURCHASE_AGE_DAYS);
        let purchase_date = self.clock - Days::new(purchase_age as u64);
        let warranty_years = *self.source.pick(&WARRANTY_YEARS);
        let warranty_expiry = purchase_date + Days::new(DAYS_PER_WARRANTY_YEAR * warranty_years);
        let calibration_age = self.source.int_inclusive(0, MAX_CALIBRATION_AGE_DAYS);
        let last_calibration = self.clock - Days::new(calibration_age as u64);

        let serial = self
            .source
            .int_inclusive(ASSET_SERIAL_RANGE.0, ASSET_SERIAL_RANGE.1);
        let batch = self
            .source
            .int_inclusive(ASSET_BATCH_RANGE.0, ASSET_BATCH_RANGE.1);
        let asset_id = format!("{}{}-{}", asset_prefix(manufacturer), serial, batch);

        let prefix: &str = *self.source.pick(equipment.model_prefixes);
        let number = self
            .source
            .int_inclusive(MODEL_NUMBER_RANGE.0, MODEL_NUMBER_RANGE.1);
        let model_number = format!("{} {}", prefix, number);

        let valuation = equipment.base_price
            + self
                .source
                .int_inclusive(-equipment.price_variance, equipment.price_variance);

        let operational_status = self
            .options
            .status_thresholds
            .classify(self.source.unit());
        let location: &'static str = *self.source.pick(self.tables.locations);
        let custodian: &'static str = *self.source.pick(self.tables.custodians);
        let requires_certification = self.source.unit() < self.options.certification_probability;

        EquipmentRecord {
            title: format!("{} {}", manufacturer, model_number),
            description: format!("{} for {}", model_number, equipment.primary_tag()),
            category: equipment.category,
            tags: equipment.tags.join(","),
            location,
            valuation,
            custodian,
            asset_id,
            manufacturer,
            purchase_date,
            warranty_expiry,
            last_calibration,
            operational_status,
            requires_certification,
        }
    }

    /// Draw `count` records in order
    pub fn generate(&mut self, count: usize) -> Vec<EquipmentRecord> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.next_record());
        }
        records
    }
}

/// Generate `count` records with default options.
///
/// `count == 0` yields an empty vector.
pub fn generate<R: RandomSource>(
    count: usize,
    tables: &ReferenceTables,
    clock: NaiveDate,
    source: R,
) -> anyhow::Result<Vec<EquipmentRecord>> {
    let mut generator = Generator::new(tables, clock, source)?;
    Ok(generator.generate(count))
}
