use super::{EquipmentRecord, OperationalStatus};
use ahash::AHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics over a generated batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub records: usize,
    pub distinct_locations: usize,
    pub distinct_custodians: usize,
    pub distinct_manufacturers: usize,
    pub status_counts: BTreeMap<&'static str, usize>,
    pub requires_certification: usize,
    pub total_valuation: i64,
}

impl GenerationSummary {
    pub fn from_records(records: &[EquipmentRecord]) -> Self {
        let mut locations = AHashSet::new();
        let mut custodians = AHashSet::new();
        let mut manufacturers = AHashSet::new();
        let mut status_counts: BTreeMap<&'static str, usize> = OperationalStatus::ALL
            .iter()
            .map(|s| (s.label(), 0))
            .collect();
        let mut requires_certification = 0;
        let mut total_valuation = 0;

        for record in records {
            locations.insert(record.location);
            custodians.insert(record.custodian);
            manufacturers.insert(record.manufacturer);
            *status_counts
                .entry(record.operational_status.label())
                .or_default() += 1;
            if record.requires_certification {
                requires_certification += 1;
            }
            total_valuation += record.valuation;
        }

        Self {
            records: records.len(),
            distinct_locations: locations.len(),
            distinct_custodians: custodians.len(),
            distinct_manufacturers: manufacturers.len(),
            status_counts,
            requires_certification,
            total_valuation,
        }
    }

    pub fn status_count(&self, status: OperationalStatus) -> usize {
        self.status_counts
            .get(status.label())
            .copied()
            .unwrap_or_default()
    }
}
