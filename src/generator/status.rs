use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperationalStatus {
    #[serde(rename = "Operational")]
    Operational,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Needs Repair")]
    NeedsRepair,
}

impl OperationalStatus {
    pub const ALL: [OperationalStatus; 4] = [
        OperationalStatus::Operational,
        OperationalStatus::UnderMaintenance,
        OperationalStatus::New,
        OperationalStatus::NeedsRepair,
    ];

    /// Option value written to the status column
    pub fn label(&self) -> &'static str {
        match self {
            OperationalStatus::Operational => "Operational",
            OperationalStatus::UnderMaintenance => "Under Maintenance",
            OperationalStatus::New => "New",
            OperationalStatus::NeedsRepair => "Needs Repair",
        }
    }
}

impl std::str::FromStr for OperationalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationalStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown operational status: {}. Valid values: Operational, Under Maintenance, New, Needs Repair",
                    s
                )
            })
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cumulative thresholds mapping one uniform draw in `[0, 1)` to a status.
///
/// `r < operational` is Operational, `r < under_maintenance` is Under
/// Maintenance, `r < new` is New and anything above is Needs Repair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub operational: f64,
    pub under_maintenance: f64,
    pub new: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            operational: 0.8,
            under_maintenance: 0.9,
            new: 0.95,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, r: f64) -> OperationalStatus {
        if r < self.operational {
            OperationalStatus::Operational
        } else if r < self.under_maintenance {
            OperationalStatus::UnderMaintenance
        } else if r < self.new {
            OperationalStatus::New
        } else {
            OperationalStatus::NeedsRepair
        }
    }

    /// Thresholds must be non-decreasing and lie in `[0, 1]`
    pub fn validate(&self) -> anyhow::Result<()> {
        let values = [self.operational, self.under_maintenance, self.new];
        if values.iter().any(|v| !(0.0..=1.0).contains(v)) {
            anyhow::bail!(
                "status thresholds must be between 0 and 1, got {} / {} / {}",
                self.operational,
                self.under_maintenance,
                self.new
            );
        }
        if self.operational > self.under_maintenance || self.under_maintenance > self.new {
            anyhow::bail!(
                "status thresholds must be non-decreasing (operational <= under_maintenance <= new), got {} / {} / {}",
                self.operational,
                self.under_maintenance,
                self.new
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let t = StatusThresholds::default();
        assert_eq!(t.classify(0.0), OperationalStatus::Operational);
        assert_eq!(t.classify(0.799), OperationalStatus::Operational);
        assert_eq!(t.classify(0.8), OperationalStatus::UnderMaintenance);
        assert_eq!(t.classify(0.9), OperationalStatus::New);
        assert_eq!(t.classify(0.95), OperationalStatus::NeedsRepair);
        assert_eq!(t.classify(0.999), OperationalStatus::NeedsRepair);
    }

    #[test]
    fn test_validate() {
        assert!(StatusThresholds::default().validate().is_ok());
        let unordered = StatusThresholds {
            operational: 0.9,
            under_maintenance: 0.8,
            new: 0.95,
        };
        assert!(unordered.validate().is_err());
        let out_of_range = StatusThresholds {
            operational: 0.5,
            under_maintenance: 0.9,
            new: 1.5,
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_label_roundtrip() {
        for status in OperationalStatus::ALL {
            assert_eq!(status.label().parse::<OperationalStatus>(), Ok(status));
        }
        assert!("operational".parse::<OperationalStatus>().is_err());
    }
}
