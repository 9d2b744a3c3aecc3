//! Storage partitioning for flattened records.

use chrono::{DateTime, Utc};

/// Path segment used for records whose source timestamp could not be
/// parsed.
pub const UNKNOWN_SEGMENT: &str = "unknown";

/// Storage partition of one analytical record.
///
/// `Unknown` is a deliberate lossy-degradation sentinel: a record with
/// an unparseable timestamp is still written, under the `unknown`
/// partition path, rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Partition {
    Day {
        year: String,
        month: String,
        day: String,
    },
    Unknown,
}

impl Partition {
    pub fn from_timestamp(ts: &DateTime<Utc>) -> Self {
        Self::Day {
            year: ts.format("%Y").to_string(),
            month: ts.format("%m").to_string(),
            day: ts.format("%d").to_string(),
        }
    }

    /// Parse from the `YYYY-MM-DD` prefix of a datetime string.
    pub fn from_date_prefix(raw: &str) -> Self {
        let prefix: String = raw.chars().take(10).collect();
        let parts: Vec<&str> = prefix.split('-').collect();
        match parts.as_slice() {
            [year, month, day] if !year.is_empty() && !month.is_empty() && !day.is_empty() => {
                Self::Day {
                    year: year.to_string(),
                    month: month.to_string(),
                    day: day.to_string(),
                }
            }
            _ => Self::Unknown,
        }
    }

    /// Hive-style path fragment, `year=.../month=.../day=...`.
    pub fn path(&self) -> String {
        match self {
            Self::Day { year, month, day } => {
                format!("year={}/month={}/day={}", year, month, day)
            }
            Self::Unknown => format!(
                "year={}/month={}/day={}",
                UNKNOWN_SEGMENT, UNKNOWN_SEGMENT, UNKNOWN_SEGMENT
            ),
        }
    }

    /// Partition values in column order, for catalog registration.
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Day { year, month, day } => vec![year.clone(), month.clone(), day.clone()],
            Self::Unknown => vec![
                UNKNOWN_SEGMENT.to_string(),
                UNKNOWN_SEGMENT.to_string(),
                UNKNOWN_SEGMENT.to_string(),
            ],
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2026-02-11T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let partition = Partition::from_timestamp(&ts);
        assert_eq!(partition.path(), "year=2026/month=02/day=11");
    }

    #[test]
    fn test_from_date_prefix() {
        // Scorecard datetimes look like "2025-10-08T14-34-19"
        let partition = Partition::from_date_prefix("2025-10-08T14-34-19");
        assert_eq!(
            partition,
            Partition::Day {
                year: "2025".to_string(),
                month: "10".to_string(),
                day: "08".to_string(),
            }
        );
    }

    #[test]
    fn test_from_date_prefix_malformed() {
        assert_eq!(Partition::from_date_prefix(""), Partition::Unknown);
        assert_eq!(Partition::from_date_prefix("20251008"), Partition::Unknown);
        assert_eq!(Partition::from_date_prefix("2025-10"), Partition::Unknown);
        assert_eq!(Partition::from_date_prefix("--"), Partition::Unknown);
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(
            Partition::Unknown.path(),
            "year=unknown/month=unknown/day=unknown"
        );
        assert_eq!(Partition::Unknown.values(), vec!["unknown"; 3]);
    }
}
