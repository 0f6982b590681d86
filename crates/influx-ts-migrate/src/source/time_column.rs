//! Rules that designate the time axis of a data set.
//!
//! InfluxDB stores every point with an implicit, reserved `time` column, so the
//! default rule is [`ReservedNameRule::influx`]. [`FirstTimestampRule`] suits
//! sources that flag temporal columns only through their type.

use crate::core::schema::ColumnInfo;
use crate::core::traits::TimeColumnRule;

/// Name of the reserved InfluxDB time column.
pub const INFLUX_TIME_COLUMN: &str = "time";

/// Picks the column with a fixed name, provided it has a temporal type.
#[derive(Debug, Clone)]
pub struct ReservedNameRule {
    name: String,
}

impl ReservedNameRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The InfluxDB convention: the reserved `time` column.
    pub fn influx() -> Self {
        Self::new(INFLUX_TIME_COLUMN)
    }
}

impl TimeColumnRule for ReservedNameRule {
    fn select(&self, columns: &[ColumnInfo]) -> Option<String> {
        columns
            .iter()
            .find(|c| c.name == self.name && c.data_type.is_temporal())
            .map(|c| c.name.clone())
    }

    fn describe(&self) -> String {
        format!("expected a timestamp column named '{}'", self.name)
    }
}

/// Picks the first column with a temporal type.
#[derive(Debug, Clone, Default)]
pub struct FirstTimestampRule;

impl TimeColumnRule for FirstTimestampRule {
    fn select(&self, columns: &[ColumnInfo]) -> Option<String> {
        columns
            .iter()
            .find(|c| c.data_type.is_temporal())
            .map(|c| c.name.clone())
    }

    fn describe(&self) -> String {
        "expected at least one timestamp column".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::CanonicalType;

    fn columns() -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::new("host", CanonicalType::Text),
            ColumnInfo::new("created", CanonicalType::Timestamp),
            ColumnInfo::new("time", CanonicalType::Timestamp),
        ]
    }

    #[test]
    fn test_reserved_name_rule() {
        let rule = ReservedNameRule::influx();
        assert_eq!(rule.select(&columns()), Some("time".to_string()));
    }

    #[test]
    fn test_reserved_name_requires_temporal_type() {
        let rule = ReservedNameRule::influx();
        let cols = vec![ColumnInfo::new("time", CanonicalType::Text)];
        assert_eq!(rule.select(&cols), None);
        assert!(rule.describe().contains("'time'"));
    }

    #[test]
    fn test_first_timestamp_rule() {
        let rule = FirstTimestampRule;
        assert_eq!(rule.select(&columns()), Some("created".to_string()));
        assert_eq!(
            rule.select(&[ColumnInfo::new("host", CanonicalType::Text)]),
            None
        );
    }
}
