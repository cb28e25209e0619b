//! Mapping from window counts to the emitted metric record.
//!
//! Series names and field keys are literal for downstream compatibility;
//! dashboards already query `jira_monthly` and `opened_jiras`.

use std::collections::BTreeMap;

use super::window::{DateRange, WindowKind};
use crate::accumulator::MetricRecord;

impl WindowKind {
    /// The output series this window kind reports under.
    pub fn series(self) -> &'static str {
        match self {
            WindowKind::Weekly => "jira_weekly",
            WindowKind::BiWeekly => "jira_biweekly",
            WindowKind::Monthly => "jira_monthly",
            WindowKind::Quarterly => "jira_quarterly",
            WindowKind::Yearly => "jira_yearly",
        }
    }
}

/// Build the single record for one (server, window kind) pair.
pub fn window_record(
    opened: u64,
    closed: u64,
    project: &str,
    kind: WindowKind,
    range: &DateRange,
) -> MetricRecord {
    let tags = BTreeMap::from([
        ("project".to_string(), project.to_string()),
        ("epoch".to_string(), range.epoch()),
    ]);
    let fields = BTreeMap::from([
        ("opened_jiras".to_string(), opened as i64),
        ("closed_jiras".to_string(), closed as i64),
    ]);
    MetricRecord {
        series: kind.series().to_string(),
        tags,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn every_window_kind_has_its_own_series() {
        let names: Vec<&str> = WindowKind::ALL.iter().map(|kind| kind.series()).collect();
        assert_eq!(
            names,
            vec![
                "jira_weekly",
                "jira_biweekly",
                "jira_monthly",
                "jira_quarterly",
                "jira_yearly",
            ]
        );
    }

    #[test]
    fn record_carries_project_epoch_and_both_counts() {
        let range = WindowKind::Monthly.range(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let record = window_record(5, 2, "X", WindowKind::Monthly, &range);
        assert_eq!(record.series, "jira_monthly");
        assert_eq!(record.tags["project"], "X");
        assert_eq!(record.tags["epoch"], "2024-03-01-2024-03-31");
        assert_eq!(record.fields["opened_jiras"], 5);
        assert_eq!(record.fields["closed_jiras"], 2);
    }
}
