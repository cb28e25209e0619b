//! Cron-job KPI gathering.
//!
//! Scans a log file for today's execution marker of a named scheduled job
//! and emits the expected per-weekday run count when the marker is found,
//! zero otherwise. Much simpler than the jira side: one file, one record.

use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::debug;

use crate::accumulator::Accumulator;
use crate::config::CronConfig;
use crate::jira::GatherError;

const SERIES: &str = "cron_kpis";

pub struct CronKpis {
    config: CronConfig,
}

impl CronKpis {
    pub fn new(config: CronConfig) -> Self {
        Self { config }
    }

    pub fn gather(&self, acc: &dyn Accumulator) -> Result<(), GatherError> {
        self.gather_for_date(Local::now().date_naive(), acc)
    }

    /// Scan the configured log for `cron_job` lines stamped with `today`'s
    /// date and emit one `cron_kpis` record.
    pub fn gather_for_date(
        &self,
        today: NaiveDate,
        acc: &dyn Accumulator,
    ) -> Result<(), GatherError> {
        if self.config.cron_count.len() != 7 {
            return Err(GatherError::configuration(
                "cron_count needs one entry per weekday, Sunday first",
            ));
        }

        // Syslog-style date stamp, day without leading zero, e.g. "Mar 5".
        let date_stamp = today.format("%b %-d").to_string();
        let weekday = today.weekday().num_days_from_sunday() as usize;

        let file = File::open(&self.config.location)?;
        let mut ran_today = false;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.contains(&self.config.cron_job) && line.contains(&date_stamp) {
                ran_today = true;
                break;
            }
        }

        let count = if ran_today {
            i64::from(self.config.cron_count[weekday])
        } else {
            0
        };
        debug!(
            job = self.config.cron_job,
            host = self.config.host,
            count,
            "cron marker scan complete"
        );

        let tags = BTreeMap::from([("server".to_string(), self.config.host.clone())]);
        let fields = BTreeMap::from([("cron_count".to_string(), count)]);
        acc.add_fields(SERIES, fields, tags);
        Ok(())
    }
}
