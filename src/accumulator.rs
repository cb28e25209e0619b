//! Metric sink abstraction shared by the jira and cron gatherers.
//!
//! The sink is append-only and must tolerate concurrent appends from the
//! per-server gather tasks; record order across servers is unspecified.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

/// One emitted fact: series name plus tag and field maps. BTreeMap keeps the
/// rendered order of tags and fields deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
    pub series: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, i64>,
}

pub trait Accumulator: Send + Sync {
    fn add_fields(
        &self,
        series: &str,
        fields: BTreeMap<String, i64>,
        tags: BTreeMap<String, String>,
    );
}

/// In-memory sink used by tests and anything that wants to batch records.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    records: Mutex<Vec<MetricRecord>>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().expect("accumulator lock").clone()
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_fields(
        &self,
        series: &str,
        fields: BTreeMap<String, i64>,
        tags: BTreeMap<String, String>,
    ) {
        self.records.lock().expect("accumulator lock").push(MetricRecord {
            series: series.to_string(),
            tags,
            fields,
        });
    }
}

/// Writes each record to stdout as InfluxDB line protocol, one line per
/// record, for use as a collector `exec` input. Timestamps are left to the
/// collector.
#[derive(Debug, Default)]
pub struct LineProtocolWriter;

impl LineProtocolWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Accumulator for LineProtocolWriter {
    fn add_fields(
        &self,
        series: &str,
        fields: BTreeMap<String, i64>,
        tags: BTreeMap<String, String>,
    ) {
        let record = MetricRecord {
            series: series.to_string(),
            tags,
            fields,
        };
        // Fire-and-forget: a closed stdout is not worth failing a cycle over.
        let _ = writeln!(std::io::stdout(), "{}", to_line_protocol(&record));
    }
}

/// Render one record as a line-protocol line (no timestamp).
pub fn to_line_protocol(record: &MetricRecord) -> String {
    let mut line = escape(&record.series);
    for (key, value) in &record.tags {
        line.push(',');
        line.push_str(&escape(key));
        line.push('=');
        line.push_str(&escape(value));
    }
    line.push(' ');
    let rendered: Vec<String> = record
        .fields
        .iter()
        .map(|(key, value)| format!("{}={}i", escape(key), value))
        .collect();
    line.push_str(&rendered.join(","));
    line
}

// Line protocol reserves comma, space, and equals in identifiers and tag
// values.
fn escape(raw: &str) -> String {
    raw.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}
