// jira-kpis - windowed open/closed issue counting for Jira servers
// This exposes the core components for testing and integration

pub mod accumulator;
pub mod config;
pub mod cron;
pub mod jira;
pub mod telemetry;

// Re-export key types for easy access
pub use accumulator::{to_line_protocol, Accumulator, LineProtocolWriter, MemoryAccumulator, MetricRecord};
pub use config::{sample_config, CronConfig, JiraConfig, KpiConfig};
pub use cron::CronKpis;
pub use jira::{
    ClassificationQuery, DateRange, GatherError, HttpJqlCounter, JiraKpis, JqlCounter,
    StatusClass, WindowKind,
};
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
