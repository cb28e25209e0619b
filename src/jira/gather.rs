//! Window aggregation and the per-server fan-out scheduler.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn, Instrument};

use super::errors::GatherError;
use super::query::{ClassificationQuery, StatusClass};
use super::report::window_record;
use super::search::{HttpJqlCounter, JqlCounter};
use super::window::WindowKind;
use crate::accumulator::Accumulator;
use crate::config::JiraConfig;
use crate::telemetry::create_gather_span;

/// The jira KPI gatherer: one instance per configured project, shared across
/// gather cycles.
#[derive(Clone)]
pub struct JiraKpis {
    config: JiraConfig,
    counter: Arc<dyn JqlCounter>,
}

impl std::fmt::Debug for JiraKpis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraKpis")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JiraKpis {
    pub fn new(config: JiraConfig) -> Result<Self, GatherError> {
        let counter = HttpJqlCounter::new(
            config.username.clone(),
            config.password.clone(),
            config.timeout(),
        )?;
        Self::with_counter(config, Arc::new(counter))
    }

    /// Construct with an injected counter, used by tests and by callers that
    /// bring their own transport.
    pub fn with_counter(
        config: JiraConfig,
        counter: Arc<dyn JqlCounter>,
    ) -> Result<Self, GatherError> {
        if config.project.trim().is_empty() {
            return Err(GatherError::configuration("project must not be empty"));
        }
        Ok(Self { config, counter })
    }

    /// The window kinds enabled by configuration, in reporting order.
    pub fn enabled_kinds(&self) -> Vec<WindowKind> {
        WindowKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                WindowKind::Weekly => self.config.gather_weekly,
                WindowKind::BiWeekly => self.config.gather_biweekly,
                WindowKind::Monthly => self.config.gather_monthly,
                WindowKind::Quarterly => self.config.gather_quarterly,
                WindowKind::Yearly => self.config.gather_yearly,
            })
            .collect()
    }

    /// Run one gather cycle against all configured servers with "today" taken
    /// from the local clock.
    pub async fn gather(&self, acc: Arc<dyn Accumulator>) -> Result<(), GatherError> {
        self.gather_for_date(Local::now().date_naive(), acc).await
    }

    /// Run one gather cycle for an explicit date. An empty server list runs a
    /// single pass against the configured default server. Otherwise each
    /// server gets its own task; all tasks are joined before returning, and
    /// per-server failures are collected rather than aborting siblings.
    pub async fn gather_for_date(
        &self,
        today: NaiveDate,
        acc: Arc<dyn Accumulator>,
    ) -> Result<(), GatherError> {
        if self.config.servers.is_empty() {
            let server = self.config.default_server.clone();
            return self.gather_server(&server, today, acc.as_ref()).await;
        }

        let total = self.config.servers.len();
        let mut units = JoinSet::new();
        for server in &self.config.servers {
            let gatherer = self.clone();
            let server = server.clone();
            let acc = Arc::clone(&acc);
            let span = create_gather_span(&server, &gatherer.config.project);
            units.spawn(
                async move { gatherer.gather_server(&server, today, acc.as_ref()).await }
                    .instrument(span),
            );
        }

        let mut failures = Vec::new();
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(error = %err, "server unit failed");
                    failures.push(err);
                }
                Err(join_err) => {
                    warn!(error = %join_err, "server unit panicked");
                    failures.push(GatherError::Transport {
                        server: "<task>".to_string(),
                        message: join_err.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(GatherError::Partial { failures, total })
        }
    }

    // Sequential within one server: window kinds one after another, and the
    // open/closed pair completes before the next kind starts.
    async fn gather_server(
        &self,
        server: &str,
        today: NaiveDate,
        acc: &dyn Accumulator,
    ) -> Result<(), GatherError> {
        for kind in self.enabled_kinds() {
            self.gather_window(server, kind, today, acc).await?;
        }
        Ok(())
    }

    async fn gather_window(
        &self,
        server: &str,
        kind: WindowKind,
        today: NaiveDate,
        acc: &dyn Accumulator,
    ) -> Result<(), GatherError> {
        let range = kind.range(today);
        let project = &self.config.project;

        // Open first, then closed. Both counts must land before reporting;
        // either failure means this window emits nothing this cycle.
        let opened = self
            .counter
            .count(
                server,
                &ClassificationQuery::new(project, range, StatusClass::Open).to_jql(),
            )
            .await?;
        let closed = self
            .counter
            .count(
                server,
                &ClassificationQuery::new(project, range, StatusClass::Closed).to_jql(),
            )
            .await?;

        debug!(server, series = kind.series(), opened, closed, "window gathered");
        let record = window_record(opened, closed, project, kind, &range);
        acc.add_fields(&record.series, record.fields, record.tags);
        Ok(())
    }
}
