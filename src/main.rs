use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use jira_kpis::{
    generate_correlation_id, init_telemetry, sample_config, shutdown_telemetry, Accumulator,
    CronKpis, JiraKpis, KpiConfig, LineProtocolWriter,
};

#[derive(Parser)]
#[command(name = "jira-kpis")]
#[command(about = "Gather open and closed issue counts from Jira projects over rolling calendar windows")]
#[command(long_about = "jira-kpis polls the configured Jira servers, counts open and closed issues \
                       per project over weekly, biweekly, monthly, quarterly, and yearly windows, \
                       and emits the counts as InfluxDB line protocol on stdout. Without a \
                       subcommand it runs a single gather cycle and exits, collector exec-input style.")]
struct Cli {
    /// Path to the configuration file (defaults to jira-kpis.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run gather cycles on an interval until interrupted
    Run {
        /// Seconds between the start of consecutive cycles
        #[arg(long, default_value = "300")]
        interval: u64,
    },
    /// Print an annotated sample configuration file
    SampleConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::SampleConfig) = cli.command {
        print!("{}", sample_config());
        return Ok(());
    }

    KpiConfig::load_env_file()?;
    let config = KpiConfig::load_from(cli.config.as_deref())?;
    init_telemetry(&config.observability.log_level)?;

    let acc: Arc<dyn Accumulator> = Arc::new(LineProtocolWriter::new());
    let jira = JiraKpis::new(config.jira.clone())?;
    let cron = config.cron.clone().map(CronKpis::new);

    let result = match cli.command {
        Some(Commands::Run { interval }) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval));
            loop {
                ticker.tick().await;
                // A failed cycle is logged, not fatal; the next tick retries.
                if let Err(err) = run_cycle(&jira, cron.as_ref(), &acc).await {
                    error!(error = %err, "gather cycle failed");
                }
            }
        }
        _ => run_cycle(&jira, cron.as_ref(), &acc).await,
    };

    shutdown_telemetry();
    result
}

async fn run_cycle(
    jira: &JiraKpis,
    cron: Option<&CronKpis>,
    acc: &Arc<dyn Accumulator>,
) -> Result<()> {
    let correlation_id = generate_correlation_id();
    info!(correlation.id = %correlation_id, "starting gather cycle");

    let mut outcome = Ok(());
    if let Err(err) = jira.gather(Arc::clone(acc)).await {
        outcome = Err(anyhow::Error::new(err));
    }
    if let Some(cron) = cron {
        if let Err(err) = cron.gather(acc.as_ref()) {
            error!(error = %err, "cron KPI scan failed");
            if outcome.is_ok() {
                outcome = Err(anyhow::Error::new(err));
            }
        }
    }

    info!(correlation.id = %correlation_id, ok = outcome.is_ok(), "gather cycle finished");
    outcome
}
