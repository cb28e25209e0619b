use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for jira-kpis
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KpiConfig {
    /// Jira gathering settings
    pub jira: JiraConfig,
    /// Cron-job KPI settings (optional section)
    pub cron: Option<CronConfig>,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Jira servers to poll; empty means the default server is queried once
    pub servers: Vec<String>,
    /// Jira project key
    pub project: String,
    /// HTTP basic authentication credentials
    pub username: String,
    pub password: String,
    /// Fallback endpoint used when `servers` is empty
    pub default_server: String,
    /// Window kinds to gather each cycle
    pub gather_weekly: bool,
    pub gather_biweekly: bool,
    pub gather_monthly: bool,
    pub gather_quarterly: bool,
    pub gather_yearly: bool,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl JiraConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CronConfig {
    /// Log file to scan for the job marker
    pub location: String,
    /// The marker naming the scheduled job, e.g. "WatchDogTimer.check"
    pub cron_job: String,
    /// Host the cron jobs run on, emitted as the `server` tag
    pub host: String,
    /// Expected unique runs per weekday, Sunday first, seven entries
    pub cron_count: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level for the tracing subscriber
    pub log_level: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            project: String::new(),
            username: String::new(),
            password: String::new(),
            default_server: "http://127.0.0.1:8080".to_string(),
            gather_weekly: false,
            gather_biweekly: true,
            gather_monthly: true,
            gather_quarterly: false,
            gather_yearly: false,
            timeout_seconds: 10,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            jira: JiraConfig::default(),
            cron: None,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl KpiConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration files (jira-kpis.toml, .jira-kpis-rc)
    /// 3. Environment variables (prefixed with JIRA_KPIS)
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same as [`load`](Self::load), but an explicit path replaces the
    /// default file candidates.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        // Start from defaults so a partial file or bare environment works.
        let mut builder =
            Config::builder().add_source(Config::try_from(&KpiConfig::default())?);

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                if Path::new("jira-kpis.toml").exists() {
                    builder = builder.add_source(File::with_name("jira-kpis"));
                }
                if Path::new(".jira-kpis-rc").exists() {
                    builder = builder.add_source(File::with_name(".jira-kpis-rc"));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("JIRA_KPIS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut kpi_config: KpiConfig = config.try_deserialize()?;

        // Credentials are usually kept out of the config file.
        if kpi_config.jira.password.is_empty() {
            if let Ok(password) = std::env::var("JIRA_PASSWORD") {
                kpi_config.jira.password = password;
            }
        }

        Ok(kpi_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Annotated sample configuration, printed by `jira-kpis sample-config`.
pub fn sample_config() -> &'static str {
    r#"[jira]
## Jira servers to poll, e.g. "https://jira.example.com".
## If no servers are specified, default_server is queried instead.
servers = []
default_server = "http://127.0.0.1:8080"

## Jira project key to report on.
project = ""

## HTTP basic authentication username and password.
## The password may also come from the JIRA_PASSWORD environment variable.
username = ""
password = ""

## Windows to gather each cycle.
gather_weekly = false
gather_biweekly = true
gather_monthly = true
gather_quarterly = false
gather_yearly = false

## Per-request timeout in seconds.
timeout_seconds = 10

## Uncomment to also report whether a scheduled job ran today.
# [cron]
# location = "/var/log/syslog"
# cron_job = "WatchDogTimer.check"
# host = "cron-host-1"
# ## Expected unique runs per weekday, Sunday first.
# cron_count = [3, 4, 5, 6, 7, 0, 0]

[observability]
log_level = "info"
"#
}
