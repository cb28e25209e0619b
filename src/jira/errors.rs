//! Error taxonomy for gather cycles.
//!
//! Failures are per-endpoint and recoverable: a failed window is simply not
//! reported this cycle, and the next cycle tries again.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatherError {
    /// Network unreachable, request timeout, or a non-2xx response.
    #[error("transport failure for {server}: {message}")]
    Transport { server: String, message: String },

    /// Response body was not valid JSON or lacked a numeric `total` field.
    #[error("bad search response from {server}: {message}")]
    Decode { server: String, message: String },

    /// Caller supplied an out-of-range or missing required field. Detected
    /// before any request is dispatched.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("log scan failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// One or more server units failed while the rest completed. Records
    /// emitted before a failure stay emitted.
    #[error("gather failed for {} of {total} server(s)", failures.len())]
    Partial {
        failures: Vec<GatherError>,
        total: usize,
    },
}

impl GatherError {
    pub fn configuration(message: impl Into<String>) -> Self {
        GatherError::Configuration {
            message: message.into(),
        }
    }

    /// Classify a reqwest failure against the taxonomy: body/JSON problems
    /// are decode errors, everything else (connect, timeout, status) is
    /// transport.
    pub(crate) fn from_http(server: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatherError::Decode {
                server: server.to_string(),
                message: err.to_string(),
            }
        } else {
            GatherError::Transport {
                server: server.to_string(),
                message: err.to_string(),
            }
        }
    }
}
