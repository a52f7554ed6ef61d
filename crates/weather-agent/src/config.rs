//! Backend selection diagnostics.
//!
//! The agent runtime decides which backend it actually talks to from
//! its own environment contract; this module only mirrors that choice
//! so the entry point can report it. The configuration is captured in
//! an explicit struct so tests can inject values instead of mutating
//! process-wide state.

use std::env;
use std::fmt::{self, Display};

/// The environment variable that selects the cloud backend when set to
/// `1`.
pub const ENV_USE_CLOUD: &str = "WEATHER_AGENT_USE_CLOUD";
/// The environment variable naming the cloud project.
pub const ENV_CLOUD_PROJECT: &str = "WEATHER_AGENT_CLOUD_PROJECT";
/// The environment variable naming the cloud region.
pub const ENV_CLOUD_REGION: &str = "WEATHER_AGENT_CLOUD_REGION";

/// The backend the agent runtime targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendMode {
    /// The default hosted API.
    Default,
    /// A cloud-hosted deployment.
    Cloud,
}

/// A snapshot of the backend selection read at process start.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackendConfig {
    /// The selected backend.
    pub mode: BackendMode,
    /// The cloud project, if named.
    pub project: Option<String>,
    /// The cloud region, if named.
    pub region: Option<String>,
}

impl BackendConfig {
    /// Reads the backend selection from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mode = if lookup(ENV_USE_CLOUD).as_deref() == Some("1") {
            BackendMode::Cloud
        } else {
            BackendMode::Default
        };
        Self {
            mode,
            project: lookup(ENV_CLOUD_PROJECT),
            region: lookup(ENV_CLOUD_REGION),
        }
    }
}

impl Display for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            BackendMode::Cloud => {
                writeln!(f, "Using cloud backend")?;
                writeln!(
                    f,
                    "  Project: {}",
                    self.project.as_deref().unwrap_or("not set")
                )?;
                write!(
                    f,
                    "  Region: {}",
                    self.region.as_deref().unwrap_or("not set")
                )
            }
            BackendMode::Default => {
                writeln!(f, "Using default API backend")?;
                write!(
                    f,
                    "To use the cloud backend, set {ENV_USE_CLOUD}=1"
                )
            }
        }
    }
}
