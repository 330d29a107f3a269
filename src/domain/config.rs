use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings that control how the editor parses and presents variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Minimum number of rows after a reset or a parse.
    ///
    /// Parsed variables are padded with blank rows up to this count. Deleting
    /// rows can still take the editor below it.
    initial_row_count: usize,

    /// How long a status message stays visible before it clears itself.
    status_timeout: Duration,

    /// Whether a key defined on more than one line produces a parse warning.
    ///
    /// When `false` (default) later definitions silently replace earlier
    /// ones.
    pub warn_on_duplicate_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_row_count: default_initial_row_count(),
            status_timeout: Duration::from_millis(default_status_timeout_ms()),
            warn_on_duplicate_keys: false,
        }
    }
}

impl Config {
    /// Returns the minimum number of rows after a reset or parse.
    #[must_use]
    pub const fn initial_row_count(&self) -> usize {
        self.initial_row_count
    }

    /// Sets the minimum number of rows after a reset or parse.
    pub const fn set_initial_row_count(&mut self, count: usize) {
        self.initial_row_count = count;
    }

    /// Returns how long a status message is shown.
    #[must_use]
    pub const fn status_timeout(&self) -> Duration {
        self.status_timeout
    }

    /// Sets how long a status message is shown.
    pub const fn set_status_timeout(&mut self, timeout: Duration) {
        self.status_timeout = timeout;
    }
}

const fn default_initial_row_count() -> usize {
    20
}

const fn default_status_timeout_ms() -> u64 {
    10_000
}

/// The serialized versions of the configuration.
///
/// Keeps the wire format stable while the domain type evolves.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_initial_row_count")]
        initial_row_count: usize,

        #[serde(default = "default_status_timeout_ms")]
        status_timeout_ms: u64,

        #[serde(default)]
        warn_on_duplicate_keys: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                initial_row_count,
                status_timeout_ms,
                warn_on_duplicate_keys,
            } => Self {
                initial_row_count,
                status_timeout: Duration::from_millis(status_timeout_ms),
                warn_on_duplicate_keys,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            initial_row_count: config.initial_row_count,
            status_timeout_ms: u64::try_from(config.status_timeout.as_millis())
                .unwrap_or(u64::MAX),
            warn_on_duplicate_keys: config.warn_on_duplicate_keys,
        }
    }
}
