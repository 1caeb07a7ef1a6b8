//! Diagnostic log levels.
//!
//! Every interface carries its own [`LogLevel`] (taken from [`crate::Config`])
//! and only emits the `tracing` events it permits. [`install`] is a convenience
//! for binaries that want a process wide stderr sink at the same level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// How chatty the device interface is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Silent
    #[default]
    None,
    /// Failures and discarded reports
    Warn,
    /// Everything, including session lifecycle and raw key reports
    Info,
}

impl LogLevel {
    #[inline(always)]
    pub fn warn_enabled(self) -> bool {
        self >= LogLevel::Warn
    }

    #[inline(always)]
    pub fn info_enabled(self) -> bool {
        self >= LogLevel::Info
    }

    /// Matching `tracing` filter
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::None => LevelFilter::OFF,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("a global tracing subscriber is already installed")]
pub struct AlreadyInstalled;

/// Install a process wide stderr subscriber at `level`.
///
/// Can only succeed once per process. Libraries embedding this crate should
/// configure their own subscriber instead.
pub fn install(level: LogLevel) -> Result<(), AlreadyInstalled> {
    tracing_subscriber::fmt()
        .with_max_level(level.as_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| AlreadyInstalled)
}
