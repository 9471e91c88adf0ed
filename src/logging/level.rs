//! Severity levels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Record severity, ordered from least to most severe.
///
/// Numeric values match the pino convention so JSON lines stay compatible
/// with existing dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Numeric value written to the `level` key.
    pub fn value(self) -> u8 {
        match self {
            Level::Trace => 10,
            Level::Debug => 20,
            Level::Info => 30,
            Level::Warn => 40,
            Level::Error => 50,
            Level::Fatal => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        if *level == tracing::Level::ERROR {
            Level::Error
        } else if *level == tracing::Level::WARN {
            Level::Warn
        } else if *level == tracing::Level::INFO {
            Level::Info
        } else if *level == tracing::Level::DEBUG {
            Level::Debug
        } else {
            Level::Trace
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// Minimum severity a logger forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Forward records at or above this level.
    AtLeast(Level),
    /// Forward nothing.
    Silent,
}

impl LevelFilter {
    pub fn enabled(self, level: Level) -> bool {
        match self {
            LevelFilter::AtLeast(min) => level >= min,
            LevelFilter::Silent => false,
        }
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::AtLeast(Level::Info)
    }
}

impl FromStr for LevelFilter {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("silent") {
            return Ok(LevelFilter::Silent);
        }
        s.parse().map(LevelFilter::AtLeast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_values() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].value() < pair[1].value());
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("info".parse::<Level>(), Ok(Level::Info));
        assert_eq!("FATAL".parse::<Level>(), Ok(Level::Fatal));
        assert!("verbose".parse::<Level>().is_err());
        assert_eq!("silent".parse::<LevelFilter>(), Ok(LevelFilter::Silent));
    }

    #[test]
    fn test_filter() {
        let info = LevelFilter::AtLeast(Level::Info);
        assert!(!info.enabled(Level::Trace));
        assert!(!info.enabled(Level::Debug));
        assert!(info.enabled(Level::Info));
        assert!(info.enabled(Level::Fatal));
        assert!(!LevelFilter::Silent.enabled(Level::Fatal));
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Trace);
        assert_eq!(Level::from(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(Level::from(&tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
    }
}
