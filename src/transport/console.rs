//! Pretty console transport for development.
//!
//! Renders each record as one human-readable header line followed by its
//! fields, one per line:
//!
//! ```text
//! [14:03:22 UTC] INFO: started
//!     service: "web-backend"
//! ```

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use colored::{ColoredString, Colorize};
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::config::ConsoleConfig;
use crate::logging::{Level, LogRecord};
use crate::transport::{Transport, TransportKind};

const FIELD_INDENT: &str = "    ";

pub struct ConsoleTransport {
    colorize: bool,
    /// chrono format string translated from the configured pattern.
    time_format: String,
    ignore: Vec<String>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleTransport {
    /// Console transport writing to stdout.
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_writer(config, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(config: &ConsoleConfig, writer: W) -> Self {
        Self {
            colorize: config.colorize,
            time_format: translate_time_pattern(&config.translate_time),
            ignore: config.ignore.clone(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Render a record to the text written for it, trailing newline included.
    pub fn render(&self, record: &LogRecord) -> String {
        let time = record.time.format(&self.time_format).to_string();
        let mut out = format!(
            "[{}] {}: {}\n",
            time,
            self.paint_level(record.level),
            self.paint_message(&record.msg)
        );

        for (key, value) in record.visible_fields() {
            if self.ignore.iter().any(|ignored| ignored == key) {
                continue;
            }
            let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            let rendered = rendered.replace('\n', &format!("\n{}", FIELD_INDENT));
            out.push_str(&format!("{}{}: {}\n", FIELD_INDENT, key, rendered));
        }
        out
    }

    fn paint_level(&self, level: Level) -> ColoredString {
        let upper = level.as_str().to_ascii_uppercase();
        let label = upper.as_str();
        if !self.colorize {
            return label.normal().clear();
        }
        match level {
            Level::Trace => label.bright_black(),
            Level::Debug => label.blue(),
            Level::Info => label.green(),
            Level::Warn => label.yellow(),
            Level::Error => label.red(),
            Level::Fatal => label.on_red(),
        }
    }

    fn paint_message(&self, msg: &str) -> ColoredString {
        if self.colorize {
            msg.cyan()
        } else {
            msg.normal().clear()
        }
    }
}

impl Transport for ConsoleTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Console
    }

    fn write(&self, record: LogRecord) {
        let line = self.render(&record);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // Nowhere left to report a failing stdout.
        let _ = writer.write_all(line.as_bytes());
    }

    fn flush(&self) -> BoxFuture<'_, ()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
        future::ready(()).boxed()
    }
}

impl fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleTransport")
            .field("colorize", &self.colorize)
            .field("time_format", &self.time_format)
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}

/// Translate a `yyyy-mm-dd HH:MM:ss.l Z` style pattern into a chrono format.
///
/// Records are rendered in UTC, so `Z` prints the zone name `UTC`.
/// Characters that are not tokens are copied through (`%` is escaped).
pub fn translate_time_pattern(pattern: &str) -> String {
    const TOKENS: [(&str, &str); 8] = [
        ("yyyy", "%Y"),
        ("mm", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("MM", "%M"),
        ("ss", "%S"),
        ("l", "%3f"),
        ("Z", "UTC"),
    ];

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'outer: while let Some(c) = rest.chars().next() {
        for (token, format) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(format);
                rest = tail;
                continue 'outer;
            }
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}
