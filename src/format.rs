use std::io::{self, Write};

use chrono::{DateTime, Local};
use log::Level;
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single published event as seen by formatters.
#[derive(Debug, Clone)]
pub struct Event<'a> {
    pub level: Level,
    pub channel: &'a str,
    pub thread: String,
    pub timestamp: DateTime<Local>,
    pub message: &'a str,
}

impl<'a> Event<'a> {
    /// Stamps `message` with the current thread and local time.
    pub fn new(level: Level, channel: &'a str, message: &'a str) -> Self {
        Self {
            level,
            channel,
            thread: std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string(),
            timestamp: Local::now(),
            message,
        }
    }
    fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Turns an event into its formatted representation.
///
/// Implementations write straight into the destination of the handler that
/// publishes the event, so a failing writer surfaces as an `io::Error` here.
pub trait LogFormatter: Send + Sync {
    fn format(&self, event: &Event<'_>, out: &mut dyn Write) -> io::Result<()>;
}

pub struct FnFormatter<F>(F);

impl<F> LogFormatter for FnFormatter<F>
where
    F: Fn(&Event<'_>, &mut dyn Write) -> io::Result<()> + Send + Sync,
{
    fn format(&self, event: &Event<'_>, out: &mut dyn Write) -> io::Result<()> {
        (self.0)(event, out)
    }
}

/// Adapts a closure into a [`LogFormatter`].
pub fn formatter_fn<F>(f: F) -> FnFormatter<F>
where
    F: Fn(&Event<'_>, &mut dyn Write) -> io::Result<()> + Send + Sync,
{
    FnFormatter(f)
}

/// Built-in line layouts. Every layout terminates the event with `\n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// `[timestamp][thread][LEVEL] message`
    Full,
    /// `[timestamp][LEVEL] message`
    DateLevelMessage,
    /// `[timestamp] message`
    DateMessage,
    /// `[thread] message`
    ThreadMessage,
    /// `[LEVEL] message`
    LevelMessage,
    #[default]
    MessageOnly,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: String,
    channel: &'a str,
    thread: &'a str,
    message: &'a str,
}

impl LogFormatter for Format {
    fn format(&self, event: &Event<'_>, out: &mut dyn Write) -> io::Result<()> {
        match self {
            Format::Full => writeln!(
                out,
                "[{}][{}][{}] {}",
                event.formatted_timestamp(),
                event.thread,
                event.level,
                event.message
            ),
            Format::DateLevelMessage => writeln!(
                out,
                "[{}][{}] {}",
                event.formatted_timestamp(),
                event.level,
                event.message
            ),
            Format::DateMessage => {
                writeln!(out, "[{}] {}", event.formatted_timestamp(), event.message)
            }
            Format::ThreadMessage => writeln!(out, "[{}] {}", event.thread, event.message),
            Format::LevelMessage => writeln!(out, "[{}] {}", event.level, event.message),
            Format::MessageOnly => writeln!(out, "{}", event.message),
            Format::Json => {
                let line = JsonLine {
                    timestamp: event.timestamp.to_rfc3339(),
                    level: event.level.to_string(),
                    channel: event.channel,
                    thread: &event.thread,
                    message: event.message,
                };
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn render(format: Format, level: Level, message: &str) -> String {
        let event = Event::new(level, "recorder-test", message);
        let mut out = Vec::new();
        format.format(&event, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn message_only() {
        assert_eq!(render(Format::MessageOnly, Level::Info, "hello"), "hello\n");
        assert_eq!(render(Format::MessageOnly, Level::Info, ""), "\n");
    }

    #[test]
    fn level_message() {
        assert_eq!(
            render(Format::LevelMessage, Level::Warn, "careful"),
            "[WARN] careful\n"
        );
    }

    #[test]
    fn thread_message_uses_current_thread_name() {
        let rendered = std::thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(|| render(Format::ThreadMessage, Level::Info, "ping"))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(rendered, "[worker-7] ping\n");
    }

    #[test]
    fn timestamped_layouts() {
        let ts = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}";

        let full = Regex::new(&format!(r"^\[{ts}\]\[[^\]]+\]\[ERROR\] boom\n$")).unwrap();
        assert!(full.is_match(&render(Format::Full, Level::Error, "boom")));

        let date_level = Regex::new(&format!(r"^\[{ts}\]\[DEBUG\] boom\n$")).unwrap();
        assert!(date_level.is_match(&render(Format::DateLevelMessage, Level::Debug, "boom")));

        let date = Regex::new(&format!(r"^\[{ts}\] boom\n$")).unwrap();
        assert!(date.is_match(&render(Format::DateMessage, Level::Info, "boom")));
    }

    #[test]
    fn json_line() {
        let rendered = render(Format::Json, Level::Info, "say \"hi\"");
        assert!(rendered.ends_with('\n'));
        assert_eq!(rendered.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(rendered.trim_end()).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["channel"], "recorder-test");
        assert_eq!(value["message"], "say \"hi\"");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn closure_formatter() {
        let formatter = formatter_fn(|event, out| write!(out, "<{}>", event.message));
        let event = Event::new(Level::Info, "c", "x");
        let mut out = Vec::new();
        formatter.format(&event, &mut out).unwrap();
        assert_eq!(out, b"<x>");
    }

    #[test]
    fn format_names_are_snake_case() {
        let format: Format = serde_yaml::from_str("date_level_message").unwrap();
        assert_eq!(format, Format::DateLevelMessage);
        assert_eq!(Format::default(), Format::MessageOnly);
    }
}
