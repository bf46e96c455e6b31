use std::{
    io::{BufWriter, Write},
    sync::Arc,
};

use log::{debug, Level, LevelFilter};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    capture::CaptureBuffer,
    channel::Channel,
    config::RecorderConfig,
    error::{RecorderError, RecorderResult},
    format::{Format, LogFormatter},
    handler::StreamHandler,
};

/// Logger double for tests.
///
/// Every recorded message is kept verbatim and is also written through the
/// formatter into an in-memory capture buffer (and, unless disabled, echoed
/// to the console), so a test can assert on either form.
pub struct Recorder {
    events: Vec<String>,
    channel: Channel,
    capture: CaptureBuffer,
    level: LevelFilter,
}

pub struct RecorderBuilder {
    config: RecorderConfig,
    formatter: Option<Arc<dyn LogFormatter>>,
    console: Option<Box<dyn Write + Send>>,
}

impl RecorderBuilder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            formatter: None,
            console: None,
        }
    }
    /// Overrides the configured [`Format`].
    pub fn formatter<F: LogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }
    pub fn format(mut self, format: Format) -> Self {
        self.config.format = format;
        self.formatter = None;
        self
    }
    pub fn echo(mut self, echo: bool) -> Self {
        self.config.echo = echo;
        self
    }
    pub fn echo_level(mut self, level: LevelFilter) -> Self {
        self.config.echo_level = level;
        self
    }
    /// Echo to `writer` instead of stderr. Echo failures are logged, never
    /// returned from `record`.
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.config.echo = true;
        self.console = Some(Box::new(writer));
        self
    }
    pub fn channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.channel_prefix = prefix.into();
        self
    }
    /// Most verbose level accepted through the `log` facade by a
    /// [`SharedRecorder`](crate::SharedRecorder). Direct calls to
    /// [`Recorder::record_at`] are recorded whatever their level.
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }
    pub fn build(self) -> Recorder {
        let format = self.config.format;
        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(format) as Arc<dyn LogFormatter>);

        let mut channel = Channel::new(&self.config.channel_prefix);
        channel.detach_all();

        let capture = CaptureBuffer::new();
        channel.attach(Box::new(StreamHandler::new(
            formatter.clone(),
            BufWriter::new(capture.clone()),
        )));

        if self.config.echo {
            let writer = self
                .console
                .unwrap_or_else(|| Box::new(std::io::stderr()) as Box<dyn Write + Send>);
            channel.attach_best_effort(Box::new(
                StreamHandler::console(formatter, writer).with_level(self.config.echo_level),
            ));
        }
        debug!(
            "channel {} ready with {} handler(s)",
            channel.name(),
            channel.handler_count()
        );

        Recorder {
            events: Vec::new(),
            channel,
            capture,
            level: self.config.level,
        }
    }
}

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// Splits on `\n` and `\r\n`, dropping trailing empty lines. Always yields
/// at least one line: input without any text, such as `""` or `"\n"`, comes
/// back as a single empty line.
pub fn split_lines(output: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK.split(output).collect();
    while lines.len() > 1 && lines.last().map_or(false, |line| line.is_empty()) {
        lines.pop();
    }
    lines
}

impl Recorder {
    pub fn new<F: LogFormatter + 'static>(formatter: F) -> Self {
        Self::builder().formatter(formatter).build()
    }
    pub fn with_format(format: Format) -> Self {
        Self::builder().format(format).build()
    }
    pub fn from_config(config: &RecorderConfig) -> Self {
        RecorderBuilder::new(config.clone()).build()
    }
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::new(RecorderConfig::default())
    }

    pub fn record(&mut self, message: &str) -> RecorderResult<()> {
        self.record_at(Level::Info, message)
    }
    /// The raw event is kept once the capture buffer has accepted it. A
    /// failing console echo does not fail the record.
    pub fn record_at(&mut self, level: Level, message: &str) -> RecorderResult<()> {
        self.channel
            .publish(level, message)
            .map_err(RecorderError::Sink)?;
        self.events.push(message.to_string());
        Ok(())
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }
    pub fn len(&self) -> usize {
        self.events.len()
    }
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }
    pub fn level_filter(&self) -> LevelFilter {
        self.level
    }

    pub fn first_raw(&self) -> RecorderResult<String> {
        self.events
            .first()
            .map(|event| event.trim().to_string())
            .ok_or(RecorderError::EmptyLog)
    }
    pub fn last_raw(&self) -> RecorderResult<String> {
        self.events
            .last()
            .map(|event| event.trim().to_string())
            .ok_or(RecorderError::EmptyLog)
    }

    /// Everything formatted so far. Pending handler output is flushed first.
    pub fn formatted_output(&mut self) -> RecorderResult<String> {
        self.channel.flush().map_err(RecorderError::Sink)?;
        Ok(self.capture.contents())
    }
    pub fn formatted_lines(
        &mut self,
        preserve_trailing_spaces: bool,
    ) -> RecorderResult<Vec<String>> {
        let output = self.formatted_output()?;
        Ok(split_lines(&output)
            .into_iter()
            .map(|line| {
                if preserve_trailing_spaces {
                    line.to_string()
                } else {
                    line.trim().to_string()
                }
            })
            .collect())
    }
    pub fn first_formatted(&mut self, preserve_trailing_spaces: bool) -> RecorderResult<String> {
        if self.is_empty() {
            return Err(RecorderError::EmptyLog);
        }
        self.formatted_lines(preserve_trailing_spaces)?
            .into_iter()
            .next()
            .ok_or(RecorderError::EmptyLog)
    }
    pub fn last_formatted(&mut self, preserve_trailing_spaces: bool) -> RecorderResult<String> {
        if self.is_empty() {
            return Err(RecorderError::EmptyLog);
        }
        self.formatted_lines(preserve_trailing_spaces)?
            .pop()
            .ok_or(RecorderError::EmptyLog)
    }

    /// Forgets all raw events and captured output.
    pub fn clear(&mut self) -> RecorderResult<()> {
        self.channel.flush().map_err(RecorderError::Sink)?;
        self.capture.clear();
        debug!(
            "cleared {} event(s) from channel {}",
            self.events.len(),
            self.channel.name()
        );
        self.events.clear();
        Ok(())
    }
}
