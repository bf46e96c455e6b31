use std::{
    io::{self, Write},
    sync::Arc,
};

use log::LevelFilter;

use crate::format::{Event, LogFormatter};

/// A destination attached to a [`Channel`](crate::channel::Channel).
pub trait Handler: Send {
    fn publish(&mut self, event: &Event<'_>) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Formats events into an arbitrary writer.
pub struct StreamHandler<W: Write + Send> {
    writer: W,
    formatter: Arc<dyn LogFormatter>,
    level: LevelFilter,
    autoflush: bool,
}

impl<W: Write + Send> StreamHandler<W> {
    /// Leaves flushing `writer` to the caller.
    pub fn new(formatter: Arc<dyn LogFormatter>, writer: W) -> Self {
        Self {
            writer,
            formatter,
            level: LevelFilter::Trace,
            autoflush: false,
        }
    }
    /// Flushes after every event so output shows up live.
    pub fn console(formatter: Arc<dyn LogFormatter>, writer: W) -> Self {
        Self {
            autoflush: true,
            ..Self::new(formatter, writer)
        }
    }
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }
    pub fn level(&self) -> LevelFilter {
        self.level
    }
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write + Send> Handler for StreamHandler<W> {
    fn publish(&mut self, event: &Event<'_>) -> io::Result<()> {
        if event.level > self.level {
            return Ok(());
        }
        self.formatter.format(event, &mut self.writer)?;
        if self.autoflush {
            self.writer.flush()?;
        }
        Ok(())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
