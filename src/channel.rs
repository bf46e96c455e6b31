use std::{
    io,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, warn, Level};

use crate::{format::Event, handler::Handler};

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// A named set of handlers. Names are unique per process, so a new channel
/// never starts out with handlers left behind by another one.
pub struct Channel {
    name: String,
    handlers: Vec<Box<dyn Handler>>,
    /// Failures here are reported and swallowed.
    best_effort: Vec<Box<dyn Handler>>,
}

impl Channel {
    pub fn new(prefix: &str) -> Self {
        let id = NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            name: format!("{}-{}", prefix, id),
            handlers: Vec::new(),
            best_effort: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn attach(&mut self, handler: Box<dyn Handler>) {
        self.handlers.push(handler);
    }
    /// Attaches a handler whose failures never reach the caller, such as a
    /// console echo.
    pub fn attach_best_effort(&mut self, handler: Box<dyn Handler>) {
        self.best_effort.push(handler);
    }
    pub fn detach_all(&mut self) {
        if self.handler_count() > 0 {
            debug!(
                "detaching {} handler(s) from channel {}",
                self.handler_count(),
                self.name
            );
        }
        self.handlers.clear();
        self.best_effort.clear();
    }
    pub fn handler_count(&self) -> usize {
        self.handlers.len() + self.best_effort.len()
    }
    /// Publishes `message` to the regular handlers in attach order, stopping
    /// at the first failure, then to the best-effort ones.
    pub fn publish(&mut self, level: Level, message: &str) -> io::Result<()> {
        let event = Event::new(level, &self.name, message);
        for handler in self.handlers.iter_mut() {
            handler.publish(&event)?;
        }
        for handler in self.best_effort.iter_mut() {
            if let Err(e) = handler.publish(&event) {
                warn!("handler on channel {} failed to publish: {}", self.name, e);
            }
        }
        Ok(())
    }
    pub fn flush(&mut self) -> io::Result<()> {
        for handler in self.handlers.iter_mut() {
            handler.flush()?;
        }
        for handler in self.best_effort.iter_mut() {
            if let Err(e) = handler.flush() {
                warn!("handler on channel {} failed to flush: {}", self.name, e);
            }
        }
        Ok(())
    }
}
