use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{Metadata, Record};

use crate::{
    error::{RecorderError, RecorderResult},
    recorder::Recorder,
};

/// Records made by this crate are never captured, so a recorder installed as
/// the global logger cannot feed on its own diagnostics.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Thread-safe handle to a [`Recorder`] that also plugs into the `log`
/// facade.
#[derive(Clone)]
pub struct SharedRecorder {
    inner: Arc<Mutex<Recorder>>,
}

impl SharedRecorder {
    pub fn new(recorder: Recorder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }
    pub fn lock(&self) -> MutexGuard<'_, Recorder> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a clone of this handle as the process-wide logger and raises
    /// the `log` max level to the recorder's filter.
    pub fn install(&self) -> RecorderResult<()> {
        let level = self.lock().level_filter();
        log::set_boxed_logger(Box::new(self.clone()))
            .map_err(|_| RecorderError::AlreadyInstalled)?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn record(&self, message: &str) -> RecorderResult<()> {
        self.lock().record(message)
    }
    pub fn len(&self) -> usize {
        self.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
    pub fn events(&self) -> Vec<String> {
        self.lock().events().to_vec()
    }
    pub fn first_raw(&self) -> RecorderResult<String> {
        self.lock().first_raw()
    }
    pub fn last_raw(&self) -> RecorderResult<String> {
        self.lock().last_raw()
    }
    pub fn formatted_output(&self) -> RecorderResult<String> {
        self.lock().formatted_output()
    }
    pub fn formatted_lines(&self, preserve_trailing_spaces: bool) -> RecorderResult<Vec<String>> {
        self.lock().formatted_lines(preserve_trailing_spaces)
    }
    pub fn first_formatted(&self, preserve_trailing_spaces: bool) -> RecorderResult<String> {
        self.lock().first_formatted(preserve_trailing_spaces)
    }
    pub fn last_formatted(&self, preserve_trailing_spaces: bool) -> RecorderResult<String> {
        self.lock().last_formatted(preserve_trailing_spaces)
    }
    pub fn clear(&self) -> RecorderResult<()> {
        self.lock().clear()
    }
}

impl log::Log for SharedRecorder {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let target = metadata.target();
        let own = target
            .strip_prefix(OWN_TARGET)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"));
        !own && metadata.level() <= self.lock().level_filter()
    }
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        if let Err(e) = self.lock().record_at(record.level(), &message) {
            eprintln!("failed to record log event: {}", e);
        }
    }
    fn flush(&self) {
        if let Err(e) = self.lock().formatted_output() {
            eprintln!("failed to flush recorder: {}", e);
        }
    }
}
