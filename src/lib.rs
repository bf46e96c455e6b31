//! Logger double for tests.
//!
//! A [`Recorder`] keeps every published message in order and writes it
//! through a [`LogFormatter`] into an in-memory buffer, so tests can assert
//! on what was logged and on how it was formatted.
//!
//! ```
//! use log_recorder::{Format, Recorder};
//!
//! let mut recorder = Recorder::builder().format(Format::LevelMessage).echo(false).build();
//! recorder.record("one").unwrap();
//! recorder.record("two").unwrap();
//!
//! assert_eq!(recorder.first_raw().unwrap(), "one");
//! assert_eq!(recorder.last_formatted(false).unwrap(), "[INFO] two");
//! ```

pub mod capture;
pub mod channel;
pub mod config;
pub mod error;
pub mod format;
pub mod handler;
pub mod recorder;
pub mod shared;

pub use config::RecorderConfig;
pub use error::{RecorderError, RecorderResult};
pub use format::{formatter_fn, Event, Format, LogFormatter};
pub use recorder::{split_lines, Recorder, RecorderBuilder};
pub use shared::SharedRecorder;
