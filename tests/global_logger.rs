//! Installs a recorder as the process-wide `log` logger. Kept in its own test
//! binary since the logger slot can only be filled once per process.

use log::{debug, error, info, LevelFilter};
use log_recorder::{Format, Recorder, RecorderError, SharedRecorder};

#[test]
fn captures_log_macros() {
    let recorder = SharedRecorder::new(
        Recorder::builder()
            .format(Format::LevelMessage)
            .echo(false)
            .level(LevelFilter::Info)
            .build(),
    );
    recorder.install().unwrap();

    info!("connection opened");
    debug!("not captured");
    error!("connection reset");

    assert_eq!(
        recorder.events(),
        vec!["connection opened".to_string(), "connection reset".to_string()]
    );
    assert_eq!(
        recorder.formatted_lines(false).unwrap(),
        vec!["[INFO] connection opened", "[ERROR] connection reset"]
    );

    recorder.clear().unwrap();
    info!("after clear");

    assert_eq!(recorder.events(), vec!["after clear".to_string()]);
    assert_eq!(recorder.first_formatted(false).unwrap(), "[INFO] after clear");

    let second = SharedRecorder::new(Recorder::builder().echo(false).build());
    assert!(matches!(
        second.install(),
        Err(RecorderError::AlreadyInstalled)
    ));
}
