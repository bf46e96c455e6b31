use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{error::RecorderError, format::Format};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Channel names are `<channel_prefix>-<n>`.
    pub channel_prefix: String,
    pub format: Format,
    /// Mirror every event to stderr.
    pub echo: bool,
    pub echo_level: LevelFilter,
    /// Most verbose level accepted through the `log` facade.
    pub level: LevelFilter,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            channel_prefix: "recorder".to_string(),
            format: Format::default(),
            echo: true,
            echo_level: LevelFilter::Trace,
            level: LevelFilter::Trace,
        }
    }
}

impl RecorderConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, RecorderError> {
        Ok(serde_yaml::from_str(s)?)
    }
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, RecorderError> {
        let file = std::fs::File::open(path).map_err(RecorderError::ConfigIo)?;
        let config = serde_yaml::from_reader(file)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.channel_prefix, "recorder");
        assert_eq!(config.format, Format::MessageOnly);
        assert!(config.echo);
        assert_eq!(config.level, LevelFilter::Trace);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = RecorderConfig::from_yaml_str("format: level_message\necho: false\n").unwrap();
        assert_eq!(config.format, Format::LevelMessage);
        assert!(!config.echo);
        assert_eq!(config.channel_prefix, "recorder");
        assert_eq!(config.echo_level, LevelFilter::Trace);
    }

    #[test]
    fn level_names_are_case_insensitive() {
        let config = RecorderConfig::from_yaml_str("level: warn\necho_level: ERROR\n").unwrap();
        assert_eq!(config.level, LevelFilter::Warn);
        assert_eq!(config.echo_level, LevelFilter::Error);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = RecorderConfig::from_yaml_str("format: fancy").unwrap_err();
        assert!(matches!(err, RecorderError::Config(_)));
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel_prefix: http\nformat: json").unwrap();

        let config = RecorderConfig::read_from_path(file.path()).unwrap();
        assert_eq!(config.channel_prefix, "http");
        assert_eq!(config.format, Format::Json);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecorderConfig::read_from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RecorderError::ConfigIo(_)));
    }
}
