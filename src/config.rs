use std::env;
use std::path::PathBuf;

use log::Level;
use url::Url;

use crate::errors::TrackerError;
use crate::export::EXPORT_FILE_NAME;
use crate::rms::DEFAULT_BASE_URL;

pub const SNAPSHOT_PATH_VARIABLE: &str = "TRACKER_SNAPSHOT_PATH";
pub const EXPORT_PATH_VARIABLE: &str = "TRACKER_EXPORT_PATH";
pub const RMS_BASE_URL_VARIABLE: &str = "TRACKER_RMS_BASE_URL";
pub const LOG_LEVEL_VARIABLE: &str = "TRACKER_LOG_LEVEL";

/// The persistence slot, named after the key the intake form used.
pub const DEFAULT_SNAPSHOT_PATH: &str = "headlight_av_projects.json";

/// Returns the value of the named environment variable, or `default`
/// if it is unset or not valid Unicode.
pub fn get_variable_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

#[derive(Clone, Debug)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub export_path: PathBuf,
    pub rms_base_url: Url,
    pub log_level: Level,
}

impl Config {
    /// Reads the configuration from the environment (after `.env`, if
    /// the caller loaded one).
    pub fn from_env() -> Result<Self, TrackerError> {
        let rms_base_url = get_variable_or(RMS_BASE_URL_VARIABLE, DEFAULT_BASE_URL);
        let log_level = get_variable_or(LOG_LEVEL_VARIABLE, "info");

        Ok(Config {
            snapshot_path: get_variable_or(SNAPSHOT_PATH_VARIABLE, DEFAULT_SNAPSHOT_PATH).into(),
            export_path: get_variable_or(EXPORT_PATH_VARIABLE, EXPORT_FILE_NAME).into(),
            rms_base_url: parse_base_url(&rms_base_url)?,
            log_level: parse_level(&log_level)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot_path: DEFAULT_SNAPSHOT_PATH.into(),
            export_path: EXPORT_FILE_NAME.into(),
            rms_base_url: Url::parse(DEFAULT_BASE_URL).expect("parse default RMS base URL"),
            log_level: Level::Info,
        }
    }
}

fn parse_base_url(value: &str) -> Result<Url, TrackerError> {
    let invalid = |reason: String| TrackerError::InvalidConfig {
        name: RMS_BASE_URL_VARIABLE.to_owned(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(invalid(format!("{} cannot be a base URL", value)));
    }

    Ok(url)
}

fn parse_level(value: &str) -> Result<Level, TrackerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "critical" => Ok(Level::Critical),
        "error" => Ok(Level::Error),
        "warn" | "warning" => Ok(Level::Warning),
        "info" => Ok(Level::Info),
        "debug" => Ok(Level::Debug),
        "trace" => Ok(Level::Trace),
        _ => Err(TrackerError::InvalidConfig {
            name: LOG_LEVEL_VARIABLE.to_owned(),
            reason: format!("unknown level {:?}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_must_be_absolute() {
        assert!(parse_base_url("https://rms.example.com").is_ok());
        assert!(parse_base_url("rms.example.com").is_err());
        assert!(parse_base_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn levels_parse_by_name() {
        assert_eq!(parse_level("DEBUG").unwrap(), Level::Debug);
        assert_eq!(parse_level("warning").unwrap(), Level::Warning);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn defaults_match_the_intake_form() {
        let config = Config::default();

        assert_eq!(config.snapshot_path, PathBuf::from("headlight_av_projects.json"));
        assert_eq!(config.export_path, PathBuf::from("headlight_av_projects.csv"));
        assert_eq!(config.rms_base_url.as_str(), "https://headlight.current-rms.com/");
    }
}
