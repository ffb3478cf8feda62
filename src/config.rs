use crate::error::{GaError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Fixed settings file name, read from the working directory. No CLI flags.
pub const SETTINGS_FILE: &str = "setup.json";

/// Raw shape of setup.json. Dates stay strings here and are parsed once
/// during load so the rest of the program only ever sees `NaiveDate`.
#[derive(Debug, Deserialize)]
struct RawSettings {
    viewid: String,
    segmentid: String,
    startdate: String,
    enddate: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub view_id: String,
    pub segment_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GaError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let raw: RawSettings = serde_json::from_str(&contents)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        if raw.viewid.is_empty() {
            return Err(GaError::config("viewid must not be empty"));
        }
        if raw.segmentid.is_empty() {
            return Err(GaError::config("segmentid must not be empty"));
        }
        Ok(Settings {
            view_id: raw.viewid,
            segment_id: raw.segmentid,
            start_date: parse_date(&raw.startdate)?,
            end_date: parse_date(&raw.enddate)?,
        })
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| GaError::config(format!("Invalid date (want YYYY-MM-DD): {s}")))
}
