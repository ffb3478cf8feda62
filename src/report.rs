use crate::error::{GaError, Result};
use chrono::{Days, NaiveDate};
use tracing::{error, info};

/// Value written to the CSV for a window whose query or parse failed.
pub const ERROR_SENTINEL: &str = "ERROR";

/// One weekly query window. Both bounds are inclusive; `end` is always
/// six days after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Anything that can answer "how many users in this window". The real
/// implementation is the Analytics client; tests inject fakes.
pub trait UserCountSource {
    fn users_for_window(&self, window: &DateWindow) -> Result<String>;
}

/// Per-window outcome. Failures keep the error so callers can tell a
/// transport problem from a bad response shape; both render as the
/// ERROR sentinel in the CSV.
#[derive(Debug)]
pub enum WeekOutcome {
    Users(String),
    Failed(GaError),
}

impl WeekOutcome {
    pub fn csv_value(&self) -> &str {
        match self {
            WeekOutcome::Users(v) => v,
            WeekOutcome::Failed(_) => ERROR_SENTINEL,
        }
    }
}

#[derive(Debug)]
pub struct WeekRow {
    pub window: DateWindow,
    pub outcome: WeekOutcome,
}

#[derive(Debug)]
pub struct ReportRun {
    pub rows: Vec<WeekRow>,
    pub error_count: usize,
}

/// Compute the weekly windows for a date range: `floor(days / 7)` windows of
/// seven days each, starting at `start`. The configured end date never bounds
/// the last window, so a trailing partial week is dropped. A span under seven
/// days produces no windows at all.
pub fn weekly_windows(start: NaiveDate, end: NaiveDate) -> Vec<DateWindow> {
    let days = (end - start).num_days().unsigned_abs();
    let num_weeks = days / 7;

    (0..num_weeks)
        .map(|i| {
            let week_start = start + Days::new(7 * i);
            DateWindow {
                start: week_start,
                end: week_start + Days::new(6),
            }
        })
        .collect()
}

/// Run the weekly report: one query per window, in order. A failed window is
/// logged, counted, and recorded with its error; the loop never aborts.
pub fn run_weekly_report<S: UserCountSource>(
    source: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> ReportRun {
    let windows = weekly_windows(start, end);
    info!(weeks = windows.len(), from = %start, to = %end, "Starting weekly report");

    let mut rows = Vec::with_capacity(windows.len());
    let mut error_count = 0usize;

    for (i, window) in windows.into_iter().enumerate() {
        info!(week = i, start = %window.start, end = %window.end, "Querying window");

        let outcome = match source.users_for_window(&window) {
            Ok(value) => WeekOutcome::Users(value),
            Err(e) => {
                error_count += 1;
                error!(
                    week = i,
                    start = %window.start,
                    end = %window.end,
                    kind = e.kind(),
                    error = %e,
                    "Query failed"
                );
                WeekOutcome::Failed(e)
            }
        };

        rows.push(WeekRow { window, outcome });
    }

    info!(errors = error_count, "Weekly report complete");
    ReportRun { rows, error_count }
}
