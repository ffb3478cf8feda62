use crate::error::Result;
use crate::report::WeekRow;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Fixed output file name.
pub const OUTPUT_FILE: &str = "output.csv";

/// Write the weekly rows to `path` with a header naming the segment.
/// Returns the number of data rows written (header excluded).
pub fn write_csv(rows: &[WeekRow], segment_id: &str, path: &Path) -> Result<usize> {
    info!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let file = std::fs::File::create(path)?;
    let written = write_csv_to(rows, segment_id, file)?;

    info!(rows = written, "CSV written successfully");
    Ok(written)
}

pub fn write_csv_to<W: Write>(rows: &[WeekRow], segment_id: &str, out: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);

    let users_column = format!("users-{segment_id}");
    wtr.write_record(["startdate", "enddate", users_column.as_str()])?;

    for row in rows {
        wtr.write_record([
            row.window.start.to_string().as_str(),
            row.window.end.to_string().as_str(),
            row.outcome.csv_value(),
        ])?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GaError;
    use crate::report::{run_weekly_report, DateWindow, UserCountSource, WeekOutcome};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(start: &str, end: &str, outcome: WeekOutcome) -> WeekRow {
        WeekRow {
            window: DateWindow { start: d(start), end: d(end) },
            outcome,
        }
    }

    fn render(rows: &[WeekRow], segment_id: &str) -> String {
        let mut buf = Vec::new();
        write_csv_to(rows, segment_id, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_names_the_segment_column() {
        let csv = render(&[], "AbCd");
        assert_eq!(csv, "startdate,enddate,users-AbCd\n");
    }

    #[test]
    fn rows_follow_the_header_in_window_order() {
        let rows = vec![
            row("2021-01-01", "2021-01-07", WeekOutcome::Users("1433".to_string())),
            row("2021-01-08", "2021-01-14", WeekOutcome::Failed(GaError::EmptyReport)),
        ];

        let csv = render(&rows, "AbCd");
        assert_eq!(
            csv,
            "startdate,enddate,users-AbCd\n\
             2021-01-01,2021-01-07,1433\n\
             2021-01-08,2021-01-14,ERROR\n"
        );
    }

    /// Pinned lookup table: window start date -> user count.
    struct TableSource;

    impl UserCountSource for TableSource {
        fn users_for_window(&self, window: &DateWindow) -> crate::error::Result<String> {
            match window.start.to_string().as_str() {
                "2021-01-01" => Ok("10".to_string()),
                "2021-01-08" => Ok("20".to_string()),
                other => panic!("unexpected window start {other}"),
            }
        }
    }

    #[test]
    fn identical_runs_produce_byte_identical_output() {
        let first = run_weekly_report(&TableSource, d("2021-01-01"), d("2021-01-15"));
        let second = run_weekly_report(&TableSource, d("2021-01-01"), d("2021-01-15"));

        assert_eq!(render(&first.rows, "seg"), render(&second.rows, "seg"));
        assert_eq!(
            render(&first.rows, "seg"),
            "startdate,enddate,users-seg\n\
             2021-01-01,2021-01-07,10\n\
             2021-01-08,2021-01-14,20\n"
        );
    }
}
