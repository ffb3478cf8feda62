use crate::error::{GaError, Result};
use crate::report::{DateWindow, UserCountSource};
use serde::{Deserialize, Serialize};
use tracing::info;

const REPORTING_URL: &str = "https://analyticsreporting.googleapis.com/v4/reports:batchGet";

const USERS_METRIC: &str = "ga:users";
const SEGMENT_DIMENSION: &str = "ga:segment";

pub struct AnalyticsClient {
    client: reqwest::blocking::Client,
    access_token: String,
    view_id: String,
    segment_id: String,
}

// --- batchGet request body ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetRequest<'a> {
    report_requests: Vec<ReportRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest<'a> {
    view_id: &'a str,
    date_ranges: Vec<DateRange>,
    metrics: Vec<Metric<'a>>,
    dimensions: Vec<Dimension<'a>>,
    segments: Vec<SegmentFilter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRange {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
struct Metric<'a> {
    expression: &'a str,
}

#[derive(Debug, Serialize)]
struct Dimension<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentFilter {
    segment_id: String,
}

// --- batchGet response types ---

#[derive(Debug, Deserialize)]
pub struct BatchGetResponse {
    pub reports: Option<Vec<Report>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub column_header: Option<ColumnHeader>,
    pub data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[allow(dead_code)]
    pub dimensions: Option<Vec<String>>,
    pub metric_header: Option<MetricHeader>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    pub metric_header_entries: Option<Vec<MetricHeaderEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct MetricHeaderEntry {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportData {
    pub rows: Option<Vec<DataRow>>,
}

#[derive(Debug, Deserialize)]
pub struct DataRow {
    #[allow(dead_code)]
    pub dimensions: Option<Vec<String>>,
    pub metrics: Option<Vec<DateRangeValues>>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeValues {
    pub values: Option<Vec<String>>,
}

impl AnalyticsClient {
    pub fn new(
        client: reqwest::blocking::Client,
        access_token: String,
        view_id: String,
        segment_id: String,
    ) -> Self {
        Self {
            client,
            access_token,
            view_id,
            segment_id,
        }
    }

    /// Issue one batchGet query for a single weekly window and return the
    /// user count for the configured segment.
    pub fn fetch_users(&self, window: &DateWindow) -> Result<String> {
        let body = BatchGetRequest {
            report_requests: vec![ReportRequest {
                view_id: &self.view_id,
                date_ranges: vec![DateRange {
                    start_date: window.start.to_string(),
                    end_date: window.end.to_string(),
                }],
                metrics: vec![Metric {
                    expression: USERS_METRIC,
                }],
                dimensions: vec![Dimension {
                    name: SEGMENT_DIMENSION,
                }],
                segments: vec![SegmentFilter {
                    segment_id: format!("gaid::{}", self.segment_id),
                }],
            }],
        };

        let resp = self
            .client
            .post(REPORTING_URL)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()?;

        let status = resp.status();
        let parsed: BatchGetResponse = resp.json()?;

        if let Some(err) = parsed.error {
            return Err(GaError::api(
                err.code.unwrap_or(status.as_u16()),
                err.message.unwrap_or_default(),
            ));
        }

        if !status.is_success() {
            return Err(GaError::api(
                status.as_u16(),
                "Unexpected error from Analytics Reporting API",
            ));
        }

        let reports = parsed.reports.unwrap_or_default();
        let value = first_metric_value(&reports).ok_or(GaError::EmptyReport)?;

        info!(
            start = %window.start,
            end = %window.end,
            users = %value,
            "Received report"
        );
        Ok(value)
    }
}

impl UserCountSource for AnalyticsClient {
    fn users_for_window(&self, window: &DateWindow) -> Result<String> {
        self.fetch_users(window)
    }
}

/// Pull out the value at the intersection of the first metric header and the
/// first data row's first date-range entry, ignoring everything after it.
/// Empty reports, rows, or headers yield `None`.
fn first_metric_value(reports: &[Report]) -> Option<String> {
    let report = reports.first()?;

    let headers = report
        .column_header
        .as_ref()?
        .metric_header
        .as_ref()?
        .metric_header_entries
        .as_deref()
        .unwrap_or_default();

    let row = report.data.as_ref()?.rows.as_deref().unwrap_or_default().first()?;
    let values = row.metrics.as_deref().unwrap_or_default().first()?;

    headers
        .iter()
        .zip(values.values.as_deref().unwrap_or_default())
        .next()
        .map(|(_, value)| value.clone())
}
