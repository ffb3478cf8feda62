mod analytics_client;
mod auth;
mod config;
mod csv_writer;
mod error;
mod report;

use std::path::Path;

use analytics_client::AnalyticsClient;
use auth::ServiceAccountKey;
use config::Settings;
use error::Result;
use tracing::info;

fn run() -> Result<()> {
    let settings = Settings::load()?;
    info!(
        view = %settings.view_id,
        segment = %settings.segment_id,
        from = %settings.start_date,
        to = %settings.end_date,
        "Loaded settings"
    );

    let http = reqwest::blocking::Client::new();

    let key = ServiceAccountKey::load()?;
    let token = auth::fetch_access_token(&http, &key)?;

    let client = AnalyticsClient::new(
        http,
        token,
        settings.view_id.clone(),
        settings.segment_id.clone(),
    );

    let run = report::run_weekly_report(&client, settings.start_date, settings.end_date);
    info!(errors = run.error_count, "Number of errors from API");

    let written = csv_writer::write_csv(
        &run.rows,
        &settings.segment_id,
        Path::new(csv_writer::OUTPUT_FILE),
    )?;
    info!(rows = written, path = csv_writer::OUTPUT_FILE, "Done — wrote CSV");

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    run()
}
