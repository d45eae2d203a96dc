use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{ServerError, server::ServerState};
use api_types::report::ReportQuery;
use engine::ReportModule;

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|t| t.and_utc())
        .unwrap_or_else(|| day_start(date))
}

/// Render one report module as a CSV attachment over an inclusive day range.
pub async fn download(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<(HeaderMap, String), ServerError> {
    let format = query.format.as_deref().unwrap_or("csv");
    if format != "csv" {
        return Err(ServerError::Generic(format!(
            "unsupported report format: {format}"
        )));
    }

    let module = ReportModule::try_from(query.module.as_str())?;
    let table = state
        .engine
        .report(
            module,
            query.from.map(day_start),
            query.to.map(day_end),
        )
        .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| ServerError::Generic(err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|err| ServerError::Generic(err.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{}-report.csv\"", query.module);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|err| ServerError::Generic(err.to_string()))?,
    );

    Ok((headers, body))
}
