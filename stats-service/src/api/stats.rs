use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use electricity_client::serde_formats;
use tracing::{error, info, warn};

use super::error::AppError;
use super::params::{self, RawStatsParams};
use super::AppState;
use crate::stats::{
    self,
    response::{DailyStatsBody, HourlyStatsBody},
};

fn rejected(e: params::ValidationError) -> AppError {
    warn!(param = e.param, reason = %e.reason, "rejected stats query");
    metrics::counter!("stats_validation_rejected_total").increment(1);
    AppError::Validation(e)
}

pub async fn get_daily_stats(
    State(state): State<AppState>,
    Query(raw): Query<RawStatsParams>,
) -> Result<Json<DailyStatsBody>, AppError> {
    metrics::counter!("stats_requests_total", "endpoint" => "daily").increment(1);
    let query = params::parse_stats_query(raw, state.default_limit).map_err(rejected)?;

    let started = Instant::now();
    let page = stats::daily_stats(state.source.as_ref(), &query)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to compute daily stats");
            e
        })?;
    metrics::histogram!("stats_query_duration_seconds", "endpoint" => "daily")
        .record(started.elapsed().as_secs_f64());

    info!(
        sort_by = ?query.sort_by,
        direction = ?query.direction,
        offset = query.page.offset,
        limit = query.page.limit,
        total = page.total,
        "GET /stats"
    );
    Ok(Json(page.into()))
}

pub async fn get_hourly_stats(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<HourlyStatsBody>, AppError> {
    metrics::counter!("stats_requests_total", "endpoint" => "hourly").increment(1);
    let date = params::parse_date("date", &date).map_err(rejected)?;

    let started = Instant::now();
    let hourly = stats::hourly_stats(state.source.as_ref(), date)
        .await
        .map_err(|e| {
            error!(error = %e, date = %date, "failed to load hourly stats");
            e
        })?;
    metrics::histogram!("stats_query_duration_seconds", "endpoint" => "hourly")
        .record(started.elapsed().as_secs_f64());

    match hourly {
        Some(hourly) => {
            info!(date = %date, hours = hourly.records.len(), "GET /stats/{{date}}");
            Ok(Json(hourly.into()))
        }
        None => {
            metrics::counter!("stats_not_found_total").increment(1);
            info!(date = %date, "no hourly data");
            Err(AppError::NotFound(serde_formats::format_date(date)))
        }
    }
}
