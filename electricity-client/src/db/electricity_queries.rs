use anyhow::Result;
use sqlx::PgPool;
use time::Date;

use crate::domain::HourlyRecord;

/// Fetch every hourly record whose date lies in `[start, end]`, ordered by
/// start time. A missing bound leaves that side of the window open.
pub async fn hourly_records(
    pool: &PgPool,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<Vec<HourlyRecord>> {
    let rows = sqlx::query_as::<_, HourlyRecord>(
        r#"
        SELECT
            date,
            start_time,
            production_amount,
            consumption_amount,
            hourly_price
        FROM electricity_data
        WHERE ($1::date IS NULL OR date >= $1)
          AND ($2::date IS NULL OR date <= $2)
        ORDER BY start_time
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the hourly records of a single date, ordered by start time.
pub async fn hourly_records_for_date(pool: &PgPool, date: Date) -> Result<Vec<HourlyRecord>> {
    let rows = sqlx::query_as::<_, HourlyRecord>(
        r#"
        SELECT
            date,
            start_time,
            production_amount,
            consumption_amount,
            hourly_price
        FROM electricity_data
        WHERE date = $1
        ORDER BY start_time
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
