use electricity_client::{
    domain::{DailySummary, HourlyRecord},
    serde_formats,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;
use time::{Date, PrimitiveDateTime};

use super::{daily::kwh_to_mwh, DailyStatsPage, HourlyStats};

fn number(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|v| v.to_f64())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryBody {
    #[serde(with = "serde_formats::date")]
    pub date: Date,
    pub total_production: Option<f64>,
    pub total_consumption: Option<f64>,
    pub average_price: Option<f64>,
    pub longest_negative_price_streak_hours: u32,
}

impl From<DailySummary> for DailySummaryBody {
    fn from(s: DailySummary) -> Self {
        Self {
            date: s.date,
            total_production: number(s.total_production),
            total_consumption: number(s.total_consumption),
            average_price: number(s.average_price),
            longest_negative_price_streak_hours: s.longest_negative_price_streak_hours,
        }
    }
}

/// `GET /stats` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatsBody {
    pub data: Vec<DailySummaryBody>,
    pub total: usize,
}

impl From<DailyStatsPage> for DailyStatsBody {
    fn from(page: DailyStatsPage) -> Self {
        Self {
            data: page.data.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

/// One hour of the drill-down. Consumption is reported in MWh, production
/// and price as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRecordBody {
    #[serde(with = "serde_formats::timestamp")]
    pub start_time: PrimitiveDateTime,
    pub production_amount: Option<f64>,
    pub consumption_amount: Option<f64>,
    pub hourly_price: Option<f64>,
}

impl From<HourlyRecord> for HourlyRecordBody {
    fn from(r: HourlyRecord) -> Self {
        Self {
            start_time: r.start_time,
            production_amount: number(r.production_amount),
            consumption_amount: number(r.consumption_amount.map(kwh_to_mwh)),
            hourly_price: number(r.hourly_price),
        }
    }
}

/// `GET /stats/{date}` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyStatsBody {
    #[serde(with = "serde_formats::date")]
    pub date: Date,
    pub data: Vec<HourlyRecordBody>,
}

impl From<HourlyStats> for HourlyStatsBody {
    fn from(stats: HourlyStats) -> Self {
        Self {
            date: stats.date,
            data: stats.records.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    #[test]
    fn daily_body_uses_camel_case_and_plain_numbers() {
        let body = DailyStatsBody::from(DailyStatsPage {
            data: vec![DailySummary {
                date: date!(2025 - 12 - 29),
                total_production: Some(dec!(720.000)),
                total_consumption: None,
                average_price: Some(dec!(-2.5)),
                longest_negative_price_streak_hours: 3,
            }],
            total: 9,
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [{
                    "date": "2025-12-29",
                    "totalProduction": 720.0,
                    "totalConsumption": null,
                    "averagePrice": -2.5,
                    "longestNegativePriceStreakHours": 3
                }],
                "total": 9
            })
        );
    }

    #[test]
    fn hourly_body_converts_consumption_to_mwh() {
        let body = HourlyStatsBody::from(HourlyStats {
            date: date!(2025 - 12 - 29),
            records: vec![HourlyRecord {
                date: date!(2025 - 12 - 29),
                start_time: datetime!(2025-12-29 13:00:00),
                production_amount: Some(dec!(30000)),
                consumption_amount: Some(dec!(4000000)),
                hourly_price: None,
            }],
        });

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["date"], "2025-12-29");
        let hour = &json["data"][0];
        assert_eq!(hour["startTime"], "2025-12-29T13:00:00");
        assert_eq!(hour["productionAmount"], 30000.0);
        assert_eq!(hour["consumptionAmount"], 4000.0);
        assert!(hour["hourlyPrice"].is_null());
        assert!(hour.get("date").is_none());
    }
}
