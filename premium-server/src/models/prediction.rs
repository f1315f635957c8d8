//! Prediction history model

use chrono::{DateTime, Utc};
use premium_core::{Estimate, RawInput};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: String,
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: bool,
    pub region: String,
    pub prediction: f64,
    pub clamped: bool,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub count: usize,
    pub latest: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub average: Option<f64>,
}

impl HistorySummary {
    /// `records` newest first
    pub fn from_records(records: &[PredictionRecord]) -> Self {
        let values: Vec<f64> = records.iter().map(|r| r.prediction).collect();
        if values.is_empty() {
            return Self { count: 0, latest: None, highest: None, lowest: None, average: None };
        }

        Self {
            count: values.len(),
            latest: values.first().copied(),
            highest: values.iter().copied().reduce(f64::max),
            lowest: values.iter().copied().reduce(f64::min),
            average: Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

impl PredictionRecord {
    pub async fn record(
        pool: &SqlitePool,
        user_id: &str,
        input: &RawInput,
        estimate: &Estimate,
        model_name: &str,
        at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            r#"
            INSERT INTO predictions
                (user_id, age, sex, bmi, children, smoker, region, prediction, clamped, model_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(user_id)
        .bind(i64::from(input.age))
        .bind(input.sex.as_str())
        .bind(input.bmi)
        .bind(i64::from(input.children))
        .bind(input.smoker)
        .bind(input.region.as_str())
        .bind(estimate.cost())
        .bind(estimate.clamped())
        .bind(model_name)
        .bind(at)
        .fetch_one(pool)
        .await
    }

    /// Newest first; id breaks ties between identical timestamps
    pub async fn list_for(pool: &SqlitePool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            "SELECT * FROM predictions WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prediction: f64) -> PredictionRecord {
        PredictionRecord {
            id: 0,
            user_id: "u".to_string(),
            age: 30,
            sex: "male".to_string(),
            bmi: 25.0,
            children: 0,
            smoker: false,
            region: "northwest".to_string(),
            prediction,
            clamped: false,
            model_name: "m".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_empty() {
        let summary = HistorySummary::from_records(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
    }

    #[test]
    fn test_summary_values() {
        let summary = HistorySummary::from_records(&[record(300.0), record(100.0), record(200.0)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.latest, Some(300.0));
        assert_eq!(summary.highest, Some(300.0));
        assert_eq!(summary.lowest, Some(100.0));
        assert_eq!(summary.average, Some(200.0));
    }
}
