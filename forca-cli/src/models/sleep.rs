use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Row of `sleep_data`: one night of sleep, dated on the morning it ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub deep_sleep_hours: f64,
    #[serde(default)]
    pub rem_sleep_hours: f64,
    #[serde(default)]
    pub light_sleep_hours: f64,
    /// Falls back to the sum of the stages when the row leaves it empty
    #[serde(default)]
    pub total_sleep_hours: Option<f64>,
    /// Sleep quality score (0-100) if the source reports one
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SleepRecord {
    pub fn total_hours(&self) -> f64 {
        self.total_sleep_hours
            .unwrap_or(self.deep_sleep_hours + self.rem_sleep_hours + self.light_sleep_hours)
    }

    /// Share of deep and REM sleep in the night, as a percentage. `None` when
    /// the night has no recorded duration.
    pub fn restorative_percentage(&self) -> Option<f64> {
        let total = self.total_hours();
        if total <= 0.0 {
            return None;
        }
        Some((self.deep_sleep_hours + self.rem_sleep_hours) / total * 100.0)
    }

    /// Quality shown on the day selector: the reported score, else the
    /// restorative share, rounded and clamped to 0-100
    pub fn quality_percentage(&self) -> Option<u8> {
        self.quality_score
            .or_else(|| self.restorative_percentage())
            .map(|q| q.round().clamp(0.0, 100.0) as u8)
    }
}

/// Payload for recording a night of sleep
#[derive(Debug, Clone, Serialize)]
pub struct NewSleepRecord {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub deep_sleep_hours: f64,
    pub rem_sleep_hours: f64,
    pub light_sleep_hours: f64,
    pub total_sleep_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

impl NewSleepRecord {
    pub fn new(user_id: Uuid, date: NaiveDate, deep: f64, rem: f64, light: f64) -> Self {
        Self {
            user_id,
            date,
            deep_sleep_hours: deep,
            rem_sleep_hours: rem,
            light_sleep_hours: light,
            total_sleep_hours: deep + rem + light,
            quality_score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate, deep: f64, rem: f64, light: f64) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            deep_sleep_hours: deep,
            rem_sleep_hours: rem,
            light_sleep_hours: light,
            total_sleep_hours: None,
            quality_score: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_quality_from_stages() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let night = record(date, 1.5, 2.0, 3.5);

        assert_eq!(night.total_hours(), 7.0);
        assert_eq!(night.quality_percentage(), Some(50));
    }

    #[test]
    fn test_reported_score_wins_and_is_clamped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut night = record(date, 1.0, 1.0, 6.0);
        night.quality_score = Some(104.2);

        assert_eq!(night.quality_percentage(), Some(100));
    }

    #[test]
    fn test_empty_night_has_no_quality() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let night = record(date, 0.0, 0.0, 0.0);

        assert_eq!(night.restorative_percentage(), None);
        assert_eq!(night.quality_percentage(), None);
    }
}
