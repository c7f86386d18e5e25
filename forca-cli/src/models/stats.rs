use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Row of `user_stats`: daily health numbers for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub heart_rate_bpm: Option<u32>,
    #[serde(default)]
    pub calories_burned: Option<u32>,
    #[serde(default)]
    pub streak_days: Option<u32>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update of a day's stats; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate_bpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
}

impl StatsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &StatsUpdate::default()
    }
}

/// Insert payload: the update plus the row's key
#[derive(Debug, Clone, Serialize)]
pub struct NewUserStats {
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: StatsUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_payload_is_flat() {
        let row = NewUserStats {
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            values: StatsUpdate {
                heart_rate_bpm: Some(62),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["date"], "2024-03-04");
        assert_eq!(value["heart_rate_bpm"], 62);
        assert!(value.get("calories_burned").is_none());
        assert!(StatsUpdate::default().is_empty());
    }
}
