use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Outcome of a planned training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Completed,
    Partial,
    Missed,
    Scheduled,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Completed,
        SessionStatus::Partial,
        SessionStatus::Missed,
        SessionStatus::Scheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Completed => "completed",
            SessionStatus::Partial => "partial",
            SessionStatus::Missed => "missed",
            SessionStatus::Scheduled => "scheduled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Completed => "Completed",
            SessionStatus::Partial => "Partial",
            SessionStatus::Missed => "Missed",
            SessionStatus::Scheduled => "Scheduled",
        }
    }

    /// Rank used when several sessions fall on one day; higher wins
    pub fn precedence(&self) -> u8 {
        match self {
            SessionStatus::Completed => 3,
            SessionStatus::Partial => 2,
            SessionStatus::Missed => 1,
            SessionStatus::Scheduled => 0,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(SessionStatus::Completed),
            "partial" => Ok(SessionStatus::Partial),
            "missed" => Ok(SessionStatus::Missed),
            "scheduled" => Ok(SessionStatus::Scheduled),
            other => Err(format!(
                "unknown session status '{}' (expected completed, partial, missed or scheduled)",
                other
            )),
        }
    }
}

/// Row of `training_sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    pub date: NaiveDate,
    pub status: SessionStatus,
    #[serde(default)]
    pub session_type: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrainingSession {
    /// Status as seen on `today`: a session still scheduled for a past day
    /// was missed
    pub fn effective_status(&self, today: NaiveDate) -> SessionStatus {
        if self.status == SessionStatus::Scheduled && self.date < today {
            SessionStatus::Missed
        } else {
            self.status
        }
    }

    pub fn title(&self) -> &str {
        self.session_type.as_deref().unwrap_or("Training")
    }
}

/// Payload for logging a training session
#[derive(Debug, Clone, Serialize)]
pub struct NewTrainingSession {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filters for listing sessions; every field is optional
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<SessionStatus>,
    pub limit: Option<usize>,
}

impl SessionFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }
}

/// Row of `training_plans`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    #[serde(default)]
    pub weekly_frequency: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrainingPlan {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled plan")
    }
}

/// Row of `training_adaptations`: a change made to a session after the fact,
/// e.g. shortened because less time was available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingAdaptation {
    pub id: Uuid,
    pub original_session_id: Uuid,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub available_minutes: Option<u32>,
    #[serde(default)]
    pub adjusted_duration: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
