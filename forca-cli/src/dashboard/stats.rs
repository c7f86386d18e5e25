use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use std::fmt;

use crate::models::{SessionStatus, SleepRecord, TrainingSession, UserProfile, UserStats};
use crate::session::User;

/// Numbers shown on the four health cards for one day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthCards {
    pub heart_rate_bpm: Option<u32>,
    pub calories: Option<u32>,
    pub streak_days: u32,
    pub sleep_hours: Option<f64>,
}

impl HealthCards {
    pub fn for_day(
        date: NaiveDate,
        today: NaiveDate,
        stats: &[UserStats],
        sleep: &[SleepRecord],
        sessions: &[TrainingSession],
    ) -> Self {
        let day_stats = stats.iter().rev().find(|s| s.date == date);

        let sleep_hours = sleep
            .iter()
            .rev()
            .find(|r| r.date == date)
            .map(SleepRecord::total_hours)
            .or_else(|| day_stats.and_then(|s| s.sleep_hours));

        Self {
            heart_rate_bpm: day_stats.and_then(|s| s.heart_rate_bpm),
            calories: day_stats.and_then(|s| s.calories_burned),
            streak_days: day_stats
                .and_then(|s| s.streak_days)
                .unwrap_or_else(|| current_streak(sessions, today)),
            sleep_hours,
        }
    }
}

/// Consecutive days with a completed session, ending today. When nothing was
/// completed today the streak may still be running from yesterday.
pub fn current_streak(sessions: &[TrainingSession], today: NaiveDate) -> u32 {
    let completed: HashSet<NaiveDate> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed && s.date <= today)
        .map(|s| s.date)
        .collect();

    let mut day = if completed.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while completed.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastWorkout {
    Today,
    Yesterday,
    DaysAgo(i64),
    Never,
}

impl LastWorkout {
    /// Most recent session that was at least partly done, up to today
    pub fn from_sessions(sessions: &[TrainingSession], today: NaiveDate) -> Self {
        let last = sessions
            .iter()
            .filter(|s| {
                matches!(s.status, SessionStatus::Completed | SessionStatus::Partial)
                    && s.date <= today
            })
            .map(|s| s.date)
            .max();

        match last.map(|d| (today - d).num_days()) {
            None => LastWorkout::Never,
            Some(0) => LastWorkout::Today,
            Some(1) => LastWorkout::Yesterday,
            Some(n) => LastWorkout::DaysAgo(n),
        }
    }
}

impl fmt::Display for LastWorkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastWorkout::Today => write!(f, "today"),
            LastWorkout::Yesterday => write!(f, "yesterday"),
            LastWorkout::DaysAgo(n) => write!(f, "{} days ago", n),
            LastWorkout::Never => write!(f, "never"),
        }
    }
}

/// Name used in the dashboard header: profile name, else username, else email
pub fn display_name<'a>(profile: Option<&'a UserProfile>, user: &'a User) -> &'a str {
    profile
        .and_then(UserProfile::display_name)
        .unwrap_or_else(|| user.handle())
}
