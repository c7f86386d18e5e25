//! Data behind the home dashboard and the views derived from it.

mod days;
mod sleep;
mod stats;

use anyhow::Result;
use chrono::{Duration, NaiveDate};

use crate::backend::BackendClient;
use crate::models::{SessionFilter, SleepRecord, TrainingSession, UserProfile, UserStats};
use crate::services::{HealthService, ProfileService, TrainingService};
use crate::session::User;

pub use days::{day_status, window, DayEntry, DaySelector, FUTURE_DAYS, PAST_DAYS, VISIBLE_DAYS};
pub use sleep::{mean_sleep_hours, week_start, SleepDay, SleepWeek};
pub use stats::{current_streak, display_name, HealthCards, LastWorkout};

/// Everything the dashboard shows, fetched in one go
#[derive(Debug, Clone)]
pub struct HomeData {
    pub user: User,
    pub today: NaiveDate,
    pub profile: Option<UserProfile>,
    pub sessions: Vec<TrainingSession>,
    pub sleep: Vec<SleepRecord>,
    pub stats: Vec<UserStats>,
    /// Dates covered by `sleep`
    sleep_range: (NaiveDate, NaiveDate),
}

impl HomeData {
    /// Sleep is loaded for the whole Monday-start weeks overlapping the
    /// selector window, so the chart of any selectable day is complete
    pub fn sleep_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (start, end) = window(today);
        (week_start(start), week_start(end) + Duration::days(6))
    }

    pub async fn fetch(client: &BackendClient, user: &User, today: NaiveDate) -> Result<Self> {
        let (start, end) = window(today);
        let (sleep_start, sleep_end) = Self::sleep_window(today);

        let profiles = ProfileService::new(client.clone());
        let training = TrainingService::new(client.clone());
        let health = HealthService::new(client.clone());

        let filter = SessionFilter::between(start, end);
        let (profile, sessions, sleep, stats) = tokio::try_join!(
            profiles.get_profile(user.id),
            training.list_sessions(&filter),
            health.sleep_between(sleep_start, sleep_end),
            health.stats_between(user.id, start, end),
        )?;

        tracing::debug!(
            "Dashboard data: {} sessions, {} nights, {} stats rows",
            sessions.len(),
            sleep.len(),
            stats.len()
        );

        Ok(Self {
            user: user.clone(),
            today,
            profile,
            sessions,
            sleep,
            stats,
            sleep_range: (sleep_start, sleep_end),
        })
    }

    /// Assemble from rows already at hand
    pub fn from_parts(
        user: User,
        today: NaiveDate,
        profile: Option<UserProfile>,
        sessions: Vec<TrainingSession>,
        sleep: Vec<SleepRecord>,
        stats: Vec<UserStats>,
    ) -> Self {
        Self {
            user,
            today,
            profile,
            sessions,
            sleep,
            stats,
            sleep_range: Self::sleep_window(today),
        }
    }

    pub fn sessions_on(&self, date: NaiveDate) -> Vec<&TrainingSession> {
        self.sessions.iter().filter(|s| s.date == date).collect()
    }

    pub fn day_selector(&self) -> DaySelector {
        DaySelector::new(self.today, &self.sessions, &self.sleep)
    }

    pub fn sleep_week(&self, date: NaiveDate) -> SleepWeek {
        SleepWeek::containing(date, &self.sleep)
    }

    /// Whether the sleep of the week starting on `start` has been loaded
    pub fn covers_week(&self, start: NaiveDate) -> bool {
        let (from, to) = self.sleep_range;
        start >= from && start + Duration::days(6) <= to
    }

    /// Add the nights of another week, replacing any already held for it
    pub fn merge_sleep(&mut self, start: NaiveDate, end: NaiveDate, records: Vec<SleepRecord>) {
        self.sleep.retain(|r| r.date < start || r.date > end);
        self.sleep.extend(records);
        self.sleep.sort_by_key(|r| r.date);

        let (from, to) = self.sleep_range;
        self.sleep_range = (from.min(start), to.max(end));
    }

    pub fn health_cards(&self, date: NaiveDate) -> HealthCards {
        HealthCards::for_day(date, self.today, &self.stats, &self.sleep, &self.sessions)
    }

    pub fn display_name(&self) -> &str {
        display_name(self.profile.as_ref(), &self.user)
    }

    pub fn last_workout(&self) -> LastWorkout {
        LastWorkout::from_sessions(&self.sessions, self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_sleep_window_spans_whole_weeks() {
        // Thursday
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let (start, end) = HomeData::sleep_window(today);

        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 24).unwrap());
    }

    #[test]
    fn test_week_coverage_grows_on_merge() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let user = User {
            id: Uuid::nil(),
            email: None,
            username: Some("ana".to_string()),
        };
        let mut data = HomeData::from_parts(user, today, None, vec![], vec![], vec![]);

        let earlier = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        assert!(data.covers_week(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
        assert!(!data.covers_week(earlier));

        data.merge_sleep(earlier, earlier + Duration::days(6), vec![]);
        assert!(data.covers_week(earlier));
        assert_eq!(data.display_name(), "ana");
        assert_eq!(data.last_workout(), LastWorkout::Never);
    }
}
