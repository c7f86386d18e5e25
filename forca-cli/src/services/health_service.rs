use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::first_row;
use crate::backend::{BackendClient, Order};
use crate::models::{NewSleepRecord, NewUserStats, SleepRecord, StatsUpdate, UserStats};

#[derive(Deserialize)]
struct RowId {
    id: Uuid,
}

pub struct HealthService {
    client: BackendClient,
}

impl HealthService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Nights recorded between `start` and `end` inclusive, oldest first
    pub async fn sleep_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SleepRecord>> {
        let records = self
            .client
            .from("sleep_data")
            .select("*")
            .gte("date", start)
            .lte("date", end)
            .order("date", Order::Ascending)
            .fetch()
            .await
            .context("Failed to load sleep data")?;

        Ok(records)
    }

    pub async fn record_sleep(&self, record: &NewSleepRecord) -> Result<SleepRecord> {
        let rows: Vec<SleepRecord> = self
            .client
            .from("sleep_data")
            .select("*")
            .insert(record)
            .await
            .context("Failed to record sleep")?;

        tracing::info!("Recorded sleep for {}", record.date);
        first_row(rows, "sleep_data")
    }

    /// Stats of one day; a day without a row is `None`
    pub async fn stats_for(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<UserStats>> {
        let stats = self
            .client
            .from("user_stats")
            .select("*")
            .eq("user_id", user_id)
            .eq("date", date)
            .maybe_single()
            .await
            .context("Failed to load daily stats")?;

        Ok(stats)
    }

    pub async fn stats_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<UserStats>> {
        let stats = self
            .client
            .from("user_stats")
            .select("*")
            .eq("user_id", user_id)
            .gte("date", start)
            .lte("date", end)
            .order("date", Order::Ascending)
            .fetch()
            .await
            .context("Failed to load stats")?;

        Ok(stats)
    }

    /// Update the day's row when there is one, insert it otherwise
    pub async fn upsert_stats(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        update: &StatsUpdate,
    ) -> Result<UserStats> {
        let existing: Option<RowId> = self
            .client
            .from("user_stats")
            .select("id")
            .eq("user_id", user_id)
            .eq("date", date)
            .maybe_single()
            .await
            .context("Failed to look up daily stats")?;

        let rows: Vec<UserStats> = match existing {
            Some(row) => {
                tracing::debug!("Updating stats row {}", row.id);
                self.client
                    .from("user_stats")
                    .select("*")
                    .eq("id", row.id)
                    .update(update)
                    .await
            }
            None => {
                tracing::debug!("Creating stats row for {}", date);
                let new = NewUserStats {
                    user_id,
                    date,
                    values: update.clone(),
                };
                self.client.from("user_stats").select("*").insert(&new).await
            }
        }
        .context("Failed to save daily stats")?;

        first_row(rows, "user_stats")
    }
}
