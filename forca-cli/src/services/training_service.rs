use anyhow::{Context, Result};
use uuid::Uuid;

use super::first_row;
use crate::backend::{BackendClient, Order};
use crate::models::{
    NewTrainingSession, SessionFilter, TrainingAdaptation, TrainingPlan, TrainingSession,
};

pub struct TrainingService {
    client: BackendClient,
}

impl TrainingService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Plans visible to the user, newest first
    pub async fn list_plans(&self) -> Result<Vec<TrainingPlan>> {
        let plans = self
            .client
            .from("training_plans")
            .select("*")
            .order("created_at", Order::Descending)
            .fetch()
            .await
            .context("Failed to load training plans")?;

        Ok(plans)
    }

    pub async fn get_plan(&self, plan_id: Uuid) -> Result<TrainingPlan> {
        let plan = self
            .client
            .from("training_plans")
            .select("*")
            .eq("id", plan_id)
            .single()
            .await
            .with_context(|| format!("Failed to load training plan {}", plan_id))?;

        Ok(plan)
    }

    /// Sessions matching the filter, newest first
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<TrainingSession>> {
        let mut query = self.client.from("training_sessions").select("*");

        if let Some(from) = filter.from {
            query = query.gte("date", from);
        }
        if let Some(to) = filter.to {
            query = query.lte("date", to);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status);
        }

        query = query.order("date", Order::Descending);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let sessions = query
            .fetch()
            .await
            .context("Failed to load training sessions")?;

        Ok(sessions)
    }

    pub async fn record_session(&self, session: &NewTrainingSession) -> Result<TrainingSession> {
        let rows: Vec<TrainingSession> = self
            .client
            .from("training_sessions")
            .select("*")
            .insert(session)
            .await
            .context("Failed to record training session")?;

        tracing::info!("Recorded {} session on {}", session.status, session.date);
        first_row(rows, "training_sessions")
    }

    /// Adaptations derived from one session
    pub async fn list_adaptations(&self, original_session_id: Uuid) -> Result<Vec<TrainingAdaptation>> {
        let adaptations = self
            .client
            .from("training_adaptations")
            .select("*")
            .eq("original_session_id", original_session_id)
            .fetch()
            .await
            .context("Failed to load training adaptations")?;

        Ok(adaptations)
    }
}
