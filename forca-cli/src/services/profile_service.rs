use anyhow::{Context, Result};
use uuid::Uuid;

use super::first_row;
use crate::api::{PlanClient, PlanResponse};
use crate::backend::BackendClient;
use crate::models::{NewProfile, ProfileUpdate, UserProfile};
use crate::questionnaire::{PlanRequest, Questionnaire};

const TABLE: &str = "user_profiles";

pub struct ProfileService {
    client: BackendClient,
}

impl ProfileService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// The user's profile, `None` when the row does not exist yet
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let profile = self
            .client
            .from(TABLE)
            .select("*")
            .eq("id", user_id)
            .maybe_single()
            .await
            .context("Failed to load profile")?;

        Ok(profile)
    }

    /// Write the columns onto the user's row, creating the row when the
    /// update matched nothing
    pub async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        let rows: Vec<UserProfile> = self
            .client
            .from(TABLE)
            .select("*")
            .eq("id", user_id)
            .update(update)
            .await
            .context("Failed to update profile")?;

        if let Some(profile) = rows.into_iter().next() {
            tracing::info!("Updated profile {}", user_id);
            return Ok(profile);
        }

        let rows: Vec<UserProfile> = self
            .client
            .from(TABLE)
            .select("*")
            .insert(&NewProfile {
                id: user_id,
                profile: update,
            })
            .await
            .context("Failed to create profile")?;

        tracing::info!("Created profile {}", user_id);
        first_row(rows, TABLE)
    }

    /// Store the answers on the profile, then ask the plan service for a
    /// training plan. Nothing is sent when the answers do not validate.
    pub async fn submit_questionnaire(
        &self,
        user_id: Uuid,
        questionnaire: &Questionnaire,
        plans: &PlanClient,
        token: Option<&str>,
    ) -> Result<PlanResponse> {
        let update = questionnaire.to_profile_update()?;
        self.update_profile(user_id, &update).await?;

        let request = PlanRequest::new(user_id, questionnaire);
        let plan = plans
            .generate_plan(token, &request)
            .await
            .context("Failed to generate training plan")?;

        Ok(plan)
    }
}
