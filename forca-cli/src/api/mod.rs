//! Client for the plan-generation service.
//!
//! The service receives the questionnaire answers and writes a personalised
//! training plan; it answers with a summary of what it generated.

use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::questionnaire::PlanRequest;

mod error;

pub use error::ApiError;

/// Paths of the generated artifacts. Older service versions answer with a
/// list, newer ones with a map keyed by artifact kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilesSaved {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl FilesSaved {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            FilesSaved::List(paths) => paths.iter().map(String::as_str).collect(),
            FilesSaved::Map(paths) => paths.values().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanOutline {
    #[serde(rename = "ciclos", default)]
    pub cycles: u32,
    #[serde(rename = "semanas", default)]
    pub weeks: u32,
    /// Sessions per week
    #[serde(rename = "frequencia", default)]
    pub frequency: u32,
}

/// How many variants of the sessions were generated
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdaptationSummary {
    /// Variants for different moods
    #[serde(rename = "humor", default)]
    pub mood: u32,
    /// Variants for different amounts of available time
    #[serde(rename = "tempo_disponivel", default)]
    pub available_time: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanSummary {
    #[serde(rename = "plano", default)]
    pub plan: Option<PlanOutline>,
    #[serde(rename = "adaptacoes", default)]
    pub adaptations: Option<AdaptationSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files_saved: Option<FilesSaved>,
    #[serde(rename = "resumo", default)]
    pub summary: Option<PlanSummary>,
    #[serde(rename = "diretorio_resultados", default)]
    pub results_dir: Option<String>,
}

impl PlanResponse {
    pub fn paths(&self) -> Vec<&str> {
        self.files_saved
            .as_ref()
            .map(FilesSaved::paths)
            .unwrap_or_default()
    }
}

/// Client for the plan-generation endpoint
pub struct PlanClient {
    client: Client,
    endpoint: String,
}

impl PlanClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.plan_path.trim_start_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit the questionnaire and wait for the generated plan summary.
    /// The user's access token is forwarded when there is one.
    pub async fn generate_plan(
        &self,
        token: Option<&str>,
        request: &PlanRequest,
    ) -> Result<PlanResponse, ApiError> {
        tracing::debug!("Requesting plan generation for {}", request.user_id);

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Plan generation failed with status {}", status);
            return Err(ApiError::from_status(status, &body));
        }

        let plan: PlanResponse = serde_json::from_str(&body)?;
        tracing::info!("Plan generated for {}", request.user_id);
        Ok(plan)
    }
}
