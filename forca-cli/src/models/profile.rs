use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Severity recorded for injuries and restrictions reported in the questionnaire
pub const DEFAULT_SEVERITY: &str = "moderada";

/// Row of `user_profiles`. Column names follow the shared schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(rename = "nome_completo", default)]
    pub full_name: Option<String>,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "genero", default)]
    pub gender: Option<String>,
    #[serde(rename = "peso", default)]
    pub weight_kg: Option<f64>,
    #[serde(rename = "altura", default)]
    pub height_cm: Option<u32>,
    #[serde(rename = "nivel", default)]
    pub level: Option<String>,
    #[serde(rename = "historico_treino", default)]
    pub training_history: Option<String>,
    #[serde(rename = "objetivos", default)]
    pub goals: Vec<ProfileGoal>,
    #[serde(rename = "lesoes", default)]
    pub injuries: Vec<ProfileInjury>,
    #[serde(rename = "restricoes", default)]
    pub restrictions: Vec<ProfileRestriction>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Columns this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Name to greet the user with
    pub fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Age in whole years on `today`
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| today.years_since(birth))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileGoal {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "prioridade")]
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInjury {
    #[serde(rename = "regiao")]
    pub region: String,
    #[serde(rename = "gravidade")]
    pub severity: String,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRestriction {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "gravidade")]
    pub severity: String,
}

/// Columns written to `user_profiles` when the questionnaire is submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "genero")]
    pub gender: Option<String>,
    #[serde(rename = "peso")]
    pub weight_kg: Option<f64>,
    #[serde(rename = "altura")]
    pub height_cm: Option<u32>,
    #[serde(rename = "nivel")]
    pub level: String,
    #[serde(rename = "historico_treino")]
    pub training_history: String,
    #[serde(rename = "objetivos")]
    pub goals: Vec<ProfileGoal>,
    #[serde(rename = "lesoes")]
    pub injuries: Vec<ProfileInjury>,
    #[serde(rename = "restricoes")]
    pub restrictions: Vec<ProfileRestriction>,
}

/// Body of the `user_profiles` insert for a user who has no row yet
#[derive(Debug, Serialize)]
pub struct NewProfile<'a> {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: &'a ProfileUpdate,
}
