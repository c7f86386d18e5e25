//! Training questionnaire: the answers, their validation and the payloads
//! derived from them.

mod options;
mod wizard;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ProfileGoal, ProfileInjury, ProfileRestriction, ProfileUpdate, DEFAULT_SEVERITY,
};

pub use options::{ExperienceLevel, Gender, Injury, SessionLength, TrainingGoal, Weekday};
pub use wizard::{QuestionnaireWizard, Step};

/// Name stored when the user leaves theirs blank
pub const DEFAULT_NAME: &str = "Usuário";

/// Oldest selectable birth year is this many years before the current one
pub const BIRTH_YEAR_SPAN: i32 = 100;

pub const MAX_TRAINING_YEARS: u32 = 20;

const WEIGHT_PATTERN: &str = r"^\d*\.?\d*$";
const HEIGHT_PATTERN: &str = r"^\d*$";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Birth date {0} is not a valid date")]
    InvalidBirthDate(String),

    #[error("Birth year must be between {min} and {max}")]
    BirthYearOutOfRange { min: i32, max: i32 },

    #[error("Weight must be a number in kg, e.g. 72.5")]
    InvalidWeight,

    #[error("Height must be a whole number of centimetres")]
    InvalidHeight,

    #[error("Select at least one injury, or answer that you have none")]
    NoInjuriesSelected,

    #[error("Years of training must be between 0 and 20")]
    TrainingYearsOutOfRange,

    #[error("Choose a training goal")]
    MissingGoal,

    #[error("Select at least one training day")]
    NoTrainingDays,
}

/// Birth date as picked from separate day, month and year lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl Default for BirthDate {
    fn default() -> Self {
        Self {
            day: 1,
            month: 1,
            year: 1990,
        }
    }
}

impl BirthDate {
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    fn validate(&self, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        let max = today.year();
        let min = max - BIRTH_YEAR_SPAN + 1;
        if self.year < min || self.year > max {
            return Err(ValidationError::BirthYearOutOfRange { min, max });
        }

        self.to_date()
            .ok_or_else(|| ValidationError::InvalidBirthDate(self.to_string()))
    }
}

impl std::fmt::Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for BirthDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("BirthDate", 3)?;
        state.serialize_field("dia", &format!("{:02}", self.day))?;
        state.serialize_field("mes", &format!("{:02}", self.month))?;
        state.serialize_field("ano", &self.year.to_string())?;
        state.end()
    }
}

/// Everything the user answers in the questionnaire. Serializes with the
/// field names the plan service reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Questionnaire {
    #[serde(rename = "nome", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "genero")]
    pub gender: Option<Gender>,
    #[serde(rename = "dataNascimento")]
    pub birth_date: BirthDate,
    /// Weight as typed, in kg
    #[serde(rename = "peso")]
    pub weight: String,
    /// Height as typed, in cm
    #[serde(rename = "altura")]
    pub height: String,
    #[serde(rename = "temLesoes")]
    pub has_injuries: bool,
    #[serde(rename = "lesoes")]
    pub injuries: Vec<Injury>,
    #[serde(rename = "descricaoLesao")]
    pub injury_description: String,
    #[serde(rename = "experienciaTreino")]
    pub experience: ExperienceLevel,
    #[serde(rename = "tempoTreino")]
    pub training_years: u32,
    #[serde(rename = "objetivo")]
    pub goal: Option<TrainingGoal>,
    #[serde(rename = "diasTreino")]
    pub training_days: Vec<Weekday>,
    #[serde(rename = "tempoTreinoDiario")]
    pub session_length: SessionLength,
    #[serde(rename = "preferenciaCardio")]
    pub wants_cardio: bool,
    #[serde(rename = "preferenciaAlongamento")]
    pub wants_stretching: bool,
}

/// Parse a weight in kg. A comma is accepted as decimal separator; blank
/// input means "not given".
pub fn parse_weight(input: &str) -> Result<Option<f64>, ValidationError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Ok(None);
    }
    if !matches_pattern(WEIGHT_PATTERN, &normalized) {
        return Err(ValidationError::InvalidWeight);
    }

    match normalized.parse::<f64>() {
        Ok(kg) if kg > 0.0 => Ok(Some(kg)),
        _ => Err(ValidationError::InvalidWeight),
    }
}

/// Parse a height in whole centimetres; blank input means "not given"
pub fn parse_height(input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !matches_pattern(HEIGHT_PATTERN, trimmed) {
        return Err(ValidationError::InvalidHeight);
    }

    match trimmed.parse::<u32>() {
        Ok(cm) if cm > 0 => Ok(Some(cm)),
        _ => Err(ValidationError::InvalidHeight),
    }
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn toggle<T: PartialEq + Copy>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|i| *i == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}

impl Questionnaire {
    /// Select the day if it is not selected, deselect it otherwise
    pub fn toggle_day(&mut self, day: Weekday) {
        toggle(&mut self.training_days, day);
    }

    pub fn toggle_injury(&mut self, injury: Injury) {
        toggle(&mut self.injuries, injury);
    }

    /// Injuries that count: none when the user said they have none
    pub fn active_injuries(&self) -> &[Injury] {
        if self.has_injuries {
            &self.injuries
        } else {
            &[]
        }
    }

    /// Check the answers gathered on one wizard step
    pub fn validate_step(&self, step: Step, today: NaiveDate) -> Result<(), ValidationError> {
        match step {
            Step::Personal => self.birth_date.validate(today).map(|_| ()),
            Step::Body => {
                parse_weight(&self.weight)?;
                parse_height(&self.height)?;
                Ok(())
            }
            Step::Injuries => {
                if self.has_injuries && self.injuries.is_empty() {
                    Err(ValidationError::NoInjuriesSelected)
                } else {
                    Ok(())
                }
            }
            Step::Experience => {
                if self.training_years > MAX_TRAINING_YEARS {
                    Err(ValidationError::TrainingYearsOutOfRange)
                } else {
                    Ok(())
                }
            }
            Step::Goal => self.goal.map(|_| ()).ok_or(ValidationError::MissingGoal),
            Step::Schedule => {
                if self.training_days.is_empty() {
                    Err(ValidationError::NoTrainingDays)
                } else {
                    Ok(())
                }
            }
            Step::Preferences => Ok(()),
            Step::Review => self.validate_on(today),
        }
    }

    /// Check every answer as of `today`, reporting the first problem in step
    /// order
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationError> {
        Step::ALL
            .iter()
            .filter(|s| **s != Step::Review)
            .try_for_each(|step| self.validate_step(*step, today))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_on(Local::now().date_naive())
    }

    /// Profile columns written when the questionnaire is submitted
    pub fn to_profile_update(&self) -> Result<ProfileUpdate, ValidationError> {
        self.validate()?;

        let birth_date = self
            .birth_date
            .to_date()
            .ok_or_else(|| ValidationError::InvalidBirthDate(self.birth_date.to_string()))?;

        let injuries = self.active_injuries();
        let name = self.name.trim();

        Ok(ProfileUpdate {
            full_name: if name.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                name.to_string()
            },
            birth_date,
            gender: self.gender.map(|g| g.value().to_string()),
            weight_kg: parse_weight(&self.weight)?,
            height_cm: parse_height(&self.height)?,
            level: self.experience.value().to_string(),
            training_history: format!("{} anos de experiência", self.training_years),
            goals: self
                .goal
                .map(|g| {
                    vec![ProfileGoal {
                        name: g.value().to_string(),
                        priority: 1,
                    }]
                })
                .unwrap_or_default(),
            injuries: injuries
                .iter()
                .map(|i| ProfileInjury {
                    region: i.region(),
                    severity: DEFAULT_SEVERITY.to_string(),
                    notes: self.injury_description.clone(),
                })
                .collect(),
            restrictions: if injuries.is_empty() {
                Vec::new()
            } else {
                vec![ProfileRestriction {
                    name: injuries
                        .iter()
                        .map(|i| i.value())
                        .collect::<Vec<_>>()
                        .join(", "),
                    severity: DEFAULT_SEVERITY.to_string(),
                }]
            },
        })
    }

    /// Body of the plan-generation request
    pub fn to_payload(&self) -> QuestionnairePayload {
        QuestionnairePayload {
            answers: self.clone(),
            weekly_availability: self.training_days.len(),
            cardio: yes_no(self.wants_cardio),
            stretching: yes_no(self.wants_stretching),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "sim"
    } else {
        "não"
    }
}

/// The answers plus the summary fields the plan service expects
#[derive(Debug, Clone, Serialize)]
pub struct QuestionnairePayload {
    #[serde(flatten)]
    pub answers: Questionnaire,
    #[serde(rename = "disponibilidade_semanal")]
    pub weekly_availability: usize,
    pub cardio: &'static str,
    #[serde(rename = "alongamento")]
    pub stretching: &'static str,
}

/// Request sent to the plan-generation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PlanRequest {
    pub user_id: Uuid,
    #[serde(rename = "questionario")]
    pub questionnaire: QuestionnairePayload,
}

impl PlanRequest {
    pub fn new(user_id: Uuid, questionnaire: &Questionnaire) -> Self {
        Self {
            user_id,
            questionnaire: questionnaire.to_payload(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn filled() -> Questionnaire {
        let mut q = Questionnaire {
            weight: "72,5".to_string(),
            height: "178".to_string(),
            goal: Some(TrainingGoal::Strength),
            ..Default::default()
        };
        q.toggle_day(Weekday::Mon);
        q.toggle_day(Weekday::Thu);
        q
    }

    #[test]
    fn test_weight_parsing() {
        assert_eq!(parse_weight("72,5"), Ok(Some(72.5)));
        assert_eq!(parse_weight(" 80 "), Ok(Some(80.0)));
        assert_eq!(parse_weight(""), Ok(None));
        assert_eq!(parse_weight("7.2.5"), Err(ValidationError::InvalidWeight));
        assert_eq!(parse_weight("."), Err(ValidationError::InvalidWeight));
        assert_eq!(parse_weight("0"), Err(ValidationError::InvalidWeight));
        assert_eq!(parse_weight("-3"), Err(ValidationError::InvalidWeight));
    }

    #[test]
    fn test_height_parsing() {
        assert_eq!(parse_height("178"), Ok(Some(178)));
        assert_eq!(parse_height("178.5"), Err(ValidationError::InvalidHeight));
        assert_eq!(parse_height("abc"), Err(ValidationError::InvalidHeight));
    }

    #[test]
    fn test_birth_date_checks() {
        let mut q = filled();
        q.birth_date = BirthDate {
            day: 31,
            month: 2,
            year: 1990,
        };
        assert!(matches!(
            q.validate_step(Step::Personal, today()),
            Err(ValidationError::InvalidBirthDate(_))
        ));

        q.birth_date = BirthDate {
            day: 1,
            month: 1,
            year: 1924,
        };
        assert_eq!(
            q.validate_step(Step::Personal, today()),
            Err(ValidationError::BirthYearOutOfRange { min: 1925, max: 2024 })
        );
    }

    #[test]
    fn test_toggles_and_injury_rule() {
        let mut q = filled();
        q.has_injuries = true;
        assert_eq!(
            q.validate_step(Step::Injuries, today()),
            Err(ValidationError::NoInjuriesSelected)
        );

        q.toggle_injury(Injury::Knee);
        assert!(q.validate_step(Step::Injuries, today()).is_ok());

        q.toggle_injury(Injury::Knee);
        assert!(q.injuries.is_empty());

        q.toggle_day(Weekday::Mon);
        assert_eq!(q.training_days, vec![Weekday::Thu]);
    }

    #[test]
    fn test_full_validation_reports_first_problem() {
        let mut q = filled();
        assert!(q.validate_on(today()).is_ok());

        q.goal = None;
        q.training_days.clear();
        assert_eq!(q.validate_on(today()), Err(ValidationError::MissingGoal));
    }

    #[test]
    fn test_payload_field_names() {
        let mut q = filled();
        q.wants_cardio = true;
        let request = PlanRequest::new(Uuid::nil(), &q);
        let value = serde_json::to_value(&request).unwrap();
        let answers = &value["questionario"];

        assert_eq!(answers["disponibilidade_semanal"], 2);
        assert_eq!(answers["cardio"], "sim");
        assert_eq!(answers["alongamento"], "não");
        assert_eq!(answers["diasTreino"], serde_json::json!(["Seg", "Qui"]));
        assert_eq!(answers["dataNascimento"]["dia"], "01");
        assert_eq!(answers["experienciaTreino"], "iniciante");
        assert_eq!(answers["tempoTreinoDiario"], 30);
        assert_eq!(answers["objetivo"], "Força");
        assert!(answers.get("nome").is_none());
    }
}
