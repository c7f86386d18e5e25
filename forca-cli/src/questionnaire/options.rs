//! Fixed answer sets offered by the questionnaire.
//!
//! Each option knows the value stored in the database and sent to the plan
//! service (Portuguese, as the shared schema expects) and the label shown in
//! the terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "masculino")]
    Male,
    #[serde(rename = "feminino")]
    Female,
    #[serde(rename = "outro")]
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn value(&self) -> &'static str {
        match self {
            Gender::Male => "masculino",
            Gender::Female => "feminino",
            Gender::Other => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    #[serde(rename = "iniciante")]
    Beginner,
    #[serde(rename = "intermediário")]
    Intermediate,
    #[serde(rename = "avançado")]
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "iniciante",
            ExperienceLevel::Intermediate => "intermediário",
            ExperienceLevel::Advanced => "avançado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingGoal {
    #[serde(rename = "Hipertrofia")]
    Hypertrophy,
    #[serde(rename = "Emagrecimento")]
    WeightLoss,
    #[serde(rename = "Força")]
    Strength,
    #[serde(rename = "Resistência")]
    Endurance,
    #[serde(rename = "Condicionamento Geral")]
    GeneralConditioning,
}

impl TrainingGoal {
    pub const ALL: [TrainingGoal; 5] = [
        TrainingGoal::Hypertrophy,
        TrainingGoal::WeightLoss,
        TrainingGoal::Strength,
        TrainingGoal::Endurance,
        TrainingGoal::GeneralConditioning,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            TrainingGoal::Hypertrophy => "Hipertrofia",
            TrainingGoal::WeightLoss => "Emagrecimento",
            TrainingGoal::Strength => "Força",
            TrainingGoal::Endurance => "Resistência",
            TrainingGoal::GeneralConditioning => "Condicionamento Geral",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrainingGoal::Hypertrophy => "Hypertrophy",
            TrainingGoal::WeightLoss => "Weight loss",
            TrainingGoal::Strength => "Strength",
            TrainingGoal::Endurance => "Endurance",
            TrainingGoal::GeneralConditioning => "General conditioning",
        }
    }
}

/// Day of the training week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Seg")]
    Mon,
    #[serde(rename = "Ter")]
    Tue,
    #[serde(rename = "Qua")]
    Wed,
    #[serde(rename = "Qui")]
    Thu,
    #[serde(rename = "Sex")]
    Fri,
    #[serde(rename = "Sab")]
    Sat,
    #[serde(rename = "Dom")]
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Short label used on the wire and in the sleep chart
    pub fn short(&self) -> &'static str {
        match self {
            Weekday::Mon => "Seg",
            Weekday::Tue => "Ter",
            Weekday::Wed => "Qua",
            Weekday::Thu => "Qui",
            Weekday::Fri => "Sex",
            Weekday::Sat => "Sab",
            Weekday::Sun => "Dom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Injury {
    #[serde(rename = "Lesão no Joelho")]
    Knee,
    #[serde(rename = "Lesão no Ombro")]
    Shoulder,
    #[serde(rename = "Lesão nas Costas")]
    Back,
    #[serde(rename = "Lesão no Tornozelo")]
    Ankle,
    #[serde(rename = "Lesão no Punho")]
    Wrist,
    #[serde(rename = "Lesão no Quadril")]
    Hip,
    #[serde(rename = "Tendinite")]
    Tendinitis,
}

impl Injury {
    pub const ALL: [Injury; 7] = [
        Injury::Knee,
        Injury::Shoulder,
        Injury::Back,
        Injury::Ankle,
        Injury::Wrist,
        Injury::Hip,
        Injury::Tendinitis,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            Injury::Knee => "Lesão no Joelho",
            Injury::Shoulder => "Lesão no Ombro",
            Injury::Back => "Lesão nas Costas",
            Injury::Ankle => "Lesão no Tornozelo",
            Injury::Wrist => "Lesão no Punho",
            Injury::Hip => "Lesão no Quadril",
            Injury::Tendinitis => "Tendinite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Injury::Knee => "Knee injury",
            Injury::Shoulder => "Shoulder injury",
            Injury::Back => "Back injury",
            Injury::Ankle => "Ankle injury",
            Injury::Wrist => "Wrist injury",
            Injury::Hip => "Hip injury",
            Injury::Tendinitis => "Tendinitis",
        }
    }

    /// Body region stored on the profile: the lower-cased value without its
    /// "lesão no"/"lesão nas" prefix
    pub fn region(&self) -> String {
        let lower = self.value().to_lowercase();
        lower
            .strip_prefix("lesão no ")
            .or_else(|| lower.strip_prefix("lesão nas "))
            .unwrap_or(&lower)
            .to_string()
    }
}

/// Minutes available per training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionLength {
    #[default]
    Min30,
    Min45,
    Min60,
    Min90,
}

impl SessionLength {
    pub const ALL: [SessionLength; 4] = [
        SessionLength::Min30,
        SessionLength::Min45,
        SessionLength::Min60,
        SessionLength::Min90,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            SessionLength::Min30 => 30,
            SessionLength::Min45 => 45,
            SessionLength::Min60 => 60,
            SessionLength::Min90 => 90,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.minutes() == minutes)
    }
}

impl Serialize for SessionLength {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.minutes())
    }
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injury_regions() {
        assert_eq!(Injury::Knee.region(), "joelho");
        assert_eq!(Injury::Back.region(), "costas");
        assert_eq!(Injury::Tendinitis.region(), "tendinite");
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(serde_json::to_value(Weekday::Sat).unwrap(), "Sab");
        assert_eq!(serde_json::to_value(ExperienceLevel::Intermediate).unwrap(), "intermediário");
        assert_eq!(serde_json::to_value(SessionLength::Min45).unwrap(), 45);
        assert_eq!(SessionLength::from_minutes(60), Some(SessionLength::Min60));
        assert_eq!(SessionLength::from_minutes(50), None);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sun);
    }
}
