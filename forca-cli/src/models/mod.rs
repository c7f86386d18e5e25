mod profile;
mod sleep;
mod stats;
mod training;

pub use profile::{
    NewProfile, ProfileGoal, ProfileInjury, ProfileRestriction, ProfileUpdate, UserProfile,
    DEFAULT_SEVERITY,
};
pub use sleep::{NewSleepRecord, SleepRecord};
pub use stats::{NewUserStats, StatsUpdate, UserStats};
pub use training::{
    NewTrainingSession, SessionFilter, SessionStatus, TrainingAdaptation, TrainingPlan,
    TrainingSession,
};
