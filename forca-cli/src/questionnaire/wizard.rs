use chrono::{Local, NaiveDate};

use super::{Questionnaire, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Personal,
    Body,
    Injuries,
    Experience,
    Goal,
    Schedule,
    Preferences,
    Review,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Personal,
        Step::Body,
        Step::Injuries,
        Step::Experience,
        Step::Goal,
        Step::Schedule,
        Step::Preferences,
        Step::Review,
    ];

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Personal => "About you",
            Step::Body => "Body measurements",
            Step::Injuries => "Injuries",
            Step::Experience => "Training experience",
            Step::Goal => "Goal",
            Step::Schedule => "Schedule",
            Step::Preferences => "Preferences",
            Step::Review => "Review",
        }
    }

    fn next(&self) -> Option<Step> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(&self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Walks the questionnaire one step at a time. Moving forward validates the
/// current step; moving back never does.
#[derive(Debug, Clone)]
pub struct QuestionnaireWizard {
    answers: Questionnaire,
    step: Step,
    today: NaiveDate,
}

impl Default for QuestionnaireWizard {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl QuestionnaireWizard {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            answers: Questionnaire::default(),
            step: Step::Personal,
            today,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &Questionnaire {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut Questionnaire {
        &mut self.answers
    }

    pub fn into_answers(self) -> Questionnaire {
        self.answers
    }

    pub fn is_first(&self) -> bool {
        self.step.previous().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.step.next().is_none()
    }

    /// (current step number, step count), 1-based
    pub fn progress(&self) -> (usize, usize) {
        (self.step.index() + 1, Step::ALL.len())
    }

    /// Validate the current step and advance. On the last step this only
    /// validates; the wizard stays on it.
    pub fn next(&mut self) -> Result<Step, ValidationError> {
        self.answers.validate_step(self.step, self.today)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{TrainingGoal, Weekday};

    fn wizard() -> QuestionnaireWizard {
        QuestionnaireWizard::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_next_refuses_invalid_step() {
        let mut wizard = wizard();
        assert_eq!(wizard.next(), Ok(Step::Body));

        wizard.answers_mut().weight = "abc".to_string();
        assert_eq!(wizard.next(), Err(ValidationError::InvalidWeight));
        assert_eq!(wizard.step(), Step::Body);

        wizard.answers_mut().weight = "70".to_string();
        assert_eq!(wizard.next(), Ok(Step::Injuries));
    }

    #[test]
    fn test_back_skips_validation() {
        let mut wizard = wizard();
        assert!(wizard.is_first());
        assert_eq!(wizard.back(), Step::Personal);

        wizard.next().unwrap();
        wizard.answers_mut().weight = "abc".to_string();
        assert_eq!(wizard.back(), Step::Personal);
    }

    #[test]
    fn test_walk_to_review() {
        let mut wizard = wizard();
        wizard.answers_mut().goal = Some(TrainingGoal::Endurance);
        wizard.answers_mut().toggle_day(Weekday::Wed);

        while !wizard.is_last() {
            wizard.next().unwrap();
        }

        assert_eq!(wizard.step(), Step::Review);
        assert_eq!(wizard.progress(), (8, 8));
        assert_eq!(wizard.next(), Ok(Step::Review));
    }

    #[test]
    fn test_schedule_requires_a_day() {
        let mut wizard = wizard();
        wizard.answers_mut().goal = Some(TrainingGoal::Hypertrophy);
        for _ in 0..5 {
            wizard.next().unwrap();
        }

        assert_eq!(wizard.step(), Step::Schedule);
        assert_eq!(wizard.next(), Err(ValidationError::NoTrainingDays));
    }
}
