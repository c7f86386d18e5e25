use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use colored::{ColoredString, Colorize};
use uuid::Uuid;

use super::common::{format_date, or_dash, print_success, report, signed_in, spinner};
use crate::config::Config;
use crate::models::{NewTrainingSession, SessionFilter, SessionStatus, TrainingSession};
use crate::services::TrainingService;

/// Paint `text` in the colour of `status`
fn paint(status: SessionStatus, text: &str) -> ColoredString {
    match status {
        SessionStatus::Completed => text.green(),
        SessionStatus::Partial => text.yellow(),
        SessionStatus::Missed => text.red(),
        SessionStatus::Scheduled => text.blue(),
    }
}

#[derive(Args)]
pub struct HistoryCommand {
    /// Only sessions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only sessions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Filter by status (completed, partial, missed, scheduled)
    #[arg(short, long)]
    status: Option<SessionStatus>,

    /// Number of sessions to show
    #[arg(short, long, default_value = "20")]
    limit: usize,
}

impl HistoryCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let (auth, _) = signed_in(config).await?;
        let client = auth.client().clone();
        let config = client.config();
        let training = TrainingService::new(client);

        let filter = SessionFilter {
            from: self.from,
            to: self.to,
            status: self.status,
            limit: Some(self.limit),
        };

        let pb = spinner("Loading training history...");
        let result = training.list_sessions(&filter).await;
        pb.finish_and_clear();

        let sessions = report(result)?;

        println!("{}", "Training History".bold());
        println!();

        if sessions.is_empty() {
            println!("No training sessions found.");
            return Ok(());
        }

        let today = Local::now().date_naive();
        println!(
            "{:<12} {:<24} {:<10} {:>8} {:>8}",
            "Date", "Session", "Status", "Minutes", "kcal"
        );
        println!("{}", "─".repeat(66));
        for session in &sessions {
            print_session_row(session, today, &config);
        }
        println!();
        println!("{} session(s)", sessions.len());

        Ok(())
    }
}

fn print_session_row(session: &TrainingSession, today: NaiveDate, config: &Config) {
    let status = session.effective_status(today);
    let status = paint(status, &format!("{:<10}", status.label()));
    println!(
        "{:<12} {:<24} {} {:>8} {:>8}",
        format_date(session.date, config),
        truncate(session.title(), 24),
        status,
        or_dash(session.duration_minutes),
        or_dash(session.calories),
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[derive(Args)]
pub struct LogSessionCommand {
    /// Day of the session (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Outcome of the session
    #[arg(short, long, default_value = "completed")]
    status: SessionStatus,

    /// Kind of session, e.g. "Upper body"
    #[arg(short = 't', long = "type")]
    session_type: Option<String>,

    /// Duration in minutes
    #[arg(short, long)]
    duration: Option<u32>,

    /// Calories burned
    #[arg(short, long)]
    calories: Option<u32>,

    /// Free-form notes
    #[arg(short, long)]
    notes: Option<String>,

    /// Plan the session belongs to
    #[arg(long)]
    plan: Option<Uuid>,
}

impl LogSessionCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let (auth, user) = signed_in(config).await?;
        let training = TrainingService::new(auth.client().clone());

        let session = NewTrainingSession {
            user_id: user.id,
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            status: self.status,
            plan_id: self.plan,
            session_type: self.session_type.filter(|t| !t.trim().is_empty()),
            duration_minutes: self.duration,
            calories: self.calories,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        };

        let pb = spinner("Saving session...");
        let result = training.record_session(&session).await;
        pb.finish_and_clear();

        let saved = report(result)?;
        print_success(format!(
            "Logged {} on {} ({})",
            saved.title(),
            saved.date,
            saved.status.label()
        ));
        println!("  ID: {}", saved.id);

        Ok(())
    }
}

pub async fn list_plans(config: Config) -> Result<()> {
    let (auth, _) = signed_in(config).await?;
    let training = TrainingService::new(auth.client().clone());

    let pb = spinner("Loading plans...");
    let result = training.list_plans().await;
    pb.finish_and_clear();

    let plans = report(result)?;

    println!("{}", "Training Plans".bold());
    println!();

    if plans.is_empty() {
        println!("No plans yet. Run 'forca questionnaire' to generate one.");
        return Ok(());
    }

    for plan in &plans {
        println!("{}  {}", plan.id.to_string().dimmed(), plan.display_name().bold());
        println!(
            "    {} weeks, {} sessions/week, status: {}",
            or_dash(plan.duration_weeks),
            or_dash(plan.weekly_frequency),
            plan.status.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

pub async fn show_plan(config: Config, id: Uuid) -> Result<()> {
    let (auth, _) = signed_in(config).await?;
    let training = TrainingService::new(auth.client().clone());

    let pb = spinner("Loading plan...");
    let result = training.get_plan(id).await;
    pb.finish_and_clear();

    let plan = report(result)?;

    println!("{}", plan.display_name().bold());
    println!();
    println!("  ID:          {}", plan.id);
    if let Some(description) = &plan.description {
        println!("  Description: {}", description);
    }
    println!("  Duration:    {} weeks", or_dash(plan.duration_weeks));
    println!("  Frequency:   {} sessions/week", or_dash(plan.weekly_frequency));
    println!("  Status:      {}", plan.status.as_deref().unwrap_or("-"));
    if let Some(created) = plan.created_at {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

pub async fn list_adaptations(config: Config, session_id: Uuid) -> Result<()> {
    let (auth, _) = signed_in(config).await?;
    let training = TrainingService::new(auth.client().clone());

    let pb = spinner("Loading adaptations...");
    let result = training.list_adaptations(session_id).await;
    pb.finish_and_clear();

    let adaptations = report(result)?;

    println!("{} {}", "Adaptations of session".bold(), session_id);
    println!();

    if adaptations.is_empty() {
        println!("This session was not adapted.");
        return Ok(());
    }

    for adaptation in &adaptations {
        println!(
            "  {}  {}",
            adaptation
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            adaptation.reason.as_deref().unwrap_or("No reason given")
        );
        println!(
            "      available: {} min, adjusted to: {} min",
            or_dash(adaptation.available_minutes),
            or_dash(adaptation.adjusted_duration)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Legs", 10), "Legs");
        assert_eq!(truncate("Full body strength", 10), "Full body…");
        assert_eq!(truncate("Full body…", 10).chars().count(), 10);
    }
}
