use anyhow::{bail, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use colored::Colorize;

use super::common::{
    failure, format_date, or_dash, print_success, report, signed_in, spinner,
};
use crate::config::Config;
use crate::dashboard::{mean_sleep_hours, week_start};
use crate::models::{NewSleepRecord, SleepRecord};
use crate::services::HealthService;

const HOURS_PER_DAY: f64 = 24.0;

/// Reject nights that cannot be real
fn check_night(deep: f64, rem: f64, light: f64, quality: Option<f64>) -> Result<()> {
    if [deep, rem, light].iter().any(|h| !h.is_finite() || *h < 0.0) {
        bail!("Sleep hours must be zero or more");
    }
    if deep + rem + light > HOURS_PER_DAY {
        bail!("A night cannot last more than 24 hours");
    }
    if let Some(q) = quality {
        if !(0.0..=100.0).contains(&q) {
            bail!("Quality must be between 0 and 100");
        }
    }
    Ok(())
}

#[derive(Args)]
pub struct LogSleepCommand {
    /// Night being recorded (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Hours of deep sleep
    #[arg(long)]
    deep: f64,

    /// Hours of REM sleep
    #[arg(long)]
    rem: f64,

    /// Hours of light sleep
    #[arg(long)]
    light: f64,

    /// Quality score reported by a tracker (0-100)
    #[arg(short, long)]
    quality: Option<f64>,
}

impl LogSleepCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        report(check_night(self.deep, self.rem, self.light, self.quality))?;

        let (auth, user) = signed_in(config).await?;
        let health = HealthService::new(auth.client().clone());

        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut record = NewSleepRecord::new(user.id, date, self.deep, self.rem, self.light);
        record.quality_score = self.quality;

        let pb = spinner("Saving sleep...");
        let result = health.record_sleep(&record).await;
        pb.finish_and_clear();

        let saved = report(result)?;
        print_success(format!(
            "Recorded {:.1}h of sleep on {}",
            saved.total_hours(),
            saved.date
        ));
        if let Some(quality) = saved.quality_percentage() {
            println!("  Quality: {}%", quality);
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct ShowSleepCommand {
    /// First night to show (YYYY-MM-DD, defaults to this week's Monday)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last night to show (YYYY-MM-DD, defaults to six days after --from)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl ShowSleepCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let from = self
            .from
            .unwrap_or_else(|| week_start(Local::now().date_naive()));
        let to = self.to.unwrap_or(from + Duration::days(6));
        if to < from {
            return Err(failure("--to must not be before --from"));
        }

        let (auth, _) = signed_in(config).await?;
        let client = auth.client().clone();
        let config = client.config();
        let health = HealthService::new(client);

        let pb = spinner("Loading sleep...");
        let result = health.sleep_between(from, to).await;
        pb.finish_and_clear();

        let records = report(result)?;

        println!(
            "{} {} to {}",
            "Sleep".bold(),
            format_date(from, &config),
            format_date(to, &config)
        );
        println!();

        if records.is_empty() {
            println!("No sleep recorded in this period.");
            return Ok(());
        }

        println!(
            "{:<12} {:>6} {:>6} {:>6} {:>7} {:>8}",
            "Date", "Deep", "REM", "Light", "Total", "Quality"
        );
        println!("{}", "─".repeat(50));
        for record in &records {
            println!(
                "{:<12} {:>6.1} {:>6.1} {:>6.1} {:>7.1} {:>8}",
                format_date(record.date, &config),
                record.deep_sleep_hours,
                record.rem_sleep_hours,
                record.light_sleep_hours,
                record.total_hours(),
                or_dash(record.quality_percentage().map(|q| format!("{}%", q))),
            );
        }

        if let Some(avg) = mean_sleep_hours(records.iter().map(SleepRecord::total_hours)) {
            println!();
            println!("Average: {:.1}h per night", avg);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use uuid::Uuid;

    fn night(total: f64) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            deep_sleep_hours: 0.0,
            rem_sleep_hours: 0.0,
            light_sleep_hours: 0.0,
            total_sleep_hours: Some(total),
            quality_score: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_check_night() {
        assert!(check_night(1.5, 2.0, 4.0, Some(80.0)).is_ok());
        assert!(check_night(-1.0, 2.0, 4.0, None).is_err());
        assert!(check_night(10.0, 10.0, 5.0, None).is_err());
        assert!(check_night(1.0, 1.0, 1.0, Some(120.0)).is_err());
    }

    #[test]
    fn test_listing_average_uses_record_totals() {
        let records = [night(7.0), night(0.0), night(8.25)];
        let avg = mean_sleep_hours(records.iter().map(SleepRecord::total_hours));
        assert_eq!(avg, Some(7.6));
    }
}
