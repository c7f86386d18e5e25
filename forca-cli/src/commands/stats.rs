use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use colored::Colorize;

use super::common::{
    failure, format_date, or_dash, print_success, report, signed_in, spinner,
};
use crate::config::Config;
use crate::models::StatsUpdate;
use crate::services::HealthService;

#[derive(Args)]
pub struct ShowStatsCommand {
    /// Day to show (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl ShowStatsCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let (auth, user) = signed_in(config).await?;
        let client = auth.client().clone();
        let config = client.config();
        let health = HealthService::new(client);

        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        let pb = spinner("Loading stats...");
        let result = health.stats_for(user.id, date).await;
        pb.finish_and_clear();

        println!("{} {}", "Health Stats".bold(), format_date(date, &config));
        println!();

        let Some(stats) = report(result)? else {
            println!("No stats recorded for this day.");
            return Ok(());
        };

        println!("  Heart rate:  {} bpm", or_dash(stats.heart_rate_bpm));
        println!("  Calories:    {} kcal", or_dash(stats.calories_burned));
        println!("  Streak:      {} days", or_dash(stats.streak_days));
        println!(
            "  Sleep:       {} h",
            or_dash(stats.sleep_hours.map(|h| format!("{:.1}", h)))
        );

        Ok(())
    }
}

#[derive(Args)]
pub struct SetStatsCommand {
    /// Day to update (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Resting heart rate in bpm
    #[arg(long)]
    heart_rate: Option<u32>,

    /// Calories burned
    #[arg(long)]
    calories: Option<u32>,

    /// Current training streak in days
    #[arg(long)]
    streak: Option<u32>,

    /// Hours slept
    #[arg(long)]
    sleep_hours: Option<f64>,
}

impl SetStatsCommand {
    fn update(&self) -> StatsUpdate {
        StatsUpdate {
            heart_rate_bpm: self.heart_rate,
            calories_burned: self.calories,
            streak_days: self.streak,
            sleep_hours: self.sleep_hours,
        }
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        let update = self.update();
        if update.is_empty() {
            return Err(failure(
                "Nothing to update; pass at least one of --heart-rate, --calories, --streak or --sleep-hours",
            ));
        }
        if let Some(hours) = update.sleep_hours {
            if !(0.0..=24.0).contains(&hours) {
                return Err(failure("Sleep hours must be between 0 and 24"));
            }
        }

        let (auth, user) = signed_in(config).await?;
        let health = HealthService::new(auth.client().clone());
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        let pb = spinner("Saving stats...");
        let result = health.upsert_stats(user.id, date, &update).await;
        pb.finish_and_clear();

        let saved = report(result)?;
        print_success(format!("Stats saved for {}", saved.date));

        Ok(())
    }
}
