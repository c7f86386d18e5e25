use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use super::common::{connect, failure, or_dash, print_success, report, signed_in, spinner};
use crate::config::Config;
use crate::models::UserProfile;
use crate::services::{CheckResult, DiagnosticsService, ProfileService};
use crate::session::AuthState;

pub async fn show_account(config: Config) -> Result<()> {
    let (auth, user) = signed_in(config).await?;
    let profiles = ProfileService::new(auth.client().clone());

    let pb = spinner("Loading profile...");
    let result = profiles.get_profile(user.id).await;
    pb.finish_and_clear();
    let profile = report(result)?;

    println!("{}", "Account".bold());
    println!();
    println!("  Email:     {}", user.email.as_deref().unwrap_or("-"));
    println!(
        "  Username:  {}",
        user.username.as_deref().unwrap_or("Not set")
    );
    println!("  Password:  ••••••••  (change with 'forca reset-password')");

    match profile {
        Some(profile) => print_profile(&profile),
        None => {
            println!();
            println!("No training profile yet. Run 'forca questionnaire' to create one.");
        }
    }

    println!();
    println!("Sign out with 'forca logout'.");

    Ok(())
}

fn print_profile(profile: &UserProfile) {
    let today = Local::now().date_naive();

    println!();
    println!("{}", "Profile".bold());
    println!();
    println!("  Name:      {}", profile.display_name().unwrap_or("-"));
    println!("  Age:       {}", or_dash(profile.age_on(today)));
    println!(
        "  Weight:    {}",
        or_dash(profile.weight_kg.map(|w| format!("{:.1} kg", w)))
    );
    println!(
        "  Height:    {}",
        or_dash(profile.height_cm.map(|h| format!("{} cm", h)))
    );
    println!("  Level:     {}", profile.level.as_deref().unwrap_or("-"));

    if !profile.goals.is_empty() {
        let goals: Vec<&str> = profile.goals.iter().map(|g| g.name.as_str()).collect();
        println!("  Goals:     {}", goals.join(", "));
    }
    if !profile.injuries.is_empty() {
        let regions: Vec<&str> = profile.injuries.iter().map(|i| i.region.as_str()).collect();
        println!("  Injuries:  {}", regions.join(", "));
    }
}

fn print_check(check: &CheckResult) {
    let mark = if check.passed { "✓".green() } else { "✗".red() };
    println!("  {} {:<22} {}", mark, check.name, check.message);
}

/// Run the connection diagnostic. Works signed out; the profile check is
/// added when a session can be restored.
pub async fn check_connection(config: Config) -> Result<()> {
    let user_id = if config.is_authenticated() && config.has_backend() {
        match connect(config.clone())?.restore().await {
            AuthState::SignedIn(user) => Some(user.id),
            _ => None,
        }
    } else {
        None
    };

    let pb = spinner("Checking connection...");
    let report = DiagnosticsService::new(config).run(user_id).await;
    pb.finish_and_clear();

    println!("{}", "Connection diagnostic".bold());
    println!();

    print_check(&report.configuration);
    if let Some(connection) = &report.connection {
        print_check(connection);
    }
    if !report.tables.is_empty() {
        println!();
        println!("  Tables");
        for table in &report.tables {
            print_check(table);
        }
    }
    if let Some(profile) = &report.profile {
        println!();
        print_check(profile);
    }

    println!();
    if report.success() {
        print_success("Everything looks good.");
        Ok(())
    } else {
        Err(failure("Some checks failed."))
    }
}
