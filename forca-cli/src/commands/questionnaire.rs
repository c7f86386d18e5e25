use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use super::common::{
    print_error, print_success, report, require_terminal, signed_in, spinner,
};
use crate::api::{PlanClient, PlanResponse};
use crate::config::Config;
use crate::questionnaire::{
    BirthDate, ExperienceLevel, Gender, Injury, PlanRequest, Questionnaire, QuestionnaireWizard,
    SessionLength, Step, TrainingGoal, Weekday, MAX_TRAINING_YEARS,
};
use crate::services::ProfileService;

#[derive(Args)]
pub struct QuestionnaireCommand {
    /// Print the request that would be sent instead of submitting it
    #[arg(long)]
    dry_run: bool,
}

enum ReviewChoice {
    Submit,
    Back,
    Cancel,
}

impl QuestionnaireCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        require_terminal("The questionnaire")?;
        let (auth, user) = signed_in(config).await?;

        println!("{}", "FORCA - Training questionnaire".bold());
        println!("Answer a few questions so we can build your plan.");

        let mut wizard = QuestionnaireWizard::default();

        loop {
            let (current, total) = wizard.progress();
            println!();
            println!(
                "{} {}",
                format!("[{}/{}]", current, total).dimmed(),
                wizard.step().title().bold()
            );

            let on_review = wizard.step() == Step::Review;
            if on_review {
                print_review(wizard.answers());
                match review_choice()? {
                    ReviewChoice::Submit => {}
                    ReviewChoice::Back => {
                        wizard.back();
                        continue;
                    }
                    ReviewChoice::Cancel => {
                        println!("Questionnaire cancelled; nothing was saved.");
                        return Ok(());
                    }
                }
            } else {
                ask_step(wizard.step(), wizard.answers_mut())?;
            }

            match wizard.next() {
                Ok(_) if on_review => break,
                Ok(_) => {}
                Err(e) => print_error(e),
            }
        }

        let answers = wizard.into_answers();

        if self.dry_run {
            let request = PlanRequest::new(user.id, &answers);
            println!("{}", serde_json::to_string_pretty(&request)?);
            return Ok(());
        }

        let client = auth.client().clone();
        let plans = PlanClient::new(&client.config().api)?;
        let token = client.access_token();
        let profiles = ProfileService::new(client);

        let pb = spinner("Saving your answers and generating your plan...");
        let result = profiles
            .submit_questionnaire(user.id, &answers, &plans, token.as_deref())
            .await;
        pb.finish_and_clear();

        let plan = report(result)?;
        print_success("Questionnaire submitted!");
        print_plan(&plan);

        Ok(())
    }
}

fn ask_step(step: Step, answers: &mut Questionnaire) -> Result<()> {
    match step {
        Step::Personal => ask_personal(answers),
        Step::Body => ask_body(answers),
        Step::Injuries => ask_injuries(answers),
        Step::Experience => ask_experience(answers),
        Step::Goal => ask_goal(answers),
        Step::Schedule => ask_schedule(answers),
        Step::Preferences => ask_preferences(answers),
        Step::Review => Ok(()),
    }
}

fn ask_personal(answers: &mut Questionnaire) -> Result<()> {
    answers.name = Input::new()
        .with_prompt("Name (optional)")
        .with_initial_text(answers.name.clone())
        .allow_empty(true)
        .interact_text()?;

    let mut labels: Vec<&str> = Gender::ALL.iter().map(Gender::label).collect();
    labels.push("Prefer not to say");
    let current = answers
        .gender
        .and_then(|g| Gender::ALL.iter().position(|o| *o == g))
        .unwrap_or(Gender::ALL.len());
    let choice = Select::new()
        .with_prompt("Gender")
        .items(&labels)
        .default(current)
        .interact()?;
    answers.gender = Gender::ALL.get(choice).copied();

    let birth = answers.birth_date;
    answers.birth_date = BirthDate {
        day: Input::new()
            .with_prompt("Birth day")
            .default(birth.day)
            .interact_text()?,
        month: Input::new()
            .with_prompt("Birth month")
            .default(birth.month)
            .interact_text()?,
        year: Input::new()
            .with_prompt("Birth year")
            .default(birth.year)
            .interact_text()?,
    };

    Ok(())
}

fn ask_body(answers: &mut Questionnaire) -> Result<()> {
    answers.weight = Input::new()
        .with_prompt("Weight in kg (optional)")
        .with_initial_text(answers.weight.clone())
        .allow_empty(true)
        .interact_text()?;
    answers.height = Input::new()
        .with_prompt("Height in cm (optional)")
        .with_initial_text(answers.height.clone())
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn ask_injuries(answers: &mut Questionnaire) -> Result<()> {
    answers.has_injuries = Confirm::new()
        .with_prompt("Do you have any injuries?")
        .default(answers.has_injuries)
        .interact()?;

    if !answers.has_injuries {
        return Ok(());
    }

    let labels: Vec<&str> = Injury::ALL.iter().map(Injury::label).collect();
    let checked: Vec<bool> = Injury::ALL
        .iter()
        .map(|i| answers.injuries.contains(i))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Which ones? (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;
    answers.injuries = picked.into_iter().map(|i| Injury::ALL[i]).collect();

    answers.injury_description = Input::new()
        .with_prompt("Describe them (optional)")
        .with_initial_text(answers.injury_description.clone())
        .allow_empty(true)
        .interact_text()?;

    Ok(())
}

fn ask_experience(answers: &mut Questionnaire) -> Result<()> {
    let labels: Vec<&str> = ExperienceLevel::ALL
        .iter()
        .map(ExperienceLevel::label)
        .collect();
    let current = ExperienceLevel::ALL
        .iter()
        .position(|l| *l == answers.experience)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Training experience")
        .items(&labels)
        .default(current)
        .interact()?;
    answers.experience = ExperienceLevel::ALL[choice];

    answers.training_years = Input::new()
        .with_prompt(format!("Years of training (0-{})", MAX_TRAINING_YEARS))
        .default(answers.training_years)
        .interact_text()?;

    Ok(())
}

fn ask_goal(answers: &mut Questionnaire) -> Result<()> {
    let labels: Vec<&str> = TrainingGoal::ALL.iter().map(TrainingGoal::label).collect();
    let current = answers
        .goal
        .and_then(|g| TrainingGoal::ALL.iter().position(|o| *o == g))
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Main goal")
        .items(&labels)
        .default(current)
        .interact()?;
    answers.goal = TrainingGoal::ALL.get(choice).copied();
    Ok(())
}

fn ask_schedule(answers: &mut Questionnaire) -> Result<()> {
    let labels: Vec<&str> = Weekday::ALL.iter().map(Weekday::label).collect();
    let checked: Vec<bool> = Weekday::ALL
        .iter()
        .map(|d| answers.training_days.contains(d))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Training days (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;
    answers.training_days = picked.into_iter().map(|i| Weekday::ALL[i]).collect();

    let lengths: Vec<String> = SessionLength::ALL.iter().map(|l| l.to_string()).collect();
    let current = SessionLength::ALL
        .iter()
        .position(|l| *l == answers.session_length)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Time per session")
        .items(&lengths)
        .default(current)
        .interact()?;
    answers.session_length = SessionLength::ALL[choice];

    Ok(())
}

fn ask_preferences(answers: &mut Questionnaire) -> Result<()> {
    answers.wants_cardio = Confirm::new()
        .with_prompt("Include cardio?")
        .default(answers.wants_cardio)
        .interact()?;
    answers.wants_stretching = Confirm::new()
        .with_prompt("Include stretching?")
        .default(answers.wants_stretching)
        .interact()?;
    Ok(())
}

fn review_choice() -> Result<ReviewChoice> {
    let choice = Select::new()
        .with_prompt("Submit your answers?")
        .items(&["Submit", "Go back", "Cancel"])
        .default(0)
        .interact()
        .context("Failed to read choice")?;

    Ok(match choice {
        0 => ReviewChoice::Submit,
        1 => ReviewChoice::Back,
        _ => ReviewChoice::Cancel,
    })
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_review(answers: &Questionnaire) {
    let blank = |s: &str| if s.trim().is_empty() { "-".to_string() } else { s.trim().to_string() };

    println!("  Name:          {}", blank(&answers.name));
    println!(
        "  Gender:        {}",
        answers.gender.map(|g| g.label()).unwrap_or("-")
    );
    println!("  Birth date:    {}", answers.birth_date);
    println!("  Weight:        {}", blank(&answers.weight));
    println!("  Height:        {}", blank(&answers.height));

    let injuries: Vec<&str> = answers
        .active_injuries()
        .iter()
        .map(Injury::label)
        .collect();
    println!(
        "  Injuries:      {}",
        if injuries.is_empty() {
            "none".to_string()
        } else {
            injuries.join(", ")
        }
    );
    println!("  Experience:    {}", answers.experience.label());
    println!("  Years:         {}", answers.training_years);
    println!(
        "  Goal:          {}",
        answers.goal.map(|g| g.label()).unwrap_or("-")
    );

    let days: Vec<&str> = answers.training_days.iter().map(Weekday::short).collect();
    println!("  Days:          {}", days.join(" "));
    println!("  Session:       {}", answers.session_length);
    println!("  Cardio:        {}", yes_no(answers.wants_cardio));
    println!("  Stretching:    {}", yes_no(answers.wants_stretching));
    println!();
}

fn print_plan(plan: &PlanResponse) {
    println!();
    if let Some(message) = &plan.message {
        println!("{}", message);
    }

    if let Some(summary) = &plan.summary {
        if let Some(outline) = &summary.plan {
            println!();
            println!("{}", "Plan".bold());
            println!("  Cycles:    {}", outline.cycles);
            println!("  Weeks:     {}", outline.weeks);
            println!("  Sessions:  {} per week", outline.frequency);
        }
        if let Some(adaptations) = &summary.adaptations {
            println!();
            println!("{}", "Adaptations".bold());
            println!("  By mood:            {}", adaptations.mood);
            println!("  By available time:  {}", adaptations.available_time);
            println!("  Total:              {}", adaptations.total);
        }
    }

    let paths = plan.paths();
    if !paths.is_empty() {
        println!();
        println!("{}", "Files".bold());
        for path in paths {
            println!("  {}", path);
        }
    }
    if let Some(dir) = &plan.results_dir {
        println!();
        println!("Results saved in {}", dir);
    }
}
