use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Password};

use super::common::{connect, print_success, report, spinner};
use super::forms::RegistrationForm;
use crate::backend::SignUpOutcome;
use crate::config::Config;

#[derive(Args)]
pub struct RegisterCommand {}

impl RegisterCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        println!("FORCA - Create account");
        println!();

        let form = RegistrationForm {
            username: Input::new()
                .with_prompt("Username")
                .allow_empty(true)
                .interact_text()?,
            email: Input::new()
                .with_prompt("Email")
                .allow_empty(true)
                .interact_text()?,
            password: Password::new()
                .with_prompt("Password")
                .allow_empty_password(true)
                .interact()?,
            confirmation: Password::new()
                .with_prompt("Confirm password")
                .allow_empty_password(true)
                .interact()?,
        };

        report(form.validate().map_err(anyhow::Error::from))?;

        println!();
        let auth = connect(config)?;
        let pb = spinner("Creating account...");
        let result = auth
            .sign_up(form.email.trim(), &form.password, form.username.trim())
            .await;
        pb.finish_and_clear();

        match report(result.context("Registration failed"))? {
            SignUpOutcome::Session(session) => {
                print_success("Account created!");
                println!();
                println!(
                    "Welcome, {}! Run 'forca questionnaire' to set up your training plan.",
                    session.user.username().unwrap_or(form.username.trim())
                );
                Ok(())
            }
            SignUpOutcome::ConfirmationPending(_) => {
                print_success("Account created!");
                println!();
                println!(
                    "Check {} for a confirmation link, then run 'forca login'.",
                    form.email.trim()
                );
                Ok(())
            }
        }
    }
}
