use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Password};

use super::common::{connect, print_success, report, spinner};
use super::forms::validate_email;
use crate::config::Config;

#[derive(Args)]
pub struct LoginCommand {
    /// Email address (prompted when omitted)
    #[arg(short, long)]
    email: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        println!("FORCA - Login");
        println!();

        let email: String = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        report(validate_email(&email).map_err(anyhow::Error::from))?;

        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        let auth = connect(config)?;
        let pb = spinner(format!("Logging in as {}...", email.trim()));
        let result = auth.sign_in(email.trim(), &password).await;
        pb.finish_and_clear();

        let user = report(result.context("Login failed"))?;

        print_success("Login successful!");
        println!();
        println!("Welcome, {}!", user.handle());
        if let Some(email) = &user.email {
            println!("Email: {}", email);
        }
        println!();
        println!("Run 'forca dashboard' to see your week.");

        Ok(())
    }
}
