use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Input, Password};

use super::common::{connect, failure, print_success, report, spinner};
use super::forms::{validate_email, PasswordResetForm};
use crate::config::Config;

#[derive(Args)]
pub struct ForgotPasswordCommand {
    /// Email address of the account (prompted when omitted)
    #[arg(short, long)]
    email: Option<String>,
}

impl ForgotPasswordCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        println!("FORCA - Password recovery");
        println!();

        let email: String = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        report(validate_email(&email).map_err(anyhow::Error::from))?;

        let auth = connect(config)?;
        let pb = spinner("Sending recovery email...");
        let result = auth.reset_password(email.trim()).await;
        pb.finish_and_clear();

        report(result.context("Could not send recovery email"))?;

        print_success(format!("Recovery email sent to {}", email.trim()));
        println!();
        println!("Follow the link in the email, then run:");
        println!("  forca reset-password --token <token from the link>");
        Ok(())
    }
}

#[derive(Args)]
pub struct ResetPasswordCommand {
    /// Recovery token from the password reset email. Without it the
    /// password of the signed-in account is changed.
    #[arg(long)]
    token: Option<String>,
}

impl ResetPasswordCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        println!("FORCA - Reset password");
        println!();

        if self.token.is_none() && !config.is_authenticated() {
            return Err(failure(
                "You are not logged in. Pass --token from the recovery email.",
            ));
        }

        let form = PasswordResetForm {
            password: Password::new()
                .with_prompt("New password")
                .allow_empty_password(true)
                .interact()?,
            confirmation: Password::new()
                .with_prompt("Confirm new password")
                .allow_empty_password(true)
                .interact()?,
        };

        report(form.validate().map_err(anyhow::Error::from))?;

        let auth = connect(config)?;
        let pb = spinner("Updating password...");
        let result = auth
            .update_password(&form.password, self.token.as_deref())
            .await;
        pb.finish_and_clear();

        let user = report(result.context("Could not update password"))?;
        print_success(format!("Password updated for {}", user.handle()));
        Ok(())
    }
}
