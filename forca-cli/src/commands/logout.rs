use anyhow::{Context, Result};
use clap::Args;

use super::common::{connect, print_success};
use crate::config::Config;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        if !config.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        let auth = connect(config)?;

        auth.sign_out()
            .await
            .context("Failed to clear the stored session")?;

        print_success("Logged out successfully!");

        Ok(())
    }
}
