use anyhow::Result;
use clap::Args;

use super::common::{connect, failure, print_success, spinner};
use crate::config::Config;
use crate::session::AuthState;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        if !config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'forca login' to authenticate.");
            return Ok(());
        }

        let auth = connect(config)?;

        let pb = spinner("Fetching user information...");
        let state = auth.restore().await;
        pb.finish_and_clear();

        match state {
            AuthState::SignedIn(user) => {
                print_success("Authenticated as:");
                println!();
                println!(
                    "  Username: {}",
                    user.username.as_deref().unwrap_or("(not set)")
                );
                println!("  Email:    {}", user.email.as_deref().unwrap_or("-"));
                println!("  User ID:  {}", user.id);

                Ok(())
            }
            _ => {
                let err = failure("Failed to fetch user information");
                println!();
                println!("Your session may have expired.");
                println!("Use 'forca login' to authenticate again.");
                Err(err)
            }
        }
    }
}
