mod common;
mod config_cmd;
mod dashboard;
pub mod forms;
mod login;
mod logout;
mod password;
mod questionnaire;
mod register;
mod settings;
mod sleep;
mod stats;
mod training;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Config;

pub use common::{already_reported, Reported};
pub use dashboard::DashboardCommand;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use password::{ForgotPasswordCommand, ResetPasswordCommand};
pub use questionnaire::QuestionnaireCommand;
pub use register::RegisterCommand;
pub use sleep::{LogSleepCommand, ShowSleepCommand};
pub use stats::{SetStatsCommand, ShowStatsCommand};
pub use training::{HistoryCommand, LogSessionCommand};
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "forca")]
#[command(about = "Terminal client for the FORCA training app", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FORCA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to FORCA
    Login(LoginCommand),

    /// Create a FORCA account
    Register(RegisterCommand),

    /// Log out from FORCA
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Email a password recovery link
    ForgotPassword(ForgotPasswordCommand),

    /// Set a new password
    ResetPassword(ResetPasswordCommand),

    /// Answer the training questionnaire and generate a plan
    Questionnaire(QuestionnaireCommand),

    /// Launch interactive dashboard
    Dashboard(DashboardCommand),

    /// Show training history
    History(HistoryCommand),

    /// Record training sessions
    #[command(subcommand)]
    Session(SessionSubcommands),

    /// Record and review sleep
    #[command(subcommand)]
    Sleep(SleepSubcommands),

    /// Daily health stats
    #[command(subcommand)]
    Stats(StatsSubcommands),

    /// Browse training plans
    #[command(subcommand)]
    Plans(PlansSubcommands),

    /// Account and connection settings
    #[command(subcommand)]
    Settings(SettingsSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum SessionSubcommands {
    /// Log a training session
    Log(LogSessionCommand),
}

#[derive(Subcommand)]
enum SleepSubcommands {
    /// Record a night of sleep
    Log(LogSleepCommand),

    /// Show recorded sleep
    Show(ShowSleepCommand),
}

#[derive(Subcommand)]
enum StatsSubcommands {
    /// Show the stats of a day
    Show(ShowStatsCommand),

    /// Set the stats of a day
    Set(SetStatsCommand),
}

#[derive(Subcommand)]
enum PlansSubcommands {
    /// List training plans
    List,

    /// Show plan details
    Show {
        /// Plan ID
        id: Uuid,
    },

    /// Show how a session was adapted
    Adaptations {
        /// Training session ID
        session_id: Uuid,
    },
}

#[derive(Subcommand)]
enum SettingsSubcommands {
    /// Show account details
    Account,

    /// Check the connection to the database
    Connection,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let config = Config::load_from(self.config.as_deref())?;
        tracing::debug!("Using configuration at {:?}", config.path()?);

        match self.command {
            Commands::Login(cmd) => cmd.execute(config).await,
            Commands::Register(cmd) => cmd.execute(config).await,
            Commands::Logout(cmd) => cmd.execute(config).await,
            Commands::Whoami(cmd) => cmd.execute(config).await,
            Commands::ForgotPassword(cmd) => cmd.execute(config).await,
            Commands::ResetPassword(cmd) => cmd.execute(config).await,
            Commands::Questionnaire(cmd) => cmd.execute(config).await,
            Commands::Dashboard(cmd) => cmd.execute(config).await,
            Commands::History(cmd) => cmd.execute(config).await,
            Commands::Session(subcmd) => match subcmd {
                SessionSubcommands::Log(cmd) => cmd.execute(config).await,
            },
            Commands::Sleep(subcmd) => match subcmd {
                SleepSubcommands::Log(cmd) => cmd.execute(config).await,
                SleepSubcommands::Show(cmd) => cmd.execute(config).await,
            },
            Commands::Stats(subcmd) => match subcmd {
                StatsSubcommands::Show(cmd) => cmd.execute(config).await,
                StatsSubcommands::Set(cmd) => cmd.execute(config).await,
            },
            Commands::Plans(subcmd) => match subcmd {
                PlansSubcommands::List => training::list_plans(config).await,
                PlansSubcommands::Show { id } => training::show_plan(config, id).await,
                PlansSubcommands::Adaptations { session_id } => {
                    training::list_adaptations(config, session_id).await
                }
            },
            Commands::Settings(subcmd) => match subcmd {
                SettingsSubcommands::Account => settings::show_account(config).await,
                SettingsSubcommands::Connection => settings::check_connection(config).await,
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(config).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(config, force).await,
                ConfigSubcommands::Path => config_cmd::config_path(config).await,
            },
            Commands::Completions { .. } => Ok(()),
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
