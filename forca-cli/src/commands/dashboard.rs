use anyhow::Result;
use chrono::Local;
use clap::Args;

use super::common::{require_terminal, signed_in, spinner};
use crate::config::Config;
use crate::dashboard::HomeData;
use crate::ui::Dashboard;

#[derive(Args)]
pub struct DashboardCommand {
    /// Open with the sleep explanation panel expanded
    #[arg(long)]
    sleep_info: bool,
}

impl DashboardCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        require_terminal("The dashboard")?;
        let show_sleep_info = self.sleep_info || config.ui.show_sleep_info;
        let (auth, user) = signed_in(config).await?;
        let client = auth.client().clone();

        let pb = spinner("Loading your week...");
        let data = HomeData::fetch(&client, &user, Local::now().date_naive()).await;
        pb.finish_and_clear();

        let mut dashboard = Dashboard::new(client, data?, show_sleep_info)?;
        let result = dashboard.run().await;
        dashboard.cleanup()?;

        result
    }
}
