use serde_json::Value;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::config::Config;

/// Tables the client reads and writes
pub const REQUIRED_TABLES: [&str; 6] = [
    "user_profiles",
    "sleep_data",
    "training_sessions",
    "training_adaptations",
    "training_plans",
    "user_stats",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub configuration: CheckResult,
    /// Skipped (`None`) when the configuration is incomplete
    pub connection: Option<CheckResult>,
    pub tables: Vec<CheckResult>,
    /// Only checked for a signed-in user; informational
    pub profile: Option<CheckResult>,
}

impl DiagnosticReport {
    /// Configuration, connection and every table must pass. The profile
    /// check does not count.
    pub fn success(&self) -> bool {
        self.configuration.passed
            && self.connection.as_ref().is_some_and(|c| c.passed)
            && !self.tables.is_empty()
            && self.tables.iter().all(|t| t.passed)
    }
}

/// Checks that the managed database is reachable and set up for this client
pub struct DiagnosticsService {
    config: Config,
}

impl DiagnosticsService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn check_configuration(&self) -> CheckResult {
        let has_url = !self.config.backend.url.trim().is_empty();
        let has_key = !self.config.backend.anon_key.trim().is_empty();

        match (has_url, has_key) {
            (true, true) => CheckResult::pass("configuration", "Service URL and public key are set"),
            (false, true) => CheckResult::fail("configuration", "Service URL is missing"),
            (true, false) => CheckResult::fail("configuration", "Public key is missing"),
            (false, false) => {
                CheckResult::fail("configuration", "Service URL and public key are missing")
            }
        }
    }

    async fn check_connection(client: &BackendClient) -> CheckResult {
        let result: Result<Vec<Value>, _> = client
            .from("user_profiles")
            .select("id")
            .limit(1)
            .fetch()
            .await;

        match result {
            Ok(_) => CheckResult::pass("connection", "Connected to the database"),
            Err(e) => CheckResult::fail("connection", format!("Could not connect: {}", e)),
        }
    }

    async fn check_table(client: &BackendClient, table: &str) -> CheckResult {
        let result: Result<Vec<Value>, _> =
            client.from(table).select("*").limit(1).fetch().await;

        match result {
            Ok(_) => CheckResult::pass(table, "Table exists"),
            Err(e) => CheckResult::fail(table, e.to_string()),
        }
    }

    async fn check_profile(client: &BackendClient, user_id: Uuid) -> CheckResult {
        let result: Result<Option<Value>, _> = client
            .from("user_profiles")
            .select("*")
            .eq("id", user_id)
            .maybe_single()
            .await;

        match result {
            Ok(Some(_)) => CheckResult::pass("profile", "Profile found"),
            Ok(None) => CheckResult::fail(
                "profile",
                "No profile yet; complete the questionnaire to create one",
            ),
            Err(e) => CheckResult::fail("profile", format!("Could not load profile: {}", e)),
        }
    }

    /// Run every check. Later checks are skipped once an earlier one makes
    /// them meaningless.
    pub async fn run(&self, user_id: Option<Uuid>) -> DiagnosticReport {
        let configuration = self.check_configuration();
        let mut report = DiagnosticReport {
            configuration,
            connection: None,
            tables: Vec::new(),
            profile: None,
        };

        if !report.configuration.passed {
            return report;
        }

        let client = match BackendClient::new(self.config.clone()) {
            Ok(client) => client,
            Err(e) => {
                report.connection = Some(CheckResult::fail("connection", e.to_string()));
                return report;
            }
        };

        let connection = Self::check_connection(&client).await;
        let connected = connection.passed;
        report.connection = Some(connection);
        if !connected {
            return report;
        }

        for table in REQUIRED_TABLES {
            let result = Self::check_table(&client, table).await;
            tracing::debug!("Table {}: {}", table, result.message);
            report.tables.push(result);
        }

        if let Some(user_id) = user_id {
            report.profile = Some(Self::check_profile(&client, user_id).await);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_incomplete_configuration_stops_early() {
        let mut config = Config::default();
        config.backend.url = "https://project.supabase.co".to_string();

        let report = DiagnosticsService::new(config).run(None).await;

        assert!(!report.success());
        assert_eq!(report.configuration.message, "Public key is missing");
        assert!(report.connection.is_none());
        assert!(report.tables.is_empty());
    }

    #[test]
    fn test_missing_profile_does_not_fail_report() {
        let report = DiagnosticReport {
            configuration: CheckResult::pass("configuration", "ok"),
            connection: Some(CheckResult::pass("connection", "ok")),
            tables: REQUIRED_TABLES
                .iter()
                .map(|t| CheckResult::pass(*t, "ok"))
                .collect(),
            profile: Some(CheckResult::fail("profile", "missing")),
        };
        assert!(report.success());
    }
}
