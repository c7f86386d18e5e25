use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

use super::{BackendClient, BackendError, PreparedRequest};

const REST_PATH: &str = "/rest/v1";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

/// Request against one table, built up filter by filter
#[derive(Clone)]
pub struct TableQuery<'a> {
    client: &'a BackendClient,
    table: String,
    params: Vec<(String, String)>,
}

impl BackendClient {
    /// Start a request against `table`
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: table.to_string(),
            params: Vec::new(),
        }
    }
}

impl<'a> TableQuery<'a> {
    /// Columns to return (`*` for all)
    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(k, _)| k != "select");
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.params
            .push((column.to_string(), format!("{}.{}", op, value)));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.params.retain(|(k, _)| k != "limit");
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Path of the table endpoint
    pub fn path(&self) -> String {
        format!("{}/{}", REST_PATH, self.table)
    }

    /// Query-string parameters accumulated so far
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn request(&self, method: Method) -> PreparedRequest {
        PreparedRequest::new(method, self.path()).query(self.params.clone())
    }

    /// All matching rows
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let response = self.client.send(self.request(Method::GET)).await?;
        BackendClient::decode(response).await
    }

    /// Exactly one row; zero or several rows is an error
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let request = self
            .request(Method::GET)
            .header("Accept", SINGLE_OBJECT);
        let response = self.client.send(request).await?;
        BackendClient::decode(response).await
    }

    /// Zero or one row
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        match self.single::<T>().await {
            Ok(row) => Ok(Some(row)),
            Err(e) if e.is_no_rows() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert one row (or an array of rows) and return what was stored
    pub async fn insert<B, T>(self, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(serde_json::to_value(body)?);
        let response = self.client.send(request).await?;
        BackendClient::decode(response).await
    }

    /// Update the rows matched by the filters and return them
    pub async fn update<B, T>(self, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(serde_json::to_value(body)?);
        let response = self.client.send(request).await?;
        BackendClient::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;

    fn client() -> BackendClient {
        let mut config = Config::default();
        config.backend.url = "https://project.supabase.co".to_string();
        config.backend.anon_key = "anon-key".to_string();
        BackendClient::new(config).unwrap()
    }

    #[test]
    fn test_query_params() {
        let client = client();
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let query = client
            .from("sleep_data")
            .select("*")
            .gte("date", start)
            .lte("date", end)
            .order("date", Order::Ascending);

        assert_eq!(query.path(), "/rest/v1/sleep_data");
        let params: Vec<(&str, &str)> = query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("select", "*"),
                ("date", "gte.2024-03-04"),
                ("date", "lte.2024-03-10"),
                ("order", "date.asc"),
            ]
        );
    }

    #[test]
    fn test_select_and_limit_replace_previous_values() {
        let client = client();
        let query = client
            .from("user_profiles")
            .select("*")
            .select("id")
            .limit(5)
            .limit(1);

        let selects: Vec<_> = query.params().iter().filter(|(k, _)| k == "select").collect();
        assert_eq!(selects.len(), 1);
        assert_eq!(selects[0].1, "id");
        assert!(query.params().contains(&("limit".to_string(), "1".to_string())));
    }
}
