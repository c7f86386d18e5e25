use anyhow::Result;
use chrono::NaiveDate;
use forca_cli::backend::BackendClient;
use forca_cli::config::Config;
use forca_cli::dashboard::{HomeData, LastWorkout};
use forca_cli::models::SessionStatus;
use forca_cli::session::User;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

const USER_ID: &str = "0b6d1f4e-7c55-4a41-9a40-2a2b0c7c2f11";

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn user() -> User {
    User {
        id: Uuid::parse_str(USER_ID).unwrap(),
        email: Some("ana@example.com".to_string()),
        username: Some("ana".to_string()),
    }
}

fn session(day: u32, status: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "date": date(day),
        "status": status
    })
}

fn night(day: u32, deep: f64, rem: f64, light: f64) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "date": date(day),
        "deep_sleep_hours": deep,
        "rem_sleep_hours": rem,
        "light_sleep_hours": light
    })
}

/// Mock server answering the four dashboard queries around Thursday 2024-03-14
async fn home_server() -> ServerGuard {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/rest/v1/user_profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "id": USER_ID, "nome_completo": "Ana Souza" }).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/training_sessions")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("date=gte.2024-03-07".into()),
            Matcher::Regex("date=lte.2024-03-20".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                session(14, "scheduled"),
                session(13, "completed"),
                session(12, "completed"),
                session(10, "scheduled")
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/sleep_data")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("date=gte.2024-03-04".into()),
            Matcher::Regex("date=lte.2024-03-24".into()),
        ]))
        .with_status(200)
        .with_body(json!([night(13, 1.5, 2.0, 4.0), night(13, 2.0, 2.0, 3.0)]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/rest/v1/user_stats")
        .match_query(Matcher::UrlEncoded("user_id".into(), format!("eq.{}", USER_ID)))
        .with_status(200)
        .with_body(
            json!([{
                "id": Uuid::new_v4(),
                "user_id": USER_ID,
                "date": "2024-03-14",
                "heart_rate_bpm": 60,
                "calories_burned": 500
            }])
            .to_string(),
        )
        .create_async()
        .await;

    server
}

async fn fetch(server: &Server, dir: &TempDir) -> Result<HomeData> {
    let mut config = Config::default().with_path(dir.path().join("config.toml"));
    config.backend.url = server.url();
    config.backend.anon_key = "anon-key".to_string();
    config.auth.access_token = "access-token".to_string();

    let client = BackendClient::new(config)?;
    HomeData::fetch(&client, &user(), date(14)).await
}

#[tokio::test]
async fn test_home_data_header_and_cards() -> Result<()> {
    let server = home_server().await;
    let dir = TempDir::new()?;
    let data = fetch(&server, &dir).await?;

    assert_eq!(data.display_name(), "Ana Souza");
    assert_eq!(data.last_workout(), LastWorkout::Yesterday);

    let today = data.health_cards(date(14));
    assert_eq!(today.heart_rate_bpm, Some(60));
    assert_eq!(today.calories, Some(500));
    // completed on the 12th and 13th, today still scheduled
    assert_eq!(today.streak_days, 2);
    assert_eq!(today.sleep_hours, None);

    // the later of two nights on one date wins
    let yesterday = data.health_cards(date(13));
    assert_eq!(yesterday.sleep_hours, Some(7.0));
    assert_eq!(yesterday.heart_rate_bpm, None);

    Ok(())
}

#[tokio::test]
async fn test_home_data_day_strip_and_sleep_week() -> Result<()> {
    let server = home_server().await;
    let dir = TempDir::new()?;
    let data = fetch(&server, &dir).await?;

    let selector = data.day_selector();
    assert_eq!(selector.days().len(), 14);
    assert_eq!(selector.selected().date, date(14));
    assert!(selector.selected().is_today);

    let status_on = |day: u32| {
        selector
            .days()
            .iter()
            .find(|d| d.date == date(day))
            .and_then(|d| d.status)
    };
    assert_eq!(status_on(10), Some(SessionStatus::Missed));
    assert_eq!(status_on(13), Some(SessionStatus::Completed));
    assert_eq!(status_on(14), Some(SessionStatus::Scheduled));
    assert_eq!(status_on(15), None);

    let night = selector
        .days()
        .iter()
        .find(|d| d.date == date(13))
        .and_then(|d| d.sleep_quality);
    assert_eq!(night, Some(57));

    let week = data.sleep_week(date(14));
    assert_eq!(week.start(), date(11));
    assert_eq!(week.days().iter().filter(|d| d.has_data()).count(), 1);
    assert_eq!(week.average_hours(), Some(7.0));

    assert_eq!(data.sessions_on(date(12)).len(), 1);
    assert!(data.covers_week(date(18)));

    Ok(())
}

#[tokio::test]
async fn test_home_data_fails_when_a_query_fails() -> Result<()> {
    let mut server = Server::new_async().await;
    let dir = TempDir::new()?;

    server
        .mock("GET", "/rest/v1/user_profiles")
        .match_query(Matcher::Any)
        .with_status(406)
        .with_body(r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#)
        .create_async()
        .await;
    for table in ["training_sessions", "user_stats"] {
        server
            .mock("GET", format!("/rest/v1/{}", table).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
    }
    server
        .mock("GET", "/rest/v1/sleep_data")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message":"boom"}"#)
        .create_async()
        .await;

    let err = fetch(&server, &dir).await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load sleep data"));

    Ok(())
}
