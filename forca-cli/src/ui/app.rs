use chrono::NaiveDate;
use crossterm::event::KeyCode;

use crate::dashboard::{week_start, DaySelector, HealthCards, HomeData, SleepWeek};
use crate::models::{SleepRecord, TrainingSession};

/// Application state for the TUI dashboard
pub struct App {
    /// Should the application quit?
    pub should_quit: bool,
    /// Show help overlay
    pub show_help: bool,
    /// Show the panel explaining the sleep chart
    pub show_sleep_info: bool,
    /// Message for the status bar (errors from the last refresh)
    pub status: Option<String>,
    data: HomeData,
    selector: DaySelector,
    /// Monday of the week the sleep chart shows
    sleep_week_start: NaiveDate,
    refresh_requested: bool,
}

impl App {
    pub fn new(data: HomeData, show_sleep_info: bool) -> Self {
        let selector = data.day_selector();
        let sleep_week_start = week_start(selector.selected().date);

        Self {
            should_quit: false,
            show_help: false,
            show_sleep_info,
            status: None,
            data,
            selector,
            sleep_week_start,
            refresh_requested: false,
        }
    }

    pub fn data(&self) -> &HomeData {
        &self.data
    }

    pub fn selector(&self) -> &DaySelector {
        &self.selector
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selector.selected().date
    }

    pub fn sleep_week(&self) -> SleepWeek {
        self.data.sleep_week(self.sleep_week_start)
    }

    pub fn health_cards(&self) -> HealthCards {
        self.data.health_cards(self.selected_date())
    }

    pub fn selected_sessions(&self) -> Vec<&TrainingSession> {
        self.data.sessions_on(self.selected_date())
    }

    /// True once after the user asked for fresh data
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Week whose sleep still has to be fetched for the chart
    pub fn pending_sleep_week(&self) -> Option<NaiveDate> {
        (!self.data.covers_week(self.sleep_week_start)).then_some(self.sleep_week_start)
    }

    pub fn load_sleep_week(&mut self, start: NaiveDate, records: Vec<SleepRecord>) {
        let end = start + chrono::Duration::days(6);
        self.data.merge_sleep(start, end, records);
    }

    /// Swap in freshly fetched data, keeping the selected day when it is
    /// still in the window
    pub fn replace_data(&mut self, data: HomeData) {
        let selected = self.selected_date();
        self.selector = data.day_selector();
        if !self.selector.select_date(selected) {
            self.sleep_week_start = week_start(self.selector.selected().date);
        }
        self.data = data;
        self.status = None;
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyCode) {
        // Help overlay takes precedence
        if self.show_help {
            match key {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            KeyCode::Char('?') => {
                self.show_help = true;
            }

            KeyCode::Left | KeyCode::Char('h') => {
                self.selector.move_cursor(false);
            }

            KeyCode::Right | KeyCode::Char('l') => {
                self.selector.move_cursor(true);
            }

            KeyCode::Enter => {
                let date = self.selector.select_cursor().date;
                self.sleep_week_start = week_start(date);
            }

            KeyCode::Char('[') => {
                self.sleep_week_start -= chrono::Duration::days(7);
            }

            KeyCode::Char(']') => {
                self.sleep_week_start += chrono::Duration::days(7);
            }

            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.show_sleep_info = !self.show_sleep_info;
            }

            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh_requested = true;
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use crate::session::User;
    use serde_json::Map;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        // Thursday
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn app() -> App {
        let user = User {
            id: Uuid::nil(),
            email: Some("ana@example.com".to_string()),
            username: None,
        };
        let session = TrainingSession {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            plan_id: None,
            date: today() - chrono::Duration::days(1),
            status: SessionStatus::Completed,
            session_type: Some("Legs".to_string()),
            duration_minutes: Some(50),
            calories: None,
            notes: None,
            created_at: None,
            extra: Map::new(),
        };
        let data = HomeData::from_parts(user, today(), None, vec![session], vec![], vec![]);
        App::new(data, false)
    }

    #[test]
    fn test_cursor_and_selection() {
        let mut app = app();
        assert_eq!(app.selected_date(), today());

        app.handle_key(KeyCode::Left);
        assert_eq!(app.selected_date(), today());

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.selected_date(), today() - chrono::Duration::days(1));
        assert_eq!(app.selected_sessions().len(), 1);
    }

    #[test]
    fn test_sleep_week_navigation() {
        let mut app = app();
        assert_eq!(app.sleep_week().start(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(app.pending_sleep_week(), None);

        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Char('['));
        let earlier = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        assert_eq!(app.pending_sleep_week(), Some(earlier));

        app.load_sleep_week(earlier, vec![]);
        assert_eq!(app.pending_sleep_week(), None);
    }

    #[test]
    fn test_overlays_refresh_and_quit() {
        let mut app = app();

        app.handle_key(KeyCode::Char('i'));
        assert!(app.show_sleep_info);

        app.handle_key(KeyCode::Char('?'));
        assert!(app.show_help);
        app.handle_key(KeyCode::Char('r'));
        assert!(!app.take_refresh_request());
        app.handle_key(KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
