use anyhow::{Context, Result};
use chrono::{Duration, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;

use super::app::App;
use super::widgets;
use crate::backend::BackendClient;
use crate::dashboard::HomeData;
use crate::services::HealthService;

/// Dashboard manages the TUI lifecycle
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    client: BackendClient,
}

impl Dashboard {
    /// Take over the terminal and show `data`
    pub fn new(client: BackendClient, data: HomeData, show_sleep_info: bool) -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            app: App::new(data, show_sleep_info),
            client,
        })
    }

    /// Run the dashboard event loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let app = &self.app;
            self.terminal.draw(|f| render(f, app))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        self.app.handle_key(key.code);
                    }
                }
            }

            if self.app.should_quit {
                break;
            }

            if self.app.take_refresh_request() {
                self.refresh().await;
            }

            if let Some(start) = self.app.pending_sleep_week() {
                self.load_sleep_week(start).await;
            }
        }

        Ok(())
    }

    async fn refresh(&mut self) {
        let user = self.app.data().user.clone();
        let today = Local::now().date_naive();

        match HomeData::fetch(&self.client, &user, today).await {
            Ok(data) => self.app.replace_data(data),
            Err(e) => {
                tracing::warn!("Dashboard refresh failed: {:#}", e);
                self.app.status = Some(format!("Refresh failed: {}", e));
            }
        }
    }

    async fn load_sleep_week(&mut self, start: chrono::NaiveDate) {
        let end = start + Duration::days(6);
        let health = HealthService::new(self.client.clone());

        match health.sleep_between(start, end).await {
            Ok(records) => self.app.load_sleep_week(start, records),
            Err(e) => {
                tracing::warn!("Loading sleep for week of {} failed: {:#}", start, e);
                self.app.status = Some(format!("Could not load sleep data: {}", e));
                // mark the week as loaded so the loop does not retry on every tick
                self.app.load_sleep_week(start, Vec::new());
            }
        }
    }

    /// Cleanup terminal on exit
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the UI
pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(size);

    let data = app.data();
    widgets::render_header(rows[0], f.buffer_mut(), data.display_name(), data.last_workout());
    widgets::render_day_strip(rows[1], f.buffer_mut(), app.selector());

    let chart_area = if app.show_sleep_info {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(rows[2]);
        widgets::render_sleep_info(parts[1], f.buffer_mut());
        parts[0]
    } else {
        rows[2]
    };

    widgets::render_sleep_chart(
        chart_area,
        f.buffer_mut(),
        &app.sleep_week(),
        app.selected_date(),
    );

    widgets::render_health_cards(rows[3], f.buffer_mut(), &app.health_cards());

    widgets::render_history(
        rows[4],
        f.buffer_mut(),
        app.selected_date(),
        &app.selected_sessions(),
        data.today,
    );

    widgets::render_status_bar(rows[5], f.buffer_mut(), app.status.as_deref());

    // Render help overlay if active
    if app.show_help {
        let help_area = centered_rect(60, 80, size);
        widgets::render_help_overlay(help_area, f.buffer_mut());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;
    use chrono::NaiveDate;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;
    use uuid::Uuid;

    fn app() -> App {
        let user = User {
            id: Uuid::nil(),
            email: None,
            username: Some("rafa".to_string()),
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        App::new(HomeData::from_parts(user, today, None, vec![], vec![], vec![]), false)
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_home() {
        let text = screen(&app());
        assert!(text.contains("rafa"));
        assert!(text.contains("Last workout: never"));
        assert!(text.contains("No training on this day."));
        assert!(text.contains("Press ? for help"));
    }

    #[test]
    fn test_render_overlays() {
        let mut app = app();
        app.handle_key(KeyCode::Char('i'));
        app.handle_key(KeyCode::Char('?'));

        let text = screen(&app);
        assert!(text.contains("About sleep"));
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Day status:"));
        assert!(text.contains("- Partially done"));
        assert!(text.contains("- Scheduled"));
    }
}
