use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

use crate::dashboard::{DaySelector, HealthCards, LastWorkout, SleepWeek};
use crate::models::{SessionStatus, TrainingSession};
use crate::questionnaire::Weekday;

const DEEP_COLOR: Color = Color::Blue;
const REM_COLOR: Color = Color::Green;
const LIGHT_COLOR: Color = Color::Magenta;

pub fn status_color(status: Option<SessionStatus>) -> Color {
    match status {
        Some(SessionStatus::Completed) => Color::Green,
        Some(SessionStatus::Partial) => Color::Yellow,
        Some(SessionStatus::Missed) => Color::Red,
        Some(SessionStatus::Scheduled) => Color::Blue,
        None => Color::DarkGray,
    }
}

/// Render greeting and last workout
pub fn render_header(area: Rect, buf: &mut Buffer, name: &str, last_workout: LastWorkout) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Hello, ", Style::default().fg(Color::Gray)),
            Span::styled(
                name.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("Last workout: {}", last_workout),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines).render(area, buf);
}

/// Render the strip of days with the cursor and selection
pub fn render_day_strip(area: Rect, buf: &mut Buffer, selector: &DaySelector) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📅 Training history ")
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let arrow_style = Style::default().fg(Color::Gray);
    if selector.can_scroll_left() {
        Paragraph::new("◀").style(arrow_style).render(columns[0], buf);
    }
    if selector.can_scroll_right() {
        Paragraph::new("▶").style(arrow_style).render(columns[2], buf);
    }

    let range = selector.visible_range();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, range.len().max(1) as u32); range.len()])
        .split(columns[1]);

    for (cell, index) in cells.iter().zip(range) {
        let day = &selector.days()[index];
        let is_selected = index == selector.selected_index();
        let is_cursor = index == selector.cursor();

        let mut label_style = Style::default().fg(Color::Gray);
        if day.is_today {
            label_style = label_style.fg(Color::White).add_modifier(Modifier::BOLD);
        }
        if is_selected {
            label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        if is_cursor {
            label_style = label_style.add_modifier(Modifier::REVERSED);
        }

        let quality = day
            .sleep_quality
            .map(|q| format!("{}%", q))
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(Span::styled(
                Weekday::from_chrono(day.date.weekday()).short(),
                label_style,
            )),
            Line::from(Span::styled(day.date.day().to_string(), label_style)),
            Line::from(Span::styled("●", Style::default().fg(status_color(day.status)))),
            Line::from(Span::styled(quality, Style::default().fg(Color::DarkGray))),
        ];

        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .render(*cell, buf);
    }
}

/// Render the sleep stages of one week as grouped bars, with the weekly
/// averages underneath
pub fn render_sleep_chart(area: Rect, buf: &mut Buffer, week: &SleepWeek, selected: NaiveDate) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " 🌙 Sleep {} to {} ",
            week.start().format("%d/%m"),
            week.end().format("%d/%m")
        ))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // tenths of an hour, so bars keep one decimal of precision
    let tenths = |hours: f64| (hours * 10.0).round().max(0.0) as u64;

    let mut chart = BarChart::default()
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2)
        .max(tenths(week.max_total().max(1.0)));

    for day in week.days() {
        let label_style = if day.date == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let bars = [
            Bar::default()
                .value(tenths(day.deep))
                .text_value(String::new())
                .style(Style::default().fg(DEEP_COLOR)),
            Bar::default()
                .value(tenths(day.rem))
                .text_value(String::new())
                .style(Style::default().fg(REM_COLOR)),
            Bar::default()
                .value(tenths(day.light))
                .text_value(String::new())
                .style(Style::default().fg(LIGHT_COLOR)),
        ];

        chart = chart.data(
            BarGroup::default()
                .label(Line::from(Span::styled(day.weekday.short(), label_style)))
                .bars(&bars),
        );
    }

    chart.render(rows[0], buf);

    let legend = Line::from(vec![
        Span::styled("■ deep  ", Style::default().fg(DEEP_COLOR)),
        Span::styled("■ REM  ", Style::default().fg(REM_COLOR)),
        Span::styled("■ light", Style::default().fg(LIGHT_COLOR)),
    ]);
    Paragraph::new(legend).render(rows[1], buf);

    let hours = week
        .average_hours()
        .map(|h| format!("{:.1}h", h))
        .unwrap_or_else(|| "-".to_string());
    let quality = week
        .average_quality()
        .map(|q| format!("{}%", q))
        .unwrap_or_else(|| "-".to_string());

    let averages = Line::from(vec![
        Span::styled("Average: ", Style::default().fg(Color::Gray)),
        Span::styled(hours, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("   Quality: ", Style::default().fg(Color::Gray)),
        Span::styled(quality, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
    ]);
    Paragraph::new(averages).render(rows[2], buf);
}

/// Render the panel explaining the sleep chart
pub fn render_sleep_info(area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ℹ About sleep ")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    block.render(area, buf);

    let text = "Sleep quality has a direct effect on your training results. \
                Quality is the share of deep and REM sleep in the night. \
                Track your sleep patterns to optimise recovery.";

    Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
        .render(inner, buf);
}

fn render_card(area: Rect, buf: &mut Buffer, title: &str, value: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .render(inner, buf);
}

/// Render the four health cards
pub fn render_health_cards(area: Rect, buf: &mut Buffer, cards: &HealthCards) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    render_card(
        columns[0],
        buf,
        "♥ Heart rate",
        or_dash(cards.heart_rate_bpm.map(|b| format!("{} bpm", b))),
        Color::Red,
    );
    render_card(
        columns[1],
        buf,
        "🔥 Calories",
        or_dash(cards.calories.map(|c| format!("{} kcal", c))),
        Color::Yellow,
    );
    render_card(
        columns[2],
        buf,
        "🏆 Streak",
        format!(
            "{} {}",
            cards.streak_days,
            if cards.streak_days == 1 { "day" } else { "days" }
        ),
        Color::Green,
    );
    render_card(
        columns[3],
        buf,
        "🌙 Last night",
        or_dash(cards.sleep_hours.map(|h| format!("{:.1} h", h))),
        Color::Cyan,
    );
}

/// Render the sessions of the selected day
pub fn render_history(
    area: Rect,
    buf: &mut Buffer,
    date: NaiveDate,
    sessions: &[&TrainingSession],
    today: NaiveDate,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" 🏋 {} ", date.format("%A, %d %B")))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    if sessions.is_empty() {
        Paragraph::new("No training on this day.")
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
        return;
    }

    let items: Vec<ListItem> = sessions
        .iter()
        .map(|session| {
            let status = session.effective_status(today);
            let duration = session
                .duration_minutes
                .map(|d| format!("{} min", d))
                .unwrap_or_else(|| "-".to_string());

            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(status_color(Some(status)))),
                Span::styled(
                    format!("{:<20}", session.title()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(format!("{:<10}", status.label()), Style::default().fg(Color::Gray)),
                Span::styled(duration, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    List::new(items).render(inner, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ❓ Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let legend = |status: SessionStatus, label: &'static str| {
        Line::from(vec![
            Span::styled("  ●        ", Style::default().fg(status_color(Some(status)))),
            Span::raw(label),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Days:", Style::default().fg(Color::Cyan))),
        Line::from("  ←/h      - Previous day"),
        Line::from("  →/l      - Next day"),
        Line::from("  Enter    - Select day"),
        Line::from(""),
        Line::from(Span::styled("Sleep:", Style::default().fg(Color::Cyan))),
        Line::from("  [        - Previous week"),
        Line::from("  ]        - Next week"),
        Line::from("  i        - About sleep quality"),
        Line::from(""),
        Line::from(Span::styled("Other:", Style::default().fg(Color::Cyan))),
        Line::from("  r        - Refresh data"),
        Line::from("  ?        - Toggle this help"),
        Line::from("  q/Esc    - Quit"),
        Line::from(""),
        Line::from(Span::styled("Day status:", Style::default().fg(Color::Cyan))),
        legend(SessionStatus::Completed, "- Completed"),
        legend(SessionStatus::Partial, "- Partially done"),
        legend(SessionStatus::Missed, "- Missed"),
        legend(SessionStatus::Scheduled, "- Scheduled"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or ESC to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(help_text).render(inner, buf);
}

/// Render status bar at bottom
pub fn render_status_bar(area: Rect, buf: &mut Buffer, status: Option<&str>) {
    let state = match status {
        Some(message) => Span::styled(
            format!(" ✗ {} ", message),
            Style::default().fg(Color::Red).bg(Color::DarkGray),
        ),
        None => Span::styled(
            " ✓ Up to date ",
            Style::default().fg(Color::Green).bg(Color::DarkGray),
        ),
    };

    let help_hint = Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    );

    Paragraph::new(Line::from(vec![state, help_hint])).render(area, buf);
}
