use chrono::{Duration, NaiveDate};

use crate::models::{SessionStatus, SleepRecord, TrainingSession};

/// Days shown before today
pub const PAST_DAYS: i64 = 7;
/// Days shown after today
pub const FUTURE_DAYS: i64 = 6;
/// Days visible at once, centred on the scroll position
pub const VISIBLE_DAYS: usize = 7;

const HALF_VISIBLE: usize = VISIBLE_DAYS / 2;

/// First and last day of the selector window around `today`
pub fn window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        today - Duration::days(PAST_DAYS),
        today + Duration::days(FUTURE_DAYS),
    )
}

/// Status of a day from its sessions: the best outcome wins, and a session
/// still scheduled on a past day counts as missed
pub fn day_status(
    sessions: &[TrainingSession],
    date: NaiveDate,
    today: NaiveDate,
) -> Option<SessionStatus> {
    sessions
        .iter()
        .filter(|s| s.date == date)
        .map(|s| s.effective_status(today))
        .max_by_key(SessionStatus::precedence)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub is_today: bool,
    pub status: Option<SessionStatus>,
    /// 0-100, when a night was recorded for this day
    pub sleep_quality: Option<u8>,
}

/// The strip of days on top of the dashboard. The cursor moves freely; the
/// selection only changes when the cursor is confirmed.
#[derive(Debug, Clone)]
pub struct DaySelector {
    days: Vec<DayEntry>,
    scroll: usize,
    cursor: usize,
    selected: usize,
}

impl DaySelector {
    pub fn new(today: NaiveDate, sessions: &[TrainingSession], sleep: &[SleepRecord]) -> Self {
        let (start, end) = window(today);

        let days: Vec<DayEntry> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| DayEntry {
                date,
                is_today: date == today,
                status: day_status(sessions, date, today),
                sleep_quality: sleep
                    .iter()
                    .rev()
                    .find(|r| r.date == date)
                    .and_then(SleepRecord::quality_percentage),
            })
            .collect();

        let today_index = PAST_DAYS as usize;
        Self {
            days,
            scroll: today_index,
            cursor: today_index,
            selected: today_index,
        }
    }

    pub fn days(&self) -> &[DayEntry] {
        &self.days
    }

    fn min_scroll(&self) -> usize {
        HALF_VISIBLE
    }

    fn max_scroll(&self) -> usize {
        self.days.len().saturating_sub(HALF_VISIBLE + 1)
    }

    /// Index range of the visible days
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.scroll.saturating_sub(HALF_VISIBLE);
        let end = (self.scroll + HALF_VISIBLE + 1).min(self.days.len());
        start..end
    }

    pub fn visible(&self) -> &[DayEntry] {
        &self.days[self.visible_range()]
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll
    }

    pub fn can_scroll_left(&self) -> bool {
        self.scroll > self.min_scroll()
    }

    pub fn can_scroll_right(&self) -> bool {
        self.scroll < self.max_scroll()
    }

    pub fn scroll_left(&mut self) -> bool {
        if !self.can_scroll_left() {
            return false;
        }
        self.scroll -= 1;
        true
    }

    pub fn scroll_right(&mut self) -> bool {
        if !self.can_scroll_right() {
            return false;
        }
        self.scroll += 1;
        true
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor one day, scrolling to keep it visible
    pub fn move_cursor(&mut self, forward: bool) {
        if forward {
            if self.cursor + 1 < self.days.len() {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }

        while self.cursor < self.visible_range().start && self.scroll_left() {}
        while self.cursor >= self.visible_range().end && self.scroll_right() {}
    }

    /// Make the day under the cursor the selected day
    pub fn select_cursor(&mut self) -> &DayEntry {
        self.selected = self.cursor;
        &self.days[self.selected]
    }

    /// Put the cursor on `date` and select it; false when the date is outside
    /// the window
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let Some(index) = self.days.iter().position(|d| d.date == date) else {
            return false;
        };

        while self.cursor < index {
            self.move_cursor(true);
        }
        while self.cursor > index {
            self.move_cursor(false);
        }
        self.select_cursor();
        true
    }

    pub fn selected(&self) -> &DayEntry {
        &self.days[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }
}
