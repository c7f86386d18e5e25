use chrono::{Datelike, Duration, NaiveDate};

use crate::models::SleepRecord;
use crate::questionnaire::Weekday;

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Mean of the nights that have any sleep, to one decimal
pub fn mean_sleep_hours(totals: impl IntoIterator<Item = f64>) -> Option<f64> {
    let totals: Vec<f64> = totals.into_iter().filter(|h| *h > 0.0).collect();
    if totals.is_empty() {
        return None;
    }
    let mean = totals.iter().sum::<f64>() / totals.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SleepDay {
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub deep: f64,
    pub rem: f64,
    pub light: f64,
    pub total: f64,
}

impl SleepDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            weekday: Weekday::from_chrono(date.weekday()),
            date,
            deep: 0.0,
            rem: 0.0,
            light: 0.0,
            total: 0.0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total > 0.0
    }

    /// Share of deep and REM sleep, in percent
    pub fn quality(&self) -> Option<f64> {
        self.has_data()
            .then(|| (self.deep + self.rem) / self.total * 100.0)
    }
}

/// One Monday-to-Sunday week of sleep for the chart
#[derive(Debug, Clone, PartialEq)]
pub struct SleepWeek {
    start: NaiveDate,
    days: Vec<SleepDay>,
}

impl SleepWeek {
    /// Week containing `date`, filled from `records`. A day with several
    /// records shows the last one.
    pub fn containing(date: NaiveDate, records: &[SleepRecord]) -> Self {
        let start = week_start(date);
        let days = (0..7)
            .map(|offset| {
                let day = start + Duration::days(offset);
                match records.iter().rev().find(|r| r.date == day) {
                    Some(r) => SleepDay {
                        deep: r.deep_sleep_hours,
                        rem: r.rem_sleep_hours,
                        light: r.light_sleep_hours,
                        total: r.total_hours(),
                        ..SleepDay::empty(day)
                    },
                    None => SleepDay::empty(day),
                }
            })
            .collect();

        Self { start, days }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> &[SleepDay] {
        &self.days
    }

    pub fn previous_start(&self) -> NaiveDate {
        self.start - Duration::days(7)
    }

    pub fn next_start(&self) -> NaiveDate {
        self.start + Duration::days(7)
    }

    fn recorded(&self) -> impl Iterator<Item = &SleepDay> {
        self.days.iter().filter(|d| d.has_data())
    }

    /// Mean hours per recorded night, to one decimal
    pub fn average_hours(&self) -> Option<f64> {
        mean_sleep_hours(self.recorded().map(|d| d.total))
    }

    /// Mean deep+REM share per recorded night, rounded to a whole percent
    pub fn average_quality(&self) -> Option<u8> {
        let qualities: Vec<f64> = self.recorded().filter_map(SleepDay::quality).collect();
        if qualities.is_empty() {
            return None;
        }
        let mean = qualities.iter().sum::<f64>() / qualities.len() as f64;
        Some(mean.round().clamp(0.0, 100.0) as u8)
    }

    /// Tallest night of the week, for scaling the chart
    pub fn max_total(&self) -> f64 {
        self.days.iter().map(|d| d.total).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use uuid::Uuid;

    fn record(date: NaiveDate, deep: f64, rem: f64, light: f64) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            deep_sleep_hours: deep,
            rem_sleep_hours: rem,
            light_sleep_hours: light,
            total_sleep_hours: None,
            quality_score: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-03-14 is a Thursday
        assert_eq!(week_start(date(14)), date(11));
        assert_eq!(week_start(date(11)), date(11));
        assert_eq!(week_start(date(17)), date(11));
    }

    #[test]
    fn test_week_layout() {
        let records = vec![record(date(12), 1.0, 2.0, 4.0), record(date(20), 2.0, 2.0, 4.0)];
        let week = SleepWeek::containing(date(14), &records);

        assert_eq!(week.start(), date(11));
        assert_eq!(week.end(), date(17));
        assert_eq!(week.days().len(), 7);
        assert_eq!(week.days()[0].weekday, Weekday::Mon);
        assert_eq!(week.days()[1].total, 7.0);
        assert!(!week.days()[2].has_data());
        assert_eq!(week.next_start(), date(18));
    }

    #[test]
    fn test_averages_skip_empty_nights() {
        let records = vec![
            record(date(11), 2.0, 2.0, 4.0),
            record(date(12), 1.0, 1.0, 5.0),
            record(date(13), 0.0, 0.0, 0.0),
        ];
        let week = SleepWeek::containing(date(11), &records);

        // (8 + 7) / 2
        assert_eq!(week.average_hours(), Some(7.5));
        // (50% + 28.57%) / 2
        assert_eq!(week.average_quality(), Some(39));
    }

    #[test]
    fn test_mean_sleep_hours() {
        assert_eq!(mean_sleep_hours([]), None);
        assert_eq!(mean_sleep_hours([0.0, 0.0]), None);
        assert_eq!(mean_sleep_hours([7.0, 0.0, 8.25]), Some(7.6));
    }

    #[test]
    fn test_empty_week_has_no_averages() {
        let week = SleepWeek::containing(date(11), &[]);
        assert_eq!(week.average_hours(), None);
        assert_eq!(week.average_quality(), None);
        assert_eq!(week.max_total(), 0.0);
    }
}
