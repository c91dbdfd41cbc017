//! Recurrence rules for repeating events.
//!
//! A rule is pure data: the core never expands it into occurrences. The grid
//! collaborator gets the RRULE text (or a parsed `RRuleSet`) and does that.

use std::fmt;

use chrono::{NaiveDateTime, Weekday};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    fn rrule_name(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }

    /// Unit label for "every N ..." in forms.
    pub fn unit(self) -> &'static str {
        match self {
            Frequency::Daily => "day(s)",
            Frequency::Weekly => "week(s)",
            Frequency::Monthly => "month(s)",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// "Repeat every `interval` days/weeks/months, starting at `start`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    /// Only meaningful for weekly rules, kept in Monday-first order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_weekday: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDateTime>,
    pub start: NaiveDateTime,
}

impl RecurrenceRule {
    pub fn new(
        frequency: Frequency,
        interval: u32,
        by_weekday: Vec<Weekday>,
        until: Option<NaiveDateTime>,
        start: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let by_weekday = if frequency == Frequency::Weekly {
            normalize_weekdays(by_weekday)
        } else {
            Vec::new()
        };

        let rule = RecurrenceRule {
            frequency,
            interval,
            by_weekday,
            until,
            start,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // RRULE parsers cap INTERVAL at u16
        if self.interval < 1 || self.interval > u32::from(u16::MAX) {
            return Err(ValidationError::InvalidInterval);
        }
        if self.until.is_some_and(|until| until < self.start) {
            return Err(ValidationError::UntilBeforeStart);
        }
        Ok(())
    }

    /// Weekdays as the renderer should read them: empty unless weekly.
    pub fn effective_weekdays(&self) -> &[Weekday] {
        match self.frequency {
            Frequency::Weekly => &self.by_weekday,
            Frequency::Daily | Frequency::Monthly => &[],
        }
    }

    /// iCalendar text (`DTSTART` + `RRULE`) for the grid's recurrence plugin.
    ///
    /// Wall-clock times are written as UTC so occurrences come back with the
    /// same clock reading.
    pub fn to_rrule_string(&self) -> String {
        let mut parts = vec![
            format!("FREQ={}", self.frequency.rrule_name()),
            format!("INTERVAL={}", self.interval),
        ];

        let weekdays = self.effective_weekdays();
        if !weekdays.is_empty() {
            let days: Vec<_> = weekdays.iter().map(|d| weekday_code(*d)).collect();
            parts.push(format!("BYDAY={}", days.join(",")));
        }

        if let Some(until) = self.until {
            parts.push(format!("UNTIL={}", until.format("%Y%m%dT%H%M%SZ")));
        }

        format!(
            "DTSTART:{}\nRRULE:{}",
            self.start.format("%Y%m%dT%H%M%SZ"),
            parts.join(";")
        )
    }

    pub fn to_rrule_set(&self) -> CalGridResult<RRuleSet> {
        self.validate()
            .map_err(|e| CalGridError::InvalidRule(e.to_string()))?;

        self.to_rrule_string()
            .parse()
            .map_err(|e| CalGridError::InvalidRule(format!("{}", e)))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} every {} {}", self.frequency, self.interval, self.frequency.unit())?;

        let weekdays = self.effective_weekdays();
        if !weekdays.is_empty() {
            let days: Vec<_> = weekdays.iter().map(|d| d.to_string()).collect();
            write!(f, " on {}", days.join(", "))?;
        }
        if let Some(until) = self.until {
            write!(f, " until {}", until.date())?;
        }
        Ok(())
    }
}

/// Sort Monday-first and drop duplicates.
pub fn normalize_weekdays(mut days: Vec<Weekday>) -> Vec<Weekday> {
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();
    days
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = RecurrenceRule::new(Frequency::Daily, 0, vec![], None, at(2025, 8, 6, 14));
        assert_eq!(err.unwrap_err(), ValidationError::InvalidInterval);
    }

    #[test]
    fn interval_is_capped_at_u16() {
        let start = at(2025, 8, 6, 14);
        let max = u32::from(u16::MAX);

        let rule = RecurrenceRule::new(Frequency::Daily, max, vec![], None, start).unwrap();
        assert!(rule.to_rrule_set().is_ok());

        let err = RecurrenceRule::new(Frequency::Daily, max + 1, vec![], None, start);
        assert_eq!(err.unwrap_err(), ValidationError::InvalidInterval);
        let err = RecurrenceRule::new(Frequency::Daily, 70_000, vec![], None, start);
        assert_eq!(err.unwrap_err(), ValidationError::InvalidInterval);
    }

    #[test]
    fn until_before_start_is_rejected() {
        let err = RecurrenceRule::new(
            Frequency::Daily,
            1,
            vec![],
            Some(at(2025, 8, 1, 0)),
            at(2025, 8, 6, 14),
        );
        assert_eq!(err.unwrap_err(), ValidationError::UntilBeforeStart);
    }

    #[test]
    fn weekdays_are_normalized_for_weekly() {
        let rule = RecurrenceRule::new(
            Frequency::Weekly,
            1,
            vec![Weekday::Fri, Weekday::Mon, Weekday::Fri],
            None,
            at(2025, 8, 6, 14),
        )
        .unwrap();
        assert_eq!(rule.by_weekday, vec![Weekday::Mon, Weekday::Fri]);
    }

    #[test]
    fn weekdays_are_ignored_for_other_frequencies() {
        let rule = RecurrenceRule::new(
            Frequency::Monthly,
            1,
            vec![Weekday::Tue],
            None,
            at(2025, 8, 6, 14),
        )
        .unwrap();
        assert!(rule.effective_weekdays().is_empty());

        // Hand-built rules keep the field, but readers still ignore it
        let mut daily = rule.clone();
        daily.frequency = Frequency::Daily;
        daily.by_weekday = vec![Weekday::Tue];
        assert!(daily.effective_weekdays().is_empty());
        assert!(!daily.to_rrule_string().contains("BYDAY"));
    }

    #[test]
    fn rrule_string_for_weekly_series() {
        let rule = RecurrenceRule::new(
            Frequency::Weekly,
            2,
            vec![Weekday::Tue],
            Some(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap().and_hms_opt(23, 59, 59).unwrap()),
            at(2025, 8, 6, 14),
        )
        .unwrap();

        assert_eq!(
            rule.to_rrule_string(),
            "DTSTART:20250806T140000Z\nRRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=TU;UNTIL=20250930T235959Z"
        );
    }

    #[test]
    fn rrule_set_expands_daily_rule() {
        let rule = RecurrenceRule::new(
            Frequency::Daily,
            1,
            vec![],
            Some(at(2025, 8, 8, 23)),
            at(2025, 8, 6, 14),
        )
        .unwrap();

        let set = rule.to_rrule_set().unwrap();
        let result = set.all(10);
        assert_eq!(result.dates.len(), 3);
        assert_eq!(result.dates[0].naive_utc(), at(2025, 8, 6, 14));
        assert_eq!(result.dates[2].naive_utc(), at(2025, 8, 8, 14));
    }

    #[test]
    fn rrule_set_reports_until_before_start() {
        let mut rule =
            RecurrenceRule::new(Frequency::Daily, 1, vec![], Some(at(2025, 8, 8, 0)), at(2025, 8, 6, 14))
                .unwrap();
        rule.start = at(2025, 8, 9, 14);

        assert!(matches!(rule.to_rrule_set(), Err(CalGridError::InvalidRule(_))));
    }

    #[test]
    fn display_reads_like_a_form_summary() {
        let rule = RecurrenceRule::new(
            Frequency::Weekly,
            2,
            vec![Weekday::Tue, Weekday::Thu],
            None,
            at(2025, 8, 6, 14),
        )
        .unwrap();
        assert_eq!(rule.to_string(), "weekly every 2 week(s) on Tue, Thu");
    }
}
