use std::path::Path;

use anyhow::{Context, Result};
use calgrid_core::config::BuilderConfig;
use calgrid_core::date_range::{parse_date, parse_instant};
use calgrid_core::{
    DateRange, DraftContext, DraftSession, EventDraftBuilder, EventKind, EventRecord, EventStore,
    RecurrenceRule, shift,
};
use chrono::{Duration, NaiveDateTime, TimeDelta, Utc};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::render::{Render, format_span};
use crate::script::{Script, Step};

/// Maximum occurrences listed per series when a window is given.
const MAX_OCCURRENCES: u16 = 365;

/// The presentation side of a calendar page: one dialog session and one
/// store, driven by scripted gestures.
pub struct Replay {
    builder: EventDraftBuilder,
    store: EventStore,
    session: DraftSession,
}

impl Replay {
    pub fn new(config: BuilderConfig) -> Self {
        Replay {
            builder: EventDraftBuilder::new(config),
            store: EventStore::new(),
            session: DraftSession::default(),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    fn open(&mut self, ctx: DraftContext, subject: &str) -> Result<String> {
        let line = format!("{}: {}", ctx.heading(), subject);
        self.session.open(ctx);
        Ok(line)
    }

    fn find_by_title(&self, title: &str) -> Option<&EventRecord> {
        self.store.all().iter().find(|e| e.title == title)
    }

    /// Apply one gesture and describe what happened.
    pub fn apply(&mut self, step: &Step) -> Result<String> {
        debug!(?step, "Applying step");

        match step {
            Step::ClickDate { date } => {
                let date = parse_date(date).map_err(anyhow::Error::msg)?;
                let range = DateRange::from_date_click(date);
                self.open(self.builder.start_new(range), &range.to_string())
            }
            Step::Select {
                start,
                end,
                all_day,
            } => {
                let start = parse_instant(start).map_err(anyhow::Error::msg)?;
                let end = parse_instant(end).map_err(anyhow::Error::msg)?;
                let range = DateRange::from_selection(start, end, *all_day);
                self.open(self.builder.start_new(range), &range.to_string())
            }
            Step::ClickEvent { event } => {
                let id = self
                    .find_by_title(event)
                    .map(|e| e.id)
                    .with_context(|| format!("No event titled '{}' to click", event))?;
                let ctx = self
                    .builder
                    .start_edit_target(&self.store, id)
                    .with_context(|| format!("Event '{}' disappeared", event))?;
                self.open(ctx, event)
            }
            Step::Save(fields) => {
                let Some(ctx) = self.session.context() else {
                    return Ok("Nothing to save".dimmed().to_string());
                };

                let form = fields.merge_into(&ctx.form);
                match self.session.save(&self.builder, &mut self.store, &form) {
                    Ok(Some(record)) => Ok(format!("{} {}", "Saved:".green(), record.render())),
                    Ok(None) => Ok("Nothing to save".dimmed().to_string()),
                    Err(e) => Ok(e.render()),
                }
            }
            Step::Cancel => {
                self.session.cancel();
                Ok("Cancelled".dimmed().to_string())
            }
            Step::Drag { event, by } => {
                let delta_ms = crate::script::parse_delta(by)?;

                let Some(id) = self.find_by_title(event).map(|e| e.id) else {
                    return Ok(format!("No event titled '{}' to drag", event).dimmed().to_string());
                };

                let moved = shift(&mut self.store, id, delta_ms);
                Ok(format!("Moved '{}' by {} ({} record(s))", event, by, moved))
            }
        }
    }
}

pub fn run(
    script_path: &Path,
    config: BuilderConfig,
    json: bool,
    window: Option<(NaiveDateTime, NaiveDateTime)>,
) -> Result<()> {
    let script = Script::load(script_path)?;
    let mut replay = Replay::new(config);

    for (n, step) in script.steps.iter().enumerate() {
        let line = replay
            .apply(step)
            .with_context(|| format!("Step {} failed", n + 1))?;
        if !json {
            println!("  {} {}", format!("{:>2}.", n + 1).dimmed(), line);
        }
    }

    if json {
        let output = serde_json::to_string_pretty(&replay.store().render_inputs())?;
        println!("{}", output);
        return Ok(());
    }

    println!();
    if replay.store().is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for record in replay.store().all() {
        println!("{}", record.render());

        if let (Some((from, to)), EventKind::Recurring { rule, duration_ms }) = (window, &record.kind) {
            match occurrences(rule, from, to) {
                Ok(starts) => {
                    for start in starts {
                        let end = duration_ms
                            .and_then(|ms| i64::try_from(ms).ok())
                            .and_then(TimeDelta::try_milliseconds)
                            .and_then(|d| start.checked_add_signed(d))
                            .unwrap_or(start);
                        println!("    {}", format_span(start, end, record.all_day).dimmed());
                    }
                }
                Err(e) => println!("    {}", format!("(no occurrences: {})", e).dimmed()),
            }
        }
    }

    Ok(())
}

/// Occurrence starts of `rule` within [from, to].
pub fn occurrences(
    rule: &RecurrenceRule,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>> {
    let set = rule.to_rrule_set()?;

    // after/before are exclusive, widen by a second on each side
    let tz: rrule::Tz = Utc.into();
    let after = (from.and_utc() - Duration::seconds(1)).with_timezone(&tz);
    let before = (to.and_utc() + Duration::seconds(1)).with_timezone(&tz);

    let result = set.after(after).before(before).all(MAX_OCCURRENCES);
    Ok(result.dates.iter().map(|d| d.naive_utc()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::SaveFields;
    use calgrid_core::Frequency;
    use chrono::{NaiveDate, Weekday};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn select_sync() -> Step {
        Step::Select {
            start: "2025-08-06T14:00".to_string(),
            end: "2025-08-06T15:00".to_string(),
            all_day: false,
        }
    }

    fn save_title(title: &str) -> Step {
        Step::Save(SaveFields {
            title: Some(title.to_string()),
            ..SaveFields::default()
        })
    }

    #[test]
    fn create_then_drag_series() {
        let mut replay = Replay::new(BuilderConfig::default());
        replay.apply(&select_sync()).unwrap();
        replay
            .apply(&Step::Save(SaveFields {
                title: Some("Sync".to_string()),
                repeat: Some(crate::script::RepeatChoice::Weekly),
                interval: Some(2),
                weekdays: Some(vec![Weekday::Tue]),
                ..SaveFields::default()
            }))
            .unwrap();
        replay
            .apply(&Step::Drag {
                event: "Sync".to_string(),
                by: "1day".to_string(),
            })
            .unwrap();

        let record = &replay.store().all()[0];
        let rule = record.rule().unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.start, at(7, 14));
        assert_eq!(rule.by_weekday, vec![Weekday::Tue]);
    }

    #[test]
    fn invalid_save_keeps_dialog_open() {
        let mut replay = Replay::new(BuilderConfig::default());
        replay.apply(&select_sync()).unwrap();
        replay.apply(&save_title("   ")).unwrap();

        assert!(replay.session().is_open());
        assert!(replay.store().is_empty());
    }

    #[test]
    fn edit_keeps_unmentioned_fields() {
        let mut replay = Replay::new(BuilderConfig::default());
        replay.apply(&select_sync()).unwrap();
        replay
            .apply(&Step::Save(SaveFields {
                title: Some("Run".to_string()),
                repeat: Some(crate::script::RepeatChoice::Daily),
                interval: Some(3),
                ..SaveFields::default()
            }))
            .unwrap();

        replay
            .apply(&Step::ClickEvent {
                event: "Run".to_string(),
            })
            .unwrap();
        replay.apply(&save_title("Long run")).unwrap();

        assert_eq!(replay.store().len(), 1);
        let record = &replay.store().all()[0];
        assert_eq!(record.title, "Long run");
        assert_eq!(record.rule().unwrap().interval, 3);
    }

    #[test]
    fn click_on_missing_event_fails() {
        let mut replay = Replay::new(BuilderConfig::default());
        assert!(
            replay
                .apply(&Step::ClickEvent {
                    event: "Ghost".to_string(),
                })
                .is_err()
        );
    }

    #[test]
    fn drag_on_missing_event_is_ignored() {
        let mut replay = Replay::new(BuilderConfig::default());
        let line = replay
            .apply(&Step::Drag {
                event: "Ghost".to_string(),
                by: "1h".to_string(),
            })
            .unwrap();
        assert!(line.contains("Ghost"));
        assert!(replay.store().is_empty());
    }

    #[test]
    fn occurrences_within_window() {
        let rule = RecurrenceRule::new(
            Frequency::Weekly,
            1,
            vec![Weekday::Tue, Weekday::Thu],
            None,
            at(5, 9),
        )
        .unwrap();

        let starts = occurrences(&rule, at(5, 0), at(14, 23)).unwrap();
        assert_eq!(starts, vec![at(5, 9), at(7, 9), at(12, 9), at(14, 9)]);
    }
}
