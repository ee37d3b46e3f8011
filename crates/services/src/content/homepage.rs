use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

/// Active window of a scheduled homepage, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// RFC 3339 timestamp or plain `YYYY-MM-DD`. A plain end date covers that
/// whole day.
fn parse_bound(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
    };
    Some(date.and_time(time).and_utc())
}

impl ScheduleWindow {
    /// Window from `scheduledStart` / `scheduledEnd`; absent when either is
    /// missing or unparseable
    pub fn from_document(document: &Value) -> Option<Self> {
        let start = document.get("scheduledStart")?.as_str()?;
        let end = document.get("scheduledEnd")?.as_str()?;
        Some(Self {
            start: parse_bound(start, Bound::Start)?,
            end: parse_bound(end, Bound::End)?,
        })
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

/// First candidate whose window contains `now`. Candidates come latest
/// start first, so overlapping schedules resolve to the newest one.
pub fn active_schedule(candidates: &[Value], now: DateTime<Utc>) -> Option<&Value> {
    candidates.iter().find(|candidate| {
        ScheduleWindow::from_document(candidate).is_some_and(|window| window.contains(now))
    })
}
