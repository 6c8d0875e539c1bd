//! Reading VEVENTs into engine records.
//!
//! Every datetime form RFC 5545 allows for DTSTART/DTEND is accepted and pinned
//! to UTC: `Z` times as-is, `TZID=` times in their own zone, floating times and
//! bare dates in the configured zone. An event with DURATION instead of DTEND
//! ends that long after its start. Events that cannot be read are logged and
//! skipped so one bad VEVENT never hides a whole calendar.

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{read_calendar, unfold, Component};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::{debug, warn};
use viscal_engine::RawEvent;

use crate::error::{IcsError, Result};

/// Properties the engine models itself. Everything else rides along untouched.
pub(crate) const MANAGED: &[&str] = &["UID", "SUMMARY", "DTSTART", "DTEND", "DURATION", "DTSTAMP"];

/// Parse a whole `.ics` document. `path` only labels errors and log records.
pub fn parse_calendar(content: &str, path: &Path, tz: Tz) -> Result<Vec<RawEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| IcsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    let mut events = Vec::with_capacity(vevents.len());
    for vevent in vevents {
        match parse_event(vevent, tz) {
            Ok(event) => events.push(event),
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable event"),
        }
    }
    debug!(path = %path.display(), events = events.len(), "parsed calendar");
    Ok(events)
}

fn collect_vevents<'c, 'a>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else if component.name == "VCALENDAR" {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_event(vevent: &Component<'_>, tz: Tz) -> Result<RawEvent> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .ok_or_else(|| IcsError::MissingProperty {
            uid: "(none)".to_string(),
            property: "UID",
        })?;
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .ok_or_else(|| IcsError::MissingProperty {
            uid: uid.clone(),
            property: "DTSTART",
        })?;
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok());

    let duration = match vevent.find_prop("DURATION") {
        Some(prop) if end.is_none() => Some(parse_duration(prop.val.as_str()).ok_or_else(|| {
            IcsError::InvalidDuration {
                uid: uid.clone(),
                value: prop.val.to_string(),
            }
        })?),
        _ => None,
    };

    let all_day = matches!(start, DatePerhapsTime::Date(_));
    let start_utc = to_utc(&start, tz);
    let end_utc = match (&start, end, duration) {
        (_, Some(end), _) => to_utc(&end, tz),
        // whole days count in the local calendar, not in 24h steps
        (DatePerhapsTime::Date(date), None, Some(d)) if d.num_seconds() % 86_400 == 0 => {
            date_to_utc(*date + Duration::days(d.num_days()), tz)
        }
        (_, None, Some(d)) => start_utc + d,
        // a date-valued DTSTART with no DTEND lasts one day
        (DatePerhapsTime::Date(date), None, None) => date_to_utc(*date + Duration::days(1), tz),
        (_, None, None) => start_utc,
    };
    if end_utc < start_utc {
        return Err(IcsError::InvalidInterval);
    }

    let mut properties = Vec::new();
    for prop in &vevent.properties {
        let name: &str = prop.name.as_ref();
        if MANAGED.contains(&name) {
            continue;
        }
        if !prop.params.is_empty() {
            debug!(uid = %uid, property = name, "dropping parameterized property");
            continue;
        }
        properties.push((name.to_string(), prop.val.to_string()));
    }

    Ok(RawEvent {
        uid,
        start: start_utc,
        end: end_utc,
        summary,
        all_day,
        properties,
    })
}

/// Read a DURATION value such as `PT1H30M`, `P2D`, `P1W` or `-PT15M`.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let parsed: std::time::Duration = iso8601::duration(rest).ok()?.into();
    let duration = Duration::from_std(parsed).ok()?;
    Some(if negative { -duration } else { duration })
}

fn to_utc(value: &DatePerhapsTime, tz: Tz) -> DateTime<Utc> {
    match value {
        DatePerhapsTime::Date(date) => date_to_utc(*date, tz),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => *dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => local_to_utc(naive, tz),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<Tz>() {
                Ok(zone) => local_to_utc(date_time, zone),
                Err(_) => {
                    warn!(%tzid, "unknown TZID, reading as local time");
                    local_to_utc(date_time, tz)
                }
            }
        }
    }
}

fn date_to_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(&date.and_time(NaiveTime::MIN), tz)
}

/// Resolve a wall-clock time. Ambiguous times take the earlier instant; times
/// skipped by a DST jump move forward an hour.
fn local_to_utc(naive: &NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(naive))
}
