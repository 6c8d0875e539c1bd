//! Writing engine records back out as a VCALENDAR.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Property, ValueType};
use viscal_engine::RawEvent;

const PRODID: &str = "-//viscal//viscal-ics//EN";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Render `records` as one VCALENDAR. Timed events are written in UTC; all-day
/// events as `VALUE=DATE` days of `tz`. `stamp` becomes every DTSTAMP.
pub fn generate_calendar(records: &[RawEvent], tz: Tz, stamp: DateTime<Utc>) -> String {
    let mut cal = Calendar::new();
    let dtstamp = stamp.format(UTC_FORMAT).to_string();

    for record in records {
        let mut event = icalendar::Event::new();
        event.uid(&record.uid);
        event.summary(&record.summary);
        event.add_property("DTSTAMP", &dtstamp);

        if record.all_day {
            let first = local_date(record.start, tz);
            let mut last = local_date(record.end, tz);
            if last <= first {
                last = first + Duration::days(1);
            }
            add_date_property(&mut event, "DTSTART", first);
            add_date_property(&mut event, "DTEND", last);
        } else {
            event.add_property("DTSTART", record.start.format(UTC_FORMAT).to_string());
            event.add_property("DTEND", record.end.format(UTC_FORMAT).to_string());
        }

        for (name, value) in &record.properties {
            event.append_multi_property(Property::new(name.as_str(), value.as_str()));
        }

        let event = event.done();
        cal.push(event);
    }

    replace_prodid(&cal.done().to_string())
}

fn local_date(t: DateTime<Utc>, tz: Tz) -> NaiveDate {
    t.with_timezone(&tz).date_naive()
}

fn add_date_property(event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    event.append_property(prop);
}

fn replace_prodid(ics: &str) -> String {
    let mut out = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            out.push_str("PRODID:");
            out.push_str(PRODID);
        } else {
            out.push_str(line);
        }
        out.push_str("\r\n");
    }
    out
}
