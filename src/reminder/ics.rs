// ICS calendar export
//
// Builds a single-event VCALENDAR for a record's expiry date with a display
// alarm one month ahead, so operators can import the deadline into their own
// calendars.

use crate::store::MonitoredRecord;
use anyhow::anyhow;
use chrono::{DateTime, Duration, Months, Utc};

const DTSTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Render the expiry of a record as an ICS event. Fails when the record has
/// no known expiry.
pub fn ics_for_record(record: &MonitoredRecord) -> crate::Result<String> {
    let expires = record
        .expires
        .ok_or_else(|| anyhow!("no expiry known for {}", record.hostname))?;

    let alarm = expires
        .checked_sub_months(Months::new(1))
        .unwrap_or(expires - Duration::days(30));

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//certwatch//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}-expiry@certwatch", record.hostname),
        format!("DTSTAMP:{}", stamp(Utc::now())),
        format!("DTSTART:{}", stamp(expires)),
        format!("DTEND:{}", stamp(expires + Duration::seconds(1))),
        format!("SUMMARY:{} SSL certificate expires", record.hostname),
        "BEGIN:VALARM".to_string(),
        "ACTION:DISPLAY".to_string(),
        format!("DESCRIPTION:{} SSL certificate expires soon", record.hostname),
        format!("TRIGGER;VALUE=DATE-TIME:{}", stamp(alarm)),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    Ok(lines.join("\r\n"))
}

fn stamp(dt: DateTime<Utc>) -> String {
    dt.format(DTSTAMP_FORMAT).to_string()
}
