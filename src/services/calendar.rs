use anyhow::Context;
use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::models::{Booking, BookingStatus};

pub const APPOINTMENT_MINUTES: i64 = 30;

pub fn appointment_start(booking: &Booking) -> anyhow::Result<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(&booking.appointment_time, "%H:%M")
        .with_context(|| format!("invalid appointment time: {}", booking.appointment_time))?;
    Ok(booking.appointment_date.and_time(time))
}

/// VEVENT only knows TENTATIVE, CONFIRMED and CANCELLED.
fn event_status(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "TENTATIVE",
        BookingStatus::Confirmed | BookingStatus::Completed => "CONFIRMED",
        BookingStatus::Cancelled => "CANCELLED",
    }
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

fn slug(s: &str) -> String {
    let slug: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "dental-site".to_string()
    } else {
        slug
    }
}

pub fn generate_ics(booking: &Booking, practice_name: &str) -> anyhow::Result<String> {
    let start = appointment_start(booking)?;
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(APPOINTMENT_MINUTES))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@{}", booking.id, slug(practice_name));

    let summary = escape_text(&format!("{} with {}", booking.service_type, practice_name));
    let description = escape_text(booking.message.as_deref().unwrap_or("No additional notes"));

    Ok(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Dental Site//Appointments//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         STATUS:{status}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
        status = event_status(booking.status),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(message: Option<&str>) -> Booking {
        Booking {
            id: "test-123".to_string(),
            name: "Alice".to_string(),
            email: None,
            phone: "0911234567".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            appointment_time: "14:00".to_string(),
            service_type: "Dental Implants".to_string(),
            message: message.map(str::to_string),
            status: BookingStatus::Confirmed,
            created_at: NaiveDateTime::parse_from_str("2025-03-10 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_generate_ics() {
        let ics = generate_ics(&booking(Some("Upper left molar, sensitive")), "Dr. Abdu Dental Care")
            .unwrap();
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("DTSTART:20250315T140000"));
        assert!(ics.contains("DTEND:20250315T143000"));
        assert!(ics.contains("DTSTAMP:20250310T100000Z"));
        assert!(ics.contains("SUMMARY:Dental Implants with Dr. Abdu Dental Care"));
        assert!(ics.contains("DESCRIPTION:Upper left molar\\, sensitive"));
        assert!(ics.contains("UID:test-123@dr-abdu-dental-care"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_generate_ics_no_message() {
        let ics = generate_ics(&booking(None), "Clinic").unwrap();
        assert!(ics.contains("DESCRIPTION:No additional notes"));
    }

    #[test]
    fn test_bad_time_is_an_error() {
        let mut b = booking(None);
        b.appointment_time = "noon".to_string();
        assert!(generate_ics(&b, "Clinic").is_err());
    }

    #[test]
    fn test_event_status_per_booking_status() {
        let cases = [
            (BookingStatus::Pending, "STATUS:TENTATIVE"),
            (BookingStatus::Confirmed, "STATUS:CONFIRMED"),
            (BookingStatus::Completed, "STATUS:CONFIRMED"),
            (BookingStatus::Cancelled, "STATUS:CANCELLED"),
        ];
        for (status, expected) in cases {
            let mut b = booking(None);
            b.status = status;
            let ics = generate_ics(&b, "Clinic").unwrap();
            assert!(ics.contains(expected), "{status:?}: {ics}");
        }
    }
}
