use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{NewBooking, ServiceType};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^\+?[0-9\s\-()]{10,}$").unwrap();
}

/// Half-hour slots offered to patients; lunch break between 12:30 and 14:00.
pub const TIME_SLOTS: [&str; 16] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "14:00", "14:30",
    "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

/// Raw intake form as posted by the marketing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub appointment_time: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Checks a submission and produces the record to insert.
///
/// `today` is the earliest date a patient may pick.
pub fn validate_booking(form: &BookingForm, today: NaiveDate) -> Result<NewBooking, AppError> {
    let name = form.name.trim();
    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() {
        let field = if name.is_empty() { "name" } else { "phone" };
        return Err(AppError::validation(
            field,
            "Please fill in all required fields",
        ));
    }

    let date = form.appointment_date.trim();
    let time = form.appointment_time.trim();
    if date.is_empty() || time.is_empty() {
        let field = if date.is_empty() {
            "appointment_date"
        } else {
            "appointment_time"
        };
        return Err(AppError::validation(
            field,
            "Please select appointment date and time",
        ));
    }

    let email = non_empty(form.email.as_deref());
    if let Some(email) = &email {
        if !EMAIL.is_match(email) {
            return Err(AppError::validation(
                "email",
                "Please enter a valid email address",
            ));
        }
    }

    if !PHONE.is_match(phone) {
        return Err(AppError::validation(
            "phone",
            "Please enter a valid phone number",
        ));
    }

    let appointment_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::validation("appointment_date", "Please select a valid appointment date")
    })?;
    if appointment_date < today {
        return Err(AppError::validation(
            "appointment_date",
            "Appointment date cannot be in the past",
        ));
    }

    let slot = TIME_SLOTS
        .iter()
        .find(|slot| **slot == time)
        .ok_or_else(|| {
            AppError::validation("appointment_time", "Please select an available time slot")
        })?;

    let service = ServiceType::from_name(form.service_type.as_deref().unwrap_or(""))
        .ok_or_else(|| AppError::validation("service_type", "Please select a listed service"))?;

    Ok(NewBooking {
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        appointment_date,
        appointment_time: slot.to_string(),
        service_type: service.as_str().to_string(),
        message: non_empty(form.message.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn valid_form() -> BookingForm {
        BookingForm {
            name: "  Hana Tesfaye ".to_string(),
            email: Some("hana@example.com".to_string()),
            phone: "+251 (911) 234-567".to_string(),
            appointment_date: "2025-06-16".to_string(),
            appointment_time: "14:30".to_string(),
            service_type: Some("Teeth Whitening".to_string()),
            message: Some("   ".to_string()),
        }
    }

    fn field_of(err: AppError) -> &'static str {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form() {
        let booking = validate_booking(&valid_form(), today()).unwrap();
        assert_eq!(booking.name, "Hana Tesfaye");
        assert_eq!(booking.service_type, "Teeth Whitening");
        assert_eq!(booking.appointment_time, "14:30");
        assert_eq!(booking.message, None);
    }

    #[test]
    fn test_missing_name_or_phone() {
        let mut form = valid_form();
        form.name = "   ".to_string();
        assert_eq!(field_of(validate_booking(&form, today()).unwrap_err()), "name");

        let mut form = valid_form();
        form.phone = String::new();
        assert_eq!(field_of(validate_booking(&form, today()).unwrap_err()), "phone");
    }

    #[test]
    fn test_date_and_time_required() {
        let mut form = valid_form();
        form.appointment_time = String::new();
        assert_eq!(
            field_of(validate_booking(&form, today()).unwrap_err()),
            "appointment_time"
        );
    }

    #[test]
    fn test_email_optional_but_checked() {
        let mut form = valid_form();
        form.email = Some(String::new());
        assert_eq!(validate_booking(&form, today()).unwrap().email, None);

        for bad in ["hana", "hana@example", "ha na@example.com", "@example.com"] {
            form.email = Some(bad.to_string());
            assert_eq!(
                field_of(validate_booking(&form, today()).unwrap_err()),
                "email",
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_phone_pattern() {
        let mut form = valid_form();
        for bad in ["12345", "0911-abc-4567", "++2519112345"] {
            form.phone = bad.to_string();
            assert_eq!(
                field_of(validate_booking(&form, today()).unwrap_err()),
                "phone",
                "{bad} should be rejected"
            );
        }

        form.phone = "0911234567".to_string();
        assert!(validate_booking(&form, today()).is_ok());
    }

    #[test]
    fn test_past_date_and_unknown_slot() {
        let mut form = valid_form();
        form.appointment_date = "2025-06-09".to_string();
        assert_eq!(
            field_of(validate_booking(&form, today()).unwrap_err()),
            "appointment_date"
        );

        form.appointment_date = "2025-06-10".to_string();
        form.appointment_time = "13:00".to_string();
        assert_eq!(
            field_of(validate_booking(&form, today()).unwrap_err()),
            "appointment_time"
        );
    }

    #[test]
    fn test_service_defaults_and_rejects_unknown() {
        let mut form = valid_form();
        form.service_type = None;
        assert_eq!(
            validate_booking(&form, today()).unwrap().service_type,
            "Consultation"
        );

        form.service_type = Some("Root Canal".to_string());
        assert_eq!(
            field_of(validate_booking(&form, today()).unwrap_err()),
            "service_type"
        );
    }
}
