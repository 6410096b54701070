use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub service_type: String,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

/// A validated intake submission, ready to be written with status `pending`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub service_type: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Lenient parse for stored rows: anything unrecognised reads as pending.
    pub fn parse(s: &str) -> Self {
        Self::from_name(s).unwrap_or_default()
    }

    /// Strict parse for values supplied by a caller.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Only pending bookings expose actions; everything else is terminal.
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        *self == BookingStatus::Pending
            && matches!(target, BookingStatus::Confirmed | BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Consultation,
    CosmeticDentistry,
    DentalImplants,
    Orthodontics,
    TeethWhitening,
    GeneralCheckup,
    EmergencyVisit,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Consultation,
        ServiceType::CosmeticDentistry,
        ServiceType::DentalImplants,
        ServiceType::Orthodontics,
        ServiceType::TeethWhitening,
        ServiceType::GeneralCheckup,
        ServiceType::EmergencyVisit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Consultation => "Consultation",
            ServiceType::CosmeticDentistry => "Cosmetic Dentistry",
            ServiceType::DentalImplants => "Dental Implants",
            ServiceType::Orthodontics => "Orthodontics",
            ServiceType::TeethWhitening => "Teeth Whitening",
            ServiceType::GeneralCheckup => "General Checkup",
            ServiceType::EmergencyVisit => "Emergency Visit",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Some(ServiceType::Consultation);
        }
        Self::ALL
            .into_iter()
            .find(|svc| svc.as_str().eq_ignore_ascii_case(s))
    }
}
