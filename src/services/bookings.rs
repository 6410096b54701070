use chrono::NaiveDate;

use crate::db::queries::now_timestamp;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::services::backend::Backend;
use crate::services::intake::{validate_booking, BookingForm};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub query: Option<String>,
}

impl BookingFilter {
    /// Builds a filter from the list view's query parameters; `all` or an
    /// empty value means no status filter.
    pub fn from_params(status: Option<&str>, query: Option<&str>) -> Result<Self, AppError> {
        let status = match status.map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(
                BookingStatus::from_name(s)
                    .ok_or_else(|| AppError::validation("status", format!("unknown status: {s}")))?,
            ),
        };
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Ok(Self { status, query })
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }

        match &self.query {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                booking.name.to_lowercase().contains(&needle)
                    || booking
                        .email
                        .as_deref()
                        .map(|e| e.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || booking.phone.contains(q.as_str())
            }
        }
    }
}

pub fn filter_bookings(bookings: Vec<Booking>, filter: &BookingFilter) -> Vec<Booking> {
    bookings.into_iter().filter(|b| filter.matches(b)).collect()
}

/// Validates the form and writes exactly one new `pending` booking.
pub async fn submit_booking(
    backend: &dyn Backend,
    form: &BookingForm,
    today: NaiveDate,
) -> Result<Booking, AppError> {
    let new_booking = validate_booking(form, today)?;

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        name: new_booking.name,
        email: new_booking.email,
        phone: new_booking.phone,
        appointment_date: new_booking.appointment_date,
        appointment_time: new_booking.appointment_time,
        service_type: new_booking.service_type,
        message: new_booking.message,
        status: BookingStatus::Pending,
        created_at: now_timestamp(),
    };

    let booking = backend.insert_booking(&booking).await?;
    tracing::info!(booking_id = %booking.id, service = %booking.service_type, "booking submitted");

    Ok(booking)
}

/// Moves a pending booking to `confirmed` or `cancelled` and returns the
/// record as it now stands.
pub async fn transition_booking(
    backend: &dyn Backend,
    id: &str,
    target: BookingStatus,
) -> Result<Booking, AppError> {
    let mut booking = backend
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !booking.status.can_transition_to(target) {
        return Err(AppError::InvalidTransition {
            from: booking.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    if !backend.update_booking_status(id, target).await? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(booking_id = %id, status = target.as_str(), "booking status updated");
    booking.status = target;
    Ok(booking)
}
