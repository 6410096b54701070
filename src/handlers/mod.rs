pub mod auth;
pub mod bookings;
pub mod galleries;
pub mod site;
