pub mod auth;
pub mod backend;
pub mod bookings;
pub mod calendar;
pub mod carousel;
pub mod galleries;
pub mod intake;
pub mod storage;
