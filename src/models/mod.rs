pub mod booking;
pub mod gallery;
pub mod session;

pub use booking::{Booking, BookingStatus, NewBooking, ServiceType};
pub use gallery::{Gallery, GalleryImage, GalleryInput};
pub use session::{AdminUser, Session};
