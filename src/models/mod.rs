pub mod booking;
pub mod notification;

pub use booking::{Booking, BookingRequest, BookingStatus, NewBooking, ALLOWED_TRANSITIONS};
pub use notification::{Delivery, NotificationKind, NotificationRecord};
