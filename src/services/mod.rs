pub mod bookings;
pub mod email;
pub mod notifications;
