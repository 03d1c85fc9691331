pub mod admin;
pub mod bookings;
pub mod dev;
pub mod health;
