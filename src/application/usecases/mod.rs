pub mod availability;
pub mod bookings;
pub mod discounts;
pub mod payments;
pub mod rooms;
pub mod sweep;
