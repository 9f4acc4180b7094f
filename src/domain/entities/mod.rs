pub mod booking_details;
pub mod bookings;
pub mod discounts;
pub mod payments;
pub mod room_types;
pub mod rooms;
