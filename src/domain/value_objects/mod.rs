pub mod bookings;
pub mod discounts;
pub mod enums;
pub mod iam;
pub mod payments;
pub mod rooms;
