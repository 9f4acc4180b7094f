pub mod booking_statuses;
pub mod discount_types;
pub mod payment_statuses;
pub mod room_statuses;
