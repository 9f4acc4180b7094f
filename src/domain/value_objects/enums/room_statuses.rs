use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Display hint for the front desk. Never consulted for availability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Vacant,
    Occupied,
    Maintenance,
    Cleaning,
    Reserved,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Vacant => "vacant",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::Cleaning => "cleaning",
            RoomStatus::Reserved => "reserved",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "vacant" => Some(RoomStatus::Vacant),
            "occupied" => Some(RoomStatus::Occupied),
            "maintenance" => Some(RoomStatus::Maintenance),
            "cleaning" => Some(RoomStatus::Cleaning),
            "reserved" => Some(RoomStatus::Reserved),
            _ => None,
        }
    }
}

impl Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
