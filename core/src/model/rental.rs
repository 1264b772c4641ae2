use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "p" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "cancelled" | "canceled" | "c" => Ok(PaymentStatus::Cancelled),
            other => Err(anyhow!("Unknown payment status: '{}'", other)),
        }
    }
}

/// Vehicle attributes joined onto a rental row by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VehicleInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(rename = "type", default)]
    pub vehicle_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RentalRecord {
    pub id: Uuid,
    pub renter_name: String,
    #[serde(default)]
    pub renter_phone: String,
    #[serde(default)]
    pub destination: String,
    pub vehicle_id: Uuid,
    #[serde(default)]
    pub driver_id: Option<Uuid>,

    // Kept as the raw strings the store hands back. A malformed date must not
    // make the whole row unreadable; analytics parses them leniently.
    pub start_date: String,
    pub end_date: String,

    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub payment_amount: i64,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub vehicle: Option<VehicleInfo>,
}

impl RentalRecord {
    pub fn new(renter_name: String, vehicle_id: Uuid, start_date: String, end_date: String, payment_amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            renter_name,
            renter_phone: String::new(),
            destination: String::new(),
            vehicle_id,
            driver_id: None,
            start_date,
            end_date,
            payment_status: PaymentStatus::default(),
            payment_amount,
            created_at: Utc::now(),
            vehicle: None,
        }
    }

    /// Vehicle category used for income grouping, if the joined vehicle has one.
    pub fn category(&self) -> Option<&str> {
        self.vehicle.as_ref().and_then(|v| v.vehicle_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_row() {
        let json = r#"{
            "id": "7d9f2c1e-4b7a-4c1e-9a55-0f1f3c2b8a10",
            "renter_name": "Budi",
            "renter_phone": "0812",
            "destination": "Bandung",
            "vehicle_id": "0b3c1f8e-2a44-4f0e-8d1b-6a7e5c9d2f31",
            "driver_id": null,
            "start_date": "2026-10-01",
            "end_date": "2026-10-03",
            "payment_status": "paid",
            "payment_amount": 1500000,
            "created_at": "2026-10-01T08:00:00Z",
            "vehicle": { "name": "Hiace", "plate_number": "D 1234 AB", "type": "bus" }
        }"#;

        let rental: RentalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rental.payment_status, PaymentStatus::Paid);
        assert_eq!(rental.payment_amount, 1_500_000);
        assert_eq!(rental.category(), Some("bus"));
        assert!(rental.driver_id.is_none());
    }

    #[test]
    fn test_missing_vehicle_has_no_category() {
        let json = r#"{
            "id": "7d9f2c1e-4b7a-4c1e-9a55-0f1f3c2b8a10",
            "renter_name": "Sari",
            "vehicle_id": "0b3c1f8e-2a44-4f0e-8d1b-6a7e5c9d2f31",
            "start_date": "not a date",
            "end_date": "",
            "payment_status": "cancelled",
            "payment_amount": 0,
            "created_at": "2026-10-01T08:00:00Z"
        }"#;

        let rental: RentalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rental.payment_status, PaymentStatus::Cancelled);
        assert_eq!(rental.category(), None);
        assert_eq!(rental.start_date, "not a date");
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("PAID".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("canceled".parse::<PaymentStatus>().unwrap(), PaymentStatus::Cancelled);
        assert_eq!("p".parse::<PaymentStatus>().unwrap(), PaymentStatus::Pending);
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }
}
