use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use fleetrent_core::{
    parse_amount, parse_args, parse_human_date, PaymentStatus, RentalRecord, VehicleInfo, RENTAL_KEYS,
};
use tracing::warn;
use uuid::Uuid;

/// Builds a rental from `fleetrent add` arguments. Free words form the renter
/// name; `amount:` and `vehicle:` are required, dates default to `today`.
pub fn build_rental(args: &[String], today: NaiveDate) -> Result<RentalRecord> {
    let (parsed, errors) = parse_args(args, RENTAL_KEYS);
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        warn!(errors = ?messages, "rejected add arguments");
        bail!("{}", messages.join("; "));
    }

    if parsed.text.is_empty() {
        bail!("Renter name is required.");
    }

    let fields = &parsed.fields;
    let amount = parse_amount(fields.get("amount").ok_or_else(|| anyhow!("amount: is required"))?)?;
    let vehicle_id = fields.get("vehicle")
        .ok_or_else(|| anyhow!("vehicle: is required"))
        .and_then(|v| Uuid::parse_str(v).with_context(|| format!("Invalid vehicle id '{}'", v)))?;

    let start = match fields.get("start") {
        Some(s) => parse_human_date(s, today).with_context(|| format!("Invalid start date '{}'", s))?,
        None => today,
    };
    let end = match fields.get("end") {
        Some(s) => parse_human_date(s, today).with_context(|| format!("Invalid end date '{}'", s))?,
        None => start,
    };

    let mut rental = RentalRecord::new(
        parsed.text,
        vehicle_id,
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
        amount,
    );

    if let Some(status) = fields.get("status") {
        rental.payment_status = status.parse::<PaymentStatus>()?;
    }
    if let Some(driver) = fields.get("driver") {
        rental.driver_id = Some(Uuid::parse_str(driver).with_context(|| format!("Invalid driver id '{}'", driver))?);
    }
    if let Some(phone) = fields.get("phone") {
        rental.renter_phone = phone.clone();
    }
    if let Some(destination) = fields.get("destination") {
        rental.destination = destination.clone();
    }
    if fields.contains_key("type") || fields.contains_key("name") {
        rental.vehicle = Some(VehicleInfo {
            name: fields.get("name").cloned(),
            plate_number: None,
            vehicle_type: fields.get("type").cloned(),
        });
    }

    Ok(rental)
}
