use crate::error::Result;
use crate::model::rental::RentalRecord;

/// Source of rental rows, already joined with the vehicle attributes
/// needed for category grouping.
pub trait RentalRepository {
    fn fetch_rentals(&self) -> Result<Vec<RentalRecord>>;
    fn create(&self, rental: RentalRecord) -> Result<RentalRecord>;
}
