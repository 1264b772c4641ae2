pub mod period;
pub mod rental;
pub mod summary;
