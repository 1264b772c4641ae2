pub mod aggregator;
pub mod display;
