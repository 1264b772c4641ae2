pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use error::StoreError;
pub use model::rental::{RentalRecord, PaymentStatus, VehicleInfo};
pub use model::summary::{AggregateSummary, MonthlyIncomePoint, CategoryIncome};
pub use model::period::{ReportPeriod, filter_by_period};
pub use repository::{RentalRepository, FileRentalRepository};
pub use input::{parse_args, parse_amount, expand_key, ParsedInput, RENTAL_KEYS};
pub use time::{parse_human_date, parse_record_date};
pub use service::aggregator::{compute_summary, rental_duration_days, UNKNOWN_CATEGORY};
pub use service::display::{display_category, format_amount};
pub use usecase::report::{ReportUseCase, AccountingReport, recent_transactions};
