pub mod file;
pub mod traits;

pub use file::FileRentalRepository;
pub use traits::RentalRepository;
