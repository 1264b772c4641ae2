use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::model::rental::RentalRecord;
use crate::repository::traits::RentalRepository;

const DEFAULT_FILE_NAME: &str = "rentals.json";
const DEFAULT_DIR_NAME: &str = ".fleetrent";
const TEMP_SUFFIX: &str = "tmp";

/// Rentals kept as a JSON array in `rentals.json`.
#[derive(Clone)]
pub struct FileRentalRepository {
    file_path: PathBuf,
}

impl FileRentalRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(StoreError::HomeDirNotFound)?
                .join(DEFAULT_DIR_NAME),
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            info!(path = %path.display(), "initialising empty rental store");
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<RentalRecord>::new())?;
            writer.flush()?;
        }

        Ok(FileRentalRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_rentals(&self) -> Result<Vec<RentalRecord>> {
        if !self.file_path.exists() {
            return Err(StoreError::Missing(self.file_path.clone()));
        }
        let reader = BufReader::new(File::open(&self.file_path)?);
        let rentals: Vec<RentalRecord> = serde_json::from_reader(reader)?;
        debug!(count = rentals.len(), "read rentals");
        Ok(rentals)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.file_path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.file_path.with_file_name(name)
    }

    /// Writes the whole store to a sibling file and renames it over
    /// `rentals.json`, so a failed write leaves the previous store in place.
    fn write_rentals(&self, rentals: &[RentalRecord]) -> Result<()> {
        let temp_path = self.temp_path();
        let written = File::create(&temp_path).map_err(StoreError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, rentals)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, &self.file_path)?;
        debug!(count = rentals.len(), "wrote rentals");
        Ok(())
    }
}

impl RentalRepository for FileRentalRepository {
    fn fetch_rentals(&self) -> Result<Vec<RentalRecord>> {
        self.read_rentals()
    }

    fn create(&self, rental: RentalRecord) -> Result<RentalRecord> {
        let mut rentals = self.read_rentals()?;
        rentals.push(rental.clone());
        self.write_rentals(&rentals)?;
        info!(id = %rental.id, "rental recorded");
        Ok(rental)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rental::PaymentStatus;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn test_new_initialises_empty_store() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().join("nested"))).unwrap();

        assert!(repo.path().exists());
        assert!(repo.fetch_rentals().unwrap().is_empty());
    }

    #[test]
    fn test_create_then_fetch() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut rental = RentalRecord::new(
            "Sari".to_string(),
            Uuid::new_v4(),
            "2026-10-01".to_string(),
            "2026-10-02".to_string(),
            900_000,
        );
        rental.payment_status = PaymentStatus::Paid;
        let created = repo.create(rental.clone()).unwrap();

        let fetched = repo.fetch_rentals().unwrap();
        assert_eq!(fetched, vec![created]);

        // A second handle on the same directory sees the same data
        let reopened = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.fetch_rentals().unwrap().len(), 1);
    }

    #[test]
    fn test_create_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();

        repo.create(RentalRecord::new(
            "Sari".to_string(),
            Uuid::new_v4(),
            "2026-10-01".to_string(),
            "2026-10-02".to_string(),
            900_000,
        )).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path()).unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("rentals.json")]);
    }

    #[test]
    fn test_failed_write_keeps_previous_store() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let first = RentalRecord::new(
            "Budi".to_string(),
            Uuid::new_v4(),
            "2026-10-01".to_string(),
            "2026-10-03".to_string(),
            1_500_000,
        );
        repo.create(first.clone()).unwrap();
        let before = fs::read_to_string(repo.path()).unwrap();

        // Block the sibling file so the next write cannot be staged
        fs::create_dir(repo.temp_path()).unwrap();
        let second = RentalRecord::new(
            "Sari".to_string(),
            Uuid::new_v4(),
            "2026-10-05".to_string(),
            "2026-10-06".to_string(),
            900_000,
        );
        assert!(matches!(repo.create(second), Err(StoreError::Io(_))));

        assert_eq!(fs::read_to_string(repo.path()).unwrap(), before);
        assert_eq!(repo.fetch_rentals().unwrap(), vec![first]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.path(), "{ not json").unwrap();

        assert!(matches!(repo.fetch_rentals(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_removed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let repo = FileRentalRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::remove_file(repo.path()).unwrap();

        assert!(matches!(repo.fetch_rentals(), Err(StoreError::Missing(_))));
    }
}
