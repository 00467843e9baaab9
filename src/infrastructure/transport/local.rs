//! Local Copy Transport
//!
//! Copies files into a directory on the local filesystem (`file://`).

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::ports::{source_file_name, TransferError, Transport};
use crate::domain::value_objects::{parse_flag, Destination, Scheme, TransferOutcome};
use crate::error::{FerryResult, Violation};

/// Options understood by `file://` destinations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalOptions {
    /// Create the backup directory (and parents) if it is missing
    pub create: bool,
}

impl LocalOptions {
    pub fn decode(destination: &Destination) -> FerryResult<Self> {
        let mut decoder = destination.options().decoder();
        let create = decoder.single("create").map(parse_flag).unwrap_or(false);
        decoder
            .finish()
            .map_err(|violations| destination.reject(violations))?;
        Ok(Self { create })
    }
}

/// Transport that copies into a local backup directory
#[derive(Debug)]
pub struct LocalCopy {
    destination: Destination,
    backup_dir: PathBuf,
}

impl LocalCopy {
    /// Validate the destination and prepare the backup directory.
    pub fn new(destination: Destination) -> FerryResult<Self> {
        if destination.scheme() != Scheme::File {
            return Err(destination.reject(vec![Violation::constraint(format!(
                "scheme must be 'file', got '{}'",
                destination.scheme()
            ))]));
        }
        let options = LocalOptions::decode(&destination)?;
        let backup_dir = PathBuf::from(destination.path());

        if !backup_dir.exists() {
            if !options.create {
                return Err(destination.reject(vec![Violation::constraint(format!(
                    "backup path {} does not exist",
                    backup_dir.display()
                ))]));
            }
            fs::create_dir_all(&backup_dir).map_err(|e| {
                destination.reject(vec![Violation::constraint(format!(
                    "cannot create backup path {}: {e}",
                    backup_dir.display()
                ))])
            })?;
            info!(path = %backup_dir.display(), "created backup path");
        }

        if !backup_dir.is_dir() {
            return Err(destination.reject(vec![Violation::constraint(format!(
                "backup path {} must be a directory",
                backup_dir.display()
            ))]));
        }

        Ok(Self {
            destination,
            backup_dir,
        })
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Where `source` lands inside the backup directory
    pub fn target_for(&self, source: &Path) -> Result<PathBuf, TransferError> {
        Ok(self.backup_dir.join(source_file_name(source)?))
    }
}

impl Transport for LocalCopy {
    fn kind(&self) -> &'static str {
        "local"
    }

    fn display_name(&self) -> String {
        self.destination.display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        let target = self.target_for(source)?;
        if same_file(source, &target) {
            return Ok(TransferOutcome::failed(format!(
                "{} is already inside the backup directory",
                source.display()
            )));
        }
        // Overwrites in place; an existing target keeps its permissions.
        let mut input = File::open(source)?;
        let mut output = File::create(&target)?;
        io::copy(&mut input, &mut output)?;
        output.sync_all()?;
        Ok(TransferOutcome::succeeded())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
