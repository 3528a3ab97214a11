//! Roster ingestion: turns provider records into immutable [`Member`]s.
//!
//! Records that cannot be converted are isolated and reported in
//! [`RosterImport::rejected`]; only unreadable documents fail the import.

pub mod domain;
mod fetch;
mod parser;

use std::io::Read;
use std::path::Path;

pub use domain::{Address, Gender, Member, MemberId};
pub use fetch::{FetchError, RandomUserClient};
pub use parser::{MalformedRecordError, RecordError, RecordRejection, RosterImport};

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster document: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RosterImport, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RosterImport, RosterImportError> {
        Ok(parser::parse_document(reader)?)
    }
}
