//! Read-only tabular views over members and mentorships, joined through an
//! identifier index rather than by position.

use super::domain::Mentorship;
use crate::workflows::roster::{Member, MemberId};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    rows: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl MemberTable {
    /// Builds the table; on duplicate ids the index keeps the first row.
    pub fn new(rows: Vec<Member>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (position, member) in rows.iter().enumerate() {
            index.entry(member.id.clone()).or_insert(position);
        }
        Self { rows, index }
    }

    pub fn rows(&self) -> &[Member] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &MemberId) -> Option<&Member> {
        self.index.get(id).map(|&position| &self.rows[position])
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for member in &self.rows {
            csv_writer.serialize(MemberCsvRow::from(member))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MentorshipTable {
    rows: Vec<Mentorship>,
}

impl MentorshipTable {
    pub fn new(rows: Vec<Mentorship>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Mentorship] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Left join of every mentorship with its mentor and mentoree rows.
    pub fn join<'a>(
        &'a self,
        members: &'a MemberTable,
    ) -> impl Iterator<Item = JoinedMentorship<'a>> {
        self.rows.iter().map(move |mentorship| JoinedMentorship {
            mentorship,
            mentor: members.get(&mentorship.mentor_id),
            mentoree: members.get(&mentorship.mentoree_id),
        })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for mentorship in &self.rows {
            csv_writer.serialize(mentorship)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JoinedMentorship<'a> {
    pub mentorship: &'a Mentorship,
    pub mentor: Option<&'a Member>,
    pub mentoree: Option<&'a Member>,
}

#[derive(Debug, Serialize)]
struct MemberCsvRow<'a> {
    id: &'a str,
    full_name: &'a str,
    email: &'a str,
    age: u32,
    gender: &'static str,
    id_value: Option<&'a str>,
    registered_at: String,
    address: String,
}

impl<'a> From<&'a Member> for MemberCsvRow<'a> {
    fn from(member: &'a Member) -> Self {
        Self {
            id: member.id.as_str(),
            full_name: &member.full_name,
            email: &member.email,
            age: member.age,
            gender: member.gender.label(),
            id_value: member.id_value.as_deref(),
            registered_at: member.registered_at.to_rfc3339(),
            address: member.address.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableExportError {
    #[error("failed to create export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone)]
pub struct ExportedTables {
    pub members: PathBuf,
    pub mentorships: PathBuf,
}

/// Writes `members.csv` and `mentorships.csv` into `dir`, creating it if needed.
pub fn export_csv(
    dir: &Path,
    members: &MemberTable,
    mentorships: &MentorshipTable,
) -> Result<ExportedTables, TableExportError> {
    std::fs::create_dir_all(dir)?;
    let exported = ExportedTables {
        members: dir.join("members.csv"),
        mentorships: dir.join("mentorships.csv"),
    };

    members.write_csv(std::fs::File::create(&exported.members)?)?;
    mentorships.write_csv(std::fs::File::create(&exported.mentorships)?)?;

    info!(
        members = %exported.members.display(),
        mentorships = %exported.mentorships.display(),
        "exported tables"
    );
    Ok(exported)
}
