//! Mentor/mentoree pairing over a classified roster, plus the analytics and
//! integrity checks that run on the resulting member and mentorship tables.

pub mod analytics;
pub mod assignment;
pub mod discrepancy;
pub mod domain;
pub mod pipeline;
pub mod report;
pub mod roles;
pub mod tables;

#[cfg(test)]
mod tests;

pub use analytics::{
    median_age_of_recent_male_mentorees, mentoree_gender_counts_for_senior_mentors,
};
pub use assignment::{assign_mentorships, mentor_load, AssignmentError};
pub use discrepancy::{
    check_discrepancies, Discrepancy, DiscrepancyCategory, DiscrepancyKind, DiscrepancyReport,
};
pub use domain::{Mentorship, MentorshipId};
pub use pipeline::{run_pipeline, ClassificationCounts, PipelineError, PipelineOutcome};
pub use report::{DiscrepancyView, GenderCountEntry, MentorLoadEntry, PipelineSummary};
pub use roles::{classify, role_for, Classification, ClassificationError, ClassificationField, Role};
pub use tables::{export_csv, ExportedTables, MemberTable, MentorshipTable, TableExportError};
