use super::analytics::{
    median_age_of_recent_male_mentorees, mentoree_gender_counts_for_senior_mentors,
};
use super::assignment::{assign_mentorships, AssignmentError};
use super::discrepancy::{check_discrepancies, DiscrepancyReport};
use super::roles::classify;
use super::tables::{MemberTable, MentorshipTable};
use crate::workflows::roster::{Gender, RecordRejection, RosterImport};
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationCounts {
    pub mentors: usize,
    pub mentorees: usize,
    pub unassigned: usize,
}

/// Everything a single batch run produces. Read-only once built.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub members: MemberTable,
    pub mentorships: MentorshipTable,
    pub rejected: Vec<RecordRejection>,
    pub classification: ClassificationCounts,
    pub median_age_of_recent_male_mentorees: Option<f64>,
    pub senior_mentor_gender_counts: BTreeMap<Gender, usize>,
    pub discrepancies: DiscrepancyReport,
}

/// Classify, assign, then run analytics and the discrepancy check over the
/// resulting tables. Only a missing mentor pool aborts the run.
pub fn run_pipeline(import: RosterImport) -> Result<PipelineOutcome, PipelineError> {
    let RosterImport { members, rejected } = import;
    info!(
        members = members.len(),
        rejected = rejected.len(),
        "starting mentorship pipeline"
    );

    let classification = classify(&members);
    let counts = ClassificationCounts {
        mentors: classification.mentors.len(),
        mentorees: classification.mentorees.len(),
        unassigned: classification.unassigned,
    };
    let mentorships = assign_mentorships(&classification).map_err(|err| {
        warn!(%err, "mentorship assignment aborted");
        err
    })?;

    let members = MemberTable::new(members);
    let mentorships = MentorshipTable::new(mentorships);

    let median_age = median_age_of_recent_male_mentorees(&members, &mentorships);
    match median_age {
        Some(median) => info!(median, "median age of recent male mentorees"),
        None => warn!("no male mentorees registered on or after 2010-01-01"),
    }

    let gender_counts = mentoree_gender_counts_for_senior_mentors(&members, &mentorships);
    info!(?gender_counts, "mentorees of senior mentors by gender");

    let discrepancies = check_discrepancies(&members, &mentorships);

    Ok(PipelineOutcome {
        members,
        mentorships,
        rejected,
        classification: counts,
        median_age_of_recent_male_mentorees: median_age,
        senior_mentor_gender_counts: gender_counts,
        discrepancies,
    })
}
