use super::domain::{Mentorship, MentorshipId};
use super::roles::Classification;
use crate::workflows::roster::{Member, MemberId};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const PROGRESS_INTERVAL: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("no mentors available for {mentorees} mentoree candidate(s)")]
    NoMentorsAvailable { mentorees: usize },
}

/// Pair every mentoree candidate with a mentor, round-robin over both sets
/// sorted by registration time (ties broken by member id).
///
/// The i-th mentoree is paired with mentor `i mod M`, so output order is the
/// mentoree order and mentor loads differ by at most one.
pub fn assign_mentorships(
    classification: &Classification<'_>,
) -> Result<Vec<Mentorship>, AssignmentError> {
    let mentors = registration_order(&classification.mentors);
    let mentorees = registration_order(&classification.mentorees);

    if mentorees.is_empty() {
        warn!(mentors = mentors.len(), "no mentorees available for assignment");
        return Ok(Vec::new());
    }
    if mentors.is_empty() {
        return Err(AssignmentError::NoMentorsAvailable {
            mentorees: mentorees.len(),
        });
    }

    info!(
        mentors = mentors.len(),
        mentorees = mentorees.len(),
        "assigning mentorships round-robin"
    );

    let mentorships: Vec<Mentorship> = mentorees
        .iter()
        .enumerate()
        .map(|(index, mentoree)| {
            let mentor = mentors[index % mentors.len()];
            debug!(
                mentoree = %mentoree.full_name,
                mentor = %mentor.full_name,
                "assigned mentoree"
            );
            if (index + 1) % PROGRESS_INTERVAL == 0 {
                info!(assigned = index + 1, "mentorship assignment progress");
            }
            Mentorship {
                id: MentorshipId::for_pair(&mentor.id, &mentoree.id),
                mentor_id: mentor.id.clone(),
                mentoree_id: mentoree.id.clone(),
            }
        })
        .collect();

    info!(pairs = mentorships.len(), "mentorship assignment completed");
    Ok(mentorships)
}

fn registration_order<'a>(members: &[&'a Member]) -> Vec<&'a Member> {
    let mut ordered = members.to_vec();
    ordered.sort_by(|a, b| {
        a.registered_at
            .cmp(&b.registered_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

/// Number of mentorees assigned to each mentor, keyed by mentor id.
pub fn mentor_load(mentorships: &[Mentorship]) -> BTreeMap<MemberId, usize> {
    let mut load = BTreeMap::new();
    for mentorship in mentorships {
        *load.entry(mentorship.mentor_id.clone()).or_insert(0) += 1;
    }
    load
}
