use super::domain::MentorshipId;
use super::roles::{is_mentor_candidate, is_mentoree_candidate};
use super::tables::{MemberTable, MentorshipTable};
use crate::workflows::roster::MemberId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyCategory {
    Referential,
    Uniqueness,
    Role,
    Completeness,
}

impl DiscrepancyCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Referential => "Referential integrity",
            Self::Uniqueness => "Uniqueness",
            Self::Role => "Role integrity",
            Self::Completeness => "Completeness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    UnresolvedMentor,
    UnresolvedMentoree,
    DuplicateMemberId,
    DuplicateMentorshipId,
    IneligibleMentor,
    IneligibleMentoree,
    UnassignedMentoree,
    MentoreeAssignedMultipleTimes,
}

impl DiscrepancyKind {
    pub const fn category(self) -> DiscrepancyCategory {
        match self {
            Self::UnresolvedMentor | Self::UnresolvedMentoree => DiscrepancyCategory::Referential,
            Self::DuplicateMemberId | Self::DuplicateMentorshipId => {
                DiscrepancyCategory::Uniqueness
            }
            Self::IneligibleMentor | Self::IneligibleMentoree => DiscrepancyCategory::Role,
            Self::UnassignedMentoree | Self::MentoreeAssignedMultipleTimes => {
                DiscrepancyCategory::Completeness
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnresolvedMentor => "Mentor does not exist",
            Self::UnresolvedMentoree => "Mentoree does not exist",
            Self::DuplicateMemberId => "Duplicate member id",
            Self::DuplicateMentorshipId => "Duplicate mentorship id",
            Self::IneligibleMentor => "Mentor fails eligibility",
            Self::IneligibleMentoree => "Mentoree fails eligibility",
            Self::UnassignedMentoree => "Mentoree has no mentor",
            Self::MentoreeAssignedMultipleTimes => "Mentoree has several mentors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentorship_id: Option<MentorshipId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<MemberId>,
}

impl Discrepancy {
    pub fn category(&self) -> DiscrepancyCategory {
        self.kind.category()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscrepancyReport {
    pub violations: Vec<Discrepancy>,
}

impl DiscrepancyReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn of_kind(&self, kind: DiscrepancyKind) -> impl Iterator<Item = &Discrepancy> {
        self.violations.iter().filter(move |violation| violation.kind == kind)
    }

    pub fn counts_by_category(&self) -> BTreeMap<DiscrepancyCategory, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.category()).or_insert(0) += 1;
        }
        counts
    }

    fn push(
        &mut self,
        kind: DiscrepancyKind,
        mentorship_id: Option<MentorshipId>,
        member_ids: Vec<MemberId>,
    ) {
        self.violations.push(Discrepancy {
            kind,
            mentorship_id,
            member_ids,
        });
    }
}

/// Validate the joined dataset. Violations are collected, never raised.
///
/// Role integrity is only evaluated for references that resolve; an
/// unresolved reference is reported once, as a referential violation.
pub fn check_discrepancies(
    members: &MemberTable,
    mentorships: &MentorshipTable,
) -> DiscrepancyReport {
    let mut report = DiscrepancyReport::default();

    let mut member_ids: HashSet<&MemberId> = HashSet::new();
    let mut reported_members: HashSet<&MemberId> = HashSet::new();
    for member in members.rows() {
        if !member_ids.insert(&member.id) && reported_members.insert(&member.id) {
            report.push(DiscrepancyKind::DuplicateMemberId, None, vec![member.id.clone()]);
        }
    }

    let mut mentorship_ids: HashSet<MentorshipId> = HashSet::new();
    let mut reported_mentorships: HashSet<MentorshipId> = HashSet::new();
    let mut assignments: HashMap<&MemberId, Vec<MentorshipId>> = HashMap::new();

    for row in mentorships.join(members) {
        let mentorship = row.mentorship;
        if !mentorship_ids.insert(mentorship.id) && reported_mentorships.insert(mentorship.id) {
            report.push(
                DiscrepancyKind::DuplicateMentorshipId,
                Some(mentorship.id),
                Vec::new(),
            );
        }

        match row.mentor {
            None => report.push(
                DiscrepancyKind::UnresolvedMentor,
                Some(mentorship.id),
                vec![mentorship.mentor_id.clone()],
            ),
            Some(mentor) if !is_mentor_candidate(mentor) => report.push(
                DiscrepancyKind::IneligibleMentor,
                Some(mentorship.id),
                vec![mentor.id.clone()],
            ),
            Some(_) => {}
        }

        match row.mentoree {
            None => report.push(
                DiscrepancyKind::UnresolvedMentoree,
                Some(mentorship.id),
                vec![mentorship.mentoree_id.clone()],
            ),
            Some(mentoree) if !is_mentoree_candidate(mentoree) => report.push(
                DiscrepancyKind::IneligibleMentoree,
                Some(mentorship.id),
                vec![mentoree.id.clone()],
            ),
            Some(_) => {}
        }

        assignments
            .entry(&mentorship.mentoree_id)
            .or_default()
            .push(mentorship.id);
    }

    let mut checked: HashSet<&MemberId> = HashSet::new();
    for member in members.rows() {
        if !is_mentoree_candidate(member) || !checked.insert(&member.id) {
            continue;
        }
        match assignments.get(&member.id).map(Vec::len).unwrap_or(0) {
            0 => report.push(
                DiscrepancyKind::UnassignedMentoree,
                None,
                vec![member.id.clone()],
            ),
            1 => {}
            _ => report.push(
                DiscrepancyKind::MentoreeAssignedMultipleTimes,
                None,
                vec![member.id.clone()],
            ),
        }
    }

    for violation in &report.violations {
        warn!(
            kind = violation.kind.label(),
            category = violation.category().label(),
            mentorship_id = ?violation.mentorship_id,
            member_ids = ?violation.member_ids,
            "discrepancy found"
        );
    }
    info!(violations = report.violations.len(), "discrepancy check completed");
    report
}
