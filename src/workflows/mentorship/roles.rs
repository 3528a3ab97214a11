use crate::workflows::roster::{Gender, Member};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::info;

pub const MENTOR_MIN_AGE: u32 = 40;
/// Mentorees must be strictly younger than this.
pub const MENTOREE_AGE_LIMIT: u32 = 30;

/// Latest registration instant (inclusive) for a mentor: 2004-01-01T00:00:00Z.
pub fn mentor_registration_cutoff() -> DateTime<Utc> {
    utc_midnight(2004, 1, 1)
}

pub(crate) fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid calendar date")
        .and_utc()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Mentor,
    Mentoree,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mentor => "Mentor",
            Self::Mentoree => "Mentoree",
        }
    }
}

pub fn is_mentor_candidate(member: &Member) -> bool {
    member.gender == Gender::Female
        && member.age >= MENTOR_MIN_AGE
        && member.registered_at <= mentor_registration_cutoff()
}

pub fn is_mentoree_candidate(member: &Member) -> bool {
    member.age < MENTOREE_AGE_LIMIT
}

/// The role a member is eligible for, if any. The age thresholds keep the
/// two predicates disjoint.
pub fn role_for(member: &Member) -> Option<Role> {
    if is_mentor_candidate(member) {
        Some(Role::Mentor)
    } else if is_mentoree_candidate(member) {
        Some(Role::Mentoree)
    } else {
        None
    }
}

#[derive(Debug, Default, Clone)]
pub struct Classification<'a> {
    pub mentors: Vec<&'a Member>,
    pub mentorees: Vec<&'a Member>,
    /// Members matching neither predicate; they take part in no mentorship.
    pub unassigned: usize,
}

pub fn classify(members: &[Member]) -> Classification<'_> {
    let mut classification = Classification::default();

    for member in members {
        match role_for(member) {
            Some(Role::Mentor) => classification.mentors.push(member),
            Some(Role::Mentoree) => classification.mentorees.push(member),
            None => classification.unassigned += 1,
        }
    }

    info!(
        mentors = classification.mentors.len(),
        mentorees = classification.mentorees.len(),
        unassigned = classification.unassigned,
        "classified roster"
    );
    classification
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationField {
    Age,
    Gender,
    RegisteredAt,
}

impl fmt::Display for ClassificationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::RegisteredAt => "registration timestamp",
        })
    }
}

/// A record whose age, gender or registration timestamp is missing or cannot
/// be read, so it cannot be placed in either candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("cannot classify member: {field} {reason} (got {value})")]
pub struct ClassificationError {
    pub field: ClassificationField,
    pub value: String,
    pub reason: &'static str,
}

impl ClassificationError {
    pub(crate) fn missing(field: ClassificationField) -> Self {
        Self {
            field,
            value: Value::Null.to_string(),
            reason: "is missing",
        }
    }

    pub(crate) fn age(value: &Value, reason: &'static str) -> Self {
        Self {
            field: ClassificationField::Age,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn gender(value: &Value) -> Self {
        Self {
            field: ClassificationField::Gender,
            value: value.to_string(),
            reason: "must be one of male, female or other",
        }
    }

    pub(crate) fn registered_at(value: &Value) -> Self {
        Self {
            field: ClassificationField::RegisteredAt,
            value: value.to_string(),
            reason: "must be an RFC 3339 timestamp or YYYY-MM-DD date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mentorship::tests::common::member;

    #[test]
    fn mentor_requires_female_senior_early_registration() {
        assert!(is_mentor_candidate(&member("m1", Gender::Female, 40, "2003-12-31")));
        assert!(!is_mentor_candidate(&member("m2", Gender::Male, 55, "2001-01-01")));
        assert!(!is_mentor_candidate(&member("m3", Gender::Female, 39, "2001-01-01")));
        assert!(!is_mentor_candidate(&member("m4", Gender::Female, 50, "2004-01-02")));
    }

    #[test]
    fn mentor_cutoff_is_inclusive() {
        let at_cutoff = member("edge", Gender::Female, 45, "2004-01-01");
        assert_eq!(at_cutoff.registered_at, mentor_registration_cutoff());
        assert!(is_mentor_candidate(&at_cutoff));

        let mut after = at_cutoff.clone();
        after.registered_at = after.registered_at + chrono::Duration::seconds(1);
        assert!(!is_mentor_candidate(&after));
    }

    #[test]
    fn mentoree_threshold_is_exclusive() {
        assert_eq!(
            role_for(&member("y", Gender::Female, 29, "2015-01-01")),
            Some(Role::Mentoree)
        );
        assert_eq!(role_for(&member("z", Gender::Male, 30, "2015-01-01")), None);
        assert_eq!(role_for(&member("k", Gender::Other, 0, "2015-01-01")), Some(Role::Mentoree));
    }

    #[test]
    fn classify_partitions_and_counts_unassigned() {
        let members = vec![
            member("mentor", Gender::Female, 62, "2000-05-01"),
            member("mentoree", Gender::Male, 21, "2012-05-01"),
            member("neither", Gender::Male, 45, "2000-05-01"),
        ];

        let classification = classify(&members);
        assert_eq!(classification.mentors.len(), 1);
        assert_eq!(classification.mentorees.len(), 1);
        assert_eq!(classification.unassigned, 1);
        assert_eq!(classification.mentors[0].id.as_str(), "mentor");
        assert_eq!(classification.mentorees[0].id.as_str(), "mentoree");
    }
}
