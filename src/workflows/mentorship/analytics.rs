use super::roles::utc_midnight;
use super::tables::{MemberTable, MentorshipTable};
use crate::workflows::roster::{Gender, MemberId};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const SENIOR_MENTOR_MIN_AGE: u32 = 60;

/// Earliest registration instant (inclusive) counted as a recent mentoree.
pub fn recent_registration_start() -> DateTime<Utc> {
    utc_midnight(2010, 1, 1)
}

/// Median age of male mentorees registered on or after 2010-01-01.
///
/// Returns `None` when no mentoree qualifies.
pub fn median_age_of_recent_male_mentorees(
    members: &MemberTable,
    mentorships: &MentorshipTable,
) -> Option<f64> {
    let since = recent_registration_start();
    let ages: Vec<u32> = mentorships
        .join(members)
        .filter_map(|row| row.mentoree)
        .filter(|mentoree| mentoree.gender == Gender::Male && mentoree.registered_at >= since)
        .map(|mentoree| mentoree.age)
        .collect();

    debug!(matches = ages.len(), "filtered recent male mentorees");
    median(ages)
}

/// Mentoree counts by gender, restricted to mentors aged 60 or more. Each
/// mentoree is counted once; genders with no mentorees are absent.
pub fn mentoree_gender_counts_for_senior_mentors(
    members: &MemberTable,
    mentorships: &MentorshipTable,
) -> BTreeMap<Gender, usize> {
    let mut seen: HashSet<&MemberId> = HashSet::new();
    let mut counts = BTreeMap::new();

    for row in mentorships.join(members) {
        let (Some(mentor), Some(mentoree)) = (row.mentor, row.mentoree) else {
            continue;
        };
        if mentor.age < SENIOR_MENTOR_MIN_AGE || !seen.insert(&mentoree.id) {
            continue;
        }
        *counts.entry(mentoree.gender).or_insert(0) += 1;
    }

    debug!(?counts, "counted mentorees of senior mentors");
    counts
}

fn median(mut values: Vec<u32>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_unstable();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (f64::from(values[mid - 1]) + f64::from(values[mid])) / 2.0
    } else {
        f64::from(values[mid])
    };
    Some(median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mentorship::domain::{Mentorship, MentorshipId};
    use crate::workflows::mentorship::tests::common::member;
    use crate::workflows::roster::Member;

    fn pair(mentor: &Member, mentoree: &Member) -> Mentorship {
        Mentorship {
            id: MentorshipId::for_pair(&mentor.id, &mentoree.id),
            mentor_id: mentor.id.clone(),
            mentoree_id: mentoree.id.clone(),
        }
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(vec![25, 19, 22]), Some(22.0));
        assert_eq!(median(vec![24, 19, 22, 28]), Some(23.0));
        assert_eq!(median(Vec::new()), None);
    }

    #[test]
    fn median_age_filters_gender_and_registration_date() {
        let mentor = member("mentor", Gender::Female, 61, "2001-01-01");
        let included_a = member("a", Gender::Male, 20, "2010-01-01");
        let included_b = member("b", Gender::Male, 27, "2015-06-01");
        let too_early = member("c", Gender::Male, 29, "2009-12-31");
        let not_male = member("d", Gender::Female, 18, "2018-01-01");

        let mentorees = [&included_a, &included_b, &too_early, &not_male];
        let mentorships =
            MentorshipTable::new(mentorees.iter().map(|m| pair(&mentor, m)).collect());
        let members = MemberTable::new(
            std::iter::once(mentor.clone())
                .chain(mentorees.iter().map(|m| (*m).clone()))
                .collect(),
        );

        assert_eq!(
            median_age_of_recent_male_mentorees(&members, &mentorships),
            Some(23.5)
        );
    }

    #[test]
    fn median_age_is_none_without_matches() {
        let members = MemberTable::new(vec![member("mentor", Gender::Female, 61, "2001-01-01")]);
        let mentorships = MentorshipTable::default();
        assert_eq!(median_age_of_recent_male_mentorees(&members, &mentorships), None);
    }

    #[test]
    fn gender_counts_only_include_senior_mentors() {
        let senior = member("senior", Gender::Female, 60, "2000-01-01");
        let junior = member("junior", Gender::Female, 59, "2000-01-01");
        let kids = [
            member("k1", Gender::Male, 20, "2012-01-01"),
            member("k2", Gender::Female, 21, "2012-01-01"),
            member("k3", Gender::Male, 22, "2012-01-01"),
            member("k4", Gender::Other, 23, "2012-01-01"),
        ];

        let mentorships = MentorshipTable::new(vec![
            pair(&senior, &kids[0]),
            pair(&senior, &kids[1]),
            pair(&senior, &kids[2]),
            pair(&junior, &kids[3]),
        ]);
        let members = MemberTable::new(
            [senior.clone(), junior.clone()]
                .into_iter()
                .chain(kids.iter().cloned())
                .collect(),
        );

        let counts = mentoree_gender_counts_for_senior_mentors(&members, &mentorships);
        assert_eq!(counts.get(&Gender::Male), Some(&2));
        assert_eq!(counts.get(&Gender::Female), Some(&1));
        assert_eq!(counts.get(&Gender::Other), None);
    }

    #[test]
    fn gender_counts_are_empty_without_senior_mentors() {
        let mentor = member("mentor", Gender::Female, 45, "2000-01-01");
        let kid = member("kid", Gender::Male, 20, "2012-01-01");
        let mentorships = MentorshipTable::new(vec![pair(&mentor, &kid)]);
        let members = MemberTable::new(vec![mentor, kid]);

        assert!(mentoree_gender_counts_for_senior_mentors(&members, &mentorships).is_empty());
    }
}
