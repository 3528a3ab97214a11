use mentor_match::workflows::mentorship::{
    check_discrepancies, export_csv, run_pipeline, DiscrepancyKind, MentorshipTable,
};
use mentor_match::workflows::roster::{MemberId, RecordError, RosterImport, RosterImporter};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

fn provider_record(uuid: &str, name: &str, gender: &str, age: i64, registered: &str) -> Value {
    let (first, last) = name.split_once(' ').expect("first and last name");
    json!({
        "gender": gender,
        "name": { "title": "Mx", "first": first, "last": last },
        "location": {
            "street": { "number": 118, "name": "King St W" },
            "city": "Hamilton",
            "state": "Ontario",
            "postcode": "L8P 4R1"
        },
        "email": format!("{uuid}@example.com"),
        "login": { "uuid": uuid },
        "dob": { "date": "1980-01-01T00:00:00.000Z", "age": age },
        "registered": { "date": registered, "age": 10 },
        "id": { "name": "SIN", "value": null }
    })
}

fn worked_example_document() -> Value {
    json!({
        "results": [
            provider_record("m-colin", "Colin Matthews", "female", 63, "2001-03-18T09:00:00.000Z"),
            provider_record("m-depp", "Depp Williams", "female", 47, "2002-03-19T09:00:00.000Z"),
            provider_record("e-john", "John Davis", "male", 24, "2005-06-20T09:00:00.000Z"),
            provider_record("e-patrick", "Patrick Kart", "male", 27, "2002-01-09T09:00:00.000Z"),
            provider_record("e-emma", "Emma Themp", "female", 21, "2010-02-07T09:00:00.000Z"),
            provider_record("e-will", "Will Burt", "male", 18, "2011-04-08T09:00:00.000Z"),
            provider_record("e-jack", "Jack Riep", "male", 29, "2020-12-30T09:00:00.000Z"),
            provider_record("x-late", "Late Mentor", "female", 55, "2006-05-05T09:00:00.000Z"),
            provider_record("x-adult", "Adult Member", "male", 30, "2003-05-05T09:00:00.000Z"),
        ]
    })
}

fn import(document: &Value) -> RosterImport {
    RosterImporter::from_reader(Cursor::new(document.to_string())).expect("roster parses")
}

#[test]
fn worked_example_pairs_by_registration_order() {
    let outcome = run_pipeline(import(&worked_example_document())).expect("pipeline succeeds");

    let names: HashMap<&MemberId, &str> = outcome
        .members
        .rows()
        .iter()
        .map(|member| (&member.id, member.full_name.as_str()))
        .collect();
    let pairs: Vec<(&str, &str)> = outcome
        .mentorships
        .rows()
        .iter()
        .map(|m| (names[&m.mentoree_id], names[&m.mentor_id]))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Patrick Kart", "Colin Matthews"),
            ("John Davis", "Depp Williams"),
            ("Emma Themp", "Colin Matthews"),
            ("Will Burt", "Depp Williams"),
            ("Jack Riep", "Colin Matthews"),
        ]
    );
    assert_eq!(outcome.classification.unassigned, 2);
    assert!(outcome.discrepancies.is_clean());
}

#[test]
fn mentorships_match_mentoree_count_even_with_malformed_records() {
    let mut document = worked_example_document();
    let results = document["results"].as_array_mut().expect("results array");
    let mut missing_city =
        provider_record("e-broken", "Broken Record", "male", 20, "2015-01-01T00:00:00Z");
    missing_city["location"]
        .as_object_mut()
        .expect("location object")
        .remove("city");
    results.push(missing_city);
    results.push(provider_record("e-bad-date", "Bad Date", "male", 20, "yesterday"));

    let roster = import(&document);
    assert_eq!(roster.rejected.len(), 2);
    assert!(matches!(roster.rejected[0].error, RecordError::Malformed(_)));
    assert!(matches!(roster.rejected[1].error, RecordError::Unclassifiable(_)));

    let outcome = run_pipeline(roster).expect("pipeline succeeds");
    let mentoree_eligible = outcome
        .members
        .rows()
        .iter()
        .filter(|member| member.age < 30)
        .count();
    assert_eq!(outcome.mentorships.len(), mentoree_eligible);

    let unique: HashSet<_> = outcome
        .mentorships
        .rows()
        .iter()
        .map(|m| &m.mentoree_id)
        .collect();
    assert_eq!(unique.len(), outcome.mentorships.len());
    assert_eq!(outcome.summary().rejected_records.len(), 2);
}

#[test]
fn reruns_produce_identical_mentorship_tables() {
    let document = worked_example_document();
    let render = |table: &MentorshipTable| {
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).expect("csv written");
        buffer
    };

    let first = run_pipeline(import(&document)).expect("first run");
    let second = run_pipeline(import(&document)).expect("second run");
    assert_eq!(render(&first.mentorships), render(&second.mentorships));
}

#[test]
fn analytics_report_no_data_instead_of_failing() {
    let document = json!([
        provider_record("m-ann", "Ann Older", "female", 45, "2000-01-01T00:00:00Z"),
        provider_record("e-kim", "Kim Young", "female", 22, "2012-01-01T00:00:00Z"),
    ]);

    let outcome = run_pipeline(import(&document)).expect("pipeline succeeds");
    assert_eq!(outcome.median_age_of_recent_male_mentorees, None);
    assert!(outcome.senior_mentor_gender_counts.is_empty());

    let summary = serde_json::to_value(outcome.summary()).expect("summary serializes");
    assert_eq!(summary["median_age_of_recent_male_mentorees"], Value::Null);
    assert_eq!(summary["senior_mentor_gender_counts"], json!([]));
}

#[test]
fn corrupted_mentee_reference_is_reported_not_raised() {
    let outcome = run_pipeline(import(&worked_example_document())).expect("pipeline succeeds");
    let mut rows = outcome.mentorships.rows().to_vec();
    rows.push(mentor_match::workflows::mentorship::Mentorship {
        id: mentor_match::workflows::mentorship::MentorshipId::for_pair(
            &MemberId::new("m-colin"),
            &MemberId::new("nobody"),
        ),
        mentor_id: MemberId::new("m-colin"),
        mentoree_id: MemberId::new("nobody"),
    });

    let report = check_discrepancies(&outcome.members, &MentorshipTable::new(rows));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, DiscrepancyKind::UnresolvedMentoree);
}

#[test]
fn export_writes_both_tables() {
    let outcome = run_pipeline(import(&worked_example_document())).expect("pipeline succeeds");
    let dir = tempfile::tempdir().expect("temp dir");

    let exported = export_csv(dir.path(), &outcome.members, &outcome.mentorships).expect("export");

    let members = std::fs::read_to_string(&exported.members).expect("members csv");
    let mentorships = std::fs::read_to_string(&exported.mentorships).expect("mentorships csv");
    assert_eq!(members.lines().count(), outcome.members.len() + 1);
    assert_eq!(mentorships.lines().count(), outcome.mentorships.len() + 1);
    assert_eq!(
        mentorships.lines().next(),
        Some("id,mentor_id,mentoree_id")
    );
}
