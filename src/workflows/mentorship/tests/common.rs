use chrono::NaiveDate;

use crate::workflows::roster::{Address, Gender, Member, MemberId};

/// Member registered at midnight UTC on `registered` (YYYY-MM-DD).
pub(crate) fn member(id: &str, gender: Gender, age: u32, registered: &str) -> Member {
    named_member(id, id, gender, age, registered)
}

pub(crate) fn named_member(
    id: &str,
    full_name: &str,
    gender: Gender,
    age: u32,
    registered: &str,
) -> Member {
    let registered_at = NaiveDate::parse_from_str(registered, "%Y-%m-%d")
        .expect("valid registration date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc();

    Member {
        id: MemberId::new(id),
        full_name: full_name.to_string(),
        email: format!("{id}@example.com"),
        age,
        gender,
        id_value: None,
        registered_at,
        address: Address {
            street: "12 Queen St".to_string(),
            postcode: "M5H 2N2".to_string(),
            city: "Toronto".to_string(),
        },
    }
}

/// Two mentors and five mentorees, listed out of registration order.
pub(crate) fn worked_example_roster() -> Vec<Member> {
    vec![
        named_member("colin", "Colin Matthews", Gender::Female, 63, "2001-03-18"),
        named_member("depp", "Depp Williams", Gender::Female, 52, "2002-03-19"),
        named_member("john", "John Davis", Gender::Male, 24, "2005-06-20"),
        named_member("patrick", "Patrick Kart", Gender::Male, 28, "2002-01-09"),
        named_member("emma", "Emma Themp", Gender::Female, 22, "2010-02-07"),
        named_member("will", "Will Burt", Gender::Male, 19, "2011-04-08"),
        named_member("jack", "Jack Riep", Gender::Male, 26, "2020-12-30"),
    ]
}
