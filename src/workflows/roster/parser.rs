use super::domain::{Address, Gender, Member, MemberId};
use crate::workflows::mentorship::roles::{ClassificationError, ClassificationField};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use tracing::{info, warn};

const PROGRESS_INTERVAL: usize = 100;

/// Raised when a required field is absent or has an unusable shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedRecordError {
    #[error("record is missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
    #[error(transparent)]
    Unclassifiable(#[from] ClassificationError),
}

/// A roster entry that could not become a [`Member`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRejection {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
    pub error: RecordError,
}

#[derive(Debug, Default, Clone)]
pub struct RosterImport {
    pub members: Vec<Member>,
    pub rejected: Vec<RecordRejection>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    Envelope { results: Vec<Value> },
    Bare(Vec<Value>),
}

impl RosterDocument {
    fn into_records(self) -> Vec<Value> {
        match self {
            RosterDocument::Envelope { results } => results,
            RosterDocument::Bare(records) => records,
        }
    }
}

pub(crate) fn parse_document<R: Read>(reader: R) -> Result<RosterImport, serde_json::Error> {
    let document: RosterDocument = serde_json::from_reader(reader)?;
    Ok(convert_records(document.into_records()))
}

pub(crate) fn parse_value(value: Value) -> Result<RosterImport, serde_json::Error> {
    let document: RosterDocument = serde_json::from_value(value)?;
    Ok(convert_records(document.into_records()))
}

pub(crate) fn convert_records(records: Vec<Value>) -> RosterImport {
    info!(records = records.len(), "converting roster records into members");
    let mut import = RosterImport::default();

    for (index, record) in records.iter().enumerate() {
        match convert_record(record) {
            Ok(member) => import.members.push(member),
            Err(error) => {
                let member_id = record
                    .pointer("/login/uuid")
                    .and_then(Value::as_str)
                    .map(MemberId::new);
                warn!(index, member_id = ?member_id, %error, "skipping roster record");
                import.rejected.push(RecordRejection {
                    index,
                    member_id,
                    error,
                });
            }
        }

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            info!(processed = index + 1, "roster conversion progress");
        }
    }

    info!(
        members = import.members.len(),
        rejected = import.rejected.len(),
        "roster conversion completed"
    );
    import
}

fn convert_record(record: &Value) -> Result<Member, RecordError> {
    let id = MemberId::new(required_str(record, "login.uuid")?);
    let first = required_str(record, "name.first")?;
    let last = required_str(record, "name.last")?;
    let email = required_str(record, "email")?;
    let age = parse_age(lookup(record, "dob.age"))?;
    let gender = parse_gender(lookup(record, "gender"))?;
    let id_value = match required(record, "id")?.get("value") {
        None | Some(Value::Null) => None,
        Some(value) => Some(scalar_to_string(value).ok_or(
            MalformedRecordError::InvalidField {
                field: "id.value",
                expected: "a string or number",
            },
        )?),
    };
    let registered_at = parse_registered_at(lookup(record, "registered.date"))?;

    let street_number = required_scalar(record, "location.street.number")?;
    let street_name = required_str(record, "location.street.name")?;
    let postcode = required_scalar(record, "location.postcode")?;
    let city = required_str(record, "location.city")?;

    Ok(Member {
        id,
        full_name: format!("{first} {last}"),
        email: email.to_string(),
        age,
        gender,
        id_value,
        registered_at,
        address: Address {
            street: format!("{street_number} {street_name}"),
            postcode,
            city: city.to_string(),
        },
    })
}

/// Value at a dotted path; absent and null are both `None`.
fn lookup<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(record, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

fn required<'a>(
    record: &'a Value,
    field: &'static str,
) -> Result<&'a Value, MalformedRecordError> {
    lookup(record, field).ok_or(MalformedRecordError::MissingField { field })
}

fn required_str<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, MalformedRecordError> {
    required(record, field)?
        .as_str()
        .ok_or(MalformedRecordError::InvalidField {
            field,
            expected: "a string",
        })
}

fn required_scalar(record: &Value, field: &'static str) -> Result<String, MalformedRecordError> {
    scalar_to_string(required(record, field)?).ok_or(MalformedRecordError::InvalidField {
        field,
        expected: "a string or number",
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn parse_age(value: Option<&Value>) -> Result<u32, ClassificationError> {
    let value = value.ok_or_else(|| ClassificationError::missing(ClassificationField::Age))?;
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|age| age.fract() == 0.0).map(|age| age as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(age) if age < 0 => Err(ClassificationError::age(value, "must be non-negative")),
        Some(age) => u32::try_from(age)
            .map_err(|_| ClassificationError::age(value, "is out of range")),
        None => Err(ClassificationError::age(value, "must be a whole number")),
    }
}

fn parse_gender(value: Option<&Value>) -> Result<Gender, ClassificationError> {
    let value = value.ok_or_else(|| ClassificationError::missing(ClassificationField::Gender))?;
    value
        .as_str()
        .and_then(Gender::parse)
        .ok_or_else(|| ClassificationError::gender(value))
}

fn parse_registered_at(value: Option<&Value>) -> Result<DateTime<Utc>, ClassificationError> {
    let value =
        value.ok_or_else(|| ClassificationError::missing(ClassificationField::RegisteredAt))?;
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| ClassificationError::registered_at(value))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) fn parse_timestamp_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}
