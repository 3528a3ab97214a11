use crate::workflows::roster::MemberId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for mentorship identifiers, so they never collide with member ids.
const MENTORSHIP_NAMESPACE: Uuid = Uuid::from_u128(0x6d3c_2f1e_8a4b_4c7d_9e10_5b2a_7f84_c1d9);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentorshipId(pub Uuid);

impl MentorshipId {
    /// Name-based (v5) id over the mentor and mentoree ids: stable across
    /// re-runs on the same roster and unique per pair.
    pub fn for_pair(mentor: &MemberId, mentoree: &MemberId) -> Self {
        let name = format!("{}\u{1f}{}", mentor.as_str(), mentoree.as_str());
        Self(Uuid::new_v5(&MENTORSHIP_NAMESPACE, name.as_bytes()))
    }
}

impl fmt::Display for MentorshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentorship {
    pub id: MentorshipId,
    pub mentor_id: MemberId,
    pub mentoree_id: MemberId,
}
