use super::assignment::mentor_load;
use super::discrepancy::{Discrepancy, DiscrepancyReport};
use super::pipeline::PipelineOutcome;
use crate::workflows::roster::{Gender, MemberId, RecordRejection};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MentorLoadEntry {
    pub mentor_id: MemberId,
    pub mentor_name: String,
    pub mentorees: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenderCountEntry {
    pub gender: Gender,
    pub gender_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscrepancyView {
    pub category_label: &'static str,
    pub kind_label: &'static str,
    #[serde(flatten)]
    pub discrepancy: Discrepancy,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub members: usize,
    pub rejected_records: Vec<RecordRejection>,
    pub mentors: usize,
    pub mentorees: usize,
    pub unassigned: usize,
    pub mentorships: usize,
    pub mentor_load: Vec<MentorLoadEntry>,
    pub median_age_of_recent_male_mentorees: Option<f64>,
    pub senior_mentor_gender_counts: Vec<GenderCountEntry>,
    pub discrepancies: Vec<DiscrepancyView>,
}

impl PipelineOutcome {
    pub fn summary(&self) -> PipelineSummary {
        let mentor_load = mentor_load(self.mentorships.rows())
            .into_iter()
            .map(|(mentor_id, mentorees)| MentorLoadEntry {
                mentor_name: self
                    .members
                    .get(&mentor_id)
                    .map(|mentor| mentor.full_name.clone())
                    .unwrap_or_default(),
                mentor_id,
                mentorees,
            })
            .collect();

        let senior_mentor_gender_counts = Gender::ordered()
            .into_iter()
            .filter_map(|gender| {
                self.senior_mentor_gender_counts
                    .get(&gender)
                    .map(|&count| GenderCountEntry {
                        gender,
                        gender_label: gender.label(),
                        count,
                    })
            })
            .collect();

        PipelineSummary {
            members: self.members.len(),
            rejected_records: self.rejected.clone(),
            mentors: self.classification.mentors,
            mentorees: self.classification.mentorees,
            unassigned: self.classification.unassigned,
            mentorships: self.mentorships.len(),
            mentor_load,
            median_age_of_recent_male_mentorees: self.median_age_of_recent_male_mentorees,
            senior_mentor_gender_counts,
            discrepancies: discrepancy_views(&self.discrepancies),
        }
    }
}

fn discrepancy_views(report: &DiscrepancyReport) -> Vec<DiscrepancyView> {
    report
        .violations
        .iter()
        .map(|discrepancy| DiscrepancyView {
            category_label: discrepancy.category().label(),
            kind_label: discrepancy.kind.label(),
            discrepancy: discrepancy.clone(),
        })
        .collect()
}
