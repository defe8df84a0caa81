use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parent and child identity captured on the initial application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDetails {
    pub parent_name: String,
    pub parent_email: String,
    #[serde(default)]
    pub parent_phone: Option<String>,
    pub child_name: String,
    #[serde(default)]
    pub child_date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub grade_applying_for: Option<String>,
}

/// Ten assessment steps in the order staff work through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ScreeningCall,
    DocumentReview,
    Questionnaires,
    ClassroomObservation,
    BehaviorChecklist,
    DevelopmentalChecklist,
    ParentInterview,
    ChildInterview,
    SchoolReference,
    CompositeProfile,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::ScreeningCall,
        Stage::DocumentReview,
        Stage::Questionnaires,
        Stage::ClassroomObservation,
        Stage::BehaviorChecklist,
        Stage::DevelopmentalChecklist,
        Stage::ParentInterview,
        Stage::ChildInterview,
        Stage::SchoolReference,
        Stage::CompositeProfile,
    ];

    /// One-based position in the admissions sequence.
    pub const fn number(self) -> u8 {
        match self {
            Stage::ScreeningCall => 1,
            Stage::DocumentReview => 2,
            Stage::Questionnaires => 3,
            Stage::ClassroomObservation => 4,
            Stage::BehaviorChecklist => 5,
            Stage::DevelopmentalChecklist => 6,
            Stage::ParentInterview => 7,
            Stage::ChildInterview => 8,
            Stage::SchoolReference => 9,
            Stage::CompositeProfile => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Stage::ScreeningCall => "Screening Call",
            Stage::DocumentReview => "Document Review",
            Stage::Questionnaires => "Questionnaires",
            Stage::ClassroomObservation => "Classroom Observation",
            Stage::BehaviorChecklist => "Behavior Checklist",
            Stage::DevelopmentalChecklist => "Developmental Checklist",
            Stage::ParentInterview => "Parent Interview",
            Stage::ChildInterview => "Child Interview",
            Stage::SchoolReference => "School Reference",
            Stage::CompositeProfile => "Composite Profile",
        }
    }
}

/// Completion flag per stage. Missing fields deserialize as not completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageFlags {
    pub screening_call: bool,
    pub document_review: bool,
    pub questionnaires: bool,
    pub classroom_observation: bool,
    pub behavior_checklist: bool,
    pub developmental_checklist: bool,
    pub parent_interview: bool,
    pub child_interview: bool,
    pub school_reference: bool,
    pub composite_profile: bool,
}

impl StageFlags {
    pub fn all_completed() -> Self {
        let mut flags = Self::default();
        for stage in Stage::ALL {
            flags.set(stage, true);
        }
        flags
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        match stage {
            Stage::ScreeningCall => self.screening_call,
            Stage::DocumentReview => self.document_review,
            Stage::Questionnaires => self.questionnaires,
            Stage::ClassroomObservation => self.classroom_observation,
            Stage::BehaviorChecklist => self.behavior_checklist,
            Stage::DevelopmentalChecklist => self.developmental_checklist,
            Stage::ParentInterview => self.parent_interview,
            Stage::ChildInterview => self.child_interview,
            Stage::SchoolReference => self.school_reference,
            Stage::CompositeProfile => self.composite_profile,
        }
    }

    pub fn set(&mut self, stage: Stage, completed: bool) {
        let slot = match stage {
            Stage::ScreeningCall => &mut self.screening_call,
            Stage::DocumentReview => &mut self.document_review,
            Stage::Questionnaires => &mut self.questionnaires,
            Stage::ClassroomObservation => &mut self.classroom_observation,
            Stage::BehaviorChecklist => &mut self.behavior_checklist,
            Stage::DevelopmentalChecklist => &mut self.developmental_checklist,
            Stage::ParentInterview => &mut self.parent_interview,
            Stage::ChildInterview => &mut self.child_interview,
            Stage::SchoolReference => &mut self.school_reference,
            Stage::CompositeProfile => &mut self.composite_profile,
        };
        *slot = completed;
    }
}

/// The three respondents whose questionnaires together complete stage three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Respondent {
    ParentGuardian,
    Caregiver,
    Outsider,
}

/// Per-respondent questionnaire submission flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireFlags {
    pub parent_guardian: bool,
    pub caregiver: bool,
    pub outsider: bool,
}

impl QuestionnaireFlags {
    pub fn mark(&mut self, respondent: Respondent) {
        match respondent {
            Respondent::ParentGuardian => self.parent_guardian = true,
            Respondent::Caregiver => self.caregiver = true,
            Respondent::Outsider => self.outsider = true,
        }
    }
}

/// Overall application status. Only the derivation rule and the admin override write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Processing,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Processing => "processing",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Statuses an administrator may force onto an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTarget {
    Submitted,
    Completed,
    Rejected,
}

impl From<OverrideTarget> for ApplicationStatus {
    fn from(value: OverrideTarget) -> Self {
        match value {
            OverrideTarget::Submitted => ApplicationStatus::Submitted,
            OverrideTarget::Completed => ApplicationStatus::Completed,
            OverrideTarget::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Admin console decision payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub status: OverrideTarget,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Proof of a recorded admissions payment. Present only once paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub amount: u32,
    pub paid_at: DateTime<Utc>,
}
