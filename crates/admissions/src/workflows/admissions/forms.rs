//! Stage-specific assessment forms recorded by admissions staff.
//!
//! Every form is a flat bag of optional fields keyed by application id. A
//! single tagged [`StageForm`] carries any of them so one writer can handle
//! all twelve form kinds.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Respondent, Stage};
use super::validation::{FieldChecks, ValidationErrors};

/// Storage key for a sub-form; each application holds at most one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    ScreeningCall,
    DocumentReview,
    ParentGuardianQuestionnaire,
    CaregiverQuestionnaire,
    OutsiderQuestionnaire,
    ClassroomObservation,
    BehaviorChecklist,
    DevelopmentalChecklist,
    ParentInterview,
    ChildInterview,
    SchoolReference,
    CompositeProfile,
}

impl FormKind {
    pub const ALL: [FormKind; 12] = [
        FormKind::ScreeningCall,
        FormKind::DocumentReview,
        FormKind::ParentGuardianQuestionnaire,
        FormKind::CaregiverQuestionnaire,
        FormKind::OutsiderQuestionnaire,
        FormKind::ClassroomObservation,
        FormKind::BehaviorChecklist,
        FormKind::DevelopmentalChecklist,
        FormKind::ParentInterview,
        FormKind::ChildInterview,
        FormKind::SchoolReference,
        FormKind::CompositeProfile,
    ];

    pub const QUESTIONNAIRES: [FormKind; 3] = [
        FormKind::ParentGuardianQuestionnaire,
        FormKind::CaregiverQuestionnaire,
        FormKind::OutsiderQuestionnaire,
    ];

    pub const fn stage(self) -> Stage {
        match self {
            FormKind::ScreeningCall => Stage::ScreeningCall,
            FormKind::DocumentReview => Stage::DocumentReview,
            FormKind::ParentGuardianQuestionnaire
            | FormKind::CaregiverQuestionnaire
            | FormKind::OutsiderQuestionnaire => Stage::Questionnaires,
            FormKind::ClassroomObservation => Stage::ClassroomObservation,
            FormKind::BehaviorChecklist => Stage::BehaviorChecklist,
            FormKind::DevelopmentalChecklist => Stage::DevelopmentalChecklist,
            FormKind::ParentInterview => Stage::ParentInterview,
            FormKind::ChildInterview => Stage::ChildInterview,
            FormKind::SchoolReference => Stage::SchoolReference,
            FormKind::CompositeProfile => Stage::CompositeProfile,
        }
    }

    pub const fn respondent(self) -> Option<Respondent> {
        match self {
            FormKind::ParentGuardianQuestionnaire => Some(Respondent::ParentGuardian),
            FormKind::CaregiverQuestionnaire => Some(Respondent::Caregiver),
            FormKind::OutsiderQuestionnaire => Some(Respondent::Outsider),
            _ => None,
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            FormKind::ScreeningCall => "screening_call",
            FormKind::DocumentReview => "document_review",
            FormKind::ParentGuardianQuestionnaire => "parent_guardian_questionnaire",
            FormKind::CaregiverQuestionnaire => "caregiver_questionnaire",
            FormKind::OutsiderQuestionnaire => "outsider_questionnaire",
            FormKind::ClassroomObservation => "classroom_observation",
            FormKind::BehaviorChecklist => "behavior_checklist",
            FormKind::DevelopmentalChecklist => "developmental_checklist",
            FormKind::ParentInterview => "parent_interview",
            FormKind::ChildInterview => "child_interview",
            FormKind::SchoolReference => "school_reference",
            FormKind::CompositeProfile => "composite_profile",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form kind '{0}'")]
pub struct UnknownFormKind(pub String);

impl FromStr for FormKind {
    type Err = UnknownFormKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == value)
            .ok_or_else(|| UnknownFormKind(value.to_string()))
    }
}

/// Initial phone call with the family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningCallForm {
    pub conducted_by: Option<String>,
    pub call_date: Option<NaiveDate>,
    pub reason_for_applying: Option<String>,
    pub current_school: Option<String>,
    pub sibling_enrolled: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentReviewForm {
    pub reviewer: Option<String>,
    pub birth_certificate_received: Option<bool>,
    pub immunization_record_received: Option<bool>,
    pub prior_school_reports_received: Option<bool>,
    pub notes: Option<String>,
}

/// Shared by the parent/guardian, caregiver and outsider questionnaires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireForm {
    pub respondent_name: Option<String>,
    pub relationship_to_child: Option<String>,
    pub years_known: Option<u8>,
    pub strengths: Option<String>,
    pub concerns: Option<String>,
    pub social_behavior: Option<String>,
    pub daily_routine: Option<String>,
    pub additional_comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassroomObservationForm {
    pub observer: Option<String>,
    pub observed_on: Option<NaiveDate>,
    pub duration_minutes: Option<u16>,
    pub engagement_rating: Option<u8>,
    pub peer_interaction_rating: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorChecklistForm {
    pub completed_by: Option<String>,
    pub follows_instructions: Option<bool>,
    pub transitions_calmly: Option<bool>,
    pub shares_materials: Option<bool>,
    pub seeks_adult_help: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentalChecklistForm {
    pub completed_by: Option<String>,
    pub fine_motor: Option<bool>,
    pub gross_motor: Option<bool>,
    pub expressive_language: Option<bool>,
    pub receptive_language: Option<bool>,
    pub self_care: Option<bool>,
    pub notes: Option<String>,
}

/// Scored interview sheet, used for both the parent and the child interview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewScoreForm {
    pub interviewer: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub communication_score: Option<u8>,
    pub engagement_score: Option<u8>,
    pub alignment_score: Option<u8>,
    pub recommendation: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolReferenceForm {
    pub referee_name: Option<String>,
    pub school_name: Option<String>,
    pub attendance_concerns: Option<bool>,
    pub would_readmit: Option<bool>,
    pub comments: Option<String>,
}

/// Final sheet summarizing every earlier stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeProfileForm {
    pub prepared_by: Option<String>,
    pub summary: Option<String>,
    pub academic_readiness: Option<u8>,
    pub social_readiness: Option<u8>,
    pub support_needs: Option<String>,
    pub placement_recommendation: Option<String>,
}

/// Any stage form, tagged by its kind on the wire (`"form": "screening_call"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum StageForm {
    ScreeningCall(ScreeningCallForm),
    DocumentReview(DocumentReviewForm),
    ParentGuardianQuestionnaire(QuestionnaireForm),
    CaregiverQuestionnaire(QuestionnaireForm),
    OutsiderQuestionnaire(QuestionnaireForm),
    ClassroomObservation(ClassroomObservationForm),
    BehaviorChecklist(BehaviorChecklistForm),
    DevelopmentalChecklist(DevelopmentalChecklistForm),
    ParentInterview(InterviewScoreForm),
    ChildInterview(InterviewScoreForm),
    SchoolReference(SchoolReferenceForm),
    CompositeProfile(CompositeProfileForm),
}

impl StageForm {
    pub fn kind(&self) -> FormKind {
        match self {
            StageForm::ScreeningCall(_) => FormKind::ScreeningCall,
            StageForm::DocumentReview(_) => FormKind::DocumentReview,
            StageForm::ParentGuardianQuestionnaire(_) => FormKind::ParentGuardianQuestionnaire,
            StageForm::CaregiverQuestionnaire(_) => FormKind::CaregiverQuestionnaire,
            StageForm::OutsiderQuestionnaire(_) => FormKind::OutsiderQuestionnaire,
            StageForm::ClassroomObservation(_) => FormKind::ClassroomObservation,
            StageForm::BehaviorChecklist(_) => FormKind::BehaviorChecklist,
            StageForm::DevelopmentalChecklist(_) => FormKind::DevelopmentalChecklist,
            StageForm::ParentInterview(_) => FormKind::ParentInterview,
            StageForm::ChildInterview(_) => FormKind::ChildInterview,
            StageForm::SchoolReference(_) => FormKind::SchoolReference,
            StageForm::CompositeProfile(_) => FormKind::CompositeProfile,
        }
    }

    /// Check the payload before anything is written.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = FieldChecks::default();
        match self {
            StageForm::ScreeningCall(form) => {
                checks.required_option("conducted_by", form.conducted_by.as_ref());
            }
            StageForm::DocumentReview(form) => {
                checks.required_option("reviewer", form.reviewer.as_ref());
            }
            StageForm::ParentGuardianQuestionnaire(form)
            | StageForm::CaregiverQuestionnaire(form)
            | StageForm::OutsiderQuestionnaire(form) => {
                checks.required_option("respondent_name", form.respondent_name.as_ref());
            }
            StageForm::ClassroomObservation(form) => {
                checks
                    .required_option("observer", form.observer.as_ref())
                    .score("engagement_rating", form.engagement_rating)
                    .score("peer_interaction_rating", form.peer_interaction_rating);
            }
            StageForm::BehaviorChecklist(form) => {
                checks.required_option("completed_by", form.completed_by.as_ref());
            }
            StageForm::DevelopmentalChecklist(form) => {
                checks.required_option("completed_by", form.completed_by.as_ref());
            }
            StageForm::ParentInterview(form) | StageForm::ChildInterview(form) => {
                checks
                    .required_option("interviewer", form.interviewer.as_ref())
                    .score("communication_score", form.communication_score)
                    .score("engagement_score", form.engagement_score)
                    .score("alignment_score", form.alignment_score);
            }
            StageForm::SchoolReference(form) => {
                checks.required_option("referee_name", form.referee_name.as_ref());
            }
            StageForm::CompositeProfile(form) => {
                checks
                    .required_option("summary", form.summary.as_ref())
                    .score("academic_readiness", form.academic_readiness)
                    .score("social_readiness", form.social_readiness);
            }
        }
        checks.finish()
    }
}
