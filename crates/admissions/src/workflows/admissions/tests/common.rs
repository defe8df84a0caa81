use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::AdmissionsConfig;
use crate::workflows::admissions::domain::{ApplicantDetails, ApplicationId};
use crate::workflows::admissions::forms::{
    BehaviorChecklistForm, ClassroomObservationForm, CompositeProfileForm,
    DevelopmentalChecklistForm, DocumentReviewForm, FormKind, InterviewScoreForm,
    QuestionnaireForm, SchoolReferenceForm, ScreeningCallForm, StageForm,
};
use crate::workflows::admissions::repository::{
    ApplicationRecord, ApplicationRepository, FormRecord, FormRepository, RepositoryError,
};
use crate::workflows::admissions::{admissions_router, AdmissionService};

pub(super) fn admissions_config() -> AdmissionsConfig {
    AdmissionsConfig {
        payment_amount: 500,
    }
}

pub(super) fn applicant() -> ApplicantDetails {
    ApplicantDetails {
        parent_name: "Dana Okafor".to_string(),
        parent_email: "dana@example.org".to_string(),
        parent_phone: Some("515-555-0142".to_string()),
        child_name: "Remi Okafor".to_string(),
        child_date_of_birth: NaiveDate::from_ymd_opt(2020, 4, 12),
        grade_applying_for: Some("Kindergarten".to_string()),
    }
}

fn staff() -> Option<String> {
    Some("Ms. Lindqvist".to_string())
}

fn questionnaire(respondent: &str) -> QuestionnaireForm {
    QuestionnaireForm {
        respondent_name: Some(respondent.to_string()),
        strengths: Some("Curious, persistent with puzzles".to_string()),
        ..QuestionnaireForm::default()
    }
}

/// A valid payload for the given form kind.
pub(super) fn form_for(kind: FormKind) -> StageForm {
    match kind {
        FormKind::ScreeningCall => StageForm::ScreeningCall(ScreeningCallForm {
            conducted_by: staff(),
            call_date: NaiveDate::from_ymd_opt(2025, 1, 14),
            reason_for_applying: Some("Relocating for work".to_string()),
            ..ScreeningCallForm::default()
        }),
        FormKind::DocumentReview => StageForm::DocumentReview(DocumentReviewForm {
            reviewer: staff(),
            birth_certificate_received: Some(true),
            immunization_record_received: Some(true),
            ..DocumentReviewForm::default()
        }),
        FormKind::ParentGuardianQuestionnaire => {
            StageForm::ParentGuardianQuestionnaire(questionnaire("Dana Okafor"))
        }
        FormKind::CaregiverQuestionnaire => {
            StageForm::CaregiverQuestionnaire(questionnaire("Ama Mensah"))
        }
        FormKind::OutsiderQuestionnaire => {
            StageForm::OutsiderQuestionnaire(questionnaire("Coach Ferris"))
        }
        FormKind::ClassroomObservation => {
            StageForm::ClassroomObservation(ClassroomObservationForm {
                observer: staff(),
                engagement_rating: Some(4),
                peer_interaction_rating: Some(3),
                ..ClassroomObservationForm::default()
            })
        }
        FormKind::BehaviorChecklist => StageForm::BehaviorChecklist(BehaviorChecklistForm {
            completed_by: staff(),
            follows_instructions: Some(true),
            ..BehaviorChecklistForm::default()
        }),
        FormKind::DevelopmentalChecklist => {
            StageForm::DevelopmentalChecklist(DevelopmentalChecklistForm {
                completed_by: staff(),
                fine_motor: Some(true),
                ..DevelopmentalChecklistForm::default()
            })
        }
        FormKind::ParentInterview => StageForm::ParentInterview(interview()),
        FormKind::ChildInterview => StageForm::ChildInterview(interview()),
        FormKind::SchoolReference => StageForm::SchoolReference(SchoolReferenceForm {
            referee_name: Some("Principal Hart".to_string()),
            would_readmit: Some(true),
            ..SchoolReferenceForm::default()
        }),
        FormKind::CompositeProfile => StageForm::CompositeProfile(CompositeProfileForm {
            prepared_by: staff(),
            summary: Some("Ready for kindergarten with light reading support".to_string()),
            academic_readiness: Some(4),
            social_readiness: Some(5),
            ..CompositeProfileForm::default()
        }),
    }
}

fn interview() -> InterviewScoreForm {
    InterviewScoreForm {
        interviewer: staff(),
        communication_score: Some(4),
        engagement_score: Some(5),
        alignment_score: Some(4),
        ..InterviewScoreForm::default()
    }
}

pub(super) type MemoryService = AdmissionService<MemoryApplications, MemoryForms>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryApplications>, Arc<MemoryForms>) {
    let applications = Arc::new(MemoryApplications::default());
    let forms = Arc::new(MemoryForms::default());
    let service = AdmissionService::new(applications.clone(), forms.clone(), admissions_config());
    (service, applications, forms)
}

/// Submit every form so the application reaches `completed`.
pub(super) fn complete_all_forms(service: &MemoryService, id: &ApplicationId) {
    for kind in FormKind::ALL {
        service
            .record_form(id, form_for(kind))
            .expect("form records");
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl MemoryApplications {
    pub(super) fn is_empty(&self) -> bool {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .is_empty()
    }

    pub(super) fn remove(&self, id: &ApplicationId) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .remove(id);
    }

    pub(super) fn stored(&self, id: &ApplicationId) -> ApplicationRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("record present")
    }
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.application_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.application_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryForms {
    records: Arc<Mutex<HashMap<(ApplicationId, FormKind), FormRecord>>>,
}

impl MemoryForms {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("form mutex poisoned").len()
    }
}

impl FormRepository for MemoryForms {
    fn upsert(&self, record: FormRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("form mutex poisoned");
        guard.insert((record.application_id.clone(), record.kind()), record);
        Ok(())
    }

    fn fetch(
        &self,
        id: &ApplicationId,
        kind: FormKind,
    ) -> Result<Option<FormRecord>, RepositoryError> {
        let guard = self.records.lock().expect("form mutex poisoned");
        Ok(guard.get(&(id.clone(), kind)).cloned())
    }
}

pub(super) struct UnavailableForms;

impl FormRepository for UnavailableForms {
    fn upsert(&self, _record: FormRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &ApplicationId,
        _kind: FormKind,
    ) -> Result<Option<FormRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn admissions_router_with_service(service: MemoryService) -> axum::Router {
    admissions_router(Arc::new(service))
}
