use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantDetails, ApplicationId, ApplicationStatus, PaymentReceipt, QuestionnaireFlags,
    StageFlags,
};
use super::forms::{FormKind, StageForm};
use super::progress::{derive_status, StageProgress};

/// Repository record for one admissions application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub applicant: ApplicantDetails,
    pub stages: StageFlags,
    pub questionnaires: QuestionnaireFlags,
    pub status: ApplicationStatus,
    pub current_stage: u8,
    pub admin_comment: Option<String>,
    pub payment: Option<PaymentReceipt>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn new(
        application_id: ApplicationId,
        applicant: ApplicantDetails,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            application_id,
            applicant,
            stages: StageFlags::default(),
            questionnaires: QuestionnaireFlags::default(),
            status: ApplicationStatus::Submitted,
            current_stage: 0,
            admin_comment: None,
            payment: None,
            submitted_at,
            updated_at: submitted_at,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment.is_some()
    }

    /// Progress computed from the flags, independent of any override on `status`.
    pub fn progress(&self) -> StageProgress {
        derive_status(&self.stages)
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        let progress = self.progress();
        ApplicationStatusView {
            application_id: self.application_id.clone(),
            child_name: self.applicant.child_name.clone(),
            status: self.status.label(),
            progress_percent: progress.progress_percent,
            completed: progress.completed,
            remaining: progress.remaining,
            current_stage: self.current_stage,
            is_paid: self.is_paid(),
            payment: self.payment,
            admin_comment: self.admin_comment.clone(),
        }
    }

    pub fn summary_view(&self) -> ApplicationSummaryView {
        ApplicationSummaryView {
            application_id: self.application_id.clone(),
            parent_name: self.applicant.parent_name.clone(),
            child_name: self.applicant.child_name.clone(),
            status: self.status.label(),
            progress_percent: self.progress().progress_percent,
            is_paid: self.is_paid(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Stored sub-form row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub application_id: ApplicationId,
    pub form: StageForm,
    pub recorded_at: DateTime<Utc>,
}

impl FormRecord {
    pub fn kind(&self) -> FormKind {
        self.form.kind()
    }
}

/// Storage abstraction for application records.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Storage abstraction for sub-forms, upserted by (application id, form kind).
pub trait FormRepository: Send + Sync {
    fn upsert(&self, record: FormRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        id: &ApplicationId,
        kind: FormKind,
    ) -> Result<Option<FormRecord>, RepositoryError>;

    fn exists(&self, id: &ApplicationId, kind: FormKind) -> Result<bool, RepositoryError> {
        Ok(self.fetch(id, kind)?.is_some())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Detail view for the admin console and applicant status checks.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub child_name: String,
    pub status: &'static str,
    pub progress_percent: u8,
    pub completed: Vec<&'static str>,
    pub remaining: Vec<&'static str>,
    pub current_stage: u8,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
}

/// Row in the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummaryView {
    pub application_id: ApplicationId,
    pub parent_name: String,
    pub child_name: String,
    pub status: &'static str,
    pub progress_percent: u8,
    pub is_paid: bool,
    pub submitted_at: DateTime<Utc>,
}
