use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ApplicantDetails, ApplicationId, ApplicationStatus, OverrideTarget, PaymentReceipt, Stage,
    StatusOverride,
};
use super::forms::{FormKind, StageForm};
use super::progress::{derive_status, StageProgress};
use super::repository::{
    ApplicationRecord, ApplicationRepository, FormRecord, FormRepository, RepositoryError,
};
use super::validation::{validate_applicant, ValidationErrors};
use crate::config::AdmissionsConfig;

const DEFAULT_REJECTION_COMMENT: &str = "Rejected";

/// Service composing application storage, sub-form storage, and the status rule.
pub struct AdmissionService<R, F> {
    applications: Arc<R>,
    forms: Arc<F>,
    config: AdmissionsConfig,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("adm-{id:06}"))
}

impl<R, F> AdmissionService<R, F>
where
    R: ApplicationRepository + 'static,
    F: FormRepository + 'static,
{
    pub fn new(applications: Arc<R>, forms: Arc<F>, config: AdmissionsConfig) -> Self {
        Self {
            applications,
            forms,
            config,
        }
    }

    /// Create a new application with every stage open.
    pub fn submit(
        &self,
        applicant: ApplicantDetails,
    ) -> Result<ApplicationRecord, AdmissionServiceError> {
        validate_applicant(&applicant)?;

        let record = ApplicationRecord::new(next_application_id(), applicant, Utc::now());
        let stored = self.applications.insert(record)?;

        info!(application_id = %stored.application_id, "application submitted");
        Ok(stored)
    }

    /// Store one stage form, flip its completion flag, and persist the recomputed status.
    ///
    /// The form is written before the application is loaded. A missing
    /// application is reported as not found but the stored form stays in place.
    pub fn record_form(
        &self,
        application_id: &ApplicationId,
        form: StageForm,
    ) -> Result<StageProgress, AdmissionServiceError> {
        form.validate()?;

        let kind = form.kind();
        self.forms.upsert(FormRecord {
            application_id: application_id.clone(),
            form,
            recorded_at: Utc::now(),
        })?;

        let mut record = match self.applications.fetch(application_id)? {
            Some(record) => record,
            None => {
                warn!(
                    %application_id,
                    form = %kind,
                    "form stored for unknown application"
                );
                return Err(AdmissionServiceError::NotFound(application_id.clone()));
            }
        };

        let stage = kind.stage();
        match kind.respondent() {
            Some(respondent) => {
                record.questionnaires.mark(respondent);
                if self.questionnaires_complete(application_id)? {
                    record.stages.set(Stage::Questionnaires, true);
                }
            }
            None => record.stages.set(stage, true),
        }
        record.current_stage = record.current_stage.max(stage.number());

        let progress = self.persist_progress(record)?;
        info!(
            %application_id,
            form = %kind,
            status = progress.status.label(),
            progress = progress.progress_percent,
            "stage form recorded"
        );
        Ok(progress)
    }

    /// Progress recomputed from the stored flags.
    ///
    /// The `status` here is the derived one and ignores any admin override;
    /// the stored status is on the record returned by [`Self::get`].
    pub fn progress(
        &self,
        application_id: &ApplicationId,
    ) -> Result<StageProgress, AdmissionServiceError> {
        Ok(self.get(application_id)?.progress())
    }

    /// Force a status from the admin console. Flags are left untouched, so
    /// the next stage write recomputes and replaces this status.
    pub fn override_status(
        &self,
        application_id: &ApplicationId,
        decision: StatusOverride,
    ) -> Result<ApplicationRecord, AdmissionServiceError> {
        let mut record = self.get(application_id)?;

        let comment = decision
            .comment
            .filter(|comment| !comment.trim().is_empty());
        record.admin_comment = match (decision.status, comment) {
            (_, Some(comment)) => Some(comment),
            (OverrideTarget::Rejected, None) => Some(DEFAULT_REJECTION_COMMENT.to_string()),
            (_, None) => None,
        };
        record.status = decision.status.into();
        record.updated_at = Utc::now();

        self.update(record.clone())?;
        info!(
            %application_id,
            status = record.status.label(),
            "application status overridden"
        );
        Ok(record)
    }

    /// Record the admissions payment. Only completed, unpaid applications qualify.
    pub fn record_payment(
        &self,
        application_id: &ApplicationId,
    ) -> Result<PaymentReceipt, AdmissionServiceError> {
        let mut record = self.get(application_id)?;

        if let Some(existing) = record.payment {
            return Err(PaymentError::AlreadyPaid {
                paid_at: existing.paid_at,
            }
            .into());
        }
        if record.status != ApplicationStatus::Completed {
            return Err(PaymentError::NotCompleted(record.status).into());
        }

        let receipt = PaymentReceipt {
            amount: self.config.payment_amount,
            paid_at: Utc::now(),
        };
        record.payment = Some(receipt);
        record.updated_at = receipt.paid_at;

        self.update(record)?;
        info!(%application_id, amount = receipt.amount, "payment recorded");
        Ok(receipt)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, AdmissionServiceError> {
        self.applications
            .fetch(application_id)?
            .ok_or_else(|| AdmissionServiceError::NotFound(application_id.clone()))
    }

    /// Admin listing ordered by submission time.
    pub fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationRecord>, AdmissionServiceError> {
        let mut records: Vec<ApplicationRecord> = self
            .applications
            .list()?
            .into_iter()
            .filter(|record| status.map_or(true, |status| record.status == status))
            .collect();
        records.sort_by(|left, right| {
            left.submitted_at
                .cmp(&right.submitted_at)
                .then_with(|| left.application_id.cmp(&right.application_id))
        });
        Ok(records)
    }

    pub fn form(
        &self,
        application_id: &ApplicationId,
        kind: FormKind,
    ) -> Result<FormRecord, AdmissionServiceError> {
        self.forms
            .fetch(application_id, kind)?
            .ok_or_else(|| AdmissionServiceError::FormNotFound {
                application_id: application_id.clone(),
                kind,
            })
    }

    fn questionnaires_complete(
        &self,
        application_id: &ApplicationId,
    ) -> Result<bool, RepositoryError> {
        for kind in FormKind::QUESTIONNAIRES {
            if !self.forms.exists(application_id, kind)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn persist_progress(
        &self,
        mut record: ApplicationRecord,
    ) -> Result<StageProgress, AdmissionServiceError> {
        let progress = derive_status(&record.stages);
        record.status = progress.status;
        record.updated_at = Utc::now();
        self.update(record)?;
        Ok(progress)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), AdmissionServiceError> {
        let application_id = record.application_id.clone();
        self.applications.update(record).map_err(|err| match err {
            RepositoryError::NotFound => AdmissionServiceError::NotFound(application_id),
            other => AdmissionServiceError::Repository(other),
        })
    }
}

/// Rejections raised by the payment gate.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment requires a completed application (current status: {})", .0.label())]
    NotCompleted(ApplicationStatus),
    #[error("application already paid at {paid_at}")]
    AlreadyPaid { paid_at: chrono::DateTime<Utc> },
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("{kind} form not recorded for application {application_id}")]
    FormNotFound {
        application_id: ApplicationId,
        kind: FormKind,
    },
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
