//! Admissions workflow: intake, stage forms, status derivation, and the admin console.
//!
//! Each stage form flips one completion flag on the application record; the
//! overall status is always recomputed from those flags by [`derive_status`].
//! The admin override and payment gate act on the stored status directly.

pub mod domain;
pub mod forms;
pub mod progress;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantDetails, ApplicationId, ApplicationStatus, OverrideTarget, PaymentReceipt,
    QuestionnaireFlags, Respondent, Stage, StageFlags, StatusOverride,
};
pub use forms::{
    BehaviorChecklistForm, ClassroomObservationForm, CompositeProfileForm,
    DevelopmentalChecklistForm, DocumentReviewForm, FormKind, InterviewScoreForm,
    QuestionnaireForm, SchoolReferenceForm, ScreeningCallForm, StageForm, UnknownFormKind,
};
pub use progress::{derive_status, StageProgress};
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusView, ApplicationSummaryView,
    FormRecord, FormRepository, RepositoryError,
};
pub use router::admissions_router;
pub use service::{AdmissionService, AdmissionServiceError, PaymentError};
pub use validation::{FieldError, ValidationErrors};
