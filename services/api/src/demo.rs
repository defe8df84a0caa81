use crate::infra::{InMemoryApplicationRepository, InMemoryFormRepository};
use admissions::config::{AdmissionsConfig, DEFAULT_PAYMENT_AMOUNT};
use admissions::error::AppError;
use admissions::workflows::admissions::{
    AdmissionService, ApplicantDetails, BehaviorChecklistForm, ClassroomObservationForm,
    CompositeProfileForm, DevelopmentalChecklistForm, DocumentReviewForm, FormKind,
    InterviewScoreForm, QuestionnaireForm, SchoolReferenceForm, ScreeningCallForm, StageForm,
    StageProgress,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Child name recorded on the demo application.
    #[arg(long)]
    pub(crate) child_name: Option<String>,
    /// Stop after this many stage forms (defaults to all of them).
    #[arg(long)]
    pub(crate) stop_after: Option<usize>,
    /// Fee charged when the application completes.
    #[arg(long)]
    pub(crate) payment_amount: Option<u32>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        child_name,
        stop_after,
        payment_amount,
    } = args;

    let config = AdmissionsConfig::with_payment_amount(
        payment_amount.unwrap_or(DEFAULT_PAYMENT_AMOUNT),
    )?;
    let service = AdmissionService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryFormRepository::default()),
        config,
    );

    println!("Admissions workflow demo");
    let applicant = demo_applicant(child_name);
    let record = service.submit(applicant)?;
    let view = record.status_view();
    println!(
        "- Received application {} for {} -> status {} ({}%)",
        view.application_id, view.child_name, view.status, view.progress_percent
    );

    let today = Local::now().date_naive();
    let limit = stop_after.unwrap_or(FormKind::ALL.len());
    for kind in FormKind::ALL.into_iter().take(limit) {
        let progress = service.record_form(&record.application_id, demo_form(kind, today))?;
        render_progress(kind, &progress);
    }

    let progress = service.progress(&record.application_id)?;
    if !progress.remaining.is_empty() {
        println!("Remaining stages: {}", progress.remaining.join(", "));
    }

    println!("\nPayment");
    match service.record_payment(&record.application_id) {
        Ok(receipt) => println!(
            "- Recorded {} at {}",
            receipt.amount,
            receipt.paid_at.format("%Y-%m-%d %H:%M UTC")
        ),
        Err(err) => println!("- Payment refused: {err}"),
    }
    if let Err(err) = service.record_payment(&record.application_id) {
        println!("- Second attempt refused: {err}");
    }

    let final_view = service.get(&record.application_id)?.status_view();
    println!(
        "\nFinal status {} | {}% | paid: {}",
        final_view.status, final_view.progress_percent, final_view.is_paid
    );
    Ok(())
}

fn render_progress(kind: FormKind, progress: &StageProgress) {
    println!(
        "- {:<32} -> {:<10} {:>3}% ({} of 10 stages)",
        kind.slug(),
        progress.status.label(),
        progress.progress_percent,
        progress.completed.len()
    );
}

fn demo_applicant(child_name: Option<String>) -> ApplicantDetails {
    ApplicantDetails {
        parent_name: "Alex Moreno".to_string(),
        parent_email: "alex.moreno@example.com".to_string(),
        parent_phone: Some("555-0100".to_string()),
        child_name: child_name.unwrap_or_else(|| "Sam Moreno".to_string()),
        child_date_of_birth: NaiveDate::from_ymd_opt(2019, 9, 3),
        grade_applying_for: Some("Kindergarten".to_string()),
    }
}

fn demo_form(kind: FormKind, today: NaiveDate) -> StageForm {
    let staff = Some("Admissions Office".to_string());
    let questionnaire = |respondent: &str, relationship: &str| QuestionnaireForm {
        respondent_name: Some(respondent.to_string()),
        relationship_to_child: Some(relationship.to_string()),
        strengths: Some("Enjoys building and storytelling".to_string()),
        ..QuestionnaireForm::default()
    };
    let interview = || InterviewScoreForm {
        interviewer: staff.clone(),
        interview_date: Some(today),
        communication_score: Some(4),
        engagement_score: Some(4),
        alignment_score: Some(5),
        ..InterviewScoreForm::default()
    };

    match kind {
        FormKind::ScreeningCall => StageForm::ScreeningCall(ScreeningCallForm {
            conducted_by: staff.clone(),
            call_date: Some(today),
            reason_for_applying: Some("Looking for a smaller class size".to_string()),
            ..ScreeningCallForm::default()
        }),
        FormKind::DocumentReview => StageForm::DocumentReview(DocumentReviewForm {
            reviewer: staff.clone(),
            birth_certificate_received: Some(true),
            immunization_record_received: Some(true),
            prior_school_reports_received: Some(false),
            notes: None,
        }),
        FormKind::ParentGuardianQuestionnaire => {
            StageForm::ParentGuardianQuestionnaire(questionnaire("Alex Moreno", "Parent"))
        }
        FormKind::CaregiverQuestionnaire => {
            StageForm::CaregiverQuestionnaire(questionnaire("Rosa Diaz", "Nanny"))
        }
        FormKind::OutsiderQuestionnaire => {
            StageForm::OutsiderQuestionnaire(questionnaire("Kim Lee", "Preschool teacher"))
        }
        FormKind::ClassroomObservation => {
            StageForm::ClassroomObservation(ClassroomObservationForm {
                observer: staff.clone(),
                observed_on: Some(today),
                duration_minutes: Some(45),
                engagement_rating: Some(4),
                peer_interaction_rating: Some(4),
                notes: None,
            })
        }
        FormKind::BehaviorChecklist => StageForm::BehaviorChecklist(BehaviorChecklistForm {
            completed_by: staff.clone(),
            follows_instructions: Some(true),
            transitions_calmly: Some(true),
            shares_materials: Some(true),
            seeks_adult_help: Some(true),
            notes: None,
        }),
        FormKind::DevelopmentalChecklist => {
            StageForm::DevelopmentalChecklist(DevelopmentalChecklistForm {
                completed_by: staff.clone(),
                fine_motor: Some(true),
                gross_motor: Some(true),
                expressive_language: Some(true),
                receptive_language: Some(true),
                self_care: Some(true),
                notes: None,
            })
        }
        FormKind::ParentInterview => StageForm::ParentInterview(interview()),
        FormKind::ChildInterview => StageForm::ChildInterview(interview()),
        FormKind::SchoolReference => StageForm::SchoolReference(SchoolReferenceForm {
            referee_name: Some("Kim Lee".to_string()),
            school_name: Some("Little Oaks Preschool".to_string()),
            attendance_concerns: Some(false),
            would_readmit: Some(true),
            comments: None,
        }),
        FormKind::CompositeProfile => StageForm::CompositeProfile(CompositeProfileForm {
            prepared_by: staff.clone(),
            summary: Some("Ready for kindergarten placement".to_string()),
            academic_readiness: Some(4),
            social_readiness: Some(4),
            support_needs: None,
            placement_recommendation: Some("Admit".to_string()),
        }),
    }
}
