use serde::Serialize;

use super::domain::{ApplicationStatus, Stage, StageFlags};

/// Summary of stage completion recomputed from the flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub status: ApplicationStatus,
    pub progress_percent: u8,
    pub completed: Vec<&'static str>,
    pub remaining: Vec<&'static str>,
}

/// Derive the overall status from the ten stage flags.
///
/// Total over every flag combination. Never yields `Rejected`; that status only
/// comes from the admin override.
pub fn derive_status(flags: &StageFlags) -> StageProgress {
    let (completed, remaining): (Vec<Stage>, Vec<Stage>) = Stage::ALL
        .iter()
        .copied()
        .partition(|stage| flags.is_completed(*stage));

    let total = Stage::ALL.len();
    let done = completed.len();

    let status = if done == 0 {
        ApplicationStatus::Submitted
    } else if done < total {
        ApplicationStatus::Processing
    } else {
        ApplicationStatus::Completed
    };

    StageProgress {
        status,
        progress_percent: percent(done, total),
        completed: completed.into_iter().map(Stage::label).collect(),
        remaining: remaining.into_iter().map(Stage::label).collect(),
    }
}

// Half-up rounding.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done * 200 + total) / (total * 2)) as u8
}
