#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure diagnosis system that grades Recovery challenge progress.
//!
//! The grading is a function of the committed challenge record alone; the
//! system keeps the last published verdict so adapters can re-render it
//! without recomputing, and emits a fresh verdict only when the underlying
//! record changed.

use bee_meadow_core::{ChallengeOutcome, ChallengeView, Event};

/// Number of favorable answers that earns the top verdict.
const FLOURISHING_AT: usize = 4;
/// Number of favorable answers that earns the stabilizing verdict.
const STABILIZING_AT: usize = 3;
/// Number of favorable answers that earns the fragile verdict.
const FRAGILE_AT: usize = 2;

/// Ecosystem verdict derived from the favorable-answer tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnvironmentStatus {
    /// Zero or one favorable answers: the ecosystem stays in danger.
    Critical,
    /// Two favorable answers: recovery has begun but remains reversible.
    Fragile,
    /// Three favorable answers: the recovery trend is established.
    Stabilizing,
    /// All four favorable answers: the ecosystem thrives.
    Flourishing,
}

/// Grades a challenge record into an environment status.
#[must_use]
pub fn grade(challenges: &ChallengeView) -> EnvironmentStatus {
    match challenges.favorable {
        count if count >= FLOURISHING_AT => EnvironmentStatus::Flourishing,
        count if count >= STABILIZING_AT => EnvironmentStatus::Stabilizing,
        count if count >= FRAGILE_AT => EnvironmentStatus::Fragile,
        _ => EnvironmentStatus::Critical,
    }
}

/// Grades a record as if the pending outcome were already committed.
///
/// Adapters use this to preview the verdict while the user is still weighing
/// a choice; the record itself is never mutated.
#[must_use]
pub fn grade_with_pending(
    challenges: &ChallengeView,
    pending: Option<ChallengeOutcome>,
) -> EnvironmentStatus {
    let speculative = ChallengeView {
        current_index: challenges.current_index,
        committed: challenges.committed + usize::from(pending.is_some()),
        favorable: challenges.favorable
            + usize::from(pending.is_some_and(ChallengeOutcome::is_favorable)),
    };
    grade(&speculative)
}

/// Pure system that tracks the challenge record and publishes verdicts.
#[derive(Debug, Default)]
pub struct Diagnosis {
    last_record: Option<ChallengeView>,
    last_status: Option<EnvironmentStatus>,
}

impl Diagnosis {
    /// Creates a new diagnosis system with no published verdict.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last verdict published by the system, if any.
    #[must_use]
    pub fn last_status(&self) -> Option<EnvironmentStatus> {
        self.last_status
    }

    /// Consumes world events and the current challenge record, publishing a
    /// verdict whenever a challenge advanced and the record changed.
    pub fn handle(
        &mut self,
        events: &[Event],
        challenges: ChallengeView,
        out: &mut Vec<EnvironmentStatus>,
    ) {
        let advanced = events
            .iter()
            .any(|event| matches!(event, Event::ChallengeAdvanced { .. }));
        if !advanced {
            return;
        }

        if self.last_record == Some(challenges) {
            return;
        }

        let status = grade(&challenges);
        self.last_record = Some(challenges);
        self.last_status = Some(status);
        out.push(status);
    }
}
