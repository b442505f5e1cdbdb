use std::sync::Arc;

use chrono::{DateTime, Utc};

use course_core::engine::{ProgressPolicy, QuizAnswerOutcome, SectionReadOutcome, StreakOutcome};
use course_core::model::{BadgeId, Catalog, CourseProgress, DepthLevel, ModuleProgress};
use storage::repository::{PROGRESS_KEY, ProgressStore};
use storage::{decode_progress, encode_progress};

use crate::Clock;

/// Result of a quiz submission as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    /// Whether this answer was right, independent of the module aggregate.
    pub correct: bool,
    /// `None` when the module or question is unknown and nothing was recorded.
    pub recorded: Option<QuizAnswerOutcome>,
}

/// Owns the learner's progress and keeps storage in step with it.
///
/// Construct with [`ProgressService::load`]; every applied mutation is
/// persisted before the call returns. Persistence failures are logged and do
/// not interrupt the learner.
pub struct ProgressService {
    clock: Clock,
    policy: ProgressPolicy,
    catalog: Arc<Catalog>,
    store: Arc<dyn ProgressStore>,
    progress: CourseProgress,
}

impl ProgressService {
    /// Restore progress from `store`, reconcile it against `catalog`, credit
    /// today's streak, and persist the result.
    ///
    /// Missing, unreadable, or incompatible records fall back to a fresh one.
    pub async fn load(
        catalog: Arc<Catalog>,
        store: Arc<dyn ProgressStore>,
        clock: Clock,
        policy: ProgressPolicy,
    ) -> Self {
        let now = clock.now();
        let mut progress = restore(store.as_ref(), now).await;
        progress.normalize(&catalog, now);
        log_streak(&progress.apply_daily_streak(now));

        let service = Self {
            clock,
            policy,
            catalog,
            store,
            progress,
        };
        service.persist().await;
        service
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    /// Record a section as read. Unknown ids and repeat reads change nothing.
    pub async fn mark_section_read(
        &mut self,
        module_id: &str,
        section_id: &str,
    ) -> Option<SectionReadOutcome> {
        let now = self.clock.now();
        let outcome = self
            .progress
            .mark_section_read(&self.catalog, module_id, section_id, now);

        match &outcome {
            Some(applied) => {
                tracing::debug!(
                    module_id,
                    section_id,
                    xp = applied.xp_gained,
                    module_completed = applied.module_completed,
                    "section read"
                );
                log_badges(&applied.badges_awarded);
                self.persist().await;
            }
            None => tracing::debug!(module_id, section_id, "section read ignored"),
        }
        outcome
    }

    /// Grade and record an answer. Unknown module or question ids return
    /// `correct: false` without touching state.
    pub async fn submit_quiz_answer(
        &mut self,
        module_id: &str,
        question_id: &str,
        answer: &str,
    ) -> QuizAnswer {
        let now = self.clock.now();
        let recorded = self
            .progress
            .submit_quiz_answer(&self.catalog, module_id, question_id, answer, now);

        match &recorded {
            Some(applied) => {
                tracing::debug!(
                    module_id,
                    question_id,
                    correct = applied.correct,
                    attempt = applied.attempt_number,
                    xp = applied.xp_gained,
                    "quiz answer recorded"
                );
                log_badges(&applied.badges_awarded);
                self.persist().await;
            }
            None => tracing::debug!(module_id, question_id, "quiz answer ignored"),
        }

        QuizAnswer {
            correct: recorded.as_ref().is_some_and(|r| r.correct),
            recorded,
        }
    }

    /// Discard all progress and start over as on first run.
    pub async fn reset_progress(&mut self) {
        let now = self.clock.now();
        let mut fresh = CourseProgress::new(now);
        log_streak(&fresh.apply_daily_streak(now));
        self.progress = fresh;
        tracing::info!("progress reset");
        self.persist().await;
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    /// Read-only snapshot of the full record.
    #[must_use]
    pub fn progress(&self) -> &CourseProgress {
        &self.progress
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn module_progress(&self, module_id: &str) -> Option<ModuleProgress> {
        self.progress.module_progress(&self.catalog, module_id)
    }

    #[must_use]
    pub fn is_module_complete(&self, module_id: &str) -> bool {
        self.progress.is_module_complete(module_id)
    }

    #[must_use]
    pub fn is_module_unlocked(&self, module_id: &str) -> bool {
        self.progress.is_module_unlocked(&self.catalog, self.policy.unlock, module_id)
    }

    #[must_use]
    pub fn module_percent(&self, module_id: &str) -> u32 {
        self.progress.module_percent(self.policy.module_percent, module_id)
    }

    #[must_use]
    pub fn overall_percent(&self) -> u32 {
        self.progress.overall_percent(&self.catalog)
    }

    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.progress.has_badge(badge_id)
    }

    #[must_use]
    pub fn level(&self) -> DepthLevel {
        self.progress.level()
    }

    #[must_use]
    pub fn next_level(&self) -> Option<DepthLevel> {
        self.progress.next_level()
    }

    async fn persist(&self) {
        let raw = match encode_progress(&self.progress) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode progress");
                return;
            }
        };
        if let Err(err) = self.store.save_blob(PROGRESS_KEY, &raw).await {
            tracing::warn!(error = %err, "failed to persist progress");
        }
    }
}

async fn restore(store: &dyn ProgressStore, now: DateTime<Utc>) -> CourseProgress {
    match store.load_blob(PROGRESS_KEY).await {
        Ok(Some(raw)) => decode_progress(&raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding stored progress");
            CourseProgress::new(now)
        }),
        Ok(None) => {
            tracing::debug!("no stored progress; starting fresh");
            CourseProgress::new(now)
        }
        Err(err) => {
            tracing::warn!(error = %err, "progress store unavailable; starting fresh");
            CourseProgress::new(now)
        }
    }
}

fn log_streak(outcome: &StreakOutcome) {
    if let StreakOutcome::Credited {
        current,
        badges_awarded,
        ..
    } = outcome
    {
        tracing::debug!(streak = current, "daily streak credited");
        log_badges(badges_awarded);
    }
}

fn log_badges(badges: &[BadgeId]) {
    for badge in badges {
        tracing::info!(badge = %badge, "badge earned");
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
