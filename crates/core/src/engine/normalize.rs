use chrono::{DateTime, Utc};

use crate::engine::derive::{all_quizzes_perfect, derive_completion_badges};
use crate::model::badge::{ALL_PERFECT, COURSE_COMPLETE, is_completion_badge};
use crate::model::rewards::QUIZ_HISTORY_LIMIT;
use crate::model::{BadgeId, Catalog, CourseProgress, ModuleDef, ModuleProgress, QuizProgress};

impl CourseProgress {
    /// Reconcile a restored record with the current catalog.
    ///
    /// Drops modules the catalog no longer defines, re-syncs totals, recomputes
    /// completion, and rebuilds module and course badges from scratch. Sticky
    /// badges implied by the rebuilt state are added. Running it twice is the
    /// same as running it once.
    pub fn normalize(&mut self, catalog: &Catalog, now: DateTime<Utc>) {
        self.modules.retain(|id, _| catalog.contains(id.as_str()));
        for def in catalog.modules() {
            if let Some(module) = self.modules.get_mut(def.id().as_str()) {
                module.resync(def, now);
            }
        }

        self.streak.longest = self.streak.longest.max(self.streak.current);
        truncate_history(self);

        let derived = derive_completion_badges(catalog, &self.modules);
        self.badges.retain(|badge| !is_completion_badge(badge.as_str()));
        self.badges.extend(derived);

        if self.has_badge(COURSE_COMPLETE) && all_quizzes_perfect(catalog, &self.modules) {
            self.badges.insert(BadgeId::from(ALL_PERFECT));
        }
    }
}

pub(crate) fn truncate_history(progress: &mut CourseProgress) {
    while progress.quiz_history.len() > QUIZ_HISTORY_LIMIT {
        progress.quiz_history.pop_front();
    }
}

impl ModuleProgress {
    pub(crate) fn resync(&mut self, def: &ModuleDef, now: DateTime<Utc>) {
        self.total_sections = def.total_sections();
        self.sections_read.retain(|s| def.has_section(s.as_str()));
        if !self.sections_read.is_empty() {
            self.started = true;
        }

        self.quiz.total_questions = def.total_questions();
        self.quiz
            .question_results
            .retain(|q, _| def.question(q.as_str()).is_some());
        self.quiz.best_score = self.quiz.best_score.min(self.quiz.total_questions);
        self.quiz.recompute(def);

        self.completed_at = if self.covers_all_sections() {
            self.completed_at.or(Some(now))
        } else {
            None
        };
    }
}

impl QuizProgress {
    /// Refresh `score`, `completed` and `best_score` from the question results.
    pub(crate) fn recompute(&mut self, def: &ModuleDef) {
        let correct = def
            .quiz()
            .iter()
            .filter(|q| {
                self.question_results
                    .get(q.id().as_str())
                    .is_some_and(|r| r.correct)
            })
            .count();
        self.score = u32::try_from(correct).unwrap_or(u32::MAX);
        self.completed = !def.quiz().is_empty() && correct == def.quiz().len();
        self.best_score = self.best_score.max(self.score);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
