use chrono::{DateTime, Utc};

use crate::engine::derive::{all_modules_complete, all_quizzes_perfect, quiz_perfect_first_try};
use crate::engine::normalize::truncate_history;
use crate::model::badge::{ALL_PERFECT, COURSE_COMPLETE, PERFECT_QUIZ, SPEED_DEMON, module_badge};
use crate::model::rewards::{
    XP_COURSE_COMPLETE, XP_MODULE_COMPLETE, XP_QUIZ_CORRECT_FIRST_TRY, XP_QUIZ_CORRECT_RETRY,
    XP_SECTION_READ, fast_completion_window,
};
use crate::model::{
    BadgeId, Catalog, CourseProgress, ModuleProgress, OptionId, QuestionResult, QuizAttempt,
    SectionId,
};

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Effects of a section read that was actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionReadOutcome {
    pub xp_gained: u32,
    pub module_completed: bool,
    pub course_completed: bool,
    pub badges_awarded: Vec<BadgeId>,
}

/// Effects of a recorded quiz submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerOutcome {
    /// Correctness of this submission alone.
    pub correct: bool,
    pub attempt_number: u32,
    pub xp_gained: u32,
    pub quiz_completed: bool,
    pub badges_awarded: Vec<BadgeId>,
}

//
// ─── MUTATIONS ─────────────────────────────────────────────────────────────────
//

impl CourseProgress {
    /// Record that a section was read.
    ///
    /// Returns `None` without touching state when the module or section is not
    /// in the catalog, or the section was already read.
    pub fn mark_section_read(
        &mut self,
        catalog: &Catalog,
        module_id: &str,
        section_id: &str,
        now: DateTime<Utc>,
    ) -> Option<SectionReadOutcome> {
        let def = catalog.module(module_id)?;
        if !def.has_section(section_id) {
            return None;
        }
        if self
            .modules
            .get(module_id)
            .is_some_and(|m| m.sections_read.contains(section_id))
        {
            return None;
        }

        let mut outcome = SectionReadOutcome {
            xp_gained: XP_SECTION_READ,
            ..SectionReadOutcome::default()
        };

        let module = self
            .modules
            .entry(def.id().clone())
            .or_insert_with(|| ModuleProgress::for_module(def));
        module.total_sections = def.total_sections();
        // Records restored without a start time cannot be timed.
        let timed_from = module
            .started_at
            .or(module.sections_read.is_empty().then_some(now));
        module.sections_read.insert(SectionId::from(section_id));
        module.started = true;
        module.started_at.get_or_insert(now);

        let mut earned = Vec::new();
        if module.completed_at.is_none() && module.covers_all_sections() {
            module.completed_at = Some(now);
            outcome.module_completed = true;
            outcome.xp_gained += XP_MODULE_COMPLETE;

            if let Some(badge) = module_badge(module_id) {
                earned.push(badge.id);
            }
            if timed_from
                .is_some_and(|start| now.signed_duration_since(start) < fast_completion_window())
            {
                earned.push(SPEED_DEMON);
            }
        }

        for badge in earned {
            self.award(badge, &mut outcome.badges_awarded);
        }

        if outcome.module_completed {
            let course_xp = self.complete_course_if_finished(catalog, &mut outcome.badges_awarded);
            outcome.course_completed = course_xp > 0;
            outcome.xp_gained += course_xp;
        }

        self.xp = self.xp.saturating_add(outcome.xp_gained);
        self.last_active_at = now;
        Some(outcome)
    }

    /// Record an answer to a quiz question.
    ///
    /// Returns `None` without touching state when the module or question is not
    /// in the catalog.
    pub fn submit_quiz_answer(
        &mut self,
        catalog: &Catalog,
        module_id: &str,
        question_id: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Option<QuizAnswerOutcome> {
        let def = catalog.module(module_id)?;
        let question = def.question(question_id)?;
        let correct = question.is_correct(answer);

        let module = self
            .modules
            .entry(def.id().clone())
            .or_insert_with(|| ModuleProgress::for_module(def));
        let was_completed = module.quiz.completed;

        let result = module
            .quiz
            .question_results
            .entry(question.id().clone())
            .or_insert_with(|| QuestionResult {
                correct: false,
                selected_answer: OptionId::from(answer),
                attempts: 0,
            });
        result.attempts += 1;
        result.selected_answer = OptionId::from(answer);
        result.correct |= correct;
        let attempt_number = result.attempts;

        let xp_gained = match (correct, attempt_number) {
            (false, _) => 0,
            (true, 1) => XP_QUIZ_CORRECT_FIRST_TRY,
            (true, _) => XP_QUIZ_CORRECT_RETRY,
        };

        module.quiz.total_questions = def.total_questions();
        module.quiz.attempts += 1;
        module.quiz.recompute(def);

        let quiz_completed = !was_completed && module.quiz.completed;
        let perfect = quiz_completed && quiz_perfect_first_try(def, &module.quiz);

        let mut badges_awarded = Vec::new();
        if perfect {
            self.award(PERFECT_QUIZ, &mut badges_awarded);
        }
        if quiz_completed {
            self.award_all_perfect_if_earned(catalog, &mut badges_awarded);
        }

        self.quiz_history.push_back(QuizAttempt {
            module_id: def.id().clone(),
            question_id: question.id().clone(),
            selected_answer: OptionId::from(answer),
            correct,
            timestamp: now,
            attempt_number,
        });
        truncate_history(self);

        self.xp = self.xp.saturating_add(xp_gained);
        self.last_active_at = now;

        Some(QuizAnswerOutcome {
            correct,
            attempt_number,
            xp_gained,
            quiz_completed,
            badges_awarded,
        })
    }

    /// Award the course badge and bonus once every module is complete.
    /// Returns the XP granted.
    fn complete_course_if_finished(
        &mut self,
        catalog: &Catalog,
        awarded: &mut Vec<BadgeId>,
    ) -> u32 {
        if self.has_badge(COURSE_COMPLETE) || !all_modules_complete(catalog, &self.modules) {
            return 0;
        }
        self.award(COURSE_COMPLETE, awarded);
        self.award_all_perfect_if_earned(catalog, awarded);
        XP_COURSE_COMPLETE
    }

    fn award_all_perfect_if_earned(&mut self, catalog: &Catalog, awarded: &mut Vec<BadgeId>) {
        if self.has_badge(COURSE_COMPLETE)
            && !self.has_badge(ALL_PERFECT)
            && all_quizzes_perfect(catalog, &self.modules)
        {
            self.award(ALL_PERFECT, awarded);
        }
    }

    fn award(&mut self, badge: &str, awarded: &mut Vec<BadgeId>) {
        if self.badges.insert(BadgeId::from(badge)) {
            awarded.push(BadgeId::from(badge));
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
