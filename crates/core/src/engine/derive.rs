use std::collections::{BTreeMap, BTreeSet};

use crate::model::badge::{COURSE_COMPLETE, module_badge};
use crate::model::{BadgeId, Catalog, ModuleDef, ModuleId, ModuleProgress, QuizProgress};

/// Completion badges implied by module state: one per completed module that has
/// a badge, plus the course badge when every catalog module is complete.
///
/// Total over its inputs, so re-deriving after any change is always safe.
#[must_use]
pub fn derive_completion_badges(
    catalog: &Catalog,
    modules: &BTreeMap<ModuleId, ModuleProgress>,
) -> BTreeSet<BadgeId> {
    let mut badges: BTreeSet<BadgeId> = catalog
        .modules()
        .iter()
        .filter(|def| is_module_complete(modules, def))
        .filter_map(|def| module_badge(def.id().as_str()))
        .map(|badge| badge.badge_id())
        .collect();

    if all_modules_complete(catalog, modules) {
        badges.insert(BadgeId::from(COURSE_COMPLETE));
    }

    badges
}

/// True when the catalog is non-empty and every module has a completion time.
#[must_use]
pub fn all_modules_complete(
    catalog: &Catalog,
    modules: &BTreeMap<ModuleId, ModuleProgress>,
) -> bool {
    !catalog.is_empty()
        && catalog
            .modules()
            .iter()
            .all(|def| is_module_complete(modules, def))
}

/// Every question of the module answered correctly on its only attempt.
#[must_use]
pub fn quiz_perfect_first_try(def: &ModuleDef, quiz: &QuizProgress) -> bool {
    !def.quiz().is_empty()
        && def.quiz().iter().all(|q| {
            quiz.question_results
                .get(q.id().as_str())
                .is_some_and(|r| r.correct && r.attempts == 1)
        })
}

/// `quiz_perfect_first_try` across the whole catalog.
#[must_use]
pub fn all_quizzes_perfect(
    catalog: &Catalog,
    modules: &BTreeMap<ModuleId, ModuleProgress>,
) -> bool {
    catalog.modules().iter().all(|def| {
        def.quiz().is_empty()
            || modules
                .get(def.id().as_str())
                .is_some_and(|m| quiz_perfect_first_try(def, &m.quiz))
    })
}

fn is_module_complete(modules: &BTreeMap<ModuleId, ModuleProgress>, def: &ModuleDef) -> bool {
    modules
        .get(def.id().as_str())
        .is_some_and(ModuleProgress::is_complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionDef, QuestionResult};
    use crate::time::fixed_now;

    fn catalog() -> Catalog {
        let quiz = || vec![QuestionDef::new("q1", "a", vec![])];
        Catalog::new(vec![
            ModuleDef::new("module-1", 1, "One", 5, vec!["s1".into()], quiz()),
            ModuleDef::new("module-2", 2, "Two", 5, vec!["s1".into()], quiz()),
        ])
        .unwrap()
    }

    fn completed() -> ModuleProgress {
        let mut m = ModuleProgress::new(1, 1);
        m.sections_read.insert("s1".into());
        m.completed_at = Some(fixed_now());
        m
    }

    #[test]
    fn nothing_complete_derives_nothing() {
        assert!(derive_completion_badges(&catalog(), &BTreeMap::new()).is_empty());
    }

    #[test]
    fn completed_module_derives_only_its_badge() {
        let mut modules = BTreeMap::new();
        modules.insert(ModuleId::from("module-2"), completed());
        let badges = derive_completion_badges(&catalog(), &modules);
        assert_eq!(badges.len(), 1);
        assert!(badges.contains("outcome-thinker"));
    }

    #[test]
    fn all_complete_adds_course_badge() {
        let mut modules = BTreeMap::new();
        modules.insert(ModuleId::from("module-1"), completed());
        modules.insert(ModuleId::from("module-2"), completed());
        let badges = derive_completion_badges(&catalog(), &modules);
        assert!(badges.contains("first-delegate"));
        assert!(badges.contains("outcome-thinker"));
        assert!(badges.contains(COURSE_COMPLETE));
    }

    #[test]
    fn empty_catalog_is_never_course_complete() {
        assert!(!all_modules_complete(&Catalog::default(), &BTreeMap::new()));
    }

    #[test]
    fn perfect_requires_single_correct_attempt() {
        let catalog = catalog();
        let def = catalog.module("module-1").unwrap();
        let mut quiz = QuizProgress::new(1);
        quiz.question_results.insert(
            "q1".into(),
            QuestionResult {
                correct: true,
                selected_answer: "a".into(),
                attempts: 2,
            },
        );
        assert!(!quiz_perfect_first_try(def, &quiz));

        quiz.question_results.get_mut("q1").unwrap().attempts = 1;
        assert!(quiz_perfect_first_try(def, &quiz));
    }
}
