use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{ModuleId, OptionId, QuestionId, SectionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    #[error("module {module} lists section {section} more than once")]
    DuplicateSection { module: ModuleId, section: SectionId },

    #[error("module {module} lists question {question} more than once")]
    DuplicateQuestion {
        module: ModuleId,
        question: QuestionId,
    },

    #[error("question {question} in module {module} has a correct answer outside its options")]
    UnknownCorrectAnswer {
        module: ModuleId,
        question: QuestionId,
    },
}

//
// ─── DEFINITIONS ───────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDef {
    id: QuestionId,
    correct_answer: OptionId,
    options: Vec<OptionId>,
}

impl QuestionDef {
    /// Build a question. An empty `options` list skips the membership check
    /// for the correct answer.
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        correct_answer: impl Into<OptionId>,
        options: Vec<OptionId>,
    ) -> Self {
        Self {
            id: id.into(),
            correct_answer: correct_answer.into(),
            options,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn correct_answer(&self) -> &OptionId {
        &self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// Static definition of one course module: its ordered sections and quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDef {
    id: ModuleId,
    number: u32,
    title: String,
    estimated_minutes: u32,
    sections: Vec<SectionId>,
    quiz: Vec<QuestionDef>,
}

impl ModuleDef {
    #[must_use]
    pub fn new(
        id: impl Into<ModuleId>,
        number: u32,
        title: impl Into<String>,
        estimated_minutes: u32,
        sections: Vec<SectionId>,
        quiz: Vec<QuestionDef>,
    ) -> Self {
        Self {
            id: id.into(),
            number,
            title: title.into(),
            estimated_minutes,
            sections,
            quiz,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    #[must_use]
    pub fn quiz(&self) -> &[QuestionDef] {
        &self.quiz
    }

    #[must_use]
    pub fn total_sections(&self) -> u32 {
        u32::try_from(self.sections.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.quiz.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }

    #[must_use]
    pub fn question(&self, question: &str) -> Option<&QuestionDef> {
        self.quiz.iter().find(|q| q.id == question)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut sections = HashSet::new();
        for section in &self.sections {
            if !sections.insert(section.as_str()) {
                return Err(CatalogError::DuplicateSection {
                    module: self.id.clone(),
                    section: section.clone(),
                });
            }
        }

        let mut questions = HashSet::new();
        for question in &self.quiz {
            if !questions.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion {
                    module: self.id.clone(),
                    question: question.id.clone(),
                });
            }
            if !question.options.is_empty() && !question.options.contains(&question.correct_answer)
            {
                return Err(CatalogError::UnknownCorrectAnswer {
                    module: self.id.clone(),
                    question: question.id.clone(),
                });
            }
        }

        Ok(())
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, validated set of module definitions for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    modules: Vec<ModuleDef>,
}

impl Catalog {
    /// Validate and assemble a catalog. Module order is preserved.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids or a correct answer that is not
    /// among a question's listed options.
    pub fn new(modules: Vec<ModuleDef>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.id.as_str()) {
                return Err(CatalogError::DuplicateModule(module.id.clone()));
            }
            module.validate()?;
        }
        Ok(Self { modules })
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleDef] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// The module listed immediately before `id`, if any.
    #[must_use]
    pub fn previous_module(&self, id: &str) -> Option<&ModuleDef> {
        let idx = self.modules.iter().position(|m| m.id == id)?;
        idx.checked_sub(1).and_then(|prev| self.modules.get(prev))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.module(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
