use crate::model::{Catalog, CourseProgress, DepthLevel, ModuleProgress, level_for, next_level};

//
// ─── POLICIES ──────────────────────────────────────────────────────────────────
//

/// When a module may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlockPolicy {
    /// Every catalog module is open from the start.
    #[default]
    Open,
    /// The first module is open; each later one opens once the quiz of the
    /// module before it is completed. A predecessor without a quiz counts as
    /// passed when its sections are all read.
    SequentialQuiz,
}

/// How `module_percent` weighs section coverage against the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulePercentPolicy {
    #[default]
    SectionsOnly,
    /// Weights are percentage points and should sum to 100.
    Blended { section_weight: u32, quiz_weight: u32 },
}

impl ModulePercentPolicy {
    pub const BLENDED_70_30: Self = Self::Blended {
        section_weight: 70,
        quiz_weight: 30,
    };
}

/// Query-layer policy bundle chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressPolicy {
    pub unlock: UnlockPolicy,
    pub module_percent: ModulePercentPolicy,
}

//
// ─── QUERIES ───────────────────────────────────────────────────────────────────
//

impl CourseProgress {
    /// Stored progress for a module, or untouched defaults sized from the
    /// catalog. `None` for modules the catalog does not define.
    #[must_use]
    pub fn module_progress(&self, catalog: &Catalog, id: &str) -> Option<ModuleProgress> {
        let def = catalog.module(id)?;
        Some(
            self.modules
                .get(id)
                .cloned()
                .unwrap_or_else(|| ModuleProgress::for_module(def)),
        )
    }

    #[must_use]
    pub fn is_module_complete(&self, id: &str) -> bool {
        self.modules.get(id).is_some_and(ModuleProgress::is_complete)
    }

    #[must_use]
    pub fn is_module_unlocked(&self, catalog: &Catalog, policy: UnlockPolicy, id: &str) -> bool {
        if !catalog.contains(id) {
            return false;
        }
        match policy {
            UnlockPolicy::Open => true,
            UnlockPolicy::SequentialQuiz => match catalog.previous_module(id) {
                None => true,
                Some(prev) => self.modules.get(prev.id().as_str()).is_some_and(|m| {
                    if prev.quiz().is_empty() {
                        m.is_complete()
                    } else {
                        m.quiz.completed
                    }
                }),
            },
        }
    }

    /// Rounded completion percentage (0-100) of one module.
    #[must_use]
    pub fn module_percent(&self, policy: ModulePercentPolicy, id: &str) -> u32 {
        let Some(module) = self.modules.get(id) else {
            return 0;
        };
        let read = module.sections_read_count().min(module.total_sections);
        let total = module.total_sections;

        match policy {
            ModulePercentPolicy::SectionsOnly => rounded_ratio(read, 100, total),
            ModulePercentPolicy::Blended {
                section_weight,
                quiz_weight,
            } => {
                let quiz = if module.quiz.completed { quiz_weight } else { 0 };
                (rounded_ratio(read, section_weight, total) + quiz).min(100)
            }
        }
    }

    /// Rounded share (0-100) of catalog modules that are complete.
    #[must_use]
    pub fn overall_percent(&self, catalog: &Catalog) -> u32 {
        let total = u32::try_from(catalog.len()).unwrap_or(u32::MAX);
        let complete = catalog
            .modules()
            .iter()
            .filter(|def| self.is_module_complete(def.id().as_str()))
            .count();
        rounded_ratio(u32::try_from(complete).unwrap_or(u32::MAX), 100, total)
    }

    #[must_use]
    pub fn level(&self) -> DepthLevel {
        level_for(self.xp)
    }

    #[must_use]
    pub fn next_level(&self) -> Option<DepthLevel> {
        next_level(self.xp)
    }
}

/// `round(part * scale / whole)` with halves rounded up; 0 when `whole` is 0.
fn rounded_ratio(part: u32, scale: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, scale, whole) = (u64::from(part), u64::from(scale), u64::from(whole));
    let value = (2 * part * scale + whole) / (2 * whole);
    u32::try_from(value).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
