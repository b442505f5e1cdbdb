use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::catalog::ModuleDef;
use crate::model::ids::{BadgeId, ModuleId, OptionId, QuestionId, SectionId};

/// Schema tag written with every persisted record.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

//
// ─── COURSE PROGRESS ───────────────────────────────────────────────────────────
//

/// Canonical per-user progress record.
///
/// Serialized as a single JSON blob with camelCase keys. Mutations live in
/// `crate::engine`; this type only carries data and simple accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub version: u32,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub xp: u32,
    pub streak: Streak,
    pub modules: BTreeMap<ModuleId, ModuleProgress>,
    pub badges: BTreeSet<BadgeId>,
    pub quiz_history: VecDeque<QuizAttempt>,
}

impl CourseProgress {
    /// Fresh first-run record.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            started_at: now,
            last_active_at: now,
            xp: 0,
            streak: Streak::default(),
            modules: BTreeMap::new(),
            badges: BTreeSet::new(),
            quiz_history: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn module(&self, id: &str) -> Option<&ModuleProgress> {
        self.modules.get(id)
    }

    #[must_use]
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.contains(id)
    }
}

//
// ─── STREAK ────────────────────────────────────────────────────────────────────
//

/// Consecutive-day activity counter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current: u32,
    #[serde(with = "calendar_date")]
    pub last_active_date: Option<NaiveDate>,
    pub longest: u32,
}

/// `YYYY-MM-DD`, with the empty string standing in for "never active".
mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map(Some)
            .map_err(D::Error::custom)
    }
}

//
// ─── MODULE PROGRESS ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub started: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sections_read: BTreeSet<SectionId>,
    pub total_sections: u32,
    pub quiz: QuizProgress,
}

impl ModuleProgress {
    #[must_use]
    pub fn new(total_sections: u32, total_questions: u32) -> Self {
        Self {
            started: false,
            started_at: None,
            completed_at: None,
            sections_read: BTreeSet::new(),
            total_sections,
            quiz: QuizProgress::new(total_questions),
        }
    }

    /// Untouched progress sized for the given module definition.
    #[must_use]
    pub fn for_module(def: &ModuleDef) -> Self {
        Self::new(def.total_sections(), def.total_questions())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn sections_read_count(&self) -> u32 {
        u32::try_from(self.sections_read.len()).unwrap_or(u32::MAX)
    }

    /// Section coverage that makes a module complete. Empty modules never are.
    #[must_use]
    pub fn covers_all_sections(&self) -> bool {
        self.total_sections > 0 && self.sections_read_count() >= self.total_sections
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub completed: bool,
    pub score: u32,
    pub total_questions: u32,
    pub attempts: u32,
    pub best_score: u32,
    pub question_results: BTreeMap<QuestionId, QuestionResult>,
}

impl QuizProgress {
    #[must_use]
    pub fn new(total_questions: u32) -> Self {
        Self {
            completed: false,
            score: 0,
            total_questions,
            attempts: 0,
            best_score: 0,
            question_results: BTreeMap::new(),
        }
    }
}

/// Latest state of one question. `correct` is sticky once true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub correct: bool,
    pub selected_answer: OptionId,
    pub attempts: u32,
}

/// One submitted answer, as recorded in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub module_id: ModuleId,
    pub question_id: QuestionId,
    pub selected_answer: OptionId,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
    pub attempt_number: u32,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
