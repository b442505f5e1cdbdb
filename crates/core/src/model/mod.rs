pub mod badge;
mod catalog;
mod ids;
pub mod level;
mod progress;
pub mod rewards;

pub use badge::{BADGES, Badge, BadgeCriteria, badge_by_id, module_badge};
pub use catalog::{Catalog, CatalogError, ModuleDef, QuestionDef};
pub use ids::{BadgeId, ModuleId, OptionId, QuestionId, SectionId};
pub use level::{DepthLevel, level_for, next_level};
pub use progress::{
    CURRENT_SCHEMA_VERSION, CourseProgress, ModuleProgress, QuestionResult, QuizAttempt,
    QuizProgress, Streak,
};
