//! The progress engine: deterministic transitions over `CourseProgress`.
//!
//! Every operation takes the catalog and the current instant explicitly. Load
//! order is `normalize` then `apply_daily_streak`; mutations follow.

mod derive;
mod mutation;
mod normalize;
mod query;
mod streak;

pub use derive::{
    all_modules_complete, all_quizzes_perfect, derive_completion_badges, quiz_perfect_first_try,
};
pub use mutation::{QuizAnswerOutcome, SectionReadOutcome};
pub use query::{ModulePercentPolicy, ProgressPolicy, UnlockPolicy};
pub use streak::StreakOutcome;
