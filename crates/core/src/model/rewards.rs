//! XP rewards and fixed engine thresholds.

use chrono::Duration;

pub const XP_SECTION_READ: u32 = 5;
pub const XP_QUIZ_CORRECT_FIRST_TRY: u32 = 15;
pub const XP_QUIZ_CORRECT_RETRY: u32 = 5;
pub const XP_MODULE_COMPLETE: u32 = 50;
pub const XP_COURSE_COMPLETE: u32 = 200;
pub const XP_DAILY_STREAK: u32 = 10;

/// Maximum number of quiz attempts retained in the history log.
pub const QUIZ_HISTORY_LIMIT: usize = 200;

/// Completing a module within this window of its first read earns the speed badge.
#[must_use]
pub fn fast_completion_window() -> Duration {
    Duration::minutes(10)
}
