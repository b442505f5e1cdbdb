use chrono::{DateTime, Utc};

use crate::model::badge::{STREAK_3, STREAK_7};
use crate::model::rewards::XP_DAILY_STREAK;
use crate::model::{BadgeId, CourseProgress};

/// What a daily streak evaluation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Today was already credited.
    AlreadyCredited,
    /// The streak advanced (or restarted at 1) and the daily bonus was granted.
    Credited {
        current: u32,
        xp_gained: u32,
        badges_awarded: Vec<BadgeId>,
    },
}

impl CourseProgress {
    /// Credit today's visit: continue the streak from yesterday, or restart it.
    ///
    /// Idempotent within a calendar day (UTC).
    pub fn apply_daily_streak(&mut self, now: DateTime<Utc>) -> StreakOutcome {
        let today = now.date_naive();
        if self.streak.last_active_date == Some(today) {
            return StreakOutcome::AlreadyCredited;
        }

        let continues = self
            .streak
            .last_active_date
            .is_some_and(|last| today.pred_opt() == Some(last));
        let current = if continues {
            self.streak.current.saturating_add(1)
        } else {
            1
        };

        let mut badges_awarded = Vec::new();
        for (threshold, badge) in [(3, STREAK_3), (7, STREAK_7)] {
            if current >= threshold && self.badges.insert(BadgeId::from(badge)) {
                badges_awarded.push(BadgeId::from(badge));
            }
        }

        self.xp = self.xp.saturating_add(XP_DAILY_STREAK);
        self.last_active_at = now;
        self.streak.current = current;
        self.streak.longest = self.streak.longest.max(current);
        self.streak.last_active_date = Some(today);

        StreakOutcome::Credited {
            current,
            xp_gained: XP_DAILY_STREAK,
            badges_awarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn progress_last_active(days_ago: i64, current: u32, longest: u32) -> CourseProgress {
        let mut progress = CourseProgress::new(fixed_now());
        progress.streak.current = current;
        progress.streak.longest = longest;
        progress.streak.last_active_date =
            Some((fixed_now() - Duration::days(days_ago)).date_naive());
        progress
    }

    #[test]
    fn first_visit_starts_at_one_with_bonus() {
        let mut progress = CourseProgress::new(fixed_now());
        let outcome = progress.apply_daily_streak(fixed_now());
        assert!(matches!(outcome, StreakOutcome::Credited { current: 1, xp_gained: 10, .. }));
        assert_eq!(progress.xp, XP_DAILY_STREAK);
        assert_eq!(progress.streak.current, 1);
        assert_eq!(progress.streak.longest, 1);
        assert_eq!(progress.streak.last_active_date, Some(fixed_now().date_naive()));
    }

    #[test]
    fn yesterday_continues_the_streak() {
        let mut progress = progress_last_active(1, 4, 4);
        progress.apply_daily_streak(fixed_now());
        assert_eq!(progress.streak.current, 5);
        assert_eq!(progress.streak.longest, 5);
    }

    #[test]
    fn gap_resets_to_one_but_still_pays() {
        let mut progress = progress_last_active(2, 6, 6);
        progress.xp = 100;
        progress.apply_daily_streak(fixed_now());
        assert_eq!(progress.streak.current, 1);
        assert_eq!(progress.streak.longest, 6);
        assert_eq!(progress.xp, 110);
    }

    #[test]
    fn same_day_is_a_no_op() {
        let mut progress = progress_last_active(0, 2, 3);
        let before = progress.clone();
        assert_eq!(
            progress.apply_daily_streak(fixed_now()),
            StreakOutcome::AlreadyCredited
        );
        assert_eq!(progress, before);
    }

    #[test]
    fn thresholds_award_streak_badges_once() {
        let mut progress = progress_last_active(1, 2, 2);
        let outcome = progress.apply_daily_streak(fixed_now());
        assert!(progress.has_badge(STREAK_3));
        assert!(!progress.has_badge(STREAK_7));
        assert!(matches!(
            outcome,
            StreakOutcome::Credited { ref badges_awarded, .. } if badges_awarded.len() == 1
        ));

        let mut progress = progress_last_active(1, 6, 6);
        progress.badges.insert(STREAK_3.into());
        let outcome = progress.apply_daily_streak(fixed_now());
        assert!(progress.has_badge(STREAK_7));
        assert!(matches!(
            outcome,
            StreakOutcome::Credited { ref badges_awarded, .. }
                if badges_awarded == &vec![BadgeId::from(STREAK_7)]
        ));
    }

    #[test]
    fn reset_keeps_earned_streak_badges() {
        let mut progress = progress_last_active(5, 8, 8);
        progress.badges.insert(STREAK_7.into());
        progress.apply_daily_streak(fixed_now());
        assert_eq!(progress.streak.current, 1);
        assert!(progress.has_badge(STREAK_7));
    }
}
