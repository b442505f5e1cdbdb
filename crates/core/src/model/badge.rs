use crate::model::ids::BadgeId;

/// Rule under which a badge is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeCriteria {
    /// Every section of the named module has been read.
    ModuleComplete(&'static str),
    /// Any module quiz answered fully correct on the first try.
    PerfectAny,
    /// Every module quiz answered fully correct on the first try, course finished.
    PerfectAll,
    /// Every catalog module complete.
    AllModules,
    /// Daily streak reached the given length.
    Streak(u32),
    /// A module finished inside the fast-completion window.
    Speed,
}

impl BadgeCriteria {
    /// Stable tag used when presenting criteria to the UI.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            BadgeCriteria::ModuleComplete(module) => (*module).to_owned(),
            BadgeCriteria::PerfectAny => "perfect-any".to_owned(),
            BadgeCriteria::PerfectAll => "perfect-all".to_owned(),
            BadgeCriteria::AllModules => "all-modules".to_owned(),
            BadgeCriteria::Streak(days) => format!("streak-{days}"),
            BadgeCriteria::Speed => "speed".to_owned(),
        }
    }
}

/// Static catalog entry for an earnable badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub criteria: BadgeCriteria,
}

impl Badge {
    #[must_use]
    pub fn badge_id(&self) -> BadgeId {
        BadgeId::from(self.id)
    }
}

pub const PERFECT_QUIZ: &str = "perfect-quiz";
pub const ALL_PERFECT: &str = "all-perfect";
pub const COURSE_COMPLETE: &str = "course-complete";
pub const STREAK_3: &str = "streak-3";
pub const STREAK_7: &str = "streak-7";
pub const SPEED_DEMON: &str = "speed-demon";

const fn module_badge_entry(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    module: &'static str,
) -> Badge {
    Badge {
        id,
        name,
        description,
        icon,
        criteria: BadgeCriteria::ModuleComplete(module),
    }
}

pub const BADGES: &[Badge] = &[
    module_badge_entry(
        "first-delegate",
        "First Delegate",
        "Complete Module 1",
        "M1",
        "module-1",
    ),
    module_badge_entry(
        "outcome-thinker",
        "Outcome Thinker",
        "Complete Module 2",
        "M2",
        "module-2",
    ),
    module_badge_entry(
        "mode-switcher",
        "Mode Switcher",
        "Complete Module 3",
        "M3",
        "module-3",
    ),
    module_badge_entry(
        "playbook-builder",
        "Playbook Builder",
        "Complete Module 4",
        "M4",
        "module-4",
    ),
    module_badge_entry(
        "skill-spotter",
        "Skill Spotter",
        "Complete Module 5",
        "M5",
        "module-5",
    ),
    module_badge_entry(
        "context-curator",
        "Context Curator",
        "Complete Module 6",
        "M6",
        "module-6",
    ),
    module_badge_entry(
        "team-scaler",
        "Team Scaler",
        "Complete Module 7",
        "M7",
        "module-7",
    ),
    module_badge_entry(
        "workflow-author",
        "Workflow Author",
        "Complete Module 8",
        "M8",
        "module-8",
    ),
    Badge {
        id: PERFECT_QUIZ,
        name: "Precision Pass",
        description: "Get 100% on any quiz (first try)",
        icon: "100",
        criteria: BadgeCriteria::PerfectAny,
    },
    Badge {
        id: ALL_PERFECT,
        name: "Zero-Guess Legend",
        description: "Get 100% on all quizzes (first try)",
        icon: "ALL",
        criteria: BadgeCriteria::PerfectAll,
    },
    Badge {
        id: COURSE_COMPLETE,
        name: "Delegation Certified",
        description: "Complete all 8 modules",
        icon: "CERT",
        criteria: BadgeCriteria::AllModules,
    },
    Badge {
        id: STREAK_3,
        name: "3-Day Flow",
        description: "3-day learning streak",
        icon: "D3",
        criteria: BadgeCriteria::Streak(3),
    },
    Badge {
        id: STREAK_7,
        name: "7-Day Rhythm",
        description: "7-day learning streak",
        icon: "D7",
        criteria: BadgeCriteria::Streak(7),
    },
    Badge {
        id: SPEED_DEMON,
        name: "Quick Sprint",
        description: "Complete a module in under 10 minutes",
        icon: "FAST",
        criteria: BadgeCriteria::Speed,
    },
];

#[must_use]
pub fn badge_by_id(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// Completion badge for a module, if the catalog defines one.
#[must_use]
pub fn module_badge(module: &str) -> Option<&'static Badge> {
    BADGES
        .iter()
        .find(|b| matches!(b.criteria, BadgeCriteria::ModuleComplete(m) if m == module))
}

/// True for badges the normalizer re-derives from completion state.
#[must_use]
pub fn is_completion_badge(id: &str) -> bool {
    badge_by_id(id).is_some_and(|b| {
        matches!(
            b.criteria,
            BadgeCriteria::ModuleComplete(_) | BadgeCriteria::AllModules
        )
    })
}
