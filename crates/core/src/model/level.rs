/// Display rank derived from accumulated XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub level: u32,
    pub title: &'static str,
    pub xp_required: u32,
}

pub const DEPTH_LEVELS: &[DepthLevel] = &[
    DepthLevel {
        level: 1,
        title: "Inbox Explorer",
        xp_required: 0,
    },
    DepthLevel {
        level: 2,
        title: "Workflow Starter",
        xp_required: 50,
    },
    DepthLevel {
        level: 3,
        title: "Task Delegator",
        xp_required: 150,
    },
    DepthLevel {
        level: 4,
        title: "System Operator",
        xp_required: 300,
    },
    DepthLevel {
        level: 5,
        title: "Automation Strategist",
        xp_required: 500,
    },
    DepthLevel {
        level: 6,
        title: "Delegation Architect",
        xp_required: 750,
    },
];

/// Highest level whose threshold `xp` has reached.
#[must_use]
pub fn level_for(xp: u32) -> DepthLevel {
    DEPTH_LEVELS
        .iter()
        .rev()
        .find(|l| xp >= l.xp_required)
        .copied()
        .unwrap_or(DEPTH_LEVELS[0])
}

/// The level after the one `xp` currently sits at, or `None` at the top.
#[must_use]
pub fn next_level(xp: u32) -> Option<DepthLevel> {
    let current = level_for(xp);
    DEPTH_LEVELS
        .iter()
        .find(|l| l.level == current.level + 1)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(49).level, 1);
        assert_eq!(level_for(50).level, 2);
        assert_eq!(level_for(749).title, "Automation Strategist");
        assert_eq!(level_for(10_000).level, 6);
    }

    #[test]
    fn next_level_stops_at_the_top() {
        assert_eq!(next_level(0).unwrap().xp_required, 50);
        assert_eq!(next_level(300).unwrap().level, 5);
        assert!(next_level(750).is_none());
    }
}
