//! Entitlement rules.
//!
//! Only student creation is limited. Workouts, diets and anything else a
//! trainer does are always allowed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Students a trainer may keep without an entitled subscription.
pub const FREE_TIER_STUDENT_LIMIT: u32 = 5;

/// Something a trainer asks to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateStudent,
    CreateWorkout,
    CreateDiet,
    Other,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateStudent => "create_student",
            Action::CreateWorkout => "create_workout",
            Action::CreateDiet => "create_diet",
            Action::Other => "other",
        }
    }

    /// Returns true if the action counts against a plan limit.
    pub fn is_limited(&self) -> bool {
        matches!(self, Action::CreateStudent)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    /// Unrecognized names parse as `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "create_student" => Action::CreateStudent,
            "create_workout" => Action::CreateWorkout,
            "create_diet" => Action::CreateDiet,
            _ => Action::Other,
        })
    }
}

/// What the trainer's limit is measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementBasis {
    /// An entitled subscription exists; its denormalized counter applies.
    Plan {
        plan_name: String,
        students_count: u32,
        student_limit: u32,
    },
    /// No entitled subscription; active students are counted directly.
    FreeTier { active_students: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    PlanLimitReached {
        plan_name: String,
        current: u32,
        limit: u32,
    },
    FreeTierLimitReached { current: u32, limit: u32 },
    /// Subscription state could not be read.
    Unavailable,
}

impl DenialReason {
    /// Text shown to the trainer.
    pub fn message(&self) -> String {
        match self {
            DenialReason::PlanLimitReached {
                plan_name, limit, ..
            } => format!(
                "Your {} plan allows up to {} students. Upgrade your plan to add more.",
                plan_name, limit
            ),
            DenialReason::FreeTierLimitReached { limit, .. } => format!(
                "The free tier allows up to {} students. Subscribe to a plan to add more.",
                limit
            ),
            DenialReason::Unavailable => {
                "Could not verify your subscription. Please try again later.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementDecision {
    Allowed,
    Denied(DenialReason),
}

impl EntitlementDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EntitlementDecision::Allowed)
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        match self {
            EntitlementDecision::Allowed => None,
            EntitlementDecision::Denied(reason) => Some(reason),
        }
    }
}

/// Decides whether `action` fits within `basis`.
///
/// The comparison is strict: a trainer at exactly the limit is denied.
pub fn evaluate(action: Action, basis: &EntitlementBasis) -> EntitlementDecision {
    if !action.is_limited() {
        return EntitlementDecision::Allowed;
    }
    match basis {
        EntitlementBasis::Plan {
            plan_name,
            students_count,
            student_limit,
        } => {
            if students_count < student_limit {
                EntitlementDecision::Allowed
            } else {
                EntitlementDecision::Denied(DenialReason::PlanLimitReached {
                    plan_name: plan_name.clone(),
                    current: *students_count,
                    limit: *student_limit,
                })
            }
        }
        EntitlementBasis::FreeTier { active_students } => {
            if *active_students < FREE_TIER_STUDENT_LIMIT {
                EntitlementDecision::Allowed
            } else {
                EntitlementDecision::Denied(DenialReason::FreeTierLimitReached {
                    current: *active_students,
                    limit: FREE_TIER_STUDENT_LIMIT,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(count: u32, limit: u32) -> EntitlementBasis {
        EntitlementBasis::Plan {
            plan_name: "Pro".to_string(),
            students_count: count,
            student_limit: limit,
        }
    }

    #[test]
    fn plan_under_limit_allows() {
        assert!(evaluate(Action::CreateStudent, &plan(9, 10)).is_allowed());
    }

    #[test]
    fn plan_at_limit_denies() {
        let decision = evaluate(Action::CreateStudent, &plan(10, 10));
        assert_eq!(
            decision.denial(),
            Some(&DenialReason::PlanLimitReached {
                plan_name: "Pro".to_string(),
                current: 10,
                limit: 10,
            })
        );
    }

    #[test]
    fn plan_over_limit_denies() {
        assert!(!evaluate(Action::CreateStudent, &plan(12, 10)).is_allowed());
    }

    #[test]
    fn free_tier_allows_four() {
        let basis = EntitlementBasis::FreeTier { active_students: 4 };
        assert!(evaluate(Action::CreateStudent, &basis).is_allowed());
    }

    #[test]
    fn free_tier_denies_at_five() {
        let basis = EntitlementBasis::FreeTier { active_students: 5 };
        assert!(matches!(
            evaluate(Action::CreateStudent, &basis),
            EntitlementDecision::Denied(DenialReason::FreeTierLimitReached { current: 5, limit: 5 })
        ));
    }

    #[test]
    fn unlimited_actions_always_allowed() {
        let full = plan(10, 10);
        for action in [Action::CreateWorkout, Action::CreateDiet, Action::Other] {
            assert!(evaluate(action, &full).is_allowed());
        }
    }

    #[test]
    fn action_parses_unknown_as_other() {
        assert_eq!("create_student".parse::<Action>(), Ok(Action::CreateStudent));
        assert_eq!("export_pdf".parse::<Action>(), Ok(Action::Other));
    }

    #[test]
    fn denial_message_mentions_limit() {
        let reason = DenialReason::FreeTierLimitReached { current: 5, limit: 5 };
        assert!(reason.message().contains("5 students"));
    }
}
