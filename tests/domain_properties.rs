//! Property tests for CPF normalization and the entitlement limit.

use proptest::prelude::*;
use proptest::test_runner::Config;

use trainer_hub::domain::subscription::{
    evaluate, Action, EntitlementBasis, FREE_TIER_STUDENT_LIMIT,
};
use trainer_hub::domain::trainer::Cpf;

/// Inserts a separator after every third digit, cycling through `separators`.
fn masked(digits: &str, separators: &[char]) -> String {
    digits
        .chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let sep = (i % 3 == 2).then(|| separators[(i / 3) % separators.len()]);
            std::iter::once(c).chain(sep)
        })
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn cpf_keeps_only_the_eleven_digits(
        digits in "[0-9]{11}",
        separators in prop::collection::vec(prop::sample::select(vec!['.', '-', ' ', '/']), 1..4)
    ) {
        let raw = masked(&digits, &separators);
        let cpf = Cpf::parse(&raw).expect("cpf parse");
        prop_assert_eq!(cpf.digits(), digits.as_str());
        prop_assert_eq!(Cpf::parse(&cpf.formatted()).expect("reparse"), cpf);
    }

    #[test]
    fn cpf_with_wrong_digit_count_is_rejected(digits in "[0-9]{1,10}|[0-9]{12,20}") {
        prop_assert!(Cpf::parse(&digits).is_err());
    }

    #[test]
    fn plan_allows_exactly_below_the_limit(limit in 0_u32..500, count in 0_u32..600) {
        let basis = EntitlementBasis::Plan {
            plan_name: "Pro".to_string(),
            students_count: count,
            student_limit: limit,
        };
        let decision = evaluate(Action::CreateStudent, &basis);
        prop_assert_eq!(decision.is_allowed(), count < limit);
    }

    #[test]
    fn free_tier_boundary_is_five(active in 0_u32..50) {
        let basis = EntitlementBasis::FreeTier { active_students: active };
        let decision = evaluate(Action::CreateStudent, &basis);
        prop_assert_eq!(decision.is_allowed(), active < FREE_TIER_STUDENT_LIMIT);
    }

    #[test]
    fn unlimited_actions_are_always_allowed(count in 0_u32..1000, limit in 0_u32..10) {
        let basis = EntitlementBasis::Plan {
            plan_name: "Pro".to_string(),
            students_count: count,
            student_limit: limit,
        };
        prop_assert!(evaluate(Action::CreateWorkout, &basis).is_allowed());
        prop_assert!(evaluate(Action::CreateDiet, &basis).is_allowed());
    }
}
