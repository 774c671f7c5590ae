use proptest::prelude::*;
use waypoint_tokens::{TokenBudget, TokenCounter};

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::default();
        let combined = format!("{a}{b}");
        let count_combined = counter.count(&combined);
        let sum = counter.count(&a) + counter.count(&b);
        prop_assert!(count_combined <= sum + 1, "{} > {} + 1", count_combined, sum);
    }

    #[test]
    fn scaled_never_exceeds_cap(tokens in 0usize..10_000, kept in 0usize..500, extra in 0usize..500, cap in 0usize..5_000) {
        let total = kept + extra;
        prop_assert!(TokenBudget::scaled(tokens, kept, total, cap) <= cap);
    }
}
