//! Property tests for streak/fatigue derivation under arbitrary tick
//! batching.

use proptest::prelude::*;

use cogniflow_core::{Momentum, MomentumConfig};

proptest! {
    /// Splitting the same total accrual into arbitrary batches never
    /// changes the derived streak: every multiple is counted exactly once.
    #[test]
    fn streak_is_batch_invariant(batches in prop::collection::vec(1u64..4000, 1..40)) {
        let config = MomentumConfig::default();
        let mut batched = Momentum::new(config);
        let mut elapsed = 0u64;
        for batch in &batches {
            batched.on_focus_accrued(elapsed, elapsed + batch);
            elapsed += batch;
        }

        let mut single = Momentum::new(config);
        single.on_focus_accrued(0, elapsed);

        prop_assert_eq!(batched.focus_streak(), single.focus_streak());
        prop_assert_eq!(batched.focus_streak() as u64, elapsed / 1500);
    }

    /// Fatigue never leaves [0, 100] regardless of accrual pattern.
    #[test]
    fn fatigue_stays_clamped(seed in 0u8..=100, batches in prop::collection::vec(1u64..10_000, 1..40)) {
        let mut momentum = Momentum::with_profile(MomentumConfig::default(), 0, seed);
        let mut elapsed = 0u64;
        for batch in &batches {
            momentum.on_focus_accrued(elapsed, elapsed + batch);
            elapsed += batch;
            prop_assert!(momentum.fatigue_level() <= 100);
        }
    }

    /// The per-batch streak delta matches floor(after/1500) - floor(before/1500).
    #[test]
    fn streak_delta_matches_floor_difference(before in 0u64..100_000, advance in 0u64..10_000) {
        let mut momentum = Momentum::new(MomentumConfig::default());
        momentum.on_focus_accrued(0, before);
        let streak_before = momentum.focus_streak();

        momentum.on_focus_accrued(before, before + advance);
        let expected = (before + advance) / 1500 - before / 1500;
        prop_assert_eq!((momentum.focus_streak() - streak_before) as u64, expected);
    }
}
