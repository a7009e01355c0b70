//! Tests for `RetryPolicy`.

use super::RetryPolicy;
use std::time::Duration;

mod retry_policy_defaults {
    use super::*;

    #[test]
    fn new_creates_policy_with_defaults() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.max_attempts, RetryPolicy::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.initial_delay, RetryPolicy::DEFAULT_INITIAL_DELAY);
        assert_eq!(policy.max_delay, RetryPolicy::DEFAULT_MAX_DELAY);
        assert!((policy.multiplier - RetryPolicy::DEFAULT_MULTIPLIER).abs() < f64::EPSILON);
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(RetryPolicy::new(), RetryPolicy::default());
    }

    #[test]
    fn default_max_attempts_is_5() {
        assert_eq!(RetryPolicy::DEFAULT_MAX_ATTEMPTS, 5);
    }

    #[test]
    fn default_initial_delay_is_1_second() {
        assert_eq!(RetryPolicy::DEFAULT_INITIAL_DELAY, Duration::from_secs(1));
    }
}

mod retry_policy_builder {
    use super::*;

    #[test]
    fn with_max_attempts_sets_value() {
        let policy = RetryPolicy::new().with_max_attempts(3);
        assert_eq!(policy.max_attempts, 3);
    }

    #[test]
    fn with_max_attempts_zero_falls_back_to_default() {
        let policy = RetryPolicy::new().with_max_attempts(0);
        assert_eq!(policy.max_attempts, RetryPolicy::DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn with_max_attempts_one_means_single_attempt() {
        let policy = RetryPolicy::new().with_max_attempts(1);
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.should_retry(1));
    }

    #[test]
    fn with_multiplier_sets_value() {
        let policy = RetryPolicy::new().with_multiplier(1.5);
        assert!((policy.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "multiplier must be positive")]
    fn with_multiplier_zero_panics() {
        let _ = RetryPolicy::new().with_multiplier(0.0);
    }

    #[test]
    fn builder_chains_correctly() {
        let policy = RetryPolicy::new()
            .with_max_attempts(10)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(30))
            .with_multiplier(3.0);

        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert!((policy.multiplier - 3.0).abs() < f64::EPSILON);
    }
}

mod delay_for_retry {
    use super::*;

    #[test]
    fn first_retry_returns_initial_delay() {
        let policy = RetryPolicy::new().with_initial_delay(Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(0), Duration::from_secs(1));
    }

    #[test]
    fn delays_grow_exponentially() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_secs(1))
            .with_multiplier(2.0);

        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs(8));
    }

    #[test]
    fn delay_is_capped_at_max() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_secs(10))
            .with_max_delay(Duration::from_secs(30))
            .with_multiplier(2.0);

        // Retry 2: 10 * 2^2 = 40 -> capped at 30
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(30));
    }

    #[test]
    fn huge_retry_number_stays_capped() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.delay_for_retry(u32::MAX), RetryPolicy::DEFAULT_MAX_DELAY);
    }

    #[test]
    fn zero_initial_delay_yields_zero() {
        let policy = RetryPolicy::new().with_initial_delay(Duration::ZERO);
        assert_eq!(policy.delay_for_retry(4), Duration::ZERO);
        assert_eq!(policy.delay_for_retry(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn unbounded_max_delay_saturates_instead_of_overflowing() {
        let max = Duration::from_secs(u64::MAX);
        let policy = RetryPolicy::new().with_max_attempts(200).with_max_delay(max);

        assert_eq!(policy.delay_for_retry(63), Duration::from_secs(1 << 63));
        assert_eq!(policy.delay_for_retry(70), max);
        assert_eq!(policy.delay_for_retry(199), max);
        assert_eq!(policy.delay_for_retry(u32::MAX), max);
    }

    #[test]
    fn huge_multiplier_saturates_at_max_delay() {
        let policy = RetryPolicy::new().with_multiplier(f64::MAX);
        assert_eq!(policy.delay_for_retry(3), RetryPolicy::DEFAULT_MAX_DELAY);
    }
}

mod should_retry {
    use super::*;

    #[test]
    fn allows_attempts_below_max() {
        let policy = RetryPolicy::new().with_max_attempts(3);

        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
    }

    #[test]
    fn stops_at_max() {
        let policy = RetryPolicy::new().with_max_attempts(3);

        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }
}
