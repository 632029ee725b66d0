use std::num::NonZeroU32;
use std::time::Duration;

use super::adapter::Retrying;
use super::classify::RetryAll;
use super::error::PolicyError;

/// Attempt budget, including the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attempts {
    /// Stop after this many attempts.
    Bounded(NonZeroU32),
    /// Keep retrying until success or a non-retryable failure.
    #[default]
    Unbounded,
}

impl Attempts {
    /// A finite budget. Zero is rejected: at least one attempt is always made.
    pub fn bounded(n: u32) -> Result<Self, PolicyError> {
        NonZeroU32::new(n)
            .map(Attempts::Bounded)
            .ok_or(PolicyError::ZeroAttempts)
    }

    /// Integer convention used by config files and the CLI: any negative
    /// count means unbounded, zero is rejected.
    pub fn from_count(n: i64) -> Result<Self, PolicyError> {
        if n < 0 {
            return Ok(Attempts::Unbounded);
        }
        let n = u32::try_from(n).map_err(|_| PolicyError::TooManyAttempts(n))?;
        Self::bounded(n)
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Attempts::Unbounded)
    }
}

/// Immutable backoff configuration.
///
/// The wait before attempt `n + 1` follows
/// `interval_0 = initial_interval`,
/// `interval_{k+1} = min(interval_k * multiplier + addend, max_interval)`.
/// A run never mutates the policy; the evolving interval lives in
/// [`RetryState`](super::RetryState).
#[derive(Debug, Clone)]
pub struct BackoffPolicy<C = RetryAll> {
    max_attempts: Attempts,
    initial_interval: Duration,
    multiplier: f64,
    addend: Duration,
    max_interval: Option<Duration>,
    classifier: C,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Attempts::Unbounded,
            initial_interval: Duration::ZERO,
            multiplier: 1.0,
            addend: Duration::ZERO,
            max_interval: None,
            classifier: RetryAll,
        }
    }
}

impl BackoffPolicy {
    pub fn builder() -> BackoffPolicyBuilder {
        BackoffPolicyBuilder::default()
    }
}

impl<C> BackoffPolicy<C> {
    pub fn max_attempts(&self) -> Attempts {
        self.max_attempts
    }

    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn addend(&self) -> Duration {
        self.addend
    }

    pub fn max_interval(&self) -> Option<Duration> {
        self.max_interval
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Same numbers, different notion of which failures are retryable.
    pub fn with_classifier<D>(self, classifier: D) -> BackoffPolicy<D> {
        BackoffPolicy {
            max_attempts: self.max_attempts,
            initial_interval: self.initial_interval,
            multiplier: self.multiplier,
            addend: self.addend,
            max_interval: self.max_interval,
            classifier,
        }
    }

    /// Bind a function to this policy; see [`Retrying`].
    pub fn wrap<F>(self, f: F) -> Retrying<F, C> {
        Retrying::new(self, f)
    }

    /// One step of the recurrence: multiply, then add, then clamp.
    /// Saturates at `Duration::MAX` rather than overflowing.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let scaled = scale(current, self.multiplier);
        let grown = scaled.saturating_add(self.addend);
        match self.max_interval {
            Some(cap) => grown.min(cap),
            None => grown,
        }
    }

    /// The waits this policy would perform against an operation that never
    /// succeeds: `max_attempts - 1` items when bounded, endless otherwise.
    pub fn intervals(&self) -> Intervals<'_, C> {
        let remaining = match self.max_attempts {
            Attempts::Bounded(n) => Some(n.get() - 1),
            Attempts::Unbounded => None,
        };
        Intervals {
            policy: self,
            current: self.initial_interval,
            remaining,
        }
    }
}

fn scale(d: Duration, factor: f64) -> Duration {
    // Whole factors stay in integer nanoseconds; only fractional ones go through f64.
    if factor.fract() == 0.0 && factor <= f64::from(u32::MAX) {
        return d.saturating_mul(factor as u32);
    }
    Duration::try_from_secs_f64(d.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// Iterator returned by [`BackoffPolicy::intervals`].
#[derive(Debug, Clone)]
pub struct Intervals<'a, C> {
    policy: &'a BackoffPolicy<C>,
    current: Duration,
    remaining: Option<u32>,
}

impl<C> Iterator for Intervals<'_, C> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let wait = self.current;
        self.current = self.policy.next_interval(wait);
        Some(wait)
    }
}

/// Validating builder for [`BackoffPolicy`]. Fallible setters return the
/// builder inside a `Result` so invalid parameters never reach a run.
#[derive(Debug, Clone)]
pub struct BackoffPolicyBuilder {
    policy: BackoffPolicy,
}

impl Default for BackoffPolicyBuilder {
    fn default() -> Self {
        Self {
            policy: BackoffPolicy::default(),
        }
    }
}

impl BackoffPolicyBuilder {
    pub fn max_attempts(mut self, attempts: Attempts) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    /// Shorthand for `max_attempts(Attempts::bounded(n)?)`.
    pub fn tries(self, n: u32) -> Result<Self, PolicyError> {
        Ok(self.max_attempts(Attempts::bounded(n)?))
    }

    pub fn initial_interval(mut self, interval: Duration) -> Self {
        self.policy.initial_interval = interval;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Result<Self, PolicyError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(PolicyError::InvalidMultiplier(multiplier));
        }
        self.policy.multiplier = multiplier;
        Ok(self)
    }

    pub fn addend(mut self, addend: Duration) -> Self {
        self.policy.addend = addend;
        self
    }

    pub fn max_interval(mut self, cap: Option<Duration>) -> Self {
        self.policy.max_interval = cap;
        self
    }

    pub fn build(self) -> BackoffPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(v: &[u64]) -> Vec<Duration> {
        v.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    #[test]
    fn zero_attempts_rejected() {
        assert_eq!(Attempts::bounded(0), Err(PolicyError::ZeroAttempts));
        assert_eq!(Attempts::from_count(0), Err(PolicyError::ZeroAttempts));
    }

    #[test]
    fn negative_count_is_unbounded() {
        assert_eq!(Attempts::from_count(-1), Ok(Attempts::Unbounded));
        assert_eq!(Attempts::from_count(-42), Ok(Attempts::Unbounded));
        assert!(matches!(Attempts::from_count(3), Ok(Attempts::Bounded(n)) if n.get() == 3));
    }

    #[test]
    fn count_above_u32_rejected() {
        let n = i64::from(u32::MAX) + 1;
        assert_eq!(Attempts::from_count(n), Err(PolicyError::TooManyAttempts(n)));
    }

    #[test]
    fn defaults_never_grow() {
        let p = BackoffPolicy::default();
        assert!(p.max_attempts().is_unbounded());
        let waits: Vec<_> = p.intervals().take(5).collect();
        assert_eq!(waits, vec![Duration::ZERO; 5]);
    }

    #[test]
    fn multiplier_doubles() {
        let p = BackoffPolicy::builder()
            .tries(4)
            .unwrap()
            .initial_interval(Duration::from_secs(1))
            .multiplier(2.0)
            .unwrap()
            .build();
        assert_eq!(p.intervals().collect::<Vec<_>>(), secs(&[1, 2, 4]));
    }

    #[test]
    fn addend_is_capped() {
        let p = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(1))
            .addend(Duration::from_secs(1))
            .max_interval(Some(Duration::from_secs(3)))
            .build();
        assert_eq!(p.intervals().take(4).collect::<Vec<_>>(), secs(&[1, 2, 3, 3]));
    }

    #[test]
    fn multiply_happens_before_add() {
        // (1 * 3) + 2 = 5, then (5 * 3) + 2 = 17; add-then-multiply would give 9.
        let p = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(1))
            .multiplier(3.0)
            .unwrap()
            .addend(Duration::from_secs(2))
            .build();
        assert_eq!(p.intervals().take(3).collect::<Vec<_>>(), secs(&[1, 5, 17]));
    }

    #[test]
    fn cap_applies_to_every_update_but_not_initial() {
        let p = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(10))
            .max_interval(Some(Duration::from_secs(3)))
            .build();
        assert_eq!(p.intervals().take(3).collect::<Vec<_>>(), secs(&[10, 3, 3]));
    }

    #[test]
    fn zero_multiplier_leaves_only_addend() {
        let p = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(8))
            .multiplier(0.0)
            .unwrap()
            .addend(Duration::from_secs(1))
            .build();
        assert_eq!(p.intervals().take(3).collect::<Vec<_>>(), secs(&[8, 1, 1]));
    }

    #[test]
    fn invalid_multiplier_rejected() {
        for m in [-1.0, f64::NAN, f64::INFINITY] {
            let err = BackoffPolicy::builder().multiplier(m).unwrap_err();
            assert!(matches!(err, PolicyError::InvalidMultiplier(_)));
        }
    }

    #[test]
    fn growth_saturates_instead_of_panicking() {
        let p = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(u64::MAX / 2))
            .multiplier(1e6)
            .unwrap()
            .addend(Duration::MAX)
            .build();
        assert_eq!(p.next_interval(p.initial_interval()), Duration::MAX);

        let capped = BackoffPolicy::builder()
            .initial_interval(Duration::from_secs(u64::MAX / 2))
            .multiplier(1e6)
            .unwrap()
            .max_interval(Some(Duration::from_secs(60)))
            .build();
        assert_eq!(capped.next_interval(capped.initial_interval()), Duration::from_secs(60));
    }

    #[test]
    fn whole_multiplier_keeps_nanoseconds() {
        let p = BackoffPolicy::builder().multiplier(2.0).unwrap().build();
        assert_eq!(
            p.next_interval(Duration::new(1_000_000_000, 1)),
            Duration::new(2_000_000_000, 2)
        );
        let p = BackoffPolicy::builder().multiplier(3.0).unwrap().build();
        assert_eq!(p.next_interval(Duration::from_nanos(7)), Duration::from_nanos(21));
    }

    #[test]
    fn fractional_multiplier_still_scales() {
        let p = BackoffPolicy::builder().multiplier(1.5).unwrap().build();
        assert_eq!(p.next_interval(Duration::from_secs(2)), Duration::from_secs(3));
    }

    #[test]
    fn single_attempt_has_no_waits() {
        let p = BackoffPolicy::builder().tries(1).unwrap().build();
        assert_eq!(p.intervals().count(), 0);
    }
}
