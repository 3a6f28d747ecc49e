use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::domain::UserId;

// ============== Moderation allow-list ==============

/// Moderators come from configuration; an empty list means nobody can moderate.
pub fn is_moderator(user_id: UserId, moderators: &[i64]) -> bool {
    moderators.contains(&user_id.0)
}

// ============== Rate Limiter (Token Bucket) ==============

#[derive(Clone, Debug)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

/// Outcome of a rate-limit check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, RateDecision::Allowed)
    }

    /// Whole seconds to wait, rounded up; at least 1 when limited.
    pub fn retry_after_secs(self) -> u64 {
        match self {
            RateDecision::Allowed => 0,
            RateDecision::Limited { retry_after } => retry_after.as_secs_f64().ceil().max(1.0) as u64,
        }
    }
}

/// Per-user token bucket over incoming updates.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    enabled: bool,
    max_tokens: f64,
    refill_per_sec: f64,
    buckets: HashMap<UserId, Bucket>,
}

impl RateLimiter {
    pub fn new(enabled: bool, max_tokens: u32, window: Duration) -> Self {
        let max_tokens_f = f64::from(max_tokens.max(1));
        let window_secs = window.as_secs_f64().max(1e-9);

        Self {
            enabled,
            max_tokens: max_tokens_f,
            refill_per_sec: max_tokens_f / window_secs,
            buckets: HashMap::new(),
        }
    }

    pub fn check(&mut self, user_id: UserId) -> RateDecision {
        self.check_at(user_id, Instant::now())
    }

    pub fn check_at(&mut self, user_id: UserId, now: Instant) -> RateDecision {
        if !self.enabled {
            return RateDecision::Allowed;
        }

        let bucket = self.buckets.entry(user_id).or_insert_with(|| Bucket {
            tokens: self.max_tokens,
            last_update: now,
        });

        let elapsed = now.duration_since(bucket.last_update).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.max_tokens);
        bucket.last_update = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return RateDecision::Allowed;
        }

        let secs = (1.0 - bucket.tokens) / self.refill_per_sec;
        RateDecision::Limited {
            retry_after: Duration::from_secs_f64(secs.max(0.0)),
        }
    }

    /// Forget users whose bucket would be full again by `now`. Returns how many were dropped.
    pub fn prune_at(&mut self, now: Instant) -> usize {
        let before = self.buckets.len();
        let (max, rate) = (self.max_tokens, self.refill_per_sec);
        self.buckets.retain(|_, b| {
            let elapsed = now.duration_since(b.last_update).as_secs_f64();
            b.tokens + elapsed * rate < max
        });
        before - self.buckets.len()
    }

    pub fn prune(&mut self) -> usize {
        self.prune_at(Instant::now())
    }

    pub fn tracked_users(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_refills_over_the_window() {
        let start = Instant::now();
        let mut rl = RateLimiter::new(true, 2, Duration::from_secs(10));
        let u = UserId(1);

        assert!(rl.check_at(u, start).is_allowed());
        assert!(rl.check_at(u, start).is_allowed());
        let denied = rl.check_at(u, start);
        assert!(!denied.is_allowed());
        assert_eq!(denied.retry_after_secs(), 5);

        // 2 tokens / 10s: one token back after 5s.
        assert!(rl.check_at(u, start + Duration::from_secs(5)).is_allowed());
        // Other users have their own bucket.
        assert!(rl.check_at(UserId(2), start).is_allowed());
    }

    #[test]
    fn disabled_limiter_always_allows() {
        let start = Instant::now();
        let mut rl = RateLimiter::new(false, 1, Duration::from_secs(60));
        for _ in 0..10 {
            assert_eq!(rl.check_at(UserId(1), start), RateDecision::Allowed);
        }
        assert_eq!(rl.tracked_users(), 0);
    }

    #[test]
    fn prune_drops_refilled_buckets_only() {
        let start = Instant::now();
        let mut rl = RateLimiter::new(true, 4, Duration::from_secs(4));
        rl.check_at(UserId(1), start);
        for _ in 0..4 {
            rl.check_at(UserId(2), start + Duration::from_secs(2));
        }

        let dropped = rl.prune_at(start + Duration::from_secs(3));
        assert_eq!(dropped, 1);
        assert_eq!(rl.tracked_users(), 1);
    }

    #[test]
    fn moderators_come_from_the_allow_list() {
        assert!(is_moderator(UserId(7), &[5, 7]));
        assert!(!is_moderator(UserId(8), &[5, 7]));
        assert!(!is_moderator(UserId(8), &[]));
    }
}
