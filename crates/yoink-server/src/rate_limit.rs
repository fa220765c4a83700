use tokio::time::Instant;

/// Burst capacity of the per-connection submit bucket.
pub const SUBMIT_BURST: f64 = 10.0;
/// Refill rate of the per-connection submit bucket, tokens per second.
pub const SUBMIT_REFILL_PER_SEC: f64 = 5.0;

/// Per-connection token bucket. Applied only to `word:submit`; yoinks use
/// their own per-player cooldown. Starved requests are dropped with no reply.
pub struct SubmitLimiter {
    tokens: f64,
    last_refill: Instant,
    max_tokens: f64,
    refill_rate: f64,
}

impl Default for SubmitLimiter {
    fn default() -> Self {
        Self::new(SUBMIT_BURST, SUBMIT_REFILL_PER_SEC)
    }
}

impl SubmitLimiter {
    pub fn new(max_tokens: f64, refill_rate: f64) -> Self {
        Self {
            tokens: max_tokens,
            last_refill: Instant::now(),
            max_tokens,
            refill_rate,
        }
    }

    /// Consume one token. Returns `false` when the bucket is empty.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
