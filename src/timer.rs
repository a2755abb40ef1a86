//! One-shot spawn timer driven by the session clock.
//!
//! Managers own their timers, so cancelling on reset is a field write: a
//! timer armed in one session can never fire into the next.

#[derive(Clone, Debug, Default)]
pub struct SpawnTimer {
    due_at_ms: Option<f64>,
}

impl SpawnTimer {
    pub fn idle() -> Self {
        Self { due_at_ms: None }
    }

    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.due_at_ms = Some(now_ms + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_at_ms.is_some()
    }

    pub fn due_at(&self) -> Option<f64> {
        self.due_at_ms
    }

    /// Returns the passed deadline once, disarming the timer. Re-arm from
    /// that deadline rather than from `now_ms` to keep a fixed period.
    pub fn fire(&mut self, now_ms: f64) -> Option<f64> {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                Some(due)
            }
            _ => None,
        }
    }
}
