/// Identifies one scheduled firing of a [`ScheduledTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Bookkeeping for a single-shot timer that is replaced rather than stacked.
///
/// The timer itself runs elsewhere (an iced task); this only decides whether a
/// firing that arrives is still the current one. At most one token is pending,
/// and tokens are never reused, so a firing that raced a cancel is recognised
/// as stale and dropped.
#[derive(Debug, Clone, Default)]
pub struct ScheduledTimer {
    issued: u64,
    pending: Option<TimerToken>,
}

impl ScheduledTimer {
    /// Arm the timer, superseding whatever was pending.
    pub fn schedule(&mut self) -> TimerToken {
        self.issued += 1;
        let token = TimerToken(self.issued);
        self.pending = Some(token);
        token
    }

    /// Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consume the pending firing if `token` is it.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
