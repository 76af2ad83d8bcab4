use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Delay between a pointer release and the save it triggers, so a drop has
/// finished reordering before the snapshot is taken.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(50);

/// Deferred saves. Scheduling never cancels an earlier pending save.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay: Duration,
    pending: VecDeque<Instant>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl AutosaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: VecDeque::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.pending.push_back(deadline);
        deadline
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().min().copied()
    }

    /// Remove and count the saves due at `now`.
    pub fn take_due(&mut self, now: Instant) -> usize {
        let before = self.pending.len();
        self.pending.retain(|deadline| *deadline > now);
        before - self.pending.len()
    }

    /// Remove and count every pending save regardless of deadline.
    pub fn take_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_fire_after_delay_without_cancelling() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::default();
        scheduler.schedule(start);
        scheduler.schedule(start + Duration::from_millis(10));
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(49)), 0);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(50)), 1);
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(60))
        );
        assert_eq!(scheduler.take_all(), 1);
        assert_eq!(scheduler.next_deadline(), None);
    }
}
