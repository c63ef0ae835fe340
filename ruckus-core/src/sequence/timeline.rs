//! Pending sequence steps with absolute deadlines

use heapless::Deque;

use super::steps::{Sequence, Step, MAX_STEPS};

/// Steps waiting for their deadline, earliest first
///
/// Deadlines are absolute milliseconds on the caller's monotonic clock.
#[derive(Debug, Default)]
pub struct Timeline {
    pending: Deque<(u64, Step), MAX_STEPS>,
}

impl Timeline {
    /// Create an empty timeline
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Schedule `sequence` starting at `now_ms`, dropping anything pending
    pub fn start(&mut self, sequence: &Sequence, now_ms: u64) {
        self.pending.clear();
        for timed in sequence.steps() {
            // Sequence length is bounded by MAX_STEPS
            let _ = self
                .pending
                .push_back((now_ms + u64::from(timed.offset_ms), timed.step));
        }
    }

    /// Take the next step if its deadline has passed
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Step> {
        match self.pending.front() {
            Some((deadline, _)) if *deadline <= now_ms => {
                self.pending.pop_front().map(|(_, step)| step)
            }
            _ => None,
        }
    }

    /// Drop every pending step
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Deadline of the next pending step
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.front().map(|(deadline, _)| *deadline)
    }

    /// Whether no steps are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending steps
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;

    #[test]
    fn test_deadlines_are_absolute() {
        let mut timeline = Timeline::new();
        timeline.start(&Sequence::flash(Glyph::Surprised), 10_000);
        assert_eq!(timeline.next_deadline(), Some(10_000));
        assert_eq!(timeline.pop_due(10_000), Some(Step::Show(Glyph::Surprised)));
        assert_eq!(timeline.next_deadline(), Some(11_500));
    }

    #[test]
    fn test_clear() {
        let mut timeline = Timeline::new();
        timeline.start(&Sequence::address("42"), 0);
        timeline.clear();
        assert!(timeline.is_empty());
        assert_eq!(timeline.next_deadline(), None);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timeline = Timeline::new();
        timeline.start(&Sequence::flash(Glyph::Surprised), 0);
        timeline.pop_due(0);
        assert_eq!(timeline.pop_due(1499), None);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.pop_due(1500), Some(Step::Restore));
        assert!(timeline.is_empty());
        assert_eq!(timeline.next_deadline(), None);
    }

    #[test]
    fn test_late_poll_drains_in_order() {
        let mut timeline = Timeline::new();
        timeline.start(&Sequence::address("42"), 0);
        let mut steps = std::vec::Vec::new();
        while let Some(step) = timeline.pop_due(60_000) {
            steps.push(step);
        }
        assert_eq!(
            steps,
            [
                Step::Show(Glyph::Clear),
                Step::Show(Glyph::Four),
                Step::Show(Glyph::Clear),
                Step::Show(Glyph::Two),
                Step::Show(Glyph::Clear),
                Step::Restore,
            ]
        );
    }

    #[test]
    fn test_start_replaces_pending() {
        let mut timeline = Timeline::new();
        timeline.start(&Sequence::address("255"), 0);
        timeline.start(&Sequence::flash(Glyph::Surprised), 100);
        assert_eq!(timeline.len(), 2);
    }
}
