use super::ReplacementPolicy;

/// Cyclic victim pointer. Every slot examined moves the pointer forward, the
/// chosen victim included, so the next search resumes right after it.
pub struct RoundRobinPolicy {
    next: usize,
    slots: usize,
}

impl RoundRobinPolicy {
    pub fn new(slots: usize) -> Self {
        Self { next: 0, slots }
    }

    /// Slot the next search starts from.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl ReplacementPolicy for RoundRobinPolicy {
    fn touch(&mut self, _slot: usize, _now: u64) {}

    fn victim(&mut self, eligible: &dyn Fn(usize) -> bool) -> Option<usize> {
        for _ in 0..self.slots {
            let slot = self.next;
            self.next = (self.next + 1) % self.slots;
            if eligible(slot) {
                return Some(slot);
            }
        }
        None
    }
}
