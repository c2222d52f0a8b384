use super::ReplacementPolicy;

/// Timestamp LRU: the eligible slot with the oldest stamp loses, ties going to
/// the lowest index.
pub struct LruPolicy {
    stamps: Vec<u64>,
}

impl LruPolicy {
    pub fn new(slots: usize) -> Self {
        Self {
            stamps: vec![0; slots],
        }
    }

    pub fn stamp(&self, slot: usize) -> u64 {
        self.stamps[slot]
    }
}

impl ReplacementPolicy for LruPolicy {
    fn touch(&mut self, slot: usize, now: u64) {
        self.stamps[slot] = now;
    }

    fn victim(&mut self, eligible: &dyn Fn(usize) -> bool) -> Option<usize> {
        let mut victim: Option<usize> = None;
        for slot in (0..self.stamps.len()).filter(|&s| eligible(s)) {
            // Strict comparison keeps the first slot found on ties.
            if victim.is_none_or(|v| self.stamps[slot] < self.stamps[v]) {
                victim = Some(slot);
            }
        }
        victim
    }
}
